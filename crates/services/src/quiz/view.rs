use std::collections::HashMap;

use talk100_core::grading;
use talk100_core::model::{InputMode, Question, SessionId};

use super::service::{AnswerFeedback, QuizAnswerResult, QuizService, StartedQuiz};
use crate::error::QuizError;

/// UI-level phase for the current question: still answering, or viewing
/// post-answer feedback. This lives in the view-model, not in the persisted
/// session, which only tracks position and completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizPhase {
    Solving,
    Grading,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizOutcome {
    Continue,
    Completed,
}

/// Drives one quiz run for a page: question cursor mirror, solving/grading
/// phase, and the latest feedback to render.
pub struct QuizVm {
    quiz: StartedQuiz,
    position: usize,
    phase: QuizPhase,
    last_feedback: Option<AnswerFeedback>,
    last_passed: bool,
    completed: bool,
}

impl QuizVm {
    #[must_use]
    pub fn new(quiz: StartedQuiz) -> Self {
        Self {
            quiz,
            position: 0,
            phase: QuizPhase::Solving,
            last_feedback: None,
            last_passed: false,
            completed: false,
        }
    }

    #[must_use]
    pub fn session_id(&self) -> &SessionId {
        &self.quiz.session_id
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn input_mode(&self) -> InputMode {
        self.quiz.input_mode
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.quiz.questions.get(self.position)
    }

    #[must_use]
    pub fn question_number(&self) -> usize {
        self.position + 1
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.quiz.questions.len()
    }

    #[must_use]
    pub fn last_feedback(&self) -> Option<&AnswerFeedback> {
        self.last_feedback.as_ref()
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Submit affordance: every keyword field has something in it.
    #[must_use]
    pub fn can_submit(&self, keyword_inputs: &HashMap<String, String>) -> bool {
        self.current_question()
            .is_some_and(|q| grading::are_all_keywords_filled(keyword_inputs, &q.keywords))
    }

    /// Keyboard mode flips to grading on its own once every field validates;
    /// no explicit submit needed. Questions without keywords never auto-pass.
    #[must_use]
    pub fn ready_to_auto_grade(&self, keyword_inputs: &HashMap<String, String>) -> bool {
        self.phase == QuizPhase::Solving
            && self.current_question().is_some_and(|q| {
                !q.keywords.is_empty()
                    && grading::are_all_keywords_correct(keyword_inputs, &q.keywords)
            })
    }

    /// Grade the typed answer and move to the grading phase.
    ///
    /// # Errors
    ///
    /// Propagates `QuizError` from the service; grading itself cannot fail.
    pub async fn submit_keyboard(
        &mut self,
        service: &QuizService,
        keyword_inputs: &HashMap<String, String>,
    ) -> Result<&AnswerFeedback, QuizError> {
        let Some(question) = self.current_question().cloned() else {
            return Err(QuizError::SessionExpired);
        };
        let result = service
            .answer_keyboard(&self.quiz.session_id, &question, keyword_inputs)
            .await?;
        Ok(self.record_result(result))
    }

    /// Grade the final transcript and move to the grading phase.
    ///
    /// # Errors
    ///
    /// Propagates `QuizError` from the service; grading itself cannot fail.
    pub async fn submit_voice(
        &mut self,
        service: &QuizService,
        transcript: &str,
    ) -> Result<&AnswerFeedback, QuizError> {
        let Some(question) = self.current_question().cloned() else {
            return Err(QuizError::SessionExpired);
        };
        let result = service
            .answer_voice(&self.quiz.session_id, &question, transcript)
            .await?;
        Ok(self.record_result(result))
    }

    fn record_result(&mut self, result: QuizAnswerResult) -> &AnswerFeedback {
        self.phase = QuizPhase::Grading;
        self.last_passed = result.passed();
        self.completed = result.quiz_completed;
        self.last_feedback.insert(result.feedback)
    }

    /// Leave the grading phase: advance after a pass, retry after a miss.
    pub fn next(&mut self) -> QuizOutcome {
        if self.completed {
            return QuizOutcome::Completed;
        }
        if self.last_passed && self.position + 1 < self.quiz.questions.len() {
            self.position += 1;
        }
        self.phase = QuizPhase::Solving;
        self.last_feedback = None;
        self.last_passed = false;
        QuizOutcome::Continue
    }

    /// Switch between voice and keyboard entry mid-run.
    ///
    /// # Errors
    ///
    /// Propagates `QuizError` from the service.
    pub fn switch_input_mode(
        &mut self,
        service: &QuizService,
        mode: InputMode,
    ) -> Result<(), QuizError> {
        if !service.switch_input_mode(&self.quiz.session_id, mode)? {
            return Err(QuizError::SessionExpired);
        }
        self.quiz.input_mode = mode;
        Ok(())
    }
}
