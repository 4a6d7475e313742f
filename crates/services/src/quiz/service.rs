use std::collections::HashMap;
use std::sync::Arc;

use storage::{SessionStore, StorageError};
use talk100_core::grading::{
    self, GradingSummary, KeyboardGrading, VoiceGrading,
};
use talk100_core::model::{InputMode, Question, QuestionId, QuizCategory, SessionId};

use crate::api::QuestionApi;
use crate::error::QuizError;

//
// ─── RESULTS ───────────────────────────────────────────────────────────────────
//

/// Grading detail for one submitted answer, per input modality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerFeedback {
    Keyboard(KeyboardGrading),
    Voice(VoiceGrading),
}

impl AnswerFeedback {
    #[must_use]
    pub fn summary(&self) -> GradingSummary {
        match self {
            AnswerFeedback::Keyboard(grading) => grading.summary,
            AnswerFeedback::Voice(grading) => grading.summary,
        }
    }
}

/// Outcome of submitting one answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizAnswerResult {
    pub feedback: AnswerFeedback,
    /// The cursor moved to a next question.
    pub advanced: bool,
    /// Every question is completed and the cursor sits on the last one.
    pub quiz_completed: bool,
}

impl QuizAnswerResult {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.feedback.summary().is_all_correct
    }
}

/// A freshly started quiz run: the persisted session plus its question batch.
#[derive(Debug, Clone)]
pub struct StartedQuiz {
    pub session_id: SessionId,
    pub questions: Vec<Question>,
    pub input_mode: InputMode,
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Orchestrates quiz runs: fetch questions, create the session, grade
/// answers, advance, and mirror learner flags to the backend.
#[derive(Clone)]
pub struct QuizService {
    store: SessionStore,
    api: Arc<dyn QuestionApi>,
}

impl QuizService {
    #[must_use]
    pub fn new(store: SessionStore, api: Arc<dyn QuestionApi>) -> Self {
        Self { store, api }
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Start a quiz for the given category id.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Category` for an unrecognized id,
    /// `QuizError::Empty` when the backend has no questions for the
    /// selection, and `QuizError::Api`/`QuizError::Session` for collaborator
    /// failures.
    pub async fn start_quiz(
        &self,
        category_id: i64,
        day: u32,
        input_mode: InputMode,
    ) -> Result<StartedQuiz, QuizError> {
        let category = QuizCategory::try_from(category_id)?;
        let questions = match category {
            QuizCategory::Category | QuizCategory::Daily => {
                self.api.fetch_questions(category, day).await?
            }
            QuizCategory::WrongAnswers => self.api.fetch_wrong_answers().await?,
            QuizCategory::Favorites => self.api.fetch_favorites().await?,
        };
        if questions.is_empty() {
            return Err(QuizError::Empty);
        }

        let question_ids: Vec<QuestionId> = questions.iter().map(|q| q.id).collect();
        let session_id =
            self.store
                .create_session(category.code(), day, question_ids, input_mode)?;

        Ok(StartedQuiz {
            session_id,
            questions,
            input_mode,
        })
    }

    /// Start a regular category quiz over one day.
    ///
    /// # Errors
    ///
    /// See [`QuizService::start_quiz`].
    pub async fn start_category_quiz(
        &self,
        day: u32,
        input_mode: InputMode,
    ) -> Result<StartedQuiz, QuizError> {
        self.start_quiz(QuizCategory::Category.code(), day, input_mode)
            .await
    }

    /// Start the daily quiz.
    ///
    /// # Errors
    ///
    /// See [`QuizService::start_quiz`].
    pub async fn start_daily_quiz(
        &self,
        day: u32,
        input_mode: InputMode,
    ) -> Result<StartedQuiz, QuizError> {
        self.start_quiz(QuizCategory::Daily.code(), day, input_mode)
            .await
    }

    /// Start a personal quiz over previously wrong answers.
    ///
    /// # Errors
    ///
    /// See [`QuizService::start_quiz`].
    pub async fn start_wrong_answer_quiz(
        &self,
        input_mode: InputMode,
    ) -> Result<StartedQuiz, QuizError> {
        self.start_quiz(QuizCategory::WrongAnswers.code(), 0, input_mode)
            .await
    }

    /// Start a personal quiz over favorites.
    ///
    /// # Errors
    ///
    /// See [`QuizService::start_quiz`].
    pub async fn start_favorites_quiz(
        &self,
        input_mode: InputMode,
    ) -> Result<StartedQuiz, QuizError> {
        self.start_quiz(QuizCategory::Favorites.code(), 0, input_mode)
            .await
    }

    /// Grade a keyboard answer and, on full marks, advance the session.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::SessionExpired` if the session record is gone,
    /// or `QuizError::Storage` on substrate faults. Imperfect answers are a
    /// normal result, never an error.
    pub async fn answer_keyboard(
        &self,
        session_id: &SessionId,
        question: &Question,
        keyword_inputs: &HashMap<String, String>,
    ) -> Result<QuizAnswerResult, QuizError> {
        let grading = grading::grade_keyboard_answer(keyword_inputs, &question.keywords);
        self.apply_grading(session_id, question, AnswerFeedback::Keyboard(grading))
            .await
    }

    /// Grade a voice transcript and, on full marks, advance the session.
    ///
    /// # Errors
    ///
    /// See [`QuizService::answer_keyboard`].
    pub async fn answer_voice(
        &self,
        session_id: &SessionId,
        question: &Question,
        transcript: &str,
    ) -> Result<QuizAnswerResult, QuizError> {
        let grading = grading::grade_voice_answer(transcript, &question.keywords);
        self.apply_grading(session_id, question, AnswerFeedback::Voice(grading))
            .await
    }

    async fn apply_grading(
        &self,
        session_id: &SessionId,
        question: &Question,
        feedback: AnswerFeedback,
    ) -> Result<QuizAnswerResult, QuizError> {
        let summary = feedback.summary();

        // Attempts are telemetry: a failed report must not block grading.
        if let Err(err) = self
            .api
            .record_attempt(question.id, summary.is_all_correct)
            .await
        {
            log::warn!("failed to record attempt for question {}: {err}", question.id);
        }

        if !summary.is_all_correct {
            return Ok(QuizAnswerResult {
                feedback,
                advanced: false,
                quiz_completed: false,
            });
        }

        if !self
            .store
            .mark_question_completed(session_id, question.id)?
        {
            return Err(QuizError::SessionExpired);
        }
        let advanced = self.store.move_to_next_question(session_id)?;
        let quiz_completed = self.store.is_quiz_completed(session_id)?;

        Ok(QuizAnswerResult {
            feedback,
            advanced,
            quiz_completed,
        })
    }

    /// Flip the favorite flag locally and mirror it to the backend.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Storage` on substrate faults and `QuizError::Api`
    /// if the mirror call fails.
    pub async fn toggle_favorite(
        &self,
        session_id: &SessionId,
        question_id: QuestionId,
    ) -> Result<bool, QuizError> {
        if !self.store.toggle_favorite(session_id, question_id)? {
            return Ok(false);
        }
        let flagged = self
            .preference_state(session_id, question_id, |record| {
                &record.user_preferences.favorite_ids
            })?;
        self.api.set_favorite(question_id, flagged).await?;
        Ok(true)
    }

    /// Flip the wrong-answer star locally and mirror it to the backend.
    ///
    /// # Errors
    ///
    /// See [`QuizService::toggle_favorite`].
    pub async fn toggle_star(
        &self,
        session_id: &SessionId,
        question_id: QuestionId,
    ) -> Result<bool, QuizError> {
        if !self.store.toggle_star(session_id, question_id)? {
            return Ok(false);
        }
        let flagged = self
            .preference_state(session_id, question_id, |record| {
                &record.user_preferences.starred_ids
            })?;
        self.api.set_wrong_answer(question_id, flagged).await?;
        Ok(true)
    }

    fn preference_state(
        &self,
        session_id: &SessionId,
        question_id: QuestionId,
        select: impl FnOnce(&storage::SessionRecord) -> &Vec<QuestionId>,
    ) -> Result<bool, StorageError> {
        Ok(self
            .store
            .get_session(session_id)?
            .is_some_and(|record| select(&record).contains(&question_id)))
    }

    /// Change how answers are entered mid-run.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Storage` on substrate faults.
    pub fn switch_input_mode(
        &self,
        session_id: &SessionId,
        mode: InputMode,
    ) -> Result<bool, QuizError> {
        Ok(self.store.update_input_mode(session_id, mode)?)
    }

    /// Report the finished run to the backend and discard the session.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::SessionExpired` if the session record is gone,
    /// `QuizError::Api` if the report fails (the session is kept so the
    /// caller can retry), or `QuizError::Storage` on substrate faults.
    pub async fn finish(&self, session_id: &SessionId) -> Result<(), QuizError> {
        let Some(record) = self.store.get_session(session_id)? else {
            return Err(QuizError::SessionExpired);
        };
        self.api
            .submit_progress(
                record.category,
                record.day,
                record.progress.completed,
                record.progress.total,
            )
            .await?;
        self.store.delete_session(session_id)?;
        Ok(())
    }

    /// Discard the session without reporting, as when navigating away.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Storage` on substrate faults.
    pub fn abandon(&self, session_id: &SessionId) -> Result<(), QuizError> {
        self.store.delete_session(session_id)?;
        Ok(())
    }
}
