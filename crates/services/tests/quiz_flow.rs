use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use services::{
    ApiError, DayProgressDto, QuestionApi, QuizError, QuizOutcome, QuizPhase, QuizService, QuizVm,
};
use storage::{InMemoryStore, SessionStore};
use talk100_core::model::{
    InputMode, Question, QuestionId, QuestionType, QuizCategory,
};
use talk100_core::time::fixed_clock;

//
// ─── MOCK BACKEND ──────────────────────────────────────────────────────────────
//

#[derive(Default)]
struct MockApi {
    questions: Vec<Question>,
    attempts: Mutex<Vec<(u64, bool)>>,
    favorite_calls: Mutex<Vec<(u64, bool)>>,
    progress_reports: Mutex<Vec<(i64, u32, usize, usize)>>,
}

impl MockApi {
    fn with_questions(questions: Vec<Question>) -> Self {
        Self {
            questions,
            ..Self::default()
        }
    }
}

#[async_trait]
impl QuestionApi for MockApi {
    async fn fetch_questions(
        &self,
        _category: QuizCategory,
        _day: u32,
    ) -> Result<Vec<Question>, ApiError> {
        Ok(self.questions.clone())
    }

    async fn fetch_wrong_answers(&self) -> Result<Vec<Question>, ApiError> {
        Ok(self
            .questions
            .iter()
            .filter(|q| q.is_wrong_answer)
            .cloned()
            .collect())
    }

    async fn fetch_favorites(&self) -> Result<Vec<Question>, ApiError> {
        Ok(self
            .questions
            .iter()
            .filter(|q| q.is_favorite)
            .cloned()
            .collect())
    }

    async fn fetch_progress(&self) -> Result<Vec<DayProgressDto>, ApiError> {
        Ok(Vec::new())
    }

    async fn record_attempt(
        &self,
        question_id: QuestionId,
        is_correct: bool,
    ) -> Result<(), ApiError> {
        self.attempts
            .lock()
            .unwrap()
            .push((question_id.value(), is_correct));
        Ok(())
    }

    async fn submit_progress(
        &self,
        category: QuizCategory,
        day: u32,
        completed: usize,
        total: usize,
    ) -> Result<(), ApiError> {
        self.progress_reports
            .lock()
            .unwrap()
            .push((category.code(), day, completed, total));
        Ok(())
    }

    async fn set_favorite(&self, question_id: QuestionId, flagged: bool) -> Result<(), ApiError> {
        self.favorite_calls
            .lock()
            .unwrap()
            .push((question_id.value(), flagged));
        Ok(())
    }

    async fn set_wrong_answer(
        &self,
        _question_id: QuestionId,
        _flagged: bool,
    ) -> Result<(), ApiError> {
        Ok(())
    }
}

//
// ─── HELPERS ───────────────────────────────────────────────────────────────────
//

fn build_question(id: u64, keywords: &[&str]) -> Question {
    Question {
        id: QuestionId::new(id),
        day: 1,
        category: QuizCategory::Category,
        question_type: QuestionType::Short,
        prompt: format!("prompt {id}"),
        answer: format!("answer {id}"),
        keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
        audio: None,
        is_favorite: false,
        is_wrong_answer: false,
    }
}

fn build_service(questions: Vec<Question>) -> (QuizService, Arc<MockApi>) {
    let api = Arc::new(MockApi::with_questions(questions));
    let api_dyn: Arc<dyn QuestionApi> = api.clone();
    let store = SessionStore::new(Arc::new(InMemoryStore::new())).with_clock(fixed_clock());
    (QuizService::new(store, api_dyn), api)
}

fn correct_inputs(question: &Question) -> HashMap<String, String> {
    question
        .keywords
        .iter()
        .map(|keyword| (keyword.to_lowercase(), keyword.clone()))
        .collect()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[tokio::test]
async fn keyboard_quiz_runs_to_completion() {
    let questions = vec![
        build_question(101, &["interview", "go"]),
        build_question(102, &["point"]),
        build_question(103, &["schedule"]),
    ];
    let (service, api) = build_service(questions.clone());

    let quiz = service
        .start_category_quiz(1, InputMode::Keyboard)
        .await
        .unwrap();
    assert_eq!(quiz.questions.len(), 3);

    for (index, question) in questions.iter().enumerate() {
        let result = service
            .answer_keyboard(&quiz.session_id, question, &correct_inputs(question))
            .await
            .unwrap();
        assert!(result.passed());

        let is_last = index + 1 == questions.len();
        assert_eq!(result.advanced, !is_last);
        assert_eq!(result.quiz_completed, is_last);
    }

    // Every attempt reached the backend, all correct.
    let attempts = api.attempts.lock().unwrap().clone();
    assert_eq!(attempts, vec![(101, true), (102, true), (103, true)]);

    service.finish(&quiz.session_id).await.unwrap();
    let reports = api.progress_reports.lock().unwrap().clone();
    assert_eq!(reports, vec![(1, 1, 3, 3)]);

    // Finishing discards the session.
    assert!(service
        .store()
        .get_session(&quiz.session_id)
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn wrong_answer_does_not_advance() {
    let question = build_question(101, &["point", "interview"]);
    let (service, api) = build_service(vec![question.clone(), build_question(102, &["go"])]);

    let quiz = service
        .start_category_quiz(1, InputMode::Keyboard)
        .await
        .unwrap();

    let mut inputs = correct_inputs(&question);
    inputs.insert("point".to_string(), "pont".to_string());

    let result = service
        .answer_keyboard(&quiz.session_id, &question, &inputs)
        .await
        .unwrap();

    assert!(!result.passed());
    assert!(!result.advanced);
    assert!(!result.quiz_completed);
    assert_eq!(result.feedback.summary().correct_count, 1);

    // The failed attempt still reached the backend.
    assert_eq!(api.attempts.lock().unwrap().clone(), vec![(101, false)]);

    // The session is untouched: cursor on the first question, nothing done.
    let record = service.store().get_session(&quiz.session_id).unwrap().unwrap();
    assert_eq!(record.current_question_index, 0);
    assert!(record.completed_question_ids.is_empty());
}

#[tokio::test]
async fn voice_answers_tolerate_surrounding_words() {
    let question = build_question(101, &["interview", "go"]);
    let (service, _) = build_service(vec![question.clone()]);

    let quiz = service.start_daily_quiz(1, InputMode::Voice).await.unwrap();

    let result = service
        .answer_voice(
            &quiz.session_id,
            &question,
            "well, How did the INTERVIEW go today",
        )
        .await
        .unwrap();

    assert!(result.passed());
    assert!(result.quiz_completed);
}

#[tokio::test]
async fn empty_batch_fails_to_start() {
    let (service, _) = build_service(Vec::new());
    let err = service
        .start_category_quiz(1, InputMode::Keyboard)
        .await
        .unwrap_err();
    assert!(matches!(err, QuizError::Empty));
}

#[tokio::test]
async fn unknown_category_fails_to_start() {
    let (service, _) = build_service(vec![build_question(101, &["go"])]);
    let err = service
        .start_quiz(42, 1, InputMode::Keyboard)
        .await
        .unwrap_err();
    assert!(matches!(err, QuizError::Category(_)));
}

#[tokio::test]
async fn favorite_toggles_mirror_to_backend() {
    let question = build_question(101, &["go"]);
    let (service, api) = build_service(vec![question]);

    let quiz = service
        .start_category_quiz(1, InputMode::Keyboard)
        .await
        .unwrap();
    let question_id = QuestionId::new(101);

    assert!(service
        .toggle_favorite(&quiz.session_id, question_id)
        .await
        .unwrap());
    assert!(service
        .toggle_favorite(&quiz.session_id, question_id)
        .await
        .unwrap());

    // On, then off again.
    let calls = api.favorite_calls.lock().unwrap().clone();
    assert_eq!(calls, vec![(101, true), (101, false)]);
}

#[tokio::test]
async fn vm_walks_phases_through_a_run() {
    let questions = vec![
        build_question(101, &["interview"]),
        build_question(102, &["point"]),
    ];
    let (service, _) = build_service(questions);

    let quiz = service
        .start_category_quiz(1, InputMode::Keyboard)
        .await
        .unwrap();
    let mut vm = QuizVm::new(quiz);

    // Miss the first question once.
    let inputs = HashMap::from([("interview".to_string(), "intervew".to_string())]);
    assert!(vm.can_submit(&inputs));
    assert!(!vm.ready_to_auto_grade(&inputs));
    let feedback = vm.submit_keyboard(&service, &inputs).await.unwrap();
    assert!(!feedback.summary().is_all_correct);
    assert_eq!(vm.phase(), QuizPhase::Grading);

    // Retry stays on the same question.
    assert_eq!(vm.next(), QuizOutcome::Continue);
    assert_eq!(vm.question_number(), 1);

    // Now get it right; auto-grade readiness fires before submit.
    let inputs = HashMap::from([("interview".to_string(), "interview".to_string())]);
    assert!(vm.ready_to_auto_grade(&inputs));
    vm.submit_keyboard(&service, &inputs).await.unwrap();
    assert_eq!(vm.next(), QuizOutcome::Continue);
    assert_eq!(vm.question_number(), 2);

    // Finish the run.
    let inputs = HashMap::from([("point".to_string(), "point".to_string())]);
    vm.submit_keyboard(&service, &inputs).await.unwrap();
    assert!(vm.is_completed());
    assert_eq!(vm.next(), QuizOutcome::Completed);

    service.finish(vm.session_id()).await.unwrap();
}

#[tokio::test]
async fn switching_input_mode_persists() {
    let (service, _) = build_service(vec![build_question(101, &["go"])]);
    let quiz = service
        .start_category_quiz(1, InputMode::Keyboard)
        .await
        .unwrap();

    let mut vm = QuizVm::new(quiz);
    vm.switch_input_mode(&service, InputMode::Voice).unwrap();
    assert_eq!(vm.input_mode(), InputMode::Voice);

    let record = service.store().get_session(vm.session_id()).unwrap().unwrap();
    assert_eq!(record.input_mode, InputMode::Voice);
}
