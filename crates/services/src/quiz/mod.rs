mod service;
mod view;

// Public API of the quiz subsystem.
pub use crate::error::QuizError;
pub use service::{AnswerFeedback, QuizAnswerResult, QuizService, StartedQuiz};
pub use view::{QuizOutcome, QuizPhase, QuizVm};
