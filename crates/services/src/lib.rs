#![forbid(unsafe_code)]

pub mod api;
pub mod app_state;
pub mod error;
pub mod quiz;
pub mod settings_service;
pub mod stats;
pub mod voice;

pub use talk100_core::Clock;

pub use api::{DayProgressDto, HttpQuestionApi, QuestionApi, QuestionDto};
pub use app_state::{AppAction, AppState, AppStateStore, AppView, UserProfile};
pub use error::{ApiError, BootstrapError, QuizError, SettingsError};
pub use quiz::{
    AnswerFeedback, QuizAnswerResult, QuizOutcome, QuizPhase, QuizService, QuizVm, StartedQuiz,
};
pub use settings_service::SettingsService;
pub use stats::{DayProgressRow, ProgressBoard, StatsService};
pub use voice::{CaptureEnd, CapturedTranscript, TranscriptEvent, VoiceCapture};
