mod app_settings;
mod category;
mod ids;
mod question;

pub use app_settings::{AppSettings, AppSettingsDraft, AppSettingsError, Theme};
pub use category::{CategoryError, InputMode, QuizCategory};
pub use ids::{ParseIdError, QuestionId, SessionId};
pub use question::{Question, QuestionType};
