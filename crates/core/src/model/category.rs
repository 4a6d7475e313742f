use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Errors for quiz category handling.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CategoryError {
    #[error("unknown quiz category id: {0}")]
    Unknown(i64),
}

//
// ─── QUIZ CATEGORY ─────────────────────────────────────────────────────────────
//

/// The four quiz-selection modes.
///
/// The numeric codes are part of the persisted session format and of the
/// backend API, so they are fixed here rather than derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizCategory {
    /// A regular category quiz over one day of one course.
    Category,
    /// The daily quiz, drawing from the day's questions across categories.
    Daily,
    /// A personal quiz over questions previously answered wrong.
    WrongAnswers,
    /// A personal quiz over questions the learner marked as favorites.
    Favorites,
}

impl QuizCategory {
    /// Returns the wire/storage code for this category.
    #[must_use]
    pub fn code(self) -> i64 {
        match self {
            QuizCategory::Category => 1,
            QuizCategory::Daily => 2,
            QuizCategory::WrongAnswers => 3,
            QuizCategory::Favorites => 4,
        }
    }

    /// True for the two personal quizzes, whose question lists come from
    /// learner flags instead of a day grouping.
    #[must_use]
    pub fn is_personal(self) -> bool {
        matches!(self, QuizCategory::WrongAnswers | QuizCategory::Favorites)
    }
}

impl TryFrom<i64> for QuizCategory {
    type Error = CategoryError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Category),
            2 => Ok(Self::Daily),
            3 => Ok(Self::WrongAnswers),
            4 => Ok(Self::Favorites),
            other => Err(CategoryError::Unknown(other)),
        }
    }
}

//
// ─── INPUT MODE ────────────────────────────────────────────────────────────────
//

/// How the learner supplies an answer: per-keyword typing or free speech.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    Voice,
    Keyboard,
}

impl InputMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            InputMode::Voice => "voice",
            InputMode::Keyboard => "keyboard",
        }
    }
}
