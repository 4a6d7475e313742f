use serde::{Deserialize, Serialize};

use crate::model::{QuestionId, QuizCategory};

//
// ─── QUESTION TYPES ────────────────────────────────────────────────────────────
//

/// Shape of a question's answer text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    /// Single short sentence.
    Short,
    /// Longer passage, still a single speaker.
    Long,
    /// Two-line dialogue; prompt and answer each carry both lines.
    Dialogue,
}

/// One quiz question as served by the backend.
///
/// Read-only to the client core: questions are fetched, presented, and graded
/// against, never mutated. The per-learner `is_favorite` / `is_wrong_answer`
/// flags reflect backend state at fetch time; local toggles live in the
/// session's preference sets until mirrored back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub day: u32,
    pub category: QuizCategory,
    pub question_type: QuestionType,
    /// Source-language prompt shown to the learner.
    pub prompt: String,
    /// Target-language answer the keywords come from.
    pub answer: String,
    /// Ordered list of required keywords for grading.
    pub keywords: Vec<String>,
    /// Audio file name, if the question ships narration.
    pub audio: Option<String>,
    pub is_favorite: bool,
    pub is_wrong_answer: bool,
}

impl Question {
    #[must_use]
    pub fn has_audio(&self) -> bool {
        self.audio.as_deref().is_some_and(|name| !name.is_empty())
    }
}
