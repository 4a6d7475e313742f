use serde::{Deserialize, Serialize};

use talk100_core::model::{Question, QuestionId, QuestionType, QuizCategory};

use crate::error::ApiError;

/// Wire shape of one question as the backend serves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDto {
    pub question_id: u64,
    pub day: u32,
    pub category_id: i64,
    pub question_type: String,
    pub question_text: String,
    pub answer_text: String,
    /// Second dialogue line of the prompt, present for dialogue questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_text_b: Option<String>,
    /// Second dialogue line of the answer, present for dialogue questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_text_b: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub is_wrong_answer: bool,
}

impl QuestionDto {
    /// Convert the wire record into the domain `Question`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Decode` for an unknown category id or question
    /// type.
    pub fn into_question(self) -> Result<Question, ApiError> {
        let category = QuizCategory::try_from(self.category_id)
            .map_err(|err| ApiError::Decode(err.to_string()))?;
        let question_type = parse_question_type(&self.question_type)?;

        Ok(Question {
            id: QuestionId::new(self.question_id),
            day: self.day,
            category,
            question_type,
            prompt: join_dialogue(self.question_text, self.question_text_b),
            answer: join_dialogue(self.answer_text, self.answer_text_b),
            keywords: self.keywords,
            audio: self.audio,
            is_favorite: self.is_favorite,
            is_wrong_answer: self.is_wrong_answer,
        })
    }
}

fn parse_question_type(raw: &str) -> Result<QuestionType, ApiError> {
    match raw {
        "short" => Ok(QuestionType::Short),
        "long" => Ok(QuestionType::Long),
        "dialogue" => Ok(QuestionType::Dialogue),
        other => Err(ApiError::Decode(format!("unknown question type: {other}"))),
    }
}

fn join_dialogue(first: String, second: Option<String>) -> String {
    match second {
        Some(second) if !second.trim().is_empty() => format!("{first}\n{second}"),
        _ => first,
    }
}

/// Per-day completion counts for the progress dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayProgressDto {
    pub day: u32,
    pub completed_questions: u32,
    pub total_questions: u32,
}

/// Body for recording a single graded attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct AttemptBody {
    pub question_id: u64,
    pub is_correct: bool,
}

/// Body for submitting a finished (or abandoned) run's progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ProgressBody {
    pub category_id: i64,
    pub day: u32,
    pub completed: usize,
    pub total: usize,
}

/// Body for mirroring a preference flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct FlagBody {
    pub flagged: bool,
}
