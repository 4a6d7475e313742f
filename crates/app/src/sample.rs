//! Bundled offline backend: a small day-1 question set plus no-op report
//! endpoints, so the runner works without a server.

use async_trait::async_trait;

use services::{ApiError, DayProgressDto, QuestionApi};
use talk100_core::model::{Question, QuestionId, QuestionType, QuizCategory};

pub struct SampleApi;

fn question(
    id: u64,
    prompt: &str,
    answer: &str,
    keywords: &[&str],
    question_type: QuestionType,
) -> Question {
    Question {
        id: QuestionId::new(id),
        day: 1,
        category: QuizCategory::Category,
        question_type,
        prompt: prompt.to_string(),
        answer: answer.to_string(),
        keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
        audio: None,
        is_favorite: false,
        is_wrong_answer: false,
    }
}

pub fn sample_questions() -> Vec<Question> {
    vec![
        question(
            101,
            "면접 잘 봤어요?",
            "How did the interview go?",
            &["interview", "go"],
            QuestionType::Short,
        ),
        question(
            102,
            "요점이 뭐예요?",
            "What's your point?",
            &["point"],
            QuestionType::Short,
        ),
        question(
            103,
            "일정 좀 확인해 줄래요?",
            "Could you check the schedule for me?",
            &["check", "schedule"],
            QuestionType::Short,
        ),
        question(
            104,
            "A: 늦어서 미안해요. B: 괜찮아요.",
            "A: Sorry I'm late.\nB: That's all right.",
            &["sorry", "late"],
            QuestionType::Dialogue,
        ),
        question(
            105,
            "그 회의는 내일로 미뤄졌어요.",
            "The meeting was pushed back to tomorrow.",
            &["meeting", "pushed"],
            QuestionType::Long,
        ),
    ]
}

#[async_trait]
impl QuestionApi for SampleApi {
    async fn fetch_questions(
        &self,
        _category: QuizCategory,
        day: u32,
    ) -> Result<Vec<Question>, ApiError> {
        Ok(if day == 1 { sample_questions() } else { Vec::new() })
    }

    async fn fetch_wrong_answers(&self) -> Result<Vec<Question>, ApiError> {
        Ok(Vec::new())
    }

    async fn fetch_favorites(&self) -> Result<Vec<Question>, ApiError> {
        Ok(Vec::new())
    }

    async fn fetch_progress(&self) -> Result<Vec<DayProgressDto>, ApiError> {
        Ok(vec![
            DayProgressDto {
                day: 1,
                completed_questions: 5,
                total_questions: 5,
            },
            DayProgressDto {
                day: 2,
                completed_questions: 2,
                total_questions: 6,
            },
        ])
    }

    async fn record_attempt(
        &self,
        _question_id: QuestionId,
        _is_correct: bool,
    ) -> Result<(), ApiError> {
        Ok(())
    }

    async fn submit_progress(
        &self,
        _category: QuizCategory,
        _day: u32,
        _completed: usize,
        _total: usize,
    ) -> Result<(), ApiError> {
        Ok(())
    }

    async fn set_favorite(&self, _question_id: QuestionId, _flagged: bool) -> Result<(), ApiError> {
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
