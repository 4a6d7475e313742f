//! Client for the talk100 backend REST API.
//!
//! The trait is the seam: services depend on `dyn QuestionApi`, tests and
//! the offline runner substitute their own implementations.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};

use talk100_core::model::{Question, QuestionId, QuizCategory};

use crate::error::ApiError;

mod types;

pub use types::{DayProgressDto, QuestionDto};
use types::{AttemptBody, FlagBody, ProgressBody};

/// Backend operations the client core relies on.
#[async_trait]
pub trait QuestionApi: Send + Sync {
    /// Fetch the ordered question batch for one day of one category.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, status, or decode failures.
    async fn fetch_questions(
        &self,
        category: QuizCategory,
        day: u32,
    ) -> Result<Vec<Question>, ApiError>;

    /// Fetch the learner's wrong-answer questions.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, status, or decode failures.
    async fn fetch_wrong_answers(&self) -> Result<Vec<Question>, ApiError>;

    /// Fetch the learner's favorite questions.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, status, or decode failures.
    async fn fetch_favorites(&self) -> Result<Vec<Question>, ApiError>;

    /// Fetch per-day completion counts for the dashboard.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, status, or decode failures.
    async fn fetch_progress(&self) -> Result<Vec<DayProgressDto>, ApiError>;

    /// Record one graded attempt.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or status failures.
    async fn record_attempt(
        &self,
        question_id: QuestionId,
        is_correct: bool,
    ) -> Result<(), ApiError>;

    /// Report a run's completion counts.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or status failures.
    async fn submit_progress(
        &self,
        category: QuizCategory,
        day: u32,
        completed: usize,
        total: usize,
    ) -> Result<(), ApiError>;

    /// Mirror the favorite flag for a question.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or status failures.
    async fn set_favorite(&self, question_id: QuestionId, flagged: bool) -> Result<(), ApiError>;

    /// Mirror the wrong-answer flag for a question.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or status failures.
    async fn set_wrong_answer(
        &self,
        question_id: QuestionId,
        flagged: bool,
    ) -> Result<(), ApiError>;
}

/// `QuestionApi` over HTTP with an optional bearer token.
#[derive(Clone)]
pub struct HttpQuestionApi {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

impl HttpQuestionApi {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            auth_token: None,
        }
    }

    #[must_use]
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
        let builder = self.client.request(method, url);
        match &self.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn fetch_question_batch(&self, path: &str) -> Result<Vec<Question>, ApiError> {
        let response = self.request(Method::GET, path).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }
        let dtos: Vec<QuestionDto> = response.json().await?;
        dtos.into_iter().map(QuestionDto::into_question).collect()
    }

    async fn send_expecting_ok(&self, builder: RequestBuilder) -> Result<(), ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }
        Ok(())
    }
}

#[async_trait]
impl QuestionApi for HttpQuestionApi {
    async fn fetch_questions(
        &self,
        category: QuizCategory,
        day: u32,
    ) -> Result<Vec<Question>, ApiError> {
        let path = format!("questions?category_id={}&day={day}", category.code());
        self.fetch_question_batch(&path).await
    }

    async fn fetch_wrong_answers(&self) -> Result<Vec<Question>, ApiError> {
        self.fetch_question_batch("questions/wrong-answers").await
    }

    async fn fetch_favorites(&self) -> Result<Vec<Question>, ApiError> {
        self.fetch_question_batch("questions/favorites").await
    }

    async fn fetch_progress(&self) -> Result<Vec<DayProgressDto>, ApiError> {
        let response = self.request(Method::GET, "progress").send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }
        Ok(response.json().await?)
    }

    async fn record_attempt(
        &self,
        question_id: QuestionId,
        is_correct: bool,
    ) -> Result<(), ApiError> {
        let body = AttemptBody {
            question_id: question_id.value(),
            is_correct,
        };
        self.send_expecting_ok(self.request(Method::POST, "attempts").json(&body))
            .await
    }

    async fn submit_progress(
        &self,
        category: QuizCategory,
        day: u32,
        completed: usize,
        total: usize,
    ) -> Result<(), ApiError> {
        let body = ProgressBody {
            category_id: category.code(),
            day,
            completed,
            total,
        };
        self.send_expecting_ok(self.request(Method::POST, "progress").json(&body))
            .await
    }

    async fn set_favorite(&self, question_id: QuestionId, flagged: bool) -> Result<(), ApiError> {
        let path = format!("questions/{question_id}/favorite");
        self.send_expecting_ok(self.request(Method::PUT, &path).json(&FlagBody { flagged }))
            .await
    }

    async fn set_wrong_answer(
        &self,
        question_id: QuestionId,
        flagged: bool,
    ) -> Result<(), ApiError> {
        let path = format!("questions/{question_id}/wrong-answer");
        self.send_expecting_ok(self.request(Method::PUT, &path).json(&FlagBody { flagged }))
            .await
    }
}
