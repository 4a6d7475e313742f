use std::sync::Arc;

use crate::api::{DayProgressDto, QuestionApi};
use crate::error::ApiError;

/// One dashboard row: completion for a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayProgressRow {
    pub day: u32,
    pub completed: u32,
    pub total: u32,
    pub percentage: u8,
}

/// Presentation-agnostic progress dashboard data.
///
/// No pre-formatted strings; the UI decides how to render days and
/// percentages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressBoard {
    pub rows: Vec<DayProgressRow>,
    pub completed: u32,
    pub total: u32,
    pub percentage: u8,
}

impl ProgressBoard {
    /// Build the board from per-day counts, ordered by day.
    #[must_use]
    pub fn from_rows(days: &[DayProgressDto]) -> Self {
        let mut rows: Vec<DayProgressRow> = days
            .iter()
            .map(|dto| DayProgressRow {
                day: dto.day,
                completed: dto.completed_questions.min(dto.total_questions),
                total: dto.total_questions,
                percentage: percentage(
                    dto.completed_questions.min(dto.total_questions),
                    dto.total_questions,
                ),
            })
            .collect();
        rows.sort_by_key(|row| row.day);

        let completed = rows.iter().map(|row| row.completed).sum();
        let total = rows.iter().map(|row| row.total).sum();
        Self {
            rows,
            completed,
            total,
            percentage: percentage(completed, total),
        }
    }

    /// Days the learner has fully finished.
    #[must_use]
    pub fn finished_days(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| row.total > 0 && row.completed == row.total)
            .count()
    }
}

fn percentage(completed: u32, total: u32) -> u8 {
    if total == 0 {
        0
    } else {
        (f64::from(completed) / f64::from(total) * 100.0).round() as u8
    }
}

/// Fetches dashboard data from the backend.
#[derive(Clone)]
pub struct StatsService {
    api: Arc<dyn QuestionApi>,
}

impl StatsService {
    #[must_use]
    pub fn new(api: Arc<dyn QuestionApi>) -> Self {
        Self { api }
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the progress fetch fails.
    pub async fn load_board(&self) -> Result<ProgressBoard, ApiError> {
        let days = self.api.fetch_progress().await?;
        Ok(ProgressBoard::from_rows(&days))
    }
}
