//! Persisted quiz session state.
//!
//! One session tracks one run through an ordered question list: cursor,
//! completion set, input mode, and locally toggled preference sets. Records
//! live in the key-value substrate as JSON under a namespaced key, so the
//! serialization format is controlled in this one module.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use talk100_core::Clock;
use talk100_core::model::{CategoryError, InputMode, QuestionId, QuizCategory, SessionId};

use crate::substrate::{KeyValueStore, StorageError};

/// Prefix for every session key. No other component writes keys under it.
const SESSION_KEY_PREFIX: &str = "talk100.session.";

fn session_key(id: &SessionId) -> String {
    format!("{SESSION_KEY_PREFIX}{id}")
}

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Errors from session creation.
///
/// Only creation can fail on input: an unrecognized category id is a caller
/// bug and is rejected. Every other operation signals "session gone" with a
/// `false`/`None` result instead of an error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionStoreError {
    #[error(transparent)]
    Category(#[from] CategoryError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

//
// ─── RECORD ────────────────────────────────────────────────────────────────────
//

/// Derived completion snapshot carried on the record for cheap display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionProgress {
    pub completed: usize,
    pub total: usize,
    pub percentage: u8,
}

impl SessionProgress {
    fn from_counts(completed: usize, total: usize) -> Self {
        let percentage = if total == 0 {
            0
        } else {
            (completed as f64 / total as f64 * 100.0).round() as u8
        };
        Self {
            completed,
            total,
            percentage,
        }
    }
}

/// Question ids the learner has flagged locally, mirrored to the backend by
/// the service layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(default)]
    pub favorite_ids: Vec<QuestionId>,
    #[serde(default)]
    pub starred_ids: Vec<QuestionId>,
}

/// Persisted shape of one quiz session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: SessionId,
    pub category: QuizCategory,
    pub day: u32,
    /// Fixed for the session's lifetime.
    pub question_ids: Vec<QuestionId>,
    pub current_question_index: usize,
    pub current_question_id: Option<QuestionId>,
    /// Grows monotonically; duplicates are never stored.
    pub completed_question_ids: Vec<QuestionId>,
    pub input_mode: InputMode,
    /// Defaulted on load: records written before this field existed.
    #[serde(default)]
    pub user_preferences: UserPreferences,
    pub progress: SessionProgress,
    pub started_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Cursor sits on the final question of the list.
    #[must_use]
    pub fn is_at_last_question(&self) -> bool {
        self.current_question_index + 1 == self.question_ids.len()
    }

    /// Complete means both: cursor at the last index, and every question in
    /// the completed set. Reaching the end without finishing the final
    /// question's grading is not complete.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.is_at_last_question()
            && self.completed_question_ids.len() == self.question_ids.len()
    }

    fn recompute_progress(&mut self) {
        self.progress = SessionProgress::from_counts(
            self.completed_question_ids.len(),
            self.question_ids.len(),
        );
    }
}

//
// ─── PATCHES ───────────────────────────────────────────────────────────────────
//

/// Partial update to the preference sets. Merged one level deep so a
/// favorites update does not clobber stars, and vice versa.
#[derive(Debug, Clone, Default)]
pub struct PreferencesPatch {
    pub favorite_ids: Option<Vec<QuestionId>>,
    pub starred_ids: Option<Vec<QuestionId>>,
}

/// Partial update to a session record. `session_id`, `category`, and
/// `question_ids` are fixed at creation and cannot be patched.
#[derive(Debug, Clone, Default)]
pub struct SessionPatch {
    pub day: Option<u32>,
    pub current_question_index: Option<usize>,
    pub current_question_id: Option<Option<QuestionId>>,
    pub completed_question_ids: Option<Vec<QuestionId>>,
    pub input_mode: Option<InputMode>,
    pub progress: Option<SessionProgress>,
    pub user_preferences: Option<PreferencesPatch>,
}

impl SessionPatch {
    fn apply(self, record: &mut SessionRecord) {
        if let Some(day) = self.day {
            record.day = day;
        }
        if let Some(index) = self.current_question_index {
            record.current_question_index = index;
        }
        if let Some(id) = self.current_question_id {
            record.current_question_id = id;
        }
        if let Some(completed) = self.completed_question_ids {
            record.completed_question_ids = completed;
        }
        if let Some(mode) = self.input_mode {
            record.input_mode = mode;
        }
        if let Some(progress) = self.progress {
            record.progress = progress;
        }
        if let Some(prefs) = self.user_preferences {
            if let Some(favorites) = prefs.favorite_ids {
                record.user_preferences.favorite_ids = favorites;
            }
            if let Some(starred) = prefs.starred_ids {
                record.user_preferences.starred_ids = starred;
            }
        }
    }
}

//
// ─── STORE ─────────────────────────────────────────────────────────────────────
//

/// Creates, persists, mutates, and queries quiz sessions over the substrate.
///
/// Mutations report `Ok(false)` when the session does not exist; `Err` is
/// reserved for substrate faults. Callers branch on the boolean to present
/// "session expired" behavior uniformly.
#[derive(Clone)]
pub struct SessionStore {
    kv: Arc<dyn KeyValueStore>,
    clock: Clock,
}

impl SessionStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            clock: Clock::default(),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Create and persist a fresh session, returning its id.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError::Category` for an unrecognized category id,
    /// or `SessionStoreError::Storage` if the record cannot be written.
    pub fn create_session(
        &self,
        category_id: i64,
        day: u32,
        question_ids: Vec<QuestionId>,
        input_mode: InputMode,
    ) -> Result<SessionId, SessionStoreError> {
        let category = QuizCategory::try_from(category_id)?;
        let session_id = SessionId::generate();
        let total = question_ids.len();

        let record = SessionRecord {
            session_id: session_id.clone(),
            category,
            day,
            current_question_id: question_ids.first().copied(),
            question_ids,
            current_question_index: 0,
            completed_question_ids: Vec::new(),
            input_mode,
            user_preferences: UserPreferences::default(),
            progress: SessionProgress::from_counts(0, total),
            started_at: self.clock.now(),
        };

        self.save(&record)?;
        Ok(session_id)
    }

    /// Read a session, or `None` if absent or unreadable.
    ///
    /// A corrupt persisted record is logged and treated as "session gone",
    /// never a fatal error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only if the substrate itself cannot be read.
    pub fn get_session(&self, id: &SessionId) -> Result<Option<SessionRecord>, StorageError> {
        let Some(raw) = self.kv.get(&session_key(id))? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(record) => Ok(Some(record)),
            Err(err) => {
                log::warn!("discarding corrupt session record {id}: {err}");
                Ok(None)
            }
        }
    }

    /// Merge a partial update into an existing session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on substrate faults.
    pub fn update_session(
        &self,
        id: &SessionId,
        patch: SessionPatch,
    ) -> Result<bool, StorageError> {
        let Some(mut record) = self.get_session(id)? else {
            return Ok(false);
        };
        patch.apply(&mut record);
        self.save(&record)?;
        Ok(true)
    }

    /// Advance the cursor to the next question.
    ///
    /// Returns `Ok(false)`, leaving the record untouched, when the cursor
    /// already sits on the last question: the quiz is finished, there is no
    /// clamping or wrapping. The progress snapshot is recomputed from the
    /// completions recorded so far; progress tracks "done", not "visited".
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on substrate faults.
    pub fn move_to_next_question(&self, id: &SessionId) -> Result<bool, StorageError> {
        let Some(mut record) = self.get_session(id)? else {
            return Ok(false);
        };
        let next = record.current_question_index + 1;
        if next >= record.question_ids.len() {
            return Ok(false);
        }

        record.current_question_index = next;
        record.current_question_id = record.question_ids.get(next).copied();
        record.recompute_progress();
        self.save(&record)?;
        Ok(true)
    }

    /// Add a question to the completed set. Idempotent: marking a question
    /// twice leaves a single occurrence and reports success.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on substrate faults.
    pub fn mark_question_completed(
        &self,
        id: &SessionId,
        question_id: QuestionId,
    ) -> Result<bool, StorageError> {
        let Some(mut record) = self.get_session(id)? else {
            return Ok(false);
        };
        if record.completed_question_ids.contains(&question_id) {
            return Ok(true);
        }

        record.completed_question_ids.push(question_id);
        record.recompute_progress();
        self.save(&record)?;
        Ok(true)
    }

    /// # Errors
    ///
    /// Returns `StorageError` on substrate faults.
    pub fn is_quiz_completed(&self, id: &SessionId) -> Result<bool, StorageError> {
        Ok(self
            .get_session(id)?
            .is_some_and(|record| record.is_completed()))
    }

    /// Flip a question's membership in the favorites set.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on substrate faults.
    pub fn toggle_favorite(
        &self,
        id: &SessionId,
        question_id: QuestionId,
    ) -> Result<bool, StorageError> {
        self.toggle_preference(id, question_id, |prefs| &mut prefs.favorite_ids)
    }

    /// Flip a question's membership in the wrong-answer star set.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on substrate faults.
    pub fn toggle_star(
        &self,
        id: &SessionId,
        question_id: QuestionId,
    ) -> Result<bool, StorageError> {
        self.toggle_preference(id, question_id, |prefs| &mut prefs.starred_ids)
    }

    fn toggle_preference(
        &self,
        id: &SessionId,
        question_id: QuestionId,
        select: impl FnOnce(&mut UserPreferences) -> &mut Vec<QuestionId>,
    ) -> Result<bool, StorageError> {
        let Some(mut record) = self.get_session(id)? else {
            return Ok(false);
        };
        let set = select(&mut record.user_preferences);
        if let Some(pos) = set.iter().position(|entry| *entry == question_id) {
            set.remove(pos);
        } else {
            set.push(question_id);
        }
        self.save(&record)?;
        Ok(true)
    }

    /// # Errors
    ///
    /// Returns `StorageError` on substrate faults.
    pub fn update_input_mode(
        &self,
        id: &SessionId,
        mode: InputMode,
    ) -> Result<bool, StorageError> {
        self.update_session(
            id,
            SessionPatch {
                input_mode: Some(mode),
                ..SessionPatch::default()
            },
        )
    }

    /// Remove the persisted record. Idempotent: deleting an absent session
    /// still reports success.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on substrate faults.
    pub fn delete_session(&self, id: &SessionId) -> Result<bool, StorageError> {
        self.kv.remove(&session_key(id))?;
        Ok(true)
    }

    fn save(&self, record: &SessionRecord) -> Result<(), StorageError> {
        let raw = serde_json::to_string(record)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        self.kv.set(&session_key(&record.session_id), &raw)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
