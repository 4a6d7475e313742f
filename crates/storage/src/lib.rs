#![forbid(unsafe_code)]

pub mod session_store;
pub mod sqlite;
pub mod substrate;

pub use session_store::{
    PreferencesPatch, SessionPatch, SessionProgress, SessionRecord, SessionStore,
    SessionStoreError, UserPreferences,
};
pub use sqlite::{SqliteInitError, SqliteStore};
pub use substrate::{InMemoryStore, KeyValueStore, StorageError};
