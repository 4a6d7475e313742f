use std::sync::Arc;

use storage::KeyValueStore;
use talk100_core::model::{AppSettings, AppSettingsDraft};

use crate::error::SettingsError;

/// Key for the single persisted settings record. Outside the session
/// namespace on purpose: only the session store writes session keys.
const SETTINGS_KEY: &str = "talk100.settings";

/// Loads and saves app settings through the key-value substrate.
#[derive(Clone)]
pub struct SettingsService {
    kv: Arc<dyn KeyValueStore>,
}

impl SettingsService {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Load persisted settings, or defaults if missing.
    ///
    /// A corrupt or out-of-range record is logged and replaced by defaults;
    /// settings are never a reason to fail app startup.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Storage` only if the substrate cannot be
    /// read.
    pub fn load(&self) -> Result<AppSettings, SettingsError> {
        let Some(raw) = self.kv.get(SETTINGS_KEY)? else {
            return Ok(AppSettings::default());
        };

        let draft: AppSettingsDraft = match serde_json::from_str(&raw) {
            Ok(draft) => draft,
            Err(err) => {
                log::warn!("discarding corrupt settings record: {err}");
                return Ok(AppSettings::default());
            }
        };
        match draft.validate() {
            Ok(settings) => Ok(settings),
            Err(err) => {
                log::warn!("discarding invalid settings record: {err}");
                Ok(AppSettings::default())
            }
        }
    }

    /// Validate and persist new settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Invalid` if the draft fails validation, or
    /// `SettingsError::Storage` if persistence fails.
    pub fn save(&self, draft: AppSettingsDraft) -> Result<AppSettings, SettingsError> {
        let settings = draft.validate()?;
        let raw = serde_json::to_string(&settings)
            .map_err(|err| storage::StorageError::Serialization(err.to_string()))?;
        self.kv.set(SETTINGS_KEY, &raw)?;
        Ok(settings)
    }
}
