use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::model::InputMode;

/// UI color scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

/// Bounds for the voice silence window, in seconds.
const MIN_SILENCE_SECS: u32 = 1;
const MAX_SILENCE_SECS: u32 = 30;

const DEFAULT_SILENCE_SECS: u32 = 3;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AppSettings {
    default_input_mode: InputMode,
    voice_silence_secs: u32,
    theme: Theme,
    api_base_url: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppSettingsDraft {
    pub default_input_mode: Option<InputMode>,
    pub voice_silence_secs: Option<u32>,
    pub theme: Option<Theme>,
    pub api_base_url: Option<String>,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppSettingsError {
    #[error("invalid base URL")]
    InvalidBaseUrl,

    #[error("voice silence window must be between {MIN_SILENCE_SECS} and {MAX_SILENCE_SECS} seconds")]
    InvalidSilenceWindow,
}

impl AppSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and normalize the draft into persisted settings.
    ///
    /// # Errors
    ///
    /// Returns `AppSettingsError` if the base URL is present but invalid, or
    /// if the silence window falls outside its bounds.
    pub fn validate(self) -> Result<AppSettings, AppSettingsError> {
        let api_base_url = normalize_optional(self.api_base_url);

        if let Some(url) = api_base_url.as_ref() {
            if Url::parse(url).is_err() {
                return Err(AppSettingsError::InvalidBaseUrl);
            }
        }

        let voice_silence_secs = self.voice_silence_secs.unwrap_or(DEFAULT_SILENCE_SECS);
        if !(MIN_SILENCE_SECS..=MAX_SILENCE_SECS).contains(&voice_silence_secs) {
            return Err(AppSettingsError::InvalidSilenceWindow);
        }

        Ok(AppSettings {
            default_input_mode: self.default_input_mode.unwrap_or(InputMode::Keyboard),
            voice_silence_secs,
            theme: self.theme.unwrap_or(Theme::Light),
            api_base_url,
        })
    }
}

impl AppSettings {
    #[must_use]
    pub fn default_input_mode(&self) -> InputMode {
        self.default_input_mode
    }

    #[must_use]
    pub fn voice_silence_secs(&self) -> u32 {
        self.voice_silence_secs
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    #[must_use]
    pub fn api_base_url(&self) -> Option<&str> {
        self.api_base_url.as_deref()
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_input_mode: InputMode::Keyboard,
            voice_silence_secs: DEFAULT_SILENCE_SECS,
            theme: Theme::Light,
            api_base_url: None,
        }
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}
