use thiserror::Error;

use crate::model::{AppSettingsError, CategoryError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Category(#[from] CategoryError),
    #[error(transparent)]
    Settings(#[from] AppSettingsError),
}
