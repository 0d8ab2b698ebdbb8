use engine_config::settings::error::SettingsError;
use engine_core::error::ExtractionError;
use thiserror::Error;

/// Top-level errors of an extraction run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

impl RunError {
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            RunError::Extraction(ExtractionError::Cancelled { .. })
        )
    }
}
