use connectors::sql::base::error::{ConnectorError, DbError};
use engine_config::settings::error::SettingsError;
use engine_runtime::error::RunError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid configuration: {0}")]
    Settings(#[from] SettingsError),

    #[error("Extraction failed: {0}")]
    Runner(#[from] RunError),

    #[error("Failed to connect: {0}")]
    Connection(#[from] ConnectorError),

    /// PostgreSQL driver or query error.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] DbError),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),
}

impl CliError {
    pub fn is_shutdown(&self) -> bool {
        matches!(self, CliError::Runner(err) if err.is_cancelled())
    }
}
