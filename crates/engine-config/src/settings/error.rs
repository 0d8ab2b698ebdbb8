use engine_core::error::PolicyError;
use thiserror::Error;

/// Errors raised while loading or validating run settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read env file {path}: {reason}")]
    EnvFile { path: String, reason: String },

    #[error("Invalid env file: line {line}: {reason}")]
    InvalidEnvLine { line: usize, reason: String },

    /// A required setting was not provided under any accepted name.
    #[error("Missing setting: {0}")]
    Missing(String),

    #[error("Invalid number for {key}: '{value}'")]
    InvalidNumber { key: String, value: String },

    #[error("Invalid date for {key}: '{value}' (expected YYYY-MM-DD)")]
    InvalidDate { key: String, value: String },

    #[error("Unsupported sslmode '{0}' (expected disable, prefer, require or verify-full)")]
    InvalidSslMode(String),

    #[error("Invalid window policy: {0}")]
    Policy(#[from] PolicyError),
}
