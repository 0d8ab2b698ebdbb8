use chrono::NaiveDate;
use connectors::{
    file::csv::error::FileError,
    sql::base::error::{ConnectorError, DbError},
};
use thiserror::Error;

/// Failure of a single window attempt. Always recoverable by the controller.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Aggregate query failed: {0}")]
    Query(#[from] DbError),

    #[error("Export failed: {0}")]
    Write(#[from] FileError),
}

/// Run-level failures.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Failed to connect to the source database: {0}")]
    Connection(#[from] ConnectorError),

    #[error(
        "Retries exhausted at {resume_from} with a {window_days}-day window after {attempts} attempts: {last_error}"
    )]
    Exhausted {
        resume_from: NaiveDate,
        window_days: u32,
        attempts: u32,
        last_error: String,
    },

    #[error("Extraction cancelled, resume from {resume_from}")]
    Cancelled { resume_from: NaiveDate },

    #[error("Window of {window_days} days starting {start} is outside the supported date range")]
    InvalidWindow { start: NaiveDate, window_days: u32 },
}

impl ExtractionError {
    /// Date a manual rerun should use as its epoch, when the run stopped mid-range.
    pub fn resume_from(&self) -> Option<NaiveDate> {
        match self {
            ExtractionError::Exhausted { resume_from, .. }
            | ExtractionError::Cancelled { resume_from } => Some(*resume_from),
            ExtractionError::InvalidWindow { start, .. } => Some(*start),
            ExtractionError::Connection(_) => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("Minimum window size must be at least 1 day, got {0}")]
    MinWindowTooSmall(u32),

    #[error("Shrink factor must be at least 2, got {0}")]
    ShrinkFactorTooSmall(u32),

    #[error("Retry limit must be at least 1, got {0}")]
    RetryLimitTooSmall(u32),

    #[error("Initial window size ({initial} days) is below the minimum ({min} days)")]
    InitialBelowMinimum { initial: u32, min: u32 },
}
