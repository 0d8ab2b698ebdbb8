use crate::window::Window;
use chrono::{DateTime, NaiveDate, Utc};
use std::path::PathBuf;

/// Emitted when a window completes, whether or not it produced rows.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSucceeded {
    pub window: Window,
    pub rows: usize,
    /// Export file, `None` when the window was empty.
    pub destination: Option<PathBuf>,
    pub timestamp: DateTime<Utc>,
}

/// Emitted for every failed attempt at a window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowFailed {
    pub window: Window,
    /// 1-based attempt number at the current window size.
    pub attempt: u32,
    /// Attempts left at the current window size.
    pub retries_left: u32,
    pub error: String,
    pub timestamp: DateTime<Utc>,
}

/// Emitted when the retry budget at one size is spent and the window shrinks.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowShrunk {
    pub start: NaiveDate,
    pub from_days: u32,
    pub to_days: u32,
    pub timestamp: DateTime<Utc>,
}

/// Emitted once when the minimum window size also ran out of retries.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionExhausted {
    pub window: Window,
    /// Attempts made at this start date across all window sizes.
    pub attempts: u32,
    pub last_error: String,
    pub timestamp: DateTime<Utc>,
}
