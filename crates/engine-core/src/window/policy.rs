use crate::error::PolicyError;
use chrono::NaiveDate;
use model::window::ExtractionCursor;
use serde::Serialize;

pub const DEFAULT_EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(2010, 1, 1) {
    Some(date) => date,
    None => NaiveDate::MIN,
};
pub const DEFAULT_INITIAL_WINDOW_DAYS: u32 = 180;
pub const DEFAULT_MIN_WINDOW_DAYS: u32 = 1;
pub const DEFAULT_SHRINK_FACTOR: u32 = 2;
pub const DEFAULT_RETRY_LIMIT: u32 = 3;

/// Validated, immutable parameters of the window controller.
///
/// Fields are private so a policy can only be obtained through [`WindowPolicy::new`],
/// which guarantees `min_window_days >= 1`, `shrink_factor >= 2`,
/// `retry_limit >= 1` and `initial_window_days >= min_window_days`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WindowPolicy {
    epoch: NaiveDate,
    initial_window_days: u32,
    min_window_days: u32,
    shrink_factor: u32,
    retry_limit: u32,
}

impl WindowPolicy {
    pub fn new(
        epoch: NaiveDate,
        initial_window_days: u32,
        min_window_days: u32,
        shrink_factor: u32,
        retry_limit: u32,
    ) -> Result<Self, PolicyError> {
        if min_window_days < 1 {
            return Err(PolicyError::MinWindowTooSmall(min_window_days));
        }
        if shrink_factor < 2 {
            return Err(PolicyError::ShrinkFactorTooSmall(shrink_factor));
        }
        if retry_limit < 1 {
            return Err(PolicyError::RetryLimitTooSmall(retry_limit));
        }
        if initial_window_days < min_window_days {
            return Err(PolicyError::InitialBelowMinimum {
                initial: initial_window_days,
                min: min_window_days,
            });
        }

        Ok(WindowPolicy {
            epoch,
            initial_window_days,
            min_window_days,
            shrink_factor,
            retry_limit,
        })
    }

    pub fn epoch(&self) -> NaiveDate {
        self.epoch
    }

    pub fn initial_window_days(&self) -> u32 {
        self.initial_window_days
    }

    pub fn min_window_days(&self) -> u32 {
        self.min_window_days
    }

    pub fn shrink_factor(&self) -> u32 {
        self.shrink_factor
    }

    pub fn retry_limit(&self) -> u32 {
        self.retry_limit
    }

    pub fn initial_cursor(&self) -> ExtractionCursor {
        ExtractionCursor::new(self.epoch, self.initial_window_days)
    }

    /// Next smaller window size, floored at the minimum.
    pub fn shrink(&self, window_days: u32) -> u32 {
        (window_days / self.shrink_factor).max(self.min_window_days)
    }
}

impl Default for WindowPolicy {
    fn default() -> Self {
        WindowPolicy {
            epoch: DEFAULT_EPOCH,
            initial_window_days: DEFAULT_INITIAL_WINDOW_DAYS,
            min_window_days: DEFAULT_MIN_WINDOW_DAYS,
            shrink_factor: DEFAULT_SHRINK_FACTOR,
            retry_limit: DEFAULT_RETRY_LIMIT,
        }
    }
}
