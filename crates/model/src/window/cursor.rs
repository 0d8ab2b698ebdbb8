use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Half-open date interval `[start, end)` covered by one extraction attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Window {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Window {
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// `2020-01-01_to_2020-06-29`, used to name export files.
    pub fn suffix(&self) -> String {
        format!(
            "{}_to_{}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {})",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// Forward-progress pointer of an extraction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionCursor {
    pub current_start: NaiveDate,
    pub window_days: u32,
}

impl ExtractionCursor {
    pub fn new(current_start: NaiveDate, window_days: u32) -> Self {
        ExtractionCursor {
            current_start,
            window_days,
        }
    }

    /// The window this cursor points at, or `None` if its end is not representable.
    pub fn window(&self) -> Option<Window> {
        let end = self
            .current_start
            .checked_add_days(Days::new(u64::from(self.window_days)))?;
        Some(Window {
            start: self.current_start,
            end,
        })
    }

    /// Whether there is still range left to cover before `now`.
    pub fn is_before(&self, now: DateTime<Utc>) -> bool {
        self.current_start.and_time(NaiveTime::MIN).and_utc() < now
    }
}

/// Result of one attempt at a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    Failure,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_window_is_half_open_over_leap_year() {
        let window = ExtractionCursor::new(date(2020, 1, 1), 180).window().unwrap();
        assert_eq!(window.start, date(2020, 1, 1));
        assert_eq!(window.end, date(2020, 6, 29));
        assert_eq!(window.days(), 180);
        assert_eq!(window.to_string(), "[2020-01-01, 2020-06-29)");
        assert_eq!(window.suffix(), "2020-01-01_to_2020-06-29");
    }

    #[test]
    fn test_window_end_overflow() {
        let cursor = ExtractionCursor::new(NaiveDate::MAX, 1);
        assert!(cursor.window().is_none());
    }

    #[test]
    fn test_is_before_compares_midnight() {
        let cursor = ExtractionCursor::new(date(2020, 1, 10), 1);
        let midnight = Utc.with_ymd_and_hms(2020, 1, 10, 0, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2020, 1, 10, 0, 0, 1).unwrap();

        assert!(!cursor.is_before(midnight));
        assert!(cursor.is_before(later));
    }
}
