use crate::window::policy::WindowPolicy;
use chrono::{DateTime, Utc};
use model::window::{ExtractionCursor, Window};

/// Windows a failure-free run would attempt, in order.
///
/// Stops at the first window whose start is not before `now`, or whose end
/// would overflow the calendar.
#[derive(Debug, Clone)]
pub struct WindowPlan {
    cursor: ExtractionCursor,
    now: DateTime<Utc>,
}

impl WindowPlan {
    pub fn new(policy: &WindowPolicy, now: DateTime<Utc>) -> Self {
        WindowPlan {
            cursor: policy.initial_cursor(),
            now,
        }
    }
}

impl Iterator for WindowPlan {
    type Item = Window;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.cursor.is_before(self.now) {
            return None;
        }
        let window = self.cursor.window()?;
        self.cursor.current_start = window.end;
        Some(window)
    }
}
