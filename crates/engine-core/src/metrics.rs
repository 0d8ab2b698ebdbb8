use crate::observer::WindowObserver;
use model::events::{WindowFailed, WindowShrunk, WindowSucceeded};
use serde::Serialize;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

#[derive(Debug, Default)]
struct InnerMetrics {
    windows_succeeded: AtomicU64,
    empty_windows: AtomicU64,
    rows_exported: AtomicU64,
    files_written: AtomicU64,
    failed_attempts: AtomicU64,
    shrinks: AtomicU64,
}

/// Run counters, fed by the controller through the observer interface.
#[derive(Debug, Clone)]
pub struct Metrics {
    inner: Arc<InnerMetrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub windows_succeeded: u64,
    pub empty_windows: u64,
    pub rows_exported: u64,
    pub files_written: u64,
    pub failed_attempts: u64,
    pub shrinks: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Metrics {
            inner: Arc::new(InnerMetrics::default()),
        }
    }

    pub fn increment_windows(&self, count: u64) {
        self.inner
            .windows_succeeded
            .fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_empty_windows(&self, count: u64) {
        self.inner.empty_windows.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_rows(&self, count: u64) {
        self.inner.rows_exported.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_files(&self, count: u64) {
        self.inner.files_written.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_failures(&self, count: u64) {
        self.inner.failed_attempts.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_shrinks(&self, count: u64) {
        self.inner.shrinks.fetch_add(count, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            windows_succeeded: self.inner.windows_succeeded.load(Ordering::Relaxed),
            empty_windows: self.inner.empty_windows.load(Ordering::Relaxed),
            rows_exported: self.inner.rows_exported.load(Ordering::Relaxed),
            files_written: self.inner.files_written.load(Ordering::Relaxed),
            failed_attempts: self.inner.failed_attempts.load(Ordering::Relaxed),
            shrinks: self.inner.shrinks.load(Ordering::Relaxed),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowObserver for Metrics {
    fn on_window_success(&self, event: &WindowSucceeded) {
        self.increment_windows(1);
        self.increment_rows(event.rows as u64);
        match event.destination {
            Some(_) => self.increment_files(1),
            None => self.increment_empty_windows(1),
        }
    }

    fn on_window_failure(&self, _event: &WindowFailed) {
        self.increment_failures(1);
    }

    fn on_shrink(&self, _event: &WindowShrunk) {
        self.increment_shrinks(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use model::window::Window;
    use std::path::PathBuf;

    fn window() -> Window {
        Window {
            start: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(),
        }
    }

    #[test]
    fn test_counts_exported_and_empty_windows() {
        let metrics = Metrics::new();
        metrics.on_window_success(&WindowSucceeded {
            window: window(),
            rows: 12,
            destination: Some(PathBuf::from("out.csv")),
            timestamp: Utc::now(),
        });
        metrics.on_window_success(&WindowSucceeded {
            window: window(),
            rows: 0,
            destination: None,
            timestamp: Utc::now(),
        });
        metrics.on_window_failure(&WindowFailed {
            window: window(),
            attempt: 1,
            retries_left: 2,
            error: "boom".into(),
            timestamp: Utc::now(),
        });

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.windows_succeeded, 2);
        assert_eq!(snapshot.empty_windows, 1);
        assert_eq!(snapshot.files_written, 1);
        assert_eq!(snapshot.rows_exported, 12);
        assert_eq!(snapshot.failed_attempts, 1);
        assert_eq!(snapshot.shrinks, 0);
    }

    #[test]
    fn test_clones_share_counters() {
        let metrics = Metrics::new();
        let clone = metrics.clone();
        clone.increment_shrinks(2);
        assert_eq!(metrics.snapshot().shrinks, 2);
    }
}
