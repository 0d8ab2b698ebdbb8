use engine_core::observer::WindowObserver;
use model::events::{ExtractionExhausted, WindowFailed, WindowShrunk, WindowSucceeded};
use tracing::{error, info, warn};

/// Console reporting of controller progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl WindowObserver for TracingObserver {
    fn on_window_success(&self, event: &WindowSucceeded) {
        match &event.destination {
            Some(path) => info!(
                window = %event.window,
                rows = event.rows,
                path = %path.display(),
                "Exported window"
            ),
            None => info!(window = %event.window, "Window has no measurements, nothing written"),
        }
    }

    fn on_window_failure(&self, event: &WindowFailed) {
        warn!(
            window = %event.window,
            attempt = event.attempt,
            retries_left = event.retries_left,
            error = %event.error,
            "Window attempt failed"
        );
    }

    fn on_shrink(&self, event: &WindowShrunk) {
        warn!(
            start = %event.start,
            from_days = event.from_days,
            to_days = event.to_days,
            "Retries exhausted, shrinking window"
        );
    }

    fn on_exhausted(&self, event: &ExtractionExhausted) {
        error!(
            window = %event.window,
            attempts = event.attempts,
            error = %event.last_error,
            resume_from = %event.window.start,
            "Retries exhausted at the minimum window size, giving up"
        );
    }
}
