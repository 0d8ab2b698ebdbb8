use crate::{
    clock::{Clock, SystemClock},
    error::ExtractionError,
    extractor::WindowExtractor,
    observer::{NoopObserver, WindowObserver},
    window::{
        policy::WindowPolicy,
        state::{ControllerState, Phase, transition},
    },
};
use model::{
    events::{ExtractionExhausted, WindowFailed, WindowShrunk, WindowSucceeded},
    window::{AttemptOutcome, ExtractionCursor},
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Where a completed run stopped and how much it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    /// Cursor after the last successful window. Its start is at or past "now".
    pub cursor: ExtractionCursor,
    pub windows: u64,
    pub attempts: u64,
}

/// Walks from the policy epoch to "now" one window at a time.
///
/// Attempts are strictly sequential. Cancellation is observed only between
/// attempts, never while one is in flight.
pub struct WindowController<E> {
    policy: WindowPolicy,
    extractor: E,
    observer: Arc<dyn WindowObserver>,
    clock: Arc<dyn Clock>,
    cancel: CancellationToken,
}

impl<E: WindowExtractor> WindowController<E> {
    pub fn new(policy: WindowPolicy, extractor: E) -> Self {
        WindowController {
            policy,
            extractor,
            observer: Arc::new(NoopObserver),
            clock: Arc::new(SystemClock),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn WindowObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    pub async fn run(&self) -> Result<RunOutcome, ExtractionError> {
        let mut state = ControllerState::initial(&self.policy);
        let mut attempts_at_start: u32 = 0;
        let mut windows = 0u64;
        let mut attempts = 0u64;

        while state.cursor.is_before(self.clock.now()) {
            if self.cancel.is_cancelled() {
                return Err(ExtractionError::Cancelled {
                    resume_from: state.cursor.current_start,
                });
            }

            let window = state
                .cursor
                .window()
                .ok_or(ExtractionError::InvalidWindow {
                    start: state.cursor.current_start,
                    window_days: state.cursor.window_days,
                })?;

            attempts += 1;
            attempts_at_start += 1;
            debug!(%window, budget = state.budget, phase = %state.phase, "Attempting window");

            match self.extractor.extract(&window).await {
                Ok(report) => {
                    state = transition(&self.policy, state, &window, AttemptOutcome::Success);
                    attempts_at_start = 0;
                    windows += 1;

                    self.observer.on_window_success(&WindowSucceeded {
                        window,
                        rows: report.rows(),
                        destination: report.path().map(|p| p.to_path_buf()),
                        timestamp: self.clock.now(),
                    });
                }
                Err(err) => {
                    let next = transition(&self.policy, state, &window, AttemptOutcome::Failure);
                    let error = err.to_string();

                    self.observer.on_window_failure(&WindowFailed {
                        window,
                        attempt: self.policy.retry_limit() - state.budget + 1,
                        retries_left: match next.phase {
                            Phase::Attempting => next.budget,
                            _ => 0,
                        },
                        error: error.clone(),
                        timestamp: self.clock.now(),
                    });

                    match next.phase {
                        Phase::Shrinking => self.observer.on_shrink(&WindowShrunk {
                            start: window.start,
                            from_days: state.cursor.window_days,
                            to_days: next.cursor.window_days,
                            timestamp: self.clock.now(),
                        }),
                        Phase::Exhausted => {
                            self.observer.on_exhausted(&ExtractionExhausted {
                                window,
                                attempts: attempts_at_start,
                                last_error: error.clone(),
                                timestamp: self.clock.now(),
                            });
                            return Err(ExtractionError::Exhausted {
                                resume_from: window.start,
                                window_days: state.cursor.window_days,
                                attempts: attempts_at_start,
                                last_error: error,
                            });
                        }
                        Phase::Attempting | Phase::Advancing => {}
                    }

                    state = next;
                }
            }
        }

        Ok(RunOutcome {
            cursor: state.cursor,
            windows,
            attempts,
        })
    }
}
