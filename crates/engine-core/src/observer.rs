use model::events::{ExtractionExhausted, WindowFailed, WindowShrunk, WindowSucceeded};
use std::sync::Arc;

/// Callbacks fired by the window controller. Every method defaults to a no-op.
pub trait WindowObserver: Send + Sync {
    fn on_window_success(&self, _event: &WindowSucceeded) {}

    fn on_window_failure(&self, _event: &WindowFailed) {}

    fn on_shrink(&self, _event: &WindowShrunk) {}

    fn on_exhausted(&self, _event: &ExtractionExhausted) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl WindowObserver for NoopObserver {}

/// Fans each callback out to a list of observers, in insertion order.
#[derive(Clone, Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn WindowObserver>>,
}

impl CompositeObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, observer: Arc<dyn WindowObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl WindowObserver for CompositeObserver {
    fn on_window_success(&self, event: &WindowSucceeded) {
        self.observers
            .iter()
            .for_each(|o| o.on_window_success(event));
    }

    fn on_window_failure(&self, event: &WindowFailed) {
        self.observers
            .iter()
            .for_each(|o| o.on_window_failure(event));
    }

    fn on_shrink(&self, event: &WindowShrunk) {
        self.observers.iter().for_each(|o| o.on_shrink(event));
    }

    fn on_exhausted(&self, event: &ExtractionExhausted) {
        self.observers.iter().for_each(|o| o.on_exhausted(event));
    }
}
