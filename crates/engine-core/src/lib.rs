pub mod clock;
pub mod connectors;
pub mod error;
pub mod extractor;
pub mod metrics;
pub mod observer;
pub mod window;
