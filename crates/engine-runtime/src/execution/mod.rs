pub mod executor;
pub mod observer;
