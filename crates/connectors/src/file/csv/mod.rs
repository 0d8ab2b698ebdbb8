pub mod encoder;
pub mod error;
pub mod naming;
pub mod sink;
