pub mod controller;
pub mod plan;
pub mod policy;
pub mod state;
