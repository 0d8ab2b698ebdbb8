pub mod adapter;
pub mod row;
pub mod utils;
