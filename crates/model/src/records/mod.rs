pub mod measurement;
pub mod row;
