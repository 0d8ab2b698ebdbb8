pub mod cursor;

pub use cursor::{AttemptOutcome, ExtractionCursor, Window};
