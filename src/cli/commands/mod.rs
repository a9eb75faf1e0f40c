mod analyze;

pub use self::analyze::{analyze, collect, gather_and_rank};
