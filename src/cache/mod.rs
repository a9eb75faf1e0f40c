//! Cache module for reducing API calls
//!
//! Each source's collection is cached as one snapshot and reused until it is
//! 72 hours old.

mod clock;
mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use store::{CacheEntry, CacheStore, DEFAULT_TTL_HOURS};
