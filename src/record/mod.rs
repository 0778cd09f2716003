//! Daily record input schema
//!
//! The per-day aggregate (nutrition totals, activity totals, optional
//! check-in) that callers persist and hand to the engine, plus JSON/NDJSON
//! parsing and range validation.

mod adapter;
mod daily;

pub use adapter::*;
pub use daily::*;
