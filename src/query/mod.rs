//! Query subsystem
//!
//! Six fixed query shapes over one record snapshot:
//!
//! | Query | Index assisted |
//! |---|---|
//! | `search_by_time` | yes |
//! | `search_by_distance` | no |
//! | `search_by_fare` (total amount) | no |
//! | `search_by_location` (pickup zone) | no |
//! | `search_combined` | time window only |
//! | `aggregate_fare_by_time` (fare amount) | yes |
//!
//! # Invariants
//!
//! - Indexed and full-scan paths return the same match set
//! - `scanned` is the window size when indexed, the record count otherwise
//! - Queries never fail; no matches is an empty result
//! - Order of parallel scan output is unspecified

mod engine;
mod result;
mod scan;
mod types;

pub use engine::QueryEngine;
pub use result::{AggregationResult, QueryResult, ScanStrategy};
pub use scan::{Candidates, ParallelScan};
pub use types::{CombinedQuery, IntRange, NumericRange, TimeRange};
