//! Index subsystem
//!
//! Indexes are derived, in-memory-only state rebuilt from the dataset.
//!
//! # Design Principles
//!
//! - Derived state: the dataset is the source of truth
//! - Full rebuild: no incremental updates
//! - Deterministic: stable ordering on equal keys
//!
//! Only pickup time is indexed.

mod time_index;

pub use time_index::TimeIndex;
