//! Dataset subsystem
//!
//! The dataset is the source of truth for loaded trips. Everything else
//! (time index, query engine) is derived from it.
//!
//! # Lifecycle
//!
//! 1. `load` / `load_csv` replaces all records
//! 2. `query_engine` builds and caches an indexed engine on first use
//! 3. `load` or `clear` drops the cache; the next access rebuilds it
//!
//! Query results borrow the dataset, so it cannot be reloaded while any
//! result is alive.

mod dataset;

pub use dataset::Dataset;
