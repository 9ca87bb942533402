//! tripquery - range and aggregate queries over in-memory taxi trip records
//!
//! Records are loaded once into a `Dataset`, indexed by pickup time and
//! queried through a `QueryEngine`. Large scans fork across worker threads.

pub mod cli;
pub mod config;
pub mod dataset;
pub mod index;
pub mod ingest;
pub mod observability;
pub mod query;
pub mod record;
