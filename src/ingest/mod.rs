//! Ingestion: turning external rows into validated trip records
//!
//! # Contract with the dataset
//!
//! - A `RecordSource` yields only valid `TripRecord`s
//! - Invalid rows are discarded and counted, never raised
//! - `LoadStats` reports rows read / accepted / discarded
//! - Only failing to open or read the source is fatal (`LoadError`)
//!
//! # Row rejection (CSV)
//!
//! - Wrong field count
//! - A column that is not valid UTF-8
//! - Unparseable or non-positive pickup timestamp
//! - Dropoff not strictly after pickup
//! - Any other record invariant violation

mod csv;
mod errors;
mod source;
mod timestamp;

pub use self::csv::{parse_row, CsvReader, RowRejection, BASE_FIELDS, MAX_FIELDS};
pub use errors::{LoadError, LoadResult};
pub use source::{LoadStats, MemorySource, RecordSource};
pub use timestamp::parse_timestamp;
