//! Trip records
//!
//! A `TripRecord` is one validated taxi trip. Records can only be obtained
//! through `TripRecordBuilder::build`, which enforces the record invariants:
//!
//! - pickup timestamp is positive
//! - dropoff timestamp is strictly after pickup
//! - passenger count, trip distance and total amount are non-negative
//!
//! Records are immutable once built.

mod errors;
mod trip;

pub use errors::{RecordError, RecordResult};
pub use trip::{TripRecord, TripRecordBuilder};
