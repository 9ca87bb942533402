//! Record validation errors
//!
//! A `RecordError` never escapes a load: ingestion counts the row as
//! discarded and moves on.

use thiserror::Error;

/// Result type for record construction
pub type RecordResult<T> = Result<T, RecordError>;

/// Reasons a candidate trip is rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    /// Pickup timestamp missing, unparseable or not positive
    #[error("pickup timestamp must be positive, got {0}")]
    NonPositivePickup(i64),

    /// Dropoff at or before pickup
    #[error("dropoff timestamp {dropoff} is not after pickup {pickup}")]
    DropoffNotAfterPickup { pickup: i64, dropoff: i64 },

    /// Negative passenger count
    #[error("passenger count must be non-negative, got {0}")]
    NegativePassengerCount(i32),

    /// Negative or non-finite trip distance
    #[error("trip distance must be a non-negative number, got {0}")]
    NegativeDistance(f64),

    /// Negative or non-finite total amount
    #[error("total amount must be a non-negative number, got {0}")]
    NegativeTotal(f64),
}

impl RecordError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            RecordError::NonPositivePickup(_) => "TRIP_RECORD_BAD_PICKUP",
            RecordError::DropoffNotAfterPickup { .. } => "TRIP_RECORD_DROPOFF_BEFORE_PICKUP",
            RecordError::NegativePassengerCount(_) => "TRIP_RECORD_NEGATIVE_PASSENGERS",
            RecordError::NegativeDistance(_) => "TRIP_RECORD_NEGATIVE_DISTANCE",
            RecordError::NegativeTotal(_) => "TRIP_RECORD_NEGATIVE_TOTAL",
        }
    }
}
