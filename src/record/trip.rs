//! TripRecord and its builder

use serde::Serialize;

use super::errors::{RecordError, RecordResult};

/// One yellow-taxi trip.
///
/// Timestamps are seconds since the Unix epoch (UTC). Monetary amounts are
/// in dollars, distance in miles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRecord {
    vendor_id: i32,
    pickup_timestamp: i64,
    dropoff_timestamp: i64,
    passenger_count: i32,
    trip_distance: f64,
    rate_code_id: i32,
    store_and_fwd_flag: bool,
    pu_location_id: i32,
    do_location_id: i32,
    payment_type: i32,
    fare_amount: f64,
    extra: f64,
    mta_tax: f64,
    tip_amount: f64,
    tolls_amount: f64,
    improvement_surcharge: f64,
    total_amount: f64,
}

impl TripRecord {
    /// Starts a builder for a trip with the given pickup and dropoff times.
    pub fn builder(pickup_timestamp: i64, dropoff_timestamp: i64) -> TripRecordBuilder {
        TripRecordBuilder::new(pickup_timestamp, dropoff_timestamp)
    }

    pub fn vendor_id(&self) -> i32 {
        self.vendor_id
    }

    pub fn pickup_timestamp(&self) -> i64 {
        self.pickup_timestamp
    }

    pub fn dropoff_timestamp(&self) -> i64 {
        self.dropoff_timestamp
    }

    /// Trip duration in seconds (always positive)
    pub fn duration_secs(&self) -> i64 {
        self.dropoff_timestamp - self.pickup_timestamp
    }

    pub fn passenger_count(&self) -> i32 {
        self.passenger_count
    }

    pub fn trip_distance(&self) -> f64 {
        self.trip_distance
    }

    pub fn rate_code_id(&self) -> i32 {
        self.rate_code_id
    }

    pub fn store_and_fwd_flag(&self) -> bool {
        self.store_and_fwd_flag
    }

    /// Pickup taxi zone
    pub fn pu_location_id(&self) -> i32 {
        self.pu_location_id
    }

    /// Dropoff taxi zone
    pub fn do_location_id(&self) -> i32 {
        self.do_location_id
    }

    pub fn payment_type(&self) -> i32 {
        self.payment_type
    }

    /// Metered fare, excluding surcharges, tips and tolls
    pub fn fare_amount(&self) -> f64 {
        self.fare_amount
    }

    pub fn extra(&self) -> f64 {
        self.extra
    }

    pub fn mta_tax(&self) -> f64 {
        self.mta_tax
    }

    pub fn tip_amount(&self) -> f64 {
        self.tip_amount
    }

    pub fn tolls_amount(&self) -> f64 {
        self.tolls_amount
    }

    pub fn improvement_surcharge(&self) -> f64 {
        self.improvement_surcharge
    }

    /// Total charged to the passenger
    pub fn total_amount(&self) -> f64 {
        self.total_amount
    }
}

/// Unvalidated trip fields.
///
/// Every field other than the two timestamps defaults to zero (or `false`).
/// `build` checks the record invariants and is the only way to obtain a
/// `TripRecord`.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecordBuilder {
    record: TripRecord,
}

impl TripRecordBuilder {
    /// Creates a builder with the given timestamps
    pub fn new(pickup_timestamp: i64, dropoff_timestamp: i64) -> Self {
        Self {
            record: TripRecord {
                vendor_id: 0,
                pickup_timestamp,
                dropoff_timestamp,
                passenger_count: 0,
                trip_distance: 0.0,
                rate_code_id: 0,
                store_and_fwd_flag: false,
                pu_location_id: 0,
                do_location_id: 0,
                payment_type: 0,
                fare_amount: 0.0,
                extra: 0.0,
                mta_tax: 0.0,
                tip_amount: 0.0,
                tolls_amount: 0.0,
                improvement_surcharge: 0.0,
                total_amount: 0.0,
            },
        }
    }

    pub fn vendor_id(mut self, v: i32) -> Self {
        self.record.vendor_id = v;
        self
    }

    pub fn passenger_count(mut self, v: i32) -> Self {
        self.record.passenger_count = v;
        self
    }

    pub fn trip_distance(mut self, v: f64) -> Self {
        self.record.trip_distance = v;
        self
    }

    pub fn rate_code_id(mut self, v: i32) -> Self {
        self.record.rate_code_id = v;
        self
    }

    pub fn store_and_fwd_flag(mut self, v: bool) -> Self {
        self.record.store_and_fwd_flag = v;
        self
    }

    pub fn pu_location_id(mut self, v: i32) -> Self {
        self.record.pu_location_id = v;
        self
    }

    pub fn do_location_id(mut self, v: i32) -> Self {
        self.record.do_location_id = v;
        self
    }

    pub fn payment_type(mut self, v: i32) -> Self {
        self.record.payment_type = v;
        self
    }

    pub fn fare_amount(mut self, v: f64) -> Self {
        self.record.fare_amount = v;
        self
    }

    pub fn extra(mut self, v: f64) -> Self {
        self.record.extra = v;
        self
    }

    pub fn mta_tax(mut self, v: f64) -> Self {
        self.record.mta_tax = v;
        self
    }

    pub fn tip_amount(mut self, v: f64) -> Self {
        self.record.tip_amount = v;
        self
    }

    pub fn tolls_amount(mut self, v: f64) -> Self {
        self.record.tolls_amount = v;
        self
    }

    pub fn improvement_surcharge(mut self, v: f64) -> Self {
        self.record.improvement_surcharge = v;
        self
    }

    pub fn total_amount(mut self, v: f64) -> Self {
        self.record.total_amount = v;
        self
    }

    /// Validates the fields and produces an immutable record.
    pub fn build(self) -> RecordResult<TripRecord> {
        let r = &self.record;

        if r.pickup_timestamp <= 0 {
            return Err(RecordError::NonPositivePickup(r.pickup_timestamp));
        }
        if r.dropoff_timestamp <= r.pickup_timestamp {
            return Err(RecordError::DropoffNotAfterPickup {
                pickup: r.pickup_timestamp,
                dropoff: r.dropoff_timestamp,
            });
        }
        if r.passenger_count < 0 {
            return Err(RecordError::NegativePassengerCount(r.passenger_count));
        }
        if !r.trip_distance.is_finite() || r.trip_distance < 0.0 {
            return Err(RecordError::NegativeDistance(r.trip_distance));
        }
        if !r.total_amount.is_finite() || r.total_amount < 0.0 {
            return Err(RecordError::NegativeTotal(r.total_amount));
        }

        Ok(self.record)
    }
}
