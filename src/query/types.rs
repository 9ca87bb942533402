//! Query parameter types
//!
//! Every range is inclusive on both bounds. A range whose lower bound is
//! above its upper bound is still a valid query; it matches nothing.

use serde::{Deserialize, Serialize};

/// Pickup time window in epoch seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: i64,
    pub end: i64,
}

impl TimeRange {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn contains(&self, ts: i64) -> bool {
        ts >= self.start && ts <= self.end
    }
}

/// Floating-point range, used for distance and fare
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

impl NumericRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// NaN values never match
    #[inline]
    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }
}

/// Integer range, used for zone ids and passenger counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntRange {
    pub min: i32,
    pub max: i32,
}

impl IntRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn contains(&self, v: i32) -> bool {
        v >= self.min && v <= self.max
    }
}

/// Time window plus distance and passenger filters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombinedQuery {
    pub time: TimeRange,
    pub distance: NumericRange,
    pub passengers: IntRange,
}

impl CombinedQuery {
    pub fn new(time: TimeRange, distance: NumericRange, passengers: IntRange) -> Self {
        Self {
            time,
            distance,
            passengers,
        }
    }
}
