//! Result types for query execution

use serde::Serialize;

use crate::record::TripRecord;

/// How a query found its candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStrategy {
    /// Narrowed through the time index
    Indexed,
    /// Examined every record
    FullScan,
}

impl ScanStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanStrategy::Indexed => "indexed",
            ScanStrategy::FullScan => "full_scan",
        }
    }
}

/// Records matching a query.
///
/// Matches borrow from the engine's record snapshot and are valid until the
/// owning dataset is next loaded or cleared. Order is the time-index order
/// for sequential indexed queries and unspecified for parallel scans.
#[derive(Debug, Clone)]
pub struct QueryResult<'a> {
    /// Matching records
    pub records: Vec<&'a TripRecord>,
    /// Number of records examined
    pub scanned: usize,
    /// Strategy used to pick candidates
    pub strategy: ScanStrategy,
}

impl<'a> QueryResult<'a> {
    /// An empty full-scan result over nothing
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            scanned: 0,
            strategy: ScanStrategy::FullScan,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of matches
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a TripRecord> + '_ {
        self.records.iter().copied()
    }
}

/// Sum, average and count of a numeric field
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AggregationResult {
    pub sum: f64,
    pub avg: f64,
    pub count: usize,
}

impl AggregationResult {
    /// Builds a result from a sum and count; the average is 0 when count is 0.
    pub fn from_parts(sum: f64, count: usize) -> Self {
        let avg = if count > 0 { sum / count as f64 } else { 0.0 };
        Self { sum, avg, count }
    }
}
