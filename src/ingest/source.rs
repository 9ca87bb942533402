//! The record source seam between ingestion and the dataset

use serde::Serialize;

use crate::observability::{Logger, Severity};
use crate::record::{TripRecord, TripRecordBuilder};

use super::errors::LoadResult;

/// Row counters reported by a source.
///
/// `rows_read == rows_accepted + rows_discarded` once a source is drained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    pub rows_read: usize,
    pub rows_accepted: usize,
    pub rows_discarded: usize,
}

/// A stream of validated trip records.
///
/// Implementations discard invalid rows themselves and count them in
/// `stats`; `next_record` only fails on I/O.
pub trait RecordSource {
    /// Next valid record, `Ok(None)` at end of input
    fn next_record(&mut self) -> LoadResult<Option<TripRecord>>;

    /// Counters so far
    fn stats(&self) -> LoadStats;

    /// Estimated number of records, used to reserve capacity
    fn size_hint(&self) -> Option<usize> {
        None
    }
}

/// In-memory source over unvalidated candidates.
///
/// Each candidate counts as one row read. Candidates that fail validation
/// are discarded.
#[derive(Debug)]
pub struct MemorySource {
    candidates: std::vec::IntoIter<TripRecordBuilder>,
    total: usize,
    stats: LoadStats,
}

impl MemorySource {
    pub fn new(candidates: Vec<TripRecordBuilder>) -> Self {
        let total = candidates.len();
        Self {
            candidates: candidates.into_iter(),
            total,
            stats: LoadStats::default(),
        }
    }
}

impl RecordSource for MemorySource {
    fn next_record(&mut self) -> LoadResult<Option<TripRecord>> {
        for candidate in self.candidates.by_ref() {
            self.stats.rows_read += 1;
            match candidate.build() {
                Ok(record) => {
                    self.stats.rows_accepted += 1;
                    return Ok(Some(record));
                }
                Err(e) => {
                    self.stats.rows_discarded += 1;
                    if Logger::enabled(Severity::Trace) {
                        Logger::trace(
                            "INGEST_ROW_REJECTED",
                            &[
                                ("row", &self.stats.rows_read.to_string()),
                                ("reason", e.code()),
                            ],
                        );
                    }
                }
            }
        }
        Ok(None)
    }

    fn stats(&self) -> LoadStats {
        self.stats
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.total)
    }
}

impl From<Vec<TripRecordBuilder>> for MemorySource {
    fn from(candidates: Vec<TripRecordBuilder>) -> Self {
        Self::new(candidates)
    }
}
