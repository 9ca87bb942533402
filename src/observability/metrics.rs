//! Query metrics
//!
//! - Counters only
//! - Monotonic increase for the life of an engine
//! - Relaxed atomics: concurrent queries update them without locking

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Counters kept by one `QueryEngine`
#[derive(Debug, Default)]
pub struct QueryMetrics {
    /// Queries of any kind
    queries_executed: AtomicU64,
    /// Queries narrowed through the time index
    indexed_queries: AtomicU64,
    /// Queries that examined every record
    full_scans: AtomicU64,
    /// Scans split across workers
    parallel_scans: AtomicU64,
    /// Sum of `scanned` over all queries
    records_scanned: AtomicU64,
}

impl QueryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one finished query
    pub fn record_query(&self, indexed: bool, parallel: bool, scanned: usize) {
        self.queries_executed.fetch_add(1, Ordering::Relaxed);
        if indexed {
            self.indexed_queries.fetch_add(1, Ordering::Relaxed);
        } else {
            self.full_scans.fetch_add(1, Ordering::Relaxed);
        }
        if parallel {
            self.parallel_scans.fetch_add(1, Ordering::Relaxed);
        }
        self.records_scanned.fetch_add(scanned as u64, Ordering::Relaxed);
    }

    pub fn queries_executed(&self) -> u64 {
        self.queries_executed.load(Ordering::Relaxed)
    }

    /// Point-in-time copy of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            queries_executed: self.queries_executed.load(Ordering::Relaxed),
            indexed_queries: self.indexed_queries.load(Ordering::Relaxed),
            full_scans: self.full_scans.load(Ordering::Relaxed),
            parallel_scans: self.parallel_scans.load(Ordering::Relaxed),
            records_scanned: self.records_scanned.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of query counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MetricsSnapshot {
    pub queries_executed: u64,
    pub indexed_queries: u64,
    pub full_scans: u64,
    pub parallel_scans: u64,
    pub records_scanned: u64,
}
