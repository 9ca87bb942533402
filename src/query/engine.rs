//! Query engine
//!
//! Each query either narrows its candidates through the time index or falls
//! back to a full scan. Both strategies return the same set of matches and
//! differ only in `scanned` and cost.
//!
//! The engine performs no I/O and never fails: an empty match set is an
//! ordinary result.

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::index::TimeIndex;
use crate::observability::{Logger, MetricsSnapshot, QueryMetrics, Severity, Timer};
use crate::record::TripRecord;

use super::result::{AggregationResult, QueryResult, ScanStrategy};
use super::scan::{Candidates, ParallelScan};
use super::types::{CombinedQuery, IntRange, NumericRange, TimeRange};

/// Range and aggregate queries over one record snapshot.
///
/// Records are shared with the dataset that produced them and are read-only
/// for the life of the engine. Queries take `&self` and may run
/// concurrently; `build_indexes` takes `&mut self`, so rebuilding cannot
/// overlap a query.
#[derive(Debug)]
pub struct QueryEngine {
    records: Arc<Vec<TripRecord>>,
    time_index: TimeIndex,
    scan: ParallelScan,
    metrics: QueryMetrics,
}

impl QueryEngine {
    /// Creates an engine with default settings and no index built.
    pub fn new(records: Arc<Vec<TripRecord>>) -> Self {
        Self::with_config(records, &Config::default())
    }

    pub fn with_config(records: Arc<Vec<TripRecord>>, config: &Config) -> Self {
        Self {
            records,
            time_index: TimeIndex::new(),
            scan: ParallelScan::from_config(config),
            metrics: QueryMetrics::new(),
        }
    }

    /// Builds (or fully rebuilds) the time index and returns the time taken.
    pub fn build_indexes(&mut self) -> Duration {
        let timer = Timer::new();
        self.time_index.build(&self.records);
        let elapsed = timer.elapsed();

        Logger::info(
            "TIME_INDEX_BUILT",
            &[
                ("records", &self.records.len().to_string()),
                ("elapsed_ms", &format!("{:.3}", elapsed.as_secs_f64() * 1_000.0)),
            ],
        );
        elapsed
    }

    pub fn indexes_built(&self) -> bool {
        self.time_index.is_built()
    }

    pub fn time_index(&self) -> &TimeIndex {
        &self.time_index
    }

    /// The record snapshot this engine queries
    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Trips whose pickup time lies in `range`.
    pub fn search_by_time(&self, range: TimeRange) -> QueryResult<'_> {
        let (candidates, strategy) = match self.time_window(range) {
            Some(window) => (window, ScanStrategy::Indexed),
            None => (Candidates::All(&self.records), ScanStrategy::FullScan),
        };

        let records = match strategy {
            // Every record in the window already satisfies the time bound
            ScanStrategy::Indexed => self.scan.filter(candidates, |_| true),
            ScanStrategy::FullScan => self
                .scan
                .filter(candidates, |r| range.contains(r.pickup_timestamp())),
        };

        self.finish("time", candidates.len(), strategy, records)
    }

    /// Trips whose distance lies in `range`. Always a full scan.
    pub fn search_by_distance(&self, range: NumericRange) -> QueryResult<'_> {
        self.full_scan("distance", |r| range.contains(r.trip_distance()))
    }

    /// Trips whose total amount lies in `range`. Always a full scan.
    pub fn search_by_fare(&self, range: NumericRange) -> QueryResult<'_> {
        self.full_scan("fare", |r| range.contains(r.total_amount()))
    }

    /// Trips whose pickup zone lies in `range`. Always a full scan.
    pub fn search_by_location(&self, range: IntRange) -> QueryResult<'_> {
        self.full_scan("location", |r| range.contains(r.pu_location_id()))
    }

    /// Trips matching time, distance and passenger filters together.
    ///
    /// With the index built, only the time window is examined. The result is
    /// always a subset of `search_by_time(query.time)`.
    pub fn search_combined(&self, query: CombinedQuery) -> QueryResult<'_> {
        let rest = |r: &TripRecord| {
            query.distance.contains(r.trip_distance())
                && query.passengers.contains(r.passenger_count())
        };

        let (candidates, strategy, records) = match self.time_window(query.time) {
            Some(window) => (window, ScanStrategy::Indexed, self.scan.filter(window, rest)),
            None => {
                let all = Candidates::All(&self.records);
                let records = self
                    .scan
                    .filter(all, |r| query.time.contains(r.pickup_timestamp()) && rest(r));
                (all, ScanStrategy::FullScan, records)
            }
        };

        self.finish("combined", candidates.len(), strategy, records)
    }

    /// Sum, count and average of `fare_amount` over trips picked up in `range`.
    pub fn aggregate_fare_by_time(&self, range: TimeRange) -> AggregationResult {
        let (candidates, strategy, (sum, count)) = match self.time_window(range) {
            Some(window) => {
                let totals = self.scan.sum(window, |_| true, |r| r.fare_amount());
                (window, ScanStrategy::Indexed, totals)
            }
            None => {
                let all = Candidates::All(&self.records);
                let totals = self.scan.sum(
                    all,
                    |r| range.contains(r.pickup_timestamp()),
                    |r| r.fare_amount(),
                );
                (all, ScanStrategy::FullScan, totals)
            }
        };

        self.record("aggregate_fare", candidates.len(), strategy, count);
        AggregationResult::from_parts(sum, count)
    }

    /// The index window for `range`, or `None` when the index is not built.
    fn time_window(&self, range: TimeRange) -> Option<Candidates<'_>> {
        if !self.time_index.is_built() {
            return None;
        }
        let window = self.time_index.lookup(&self.records, range.start, range.end);
        Some(Candidates::Window {
            records: &self.records,
            positions: self.time_index.window(window),
        })
    }

    fn full_scan<F>(&self, kind: &'static str, predicate: F) -> QueryResult<'_>
    where
        F: Fn(&TripRecord) -> bool + Sync,
    {
        let candidates = Candidates::All(&self.records);
        let records = self.scan.filter(candidates, predicate);
        self.finish(kind, candidates.len(), ScanStrategy::FullScan, records)
    }

    fn finish<'a>(
        &'a self,
        kind: &'static str,
        scanned: usize,
        strategy: ScanStrategy,
        records: Vec<&'a TripRecord>,
    ) -> QueryResult<'a> {
        self.record(kind, scanned, strategy, records.len());
        QueryResult {
            records,
            scanned,
            strategy,
        }
    }

    fn record(&self, kind: &'static str, scanned: usize, strategy: ScanStrategy, matched: usize) {
        let parallel = self.scan.is_parallel(scanned);
        self.metrics
            .record_query(strategy == ScanStrategy::Indexed, parallel, scanned);

        if Logger::enabled(Severity::Trace) {
            Logger::trace(
                "QUERY_EXECUTED",
                &[
                    ("kind", kind),
                    ("strategy", strategy.as_str()),
                    ("parallel", if parallel { "true" } else { "false" }),
                    ("scanned", &scanned.to_string()),
                    ("matched", &matched.to_string()),
                ],
            );
        }
    }
}
