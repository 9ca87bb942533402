//! The record collection and its cached engine

use std::path::Path;
use std::sync::{Arc, OnceLock};

use crate::config::Config;
use crate::ingest::{CsvReader, LoadError, LoadResult, LoadStats, RecordSource};
use crate::observability::{Logger, Timer};
use crate::query::{IntRange, NumericRange, QueryEngine};
use crate::record::TripRecord;

/// Owns the loaded trip records.
///
/// Records keep their load order and are never modified until the next
/// `load` or `clear`, which also drops the cached engine.
#[derive(Debug)]
pub struct Dataset {
    records: Arc<Vec<TripRecord>>,
    stats: LoadStats,
    config: Config,
    engine: OnceLock<QueryEngine>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            records: Arc::new(Vec::new()),
            stats: LoadStats::default(),
            config,
            engine: OnceLock::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replaces the contents with every record `source` yields.
    ///
    /// The dataset is emptied first, so on error it stays empty. A load that
    /// reads rows but accepts none is not an error.
    pub fn load<S: RecordSource>(&mut self, mut source: S) -> LoadResult<LoadStats> {
        self.reset();
        let timer = Timer::new();
        Logger::info("DATASET_LOAD_BEGIN", &[]);

        let capacity = source.size_hint().unwrap_or(self.config.initial_capacity);
        let mut records = Vec::with_capacity(capacity);
        loop {
            match source.next_record() {
                Ok(Some(record)) => records.push(record),
                Ok(None) => break,
                Err(e) => return Err(load_failed(e)),
            }
        }
        records.shrink_to_fit();

        let stats = source.stats();
        self.records = Arc::new(records);
        self.stats = stats;

        let fields = [
            ("rows_read", stats.rows_read.to_string()),
            ("rows_accepted", stats.rows_accepted.to_string()),
            ("rows_discarded", stats.rows_discarded.to_string()),
            ("elapsed_ms", timer.elapsed_ms()),
        ];
        let fields: Vec<(&str, &str)> = fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
        Logger::info("DATASET_LOAD_COMPLETE", &fields);
        if stats.rows_read > 0 && stats.rows_accepted == 0 {
            Logger::warn("DATASET_LOAD_EMPTY", &fields);
        }

        Ok(stats)
    }

    /// Loads a CSV file with one header line.
    pub fn load_csv(&mut self, path: impl AsRef<Path>) -> LoadResult<LoadStats> {
        self.reset();
        let source = CsvReader::open(path).map_err(load_failed)?;
        self.load(source)
    }

    /// Empties the dataset and drops derived state.
    pub fn clear(&mut self) {
        self.reset();
        Logger::info("DATASET_CLEARED", &[]);
    }

    fn reset(&mut self) {
        self.records = Arc::new(Vec::new());
        self.stats = LoadStats::default();
        self.engine = OnceLock::new();
    }

    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Counters from the last load, zero after `clear`
    pub fn load_stats(&self) -> LoadStats {
        self.stats
    }

    /// Shared handle to the current records.
    ///
    /// The handle outlives later loads; it keeps the records it was taken from.
    pub fn snapshot(&self) -> Arc<Vec<TripRecord>> {
        Arc::clone(&self.records)
    }

    /// Engine over the current records, created with its index built on
    /// first use after each load or clear.
    pub fn query_engine(&self) -> &QueryEngine {
        self.engine.get_or_init(|| {
            let mut engine = QueryEngine::with_config(self.snapshot(), &self.config);
            engine.build_indexes();
            engine
        })
    }

    /// Records whose fare amount lies in `range`, by linear scan
    pub fn search_by_fare(&self, range: NumericRange) -> Vec<&TripRecord> {
        self.scan(|r| range.contains(r.fare_amount()))
    }

    /// Records whose trip distance lies in `range`, by linear scan
    pub fn search_by_distance(&self, range: NumericRange) -> Vec<&TripRecord> {
        self.scan(|r| range.contains(r.trip_distance()))
    }

    /// Records whose passenger count lies in `range`, by linear scan
    pub fn search_by_passenger_count(&self, range: IntRange) -> Vec<&TripRecord> {
        self.scan(|r| range.contains(r.passenger_count()))
    }

    fn scan<F: Fn(&TripRecord) -> bool>(&self, predicate: F) -> Vec<&TripRecord> {
        self.records.iter().filter(|r| predicate(r)).collect()
    }
}

impl Default for Dataset {
    fn default() -> Self {
        Self::new()
    }
}

fn load_failed(e: LoadError) -> LoadError {
    Logger::error(
        "DATASET_LOAD_FAILED",
        &[("code", e.code()), ("error", &e.to_string())],
    );
    e
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::MemorySource;
    use crate::query::TimeRange;
    use crate::record::TripRecordBuilder;
    use std::io;

    fn trip(pickup: i64, fare: f64, distance: f64, passengers: i32) -> TripRecordBuilder {
        TripRecord::builder(pickup, pickup + 300)
            .fare_amount(fare)
            .total_amount(fare + 1.5)
            .trip_distance(distance)
            .passenger_count(passengers)
    }

    fn sample() -> MemorySource {
        MemorySource::new(vec![
            trip(100, 5.0, 1.0, 1),
            trip(200, 10.0, 2.0, 2),
            trip(300, 15.0, 3.0, 3),
            trip(400, 20.0, 4.0, 4),
            trip(500, 25.0, 5.0, 5),
        ])
    }

    /// Yields one record then fails
    struct BrokenSource {
        yielded: bool,
    }

    impl RecordSource for BrokenSource {
        fn next_record(&mut self) -> LoadResult<Option<TripRecord>> {
            if !self.yielded {
                self.yielded = true;
                return Ok(Some(TripRecord::builder(1, 2).build().unwrap()));
            }
            Err(LoadError::Read {
                line: 2,
                source: io::Error::new(io::ErrorKind::UnexpectedEof, "truncated"),
            })
        }

        fn stats(&self) -> LoadStats {
            LoadStats::default()
        }
    }

    #[test]
    fn test_new_dataset_is_empty() {
        let dataset = Dataset::new();
        assert!(dataset.is_empty());
        assert_eq!(dataset.load_stats(), LoadStats::default());
        assert!(dataset.query_engine().is_empty());
    }

    #[test]
    fn test_load_keeps_order_and_counts() {
        let mut dataset = Dataset::new();
        let mut candidates = vec![trip(300, 1.0, 1.0, 1), trip(100, 1.0, 1.0, 1)];
        candidates.push(TripRecord::builder(500, 400));
        let stats = dataset.load(MemorySource::new(candidates)).unwrap();

        assert_eq!(stats.rows_read, 3);
        assert_eq!(stats.rows_accepted, 2);
        assert_eq!(stats.rows_discarded, 1);
        let pickups: Vec<i64> = dataset.records().iter().map(|r| r.pickup_timestamp()).collect();
        assert_eq!(pickups, vec![300, 100]);
    }

    #[test]
    fn test_load_with_no_accepted_rows_is_ok() {
        let mut dataset = Dataset::new();
        let stats = dataset
            .load(MemorySource::new(vec![TripRecord::builder(0, 10)]))
            .unwrap();

        assert_eq!(stats.rows_read, 1);
        assert_eq!(stats.rows_accepted, 0);
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_failed_load_leaves_dataset_empty() {
        let mut dataset = Dataset::new();
        dataset.load(sample()).unwrap();

        let err = dataset.load(BrokenSource { yielded: false }).unwrap_err();
        assert_eq!(err.code(), "TRIP_LOAD_READ_FAILED");
        assert!(dataset.is_empty());
        assert_eq!(dataset.load_stats(), LoadStats::default());
    }

    #[test]
    fn test_load_csv_missing_file() {
        let mut dataset = Dataset::new();
        dataset.load(sample()).unwrap();

        let err = dataset.load_csv("/nonexistent/trips.csv").unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut dataset = Dataset::new();
        dataset.load(sample()).unwrap();
        assert_eq!(dataset.query_engine().len(), 5);

        dataset.clear();
        assert!(dataset.is_empty());
        assert_eq!(dataset.load_stats(), LoadStats::default());
        assert!(dataset.query_engine().is_empty());
    }

    #[test]
    fn test_engine_is_cached_until_reload() {
        let mut dataset = Dataset::new();
        dataset.load(sample()).unwrap();

        let first: *const QueryEngine = dataset.query_engine();
        let second: *const QueryEngine = dataset.query_engine();
        assert_eq!(first, second);
        assert!(dataset.query_engine().indexes_built());

        dataset
            .load(MemorySource::new(vec![trip(700, 1.0, 1.0, 1)]))
            .unwrap();
        let engine = dataset.query_engine();
        assert_eq!(engine.len(), 1);
        let result = engine.search_by_time(TimeRange::new(0, 1_000));
        assert_eq!(result.len(), 1);
        assert_eq!(result.records[0].pickup_timestamp(), 700);
    }

    #[test]
    fn test_snapshot_survives_reload() {
        let mut dataset = Dataset::new();
        dataset.load(sample()).unwrap();
        let snapshot = dataset.snapshot();

        dataset.clear();
        assert_eq!(snapshot.len(), 5);
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_linear_filters() {
        let mut dataset = Dataset::new();
        dataset.load(sample()).unwrap();

        // fare_amount, not total_amount
        let fares = dataset.search_by_fare(NumericRange::new(10.0, 20.0));
        assert_eq!(fares.len(), 3);

        let dist = dataset.search_by_distance(NumericRange::new(4.0, 10.0));
        assert_eq!(dist.len(), 2);

        let pax = dataset.search_by_passenger_count(IntRange::new(1, 1));
        assert_eq!(pax.len(), 1);
        assert_eq!(pax[0].pickup_timestamp(), 100);

        assert!(dataset.search_by_fare(NumericRange::new(30.0, 10.0)).is_empty());
    }
}
