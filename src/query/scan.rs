//! Fork-join scanning
//!
//! Small candidate sets are scanned on the calling thread. Above the
//! threshold the candidate range is cut into contiguous partitions, one per
//! worker task; each worker filters into a private buffer and the buffers are
//! appended to the shared output under a mutex once the worker finishes.
//! Merged order across partitions is unspecified.
//!
//! Aggregation reduces per-partition `(sum, count)` pairs by addition.
//! Partials are combined in partition order, so a given thread count always
//! yields the same floating-point sum.

use std::ops::Range;

use parking_lot::Mutex;
use rayon::prelude::*;

use crate::config::Config;
use crate::record::TripRecord;

/// The records a scan will examine
#[derive(Debug, Clone, Copy)]
pub enum Candidates<'a> {
    /// Every record in dataset order
    All(&'a [TripRecord]),
    /// Records at the given positions, typically a time-index window
    Window {
        records: &'a [TripRecord],
        positions: &'a [usize],
    },
}

impl<'a> Candidates<'a> {
    pub fn len(&self) -> usize {
        match self {
            Candidates::All(records) => records.len(),
            Candidates::Window { positions, .. } => positions.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    fn get(&self, i: usize) -> &'a TripRecord {
        match *self {
            Candidates::All(records) => &records[i],
            Candidates::Window { records, positions } => &records[positions[i]],
        }
    }
}

/// Partitioning policy for scans
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelScan {
    threshold: usize,
    min_chunk_len: usize,
}

impl ParallelScan {
    /// `threshold`: candidate count above which scans fork.
    /// `min_chunk_len`: smallest partition given to one worker.
    pub fn new(threshold: usize, min_chunk_len: usize) -> Self {
        Self {
            threshold,
            min_chunk_len: min_chunk_len.max(1),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.parallel_threshold, config.min_chunk_len)
    }

    /// Whether a scan over `n` candidates runs on multiple workers
    pub fn is_parallel(&self, n: usize) -> bool {
        n > self.threshold
    }

    /// Contiguous partitions covering `[0, n)`
    pub fn partitions(&self, n: usize) -> Vec<Range<usize>> {
        let workers = rayon::current_num_threads().max(1);
        let chunk_len = n.div_ceil(workers).max(self.min_chunk_len);
        (0..n)
            .step_by(chunk_len)
            .map(|start| start..(start + chunk_len).min(n))
            .collect()
    }

    /// Returns every candidate for which `predicate` holds.
    pub fn filter<'a, F>(&self, candidates: Candidates<'a>, predicate: F) -> Vec<&'a TripRecord>
    where
        F: Fn(&TripRecord) -> bool + Sync,
    {
        let n = candidates.len();
        if !self.is_parallel(n) {
            return (0..n)
                .map(|i| candidates.get(i))
                .filter(|&rec| predicate(rec))
                .collect();
        }

        let merged = Mutex::new(Vec::new());
        self.partitions(n).into_par_iter().for_each(|range| {
            let local: Vec<&'a TripRecord> = range
                .map(|i| candidates.get(i))
                .filter(|&rec| predicate(rec))
                .collect();
            merged.lock().extend(local);
        });
        merged.into_inner()
    }

    /// Sums `value` over candidates matching `predicate`; returns `(sum, count)`.
    pub fn sum<F, V>(&self, candidates: Candidates<'_>, predicate: F, value: V) -> (f64, usize)
    where
        F: Fn(&TripRecord) -> bool + Sync,
        V: Fn(&TripRecord) -> f64 + Sync,
    {
        let fold_range = |range: Range<usize>| {
            let mut sum = 0.0;
            let mut count = 0;
            for i in range {
                let rec = candidates.get(i);
                if predicate(rec) {
                    sum += value(rec);
                    count += 1;
                }
            }
            (sum, count)
        };

        let n = candidates.len();
        if !self.is_parallel(n) {
            return fold_range(0..n);
        }

        let partials: Vec<(f64, usize)> = self
            .partitions(n)
            .into_par_iter()
            .map(&fold_range)
            .collect();
        partials
            .into_iter()
            .fold((0.0, 0), |(sum, count), (s, c)| (sum + s, count + c))
    }
}

impl Default for ParallelScan {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(n: usize) -> Vec<TripRecord> {
        (0..n)
            .map(|i| {
                TripRecord::builder(1 + i as i64, 2 + i as i64)
                    .passenger_count((i % 5) as i32)
                    .fare_amount((i % 10) as f64)
                    .build()
                    .unwrap()
            })
            .collect()
    }

    fn sorted_pickups(matches: &[&TripRecord]) -> Vec<i64> {
        let mut v: Vec<i64> = matches.iter().map(|r| r.pickup_timestamp()).collect();
        v.sort_unstable();
        v
    }

    #[test]
    fn test_partitions_cover_range() {
        let scan = ParallelScan::new(10, 7);
        let parts = scan.partitions(100);

        assert_eq!(parts.first().unwrap().start, 0);
        assert_eq!(parts.last().unwrap().end, 100);
        for pair in parts.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert!(parts.iter().all(|p| !p.is_empty()));
    }

    #[test]
    fn test_partitions_of_nothing() {
        assert!(ParallelScan::new(10, 7).partitions(0).is_empty());
    }

    #[test]
    fn test_threshold() {
        let scan = ParallelScan::new(100, 10);
        assert!(!scan.is_parallel(100));
        assert!(scan.is_parallel(101));
    }

    #[test]
    fn test_sequential_filter_preserves_order() {
        let recs = records(50);
        let scan = ParallelScan::new(1_000, 16);
        let matches = scan.filter(Candidates::All(&recs), |r| r.passenger_count() == 2);

        let pickups: Vec<i64> = matches.iter().map(|r| r.pickup_timestamp()).collect();
        assert_eq!(pickups, vec![3, 8, 13, 18, 23, 28, 33, 38, 43, 48]);
    }

    #[test]
    fn test_parallel_filter_matches_sequential() {
        let recs = records(5_000);
        let sequential = ParallelScan::new(usize::MAX, 1);
        let parallel = ParallelScan::new(10, 64);
        let pred = |r: &TripRecord| r.passenger_count() >= 3;

        let a = sequential.filter(Candidates::All(&recs), pred);
        let b = parallel.filter(Candidates::All(&recs), pred);

        assert_eq!(a.len(), 2_000);
        assert_eq!(sorted_pickups(&a), sorted_pickups(&b));
    }

    #[test]
    fn test_window_candidates() {
        let recs = records(10);
        let positions = [9, 4, 0];
        let scan = ParallelScan::new(1_000, 16);
        let matches = scan.filter(
            Candidates::Window {
                records: &recs,
                positions: &positions,
            },
            |_| true,
        );

        let pickups: Vec<i64> = matches.iter().map(|r| r.pickup_timestamp()).collect();
        assert_eq!(pickups, vec![10, 5, 1]);
    }

    #[test]
    fn test_parallel_sum_matches_sequential() {
        let recs = records(10_000);
        let pred = |r: &TripRecord| r.passenger_count() != 0;
        let value = |r: &TripRecord| r.fare_amount();

        let (seq_sum, seq_count) =
            ParallelScan::new(usize::MAX, 1).sum(Candidates::All(&recs), pred, value);
        let (par_sum, par_count) =
            ParallelScan::new(10, 100).sum(Candidates::All(&recs), pred, value);

        // Integer-valued fares sum exactly regardless of grouping
        assert_eq!(seq_count, 8_000);
        assert_eq!(seq_count, par_count);
        assert_eq!(seq_sum, par_sum);
    }

    #[test]
    fn test_empty_candidates() {
        let recs: Vec<TripRecord> = Vec::new();
        let scan = ParallelScan::new(0, 1);
        assert!(scan.filter(Candidates::All(&recs), |_| true).is_empty());
        assert_eq!(scan.sum(Candidates::All(&recs), |_| true, |r| r.fare_amount()), (0.0, 0));
    }
}
