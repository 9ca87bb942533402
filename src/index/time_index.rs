//! Sorted secondary index on pickup time
//!
//! The index is a permutation of record positions ordered by pickup
//! timestamp. Ties keep their dataset order (stable sort), so rebuilding over
//! unchanged records always yields the same permutation.

use std::ops::Range;

use rayon::prelude::*;

use crate::record::TripRecord;

/// Permutation of dataset positions ordered by pickup time.
///
/// The index does not own the records. Every `lookup` must be given the
/// same slice the index was built from; changing the records without
/// rebuilding gives meaningless windows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeIndex {
    positions: Vec<usize>,
    built: bool,
}

impl TimeIndex {
    /// Creates an empty, unbuilt index
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards any previous permutation and sorts `[0, n)` by pickup time.
    pub fn build(&mut self, records: &[TripRecord]) {
        let mut positions: Vec<usize> = (0..records.len()).collect();
        // par_sort_by_key is stable: equal timestamps stay in dataset order
        positions.par_sort_by_key(|&pos| records[pos].pickup_timestamp());

        self.positions = positions;
        self.built = true;
    }

    /// Finds the window of the permutation whose pickup times fall in
    /// `[start, end]` (inclusive).
    ///
    /// Returns a half-open range into `sorted_positions()`. An unbuilt or
    /// empty index, or `start > end`, gives an empty range.
    pub fn lookup(&self, records: &[TripRecord], start: i64, end: i64) -> Range<usize> {
        if !self.built || self.positions.is_empty() {
            return 0..0;
        }

        let lo = self
            .positions
            .partition_point(|&pos| records[pos].pickup_timestamp() < start);
        let hi = lo
            + self.positions[lo..].partition_point(|&pos| records[pos].pickup_timestamp() <= end);

        lo..hi
    }

    /// The dataset positions inside a window returned by `lookup`
    pub fn window(&self, range: Range<usize>) -> &[usize] {
        &self.positions[range]
    }

    /// The full permutation
    pub fn sorted_positions(&self) -> &[usize] {
        &self.positions
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
