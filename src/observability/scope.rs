//! Wall-clock timing for observable operations

use std::time::{Duration, Instant};

/// A simple duration timer
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Starts a new timer
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Time since the timer started
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Elapsed milliseconds with sub-millisecond precision, formatted for logs
    pub fn elapsed_ms(&self) -> String {
        format!("{:.3}", self.elapsed().as_secs_f64() * 1_000.0)
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
