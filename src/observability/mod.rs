//! Observability subsystem
//!
//! - Structured logging (JSON lines, severity filtered)
//! - Per-engine query counters
//! - Wall-clock timers
//!
//! Observability is read-only: nothing here changes query results.
//!
//! ```ignore
//! use tripquery::observability::{Logger, Severity};
//!
//! Logger::set_min_severity(Severity::Trace);
//! Logger::info("DATASET_LOAD_COMPLETE", &[("rows_accepted", "42")]);
//! ```

mod logger;
mod metrics;
mod scope;

pub use logger::{LogTarget, Logger, Severity};
pub use metrics::{MetricsSnapshot, QueryMetrics};
pub use scope::Timer;
