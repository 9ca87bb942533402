//! CLI module for tripquery
//!
//! Provides command-line interface for:
//! - stats: Load a CSV file and report row counters
//! - query: One-shot query execution
//! - bench: Timing of load, index build and every query

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, QueryArgs, QueryKind};
pub use commands::{bench, load_config, query, run, run_command, stats};
pub use errors::{CliError, CliResult};
pub use io::{write_error, write_json};
