//! CLI argument definitions using clap
//!
//! Commands:
//! - tripquery stats <csv>
//! - tripquery query <csv> <kind> --min <v> --max <v>
//! - tripquery bench <csv> [--runs N]

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// tripquery - range queries over NYC taxi trip records
#[derive(Parser, Debug)]
#[command(name = "tripquery")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load a CSV file and report row counters
    Stats {
        /// Trip CSV file with a header line
        csv: PathBuf,
    },

    /// Run one query and print a summary
    Query(QueryArgs),

    /// Time loading, index build and every query
    Bench {
        /// Trip CSV file with a header line
        csv: PathBuf,

        /// Runs averaged per measurement
        #[arg(long, default_value_t = 10)]
        runs: u32,
    },
}

/// Arguments of `tripquery query`
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Trip CSV file with a header line
    pub csv: PathBuf,

    /// Query to run
    #[arg(value_enum)]
    pub kind: QueryKind,

    /// Lower bound; epoch seconds or a datetime for time queries
    #[arg(long, allow_hyphen_values = true)]
    pub min: String,

    /// Upper bound; epoch seconds or a datetime for time queries
    #[arg(long, allow_hyphen_values = true)]
    pub max: String,

    /// Distance bounds for combined queries
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"], default_values_t = [0.0, f64::MAX])]
    pub distance: Vec<f64>,

    /// Passenger bounds for combined queries
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"], default_values_t = [0, i32::MAX])]
    pub passengers: Vec<i32>,

    /// Skip building the time index
    #[arg(long)]
    pub no_index: bool,

    /// Number of matching records to print
    #[arg(long, default_value_t = 0)]
    pub limit: usize,
}

/// Query shapes exposed on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Time,
    Distance,
    Fare,
    Location,
    Combined,
    Aggregate,
}

impl QueryKind {
    /// Whether `--min`/`--max` are timestamps
    pub fn is_time(&self) -> bool {
        matches!(self, Self::Time | Self::Combined | Self::Aggregate)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Distance => "distance",
            Self::Fare => "fare",
            Self::Location => "location",
            Self::Combined => "combined",
            Self::Aggregate => "aggregate",
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
