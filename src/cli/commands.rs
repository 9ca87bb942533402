//! CLI command implementations
//!
//! Every command loads a CSV file into a fresh `Dataset`, does its work and
//! prints JSON lines to stdout. Log events go to stderr so stdout carries
//! only results.

use std::path::Path;

use serde::Serialize;
use serde_json::json;

use crate::config::Config;
use crate::dataset::Dataset;
use crate::ingest::parse_timestamp;
use crate::observability::{Logger, Timer};
use crate::query::{
    CombinedQuery, IntRange, NumericRange, QueryEngine, QueryResult, ScanStrategy, TimeRange,
};
use crate::record::TripRecord;

use super::args::{Cli, Command, QueryArgs, QueryKind};
use super::errors::{CliError, CliResult};
use super::io::write_json;

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let config = load_config(cli.config.as_deref())?;
    run_command(cli.command, &config)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command, config: &Config) -> CliResult<()> {
    match cmd {
        Command::Stats { csv } => stats(config, &csv),
        Command::Query(args) => query(config, &args),
        Command::Bench { csv, runs } => bench(config, &csv, runs),
    }
}

/// Loads the configuration file, or defaults when none is given, and
/// applies its log level. Log output is moved to stderr.
pub fn load_config(path: Option<&Path>) -> CliResult<Config> {
    let config = match path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    Logger::set_min_severity(config.severity()?);
    Logger::set_stderr_only(true);
    Ok(config)
}

/// Load a CSV file and print its row counters
pub fn stats(config: &Config, csv: &Path) -> CliResult<()> {
    let mut dataset = Dataset::with_config(config.clone());
    let stats = dataset.load_csv(csv)?;
    write_json(&stats)
}

#[derive(Serialize)]
struct QuerySummary<'a> {
    kind: &'static str,
    strategy: ScanStrategy,
    matched: usize,
    scanned: usize,
    elapsed_ms: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    records: Vec<&'a TripRecord>,
}

/// Run one query and print a summary
pub fn query(config: &Config, args: &QueryArgs) -> CliResult<()> {
    let mut dataset = Dataset::with_config(config.clone());
    dataset.load_csv(&args.csv)?;

    let unindexed;
    let engine = if args.no_index {
        unindexed = QueryEngine::with_config(dataset.snapshot(), config);
        &unindexed
    } else {
        dataset.query_engine()
    };

    let timer = Timer::new();
    let result = match args.kind {
        QueryKind::Time => engine.search_by_time(time_range(args)?),
        QueryKind::Distance => engine.search_by_distance(numeric_range(args)?),
        QueryKind::Fare => engine.search_by_fare(numeric_range(args)?),
        QueryKind::Location => engine.search_by_location(IntRange::new(
            parse_int("--min", &args.min)?,
            parse_int("--max", &args.max)?,
        )),
        QueryKind::Combined => engine.search_combined(CombinedQuery::new(
            time_range(args)?,
            NumericRange::new(args.distance[0], args.distance[1]),
            IntRange::new(args.passengers[0], args.passengers[1]),
        )),
        QueryKind::Aggregate => {
            let agg = engine.aggregate_fare_by_time(time_range(args)?);
            return write_json(&json!({
                "kind": args.kind.as_str(),
                "sum": agg.sum,
                "avg": agg.avg,
                "count": agg.count,
                "elapsed_ms": to_ms(timer.elapsed().as_secs_f64()),
            }));
        }
    };
    let elapsed_ms = to_ms(timer.elapsed().as_secs_f64());

    write_json(&QuerySummary {
        kind: args.kind.as_str(),
        strategy: result.strategy,
        matched: result.len(),
        scanned: result.scanned,
        elapsed_ms,
        records: result.iter().take(args.limit).collect(),
    })
}

/// Time load, index build and every query, averaged over `runs`
pub fn bench(config: &Config, csv: &Path, runs: u32) -> CliResult<()> {
    let runs = runs.max(1);

    let (load_ms, stats) = time_runs(runs, || {
        Dataset::with_config(config.clone()).load_csv(csv)
    });
    let stats = stats?;
    write_json(&json!({
        "op": "load",
        "runs": runs,
        "avg_ms": load_ms,
        "rows_read": stats.rows_read,
        "rows_accepted": stats.rows_accepted,
        "rows_discarded": stats.rows_discarded,
    }))?;

    let mut dataset = Dataset::with_config(config.clone());
    dataset.load_csv(csv)?;

    let (fare_ms, fares) = time_runs(runs, || {
        dataset.search_by_fare(NumericRange::new(10.0, 50.0))
    });
    write_json(&json!({ "op": "dataset_fare", "avg_ms": fare_ms, "matched": fares.len() }))?;

    let (dist_ms, dists) = time_runs(runs, || {
        dataset.search_by_distance(NumericRange::new(1.0, 5.0))
    });
    write_json(&json!({ "op": "dataset_distance", "avg_ms": dist_ms, "matched": dists.len() }))?;

    let mut engine = QueryEngine::with_config(dataset.snapshot(), config);
    let (build_ms, _) = time_runs(runs, || engine.build_indexes());
    write_json(&json!({ "op": "build_indexes", "avg_ms": build_ms, "records": engine.len() }))?;

    let window = middle_window(&engine);
    let distance = NumericRange::new(1.0, 5.0);

    let (ms, result) = time_runs(runs, || engine.search_by_time(window));
    report("search_by_time", ms, &result)?;

    let (ms, result) = time_runs(runs, || engine.search_by_distance(distance));
    report("search_by_distance", ms, &result)?;

    let (ms, result) = time_runs(runs, || engine.search_by_fare(NumericRange::new(10.0, 50.0)));
    report("search_by_fare", ms, &result)?;

    let (ms, result) = time_runs(runs, || engine.search_by_location(IntRange::new(1, 100)));
    report("search_by_location", ms, &result)?;

    let combined = CombinedQuery::new(window, distance, IntRange::new(1, 2));
    let (ms, result) = time_runs(runs, || engine.search_combined(combined));
    report("search_combined", ms, &result)?;

    let (ms, agg) = time_runs(runs, || engine.aggregate_fare_by_time(window));
    write_json(&json!({
        "op": "aggregate_fare_by_time",
        "avg_ms": ms,
        "sum": agg.sum,
        "avg": agg.avg,
        "count": agg.count,
    }))?;

    write_json(&json!({ "op": "metrics", "metrics": engine.metrics() }))
}

fn report(op: &str, avg_ms: f64, result: &QueryResult<'_>) -> CliResult<()> {
    write_json(&json!({
        "op": op,
        "avg_ms": avg_ms,
        "strategy": result.strategy,
        "matched": result.len(),
        "scanned": result.scanned,
    }))
}

/// Runs `f` `runs` times; returns the mean milliseconds and the last output.
fn time_runs<T, F: FnMut() -> T>(runs: u32, mut f: F) -> (f64, T) {
    let timer = Timer::new();
    let mut last = f();
    for _ in 1..runs {
        last = f();
    }
    (to_ms(timer.elapsed().as_secs_f64()) / f64::from(runs), last)
}

fn to_ms(secs: f64) -> f64 {
    secs * 1_000.0
}

/// The middle half of the indexed pickup span
fn middle_window(engine: &QueryEngine) -> TimeRange {
    let positions = engine.time_index().sorted_positions();
    let records = engine.records();
    match (positions.first(), positions.last()) {
        (Some(&first), Some(&last)) => {
            let lo = records[first].pickup_timestamp();
            let hi = records[last].pickup_timestamp();
            let quarter = (hi - lo) / 4;
            TimeRange::new(lo + quarter, hi - quarter)
        }
        _ => TimeRange::new(0, 0),
    }
}

fn time_range(args: &QueryArgs) -> CliResult<TimeRange> {
    Ok(TimeRange::new(
        parse_time("--min", &args.min)?,
        parse_time("--max", &args.max)?,
    ))
}

fn numeric_range(args: &QueryArgs) -> CliResult<NumericRange> {
    Ok(NumericRange::new(
        parse_float("--min", &args.min)?,
        parse_float("--max", &args.max)?,
    ))
}

/// Epoch seconds, or any datetime layout the CSV reader accepts
fn parse_time(name: &'static str, value: &str) -> CliResult<i64> {
    let value = value.trim();
    if let Ok(ts) = value.parse::<i64>() {
        return Ok(ts);
    }
    match parse_timestamp(value) {
        0 => Err(CliError::invalid_argument(name, value)),
        ts => Ok(ts),
    }
}

fn parse_float(name: &'static str, value: &str) -> CliResult<f64> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::invalid_argument(name, value))
}

fn parse_int(name: &'static str, value: &str) -> CliResult<i32> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::invalid_argument(name, value))
}
