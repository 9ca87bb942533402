//! CSV Ingest Tests
//!
//! Tests for the ingestion contract:
//! - Only valid rows become records
//! - Every non-blank data row is counted as read
//! - Known datetime layouts parse, others discard the row
//! - I/O failures are fatal, value and encoding problems are not

use std::fs;
use std::io::{Cursor, Write};
use std::path::PathBuf;

use tempfile::TempDir;

use tripquery::dataset::Dataset;
use tripquery::ingest::{parse_timestamp, CsvReader, LoadError, RecordSource};
use tripquery::record::TripRecord;

// =============================================================================
// Helper Functions
// =============================================================================

const HEADER: &str = "VendorID,tpep_pickup_datetime,tpep_dropoff_datetime,passenger_count,\
trip_distance,RatecodeID,store_and_fwd_flag,PULocationID,DOLocationID,payment_type,\
fare_amount,extra,mta_tax,tip_amount,tolls_amount,improvement_surcharge,total_amount";

/// 2020-01-01 00:00:00 UTC
const JAN_1: i64 = 1_577_836_800;

fn trip_row(pickup: &str, dropoff: &str) -> String {
    format!(
        "2,{},{},1,3.10,1,N,161,237,2,12.5,0.5,0.5,0,0,0.3,16.3",
        pickup, dropoff
    )
}

fn write_file(dir: &TempDir, contents: &[u8]) -> PathBuf {
    let path = dir.path().join("trips.csv");
    let mut file = fs::File::create(&path).unwrap();
    file.write_all(contents).unwrap();
    path
}

fn write_rows(dir: &TempDir, rows: &[String]) -> PathBuf {
    let mut text = format!("{}\n", HEADER);
    for r in rows {
        text.push_str(r);
        text.push('\n');
    }
    write_file(dir, text.as_bytes())
}

fn drain<S: RecordSource>(source: &mut S) -> Vec<TripRecord> {
    let mut out = Vec::new();
    while let Some(record) = source.next_record().unwrap() {
        out.push(record);
    }
    out
}

// =============================================================================
// Layout Tests
// =============================================================================

/// Every supported datetime layout yields the same instant.
#[test]
fn test_datetime_layouts() {
    let dir = TempDir::new().unwrap();
    let path = write_rows(
        &dir,
        &[
            trip_row("2020-01-01 00:10:00", "2020-01-01 00:20:00"),
            trip_row("2020-01-01T00:10:00", "2020-01-01T00:20:00"),
            trip_row("2020-01-01 00:10", "2020-01-01 00:20"),
            trip_row("01/01/2020 12:10:00 AM", "01/01/2020 12:20:00 AM"),
            trip_row("01/01/2020 00:10:00", "01/01/2020 00:20:00"),
            trip_row("01/01/2020 00:10", "01/01/2020 00:20"),
        ],
    );

    let mut reader = CsvReader::open(&path).unwrap();
    let records = drain(&mut reader);

    assert_eq!(records.len(), 6);
    for r in &records {
        assert_eq!(r.pickup_timestamp(), JAN_1 + 600);
        assert_eq!(r.duration_secs(), 600);
    }
}

/// Ambiguous or foreign layouts are rejected rather than guessed.
#[test]
fn test_unsupported_layouts_are_rejected() {
    for text in ["20-01-01 00:10:00", "2020/01/01 00:10:00", "Jan 1 2020", "1577837400", ""] {
        assert_eq!(parse_timestamp(text), 0, "{text:?} should be rejected");
    }
}

/// Rows with 17, 18 or 19 fields are accepted.
#[test]
fn test_trailing_surcharge_columns() {
    let dir = TempDir::new().unwrap();
    let base = trip_row("2020-01-01 00:10:00", "2020-01-01 00:20:00");
    let path = write_rows(
        &dir,
        &[
            base.clone(),
            format!("{},2.5", base),
            format!("{},2.5,0", base),
            format!("{},2.5,0,9", base),
            "1,2,3".to_string(),
        ],
    );

    let mut reader = CsvReader::open(&path).unwrap();
    assert_eq!(drain(&mut reader).len(), 3);
    assert_eq!(reader.stats().rows_discarded, 2);
}

/// Quoted fields may contain commas.
#[test]
fn test_quoted_fields() {
    let dir = TempDir::new().unwrap();
    let row = r#""1","2020-01-01 00:10:00","2020-01-01 00:20:00","1","3.1","1","N","161","237","2","12.5","0.5","0.5","0","0","0.3","16.3""#;
    let path = write_rows(&dir, &[row.to_string()]);

    let mut reader = CsvReader::open(&path).unwrap();
    let records = drain(&mut reader);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].total_amount(), 16.3);
}

// =============================================================================
// Counter Tests
// =============================================================================

/// Blank lines are skipped and not counted; CRLF endings are tolerated.
#[test]
fn test_blank_lines_and_crlf() {
    let dir = TempDir::new().unwrap();
    let row = trip_row("2020-01-01 00:10:00", "2020-01-01 00:20:00");
    let text = format!("{HEADER}\r\n{row}\r\n\r\n   \r\n{row}\r\n");
    let path = write_file(&dir, text.as_bytes());

    let mut reader = CsvReader::open(&path).unwrap();
    assert_eq!(drain(&mut reader).len(), 2);

    let stats = reader.stats();
    assert_eq!(stats.rows_read, 2);
    assert_eq!(stats.rows_accepted, 2);
    assert_eq!(stats.rows_discarded, 0);
}

/// Counters add up for a mix of good and bad rows.
#[test]
fn test_counters_balance() {
    let dir = TempDir::new().unwrap();
    let good = trip_row("2020-01-01 00:10:00", "2020-01-01 00:20:00");
    let path = write_rows(
        &dir,
        &[
            good.clone(),
            trip_row("2020-01-01 00:10:00", "2020-01-01 00:10:00"),
            trip_row("1970-01-01 00:00:00", "2020-01-01 00:10:00"),
            good.replace(",3.10,", ",-1,"),
            good.replace(",16.3", ",-16.3"),
            good.replace(",1,3.10,", ",-2,3.10,"),
            good,
        ],
    );

    let mut reader = CsvReader::open(&path).unwrap();
    let records = drain(&mut reader);
    let stats = reader.stats();

    assert_eq!(records.len(), 2);
    assert_eq!(stats.rows_read, 7);
    assert_eq!(stats.rows_accepted, 2);
    assert_eq!(stats.rows_discarded, 5);
    assert_eq!(stats.rows_read, stats.rows_accepted + stats.rows_discarded);
}

/// The file size gives a rough row estimate.
#[test]
fn test_size_hint() {
    let dir = TempDir::new().unwrap();
    let rows: Vec<String> = (0..50)
        .map(|_| trip_row("2020-01-01 00:10:00", "2020-01-01 00:20:00"))
        .collect();
    let path = write_rows(&dir, &rows);

    let reader = CsvReader::open(&path).unwrap();
    let hint = reader.size_hint().unwrap();
    assert!(hint > 0 && hint < 200, "hint {hint}");
    assert_eq!(reader.path(), path.as_path());
}

// =============================================================================
// Failure Tests
// =============================================================================

/// A missing file is an open error.
#[test]
fn test_open_missing() {
    let dir = TempDir::new().unwrap();
    let err = CsvReader::open(dir.path().join("nope.csv")).unwrap_err();
    assert!(matches!(err, LoadError::Open { .. }));
}

/// A row with undecodable bytes is discarded and its neighbours still load.
#[test]
fn test_invalid_utf8_row_is_discarded() {
    let row = trip_row("2020-01-01 00:10:00", "2020-01-01 00:20:00");
    let mut bad = row.clone().into_bytes();
    let flag = row.find(",N,").unwrap() + 1;
    bad[flag] = 0xE9;

    let mut bytes = format!("{HEADER}\n{row}\n").into_bytes();
    bytes.extend_from_slice(&bad);
    bytes.extend_from_slice(format!("\n{row}\n").as_bytes());

    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, &bytes);
    let mut reader = CsvReader::open(&path).unwrap();
    assert_eq!(drain(&mut reader).len(), 2);

    let stats = reader.stats();
    assert_eq!(stats.rows_read, 3);
    assert_eq!(stats.rows_discarded, 1);

    let mut dataset = Dataset::new();
    let stats = dataset.load(CsvReader::new(Cursor::new(bytes))).unwrap();
    assert_eq!(dataset.len(), 2);
    assert_eq!(stats.rows_accepted, 2);
    assert_eq!(stats.rows_discarded, 1);
}
