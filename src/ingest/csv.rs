//! Streaming reader for TLC yellow-taxi CSV exports
//!
//! Rows are pulled one at a time through `csv::Reader`; the file is never
//! held in memory. The first row is a header and is skipped. Rows whose
//! fields are all blank are ignored. Fields are handled as raw bytes so an
//! undecodable row is discarded like any other bad row.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use ::csv::{ByteRecord, ErrorKind, Reader, ReaderBuilder, Trim};

use crate::observability::{Logger, Severity};
use crate::record::{RecordError, TripRecord, TripRecordBuilder};

use super::errors::{LoadError, LoadResult};
use super::source::{LoadStats, RecordSource};
use super::timestamp::parse_timestamp;

/// Columns in the classic yellow-taxi layout
pub const BASE_FIELDS: usize = 17;

/// Newer exports append congestion_surcharge and airport_fee
pub const MAX_FIELDS: usize = 19;

/// Rough on-disk size of one row, for capacity estimates
const APPROX_ROW_BYTES: u64 = 100;

const COLUMNS: [&str; BASE_FIELDS] = [
    "VendorID",
    "tpep_pickup_datetime",
    "tpep_dropoff_datetime",
    "passenger_count",
    "trip_distance",
    "RatecodeID",
    "store_and_fwd_flag",
    "PULocationID",
    "DOLocationID",
    "payment_type",
    "fare_amount",
    "extra",
    "mta_tax",
    "tip_amount",
    "tolls_amount",
    "improvement_surcharge",
    "total_amount",
];

/// Why a row was discarded
#[derive(Debug, Clone, PartialEq)]
pub enum RowRejection {
    FieldCount(usize),
    /// A column holds bytes that are not UTF-8
    Encoding(&'static str),
    Unparseable(&'static str),
    Invalid(RecordError),
}

impl RowRejection {
    fn reason(&self) -> String {
        match self {
            RowRejection::FieldCount(n) => format!("field count {}", n),
            RowRejection::Encoding(field) => format!("invalid utf-8 in {}", field),
            RowRejection::Unparseable(field) => format!("unparseable {}", field),
            RowRejection::Invalid(e) => e.code().to_string(),
        }
    }
}

/// Row-oriented CSV record source
pub struct CsvReader<R> {
    reader: Reader<R>,
    record: ByteRecord,
    path: PathBuf,
    size_hint: Option<usize>,
    stats: LoadStats,
}

impl CsvReader<File> {
    /// Opens a CSV file; its first row is the header.
    pub fn open(path: impl AsRef<Path>) -> LoadResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let size_hint = file
            .metadata()
            .ok()
            .map(|m| (m.len() / APPROX_ROW_BYTES) as usize);

        let mut reader = Self::new(file);
        reader.path = path.to_path_buf();
        reader.size_hint = size_hint;
        Ok(reader)
    }
}

impl<R: io::Read> CsvReader<R> {
    /// Wraps any reader; the first row is treated as the header.
    pub fn new(reader: R) -> Self {
        let reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        Self {
            reader,
            record: ByteRecord::new(),
            path: PathBuf::new(),
            size_hint: None,
            stats: LoadStats::default(),
        }
    }

    /// Path of the underlying file, empty for in-memory readers
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the next row into `self.record`; false at EOF.
    fn read_record(&mut self) -> LoadResult<bool> {
        match self.reader.read_byte_record(&mut self.record) {
            Ok(more) => Ok(more),
            Err(err) => {
                let line = self.reader.position().line() as usize;
                let source = match err.into_kind() {
                    ErrorKind::Io(source) => source,
                    kind => io::Error::new(io::ErrorKind::InvalidData, format!("{:?}", kind)),
                };
                Err(LoadError::Read { line, source })
            }
        }
    }

    fn line(&self) -> u64 {
        self.record.position().map_or(0, |p| p.line())
    }

    fn reject(&mut self, rejection: RowRejection) {
        self.stats.rows_discarded += 1;
        if Logger::enabled(Severity::Trace) {
            Logger::trace(
                "INGEST_ROW_REJECTED",
                &[
                    ("line", &self.line().to_string()),
                    ("reason", &rejection.reason()),
                ],
            );
        }
    }
}

impl<R: io::Read> RecordSource for CsvReader<R> {
    fn next_record(&mut self) -> LoadResult<Option<TripRecord>> {
        while self.read_record()? {
            if self.record.iter().all(|field| field.is_empty()) {
                continue;
            }
            self.stats.rows_read += 1;

            match parse_row(&self.record) {
                Ok(record) => {
                    self.stats.rows_accepted += 1;
                    return Ok(Some(record));
                }
                Err(rejection) => self.reject(rejection),
            }
        }
        Ok(None)
    }

    fn stats(&self) -> LoadStats {
        self.stats
    }

    fn size_hint(&self) -> Option<usize> {
        self.size_hint
    }
}

impl<R> std::fmt::Debug for CsvReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvReader")
            .field("path", &self.path)
            .field("line", &self.record.position().map(|p| p.line()))
            .field("stats", &self.stats)
            .finish()
    }
}

/// Parses one data row into a validated record.
///
/// Columns past the seventeenth are surcharges the record does not carry
/// and are not decoded.
pub fn parse_row(row: &ByteRecord) -> Result<TripRecord, RowRejection> {
    if row.len() < BASE_FIELDS || row.len() > MAX_FIELDS {
        return Err(RowRejection::FieldCount(row.len()));
    }

    let mut fields = [""; BASE_FIELDS];
    for (i, (slot, bytes)) in fields.iter_mut().zip(row.iter()).enumerate() {
        *slot = std::str::from_utf8(bytes).map_err(|_| RowRejection::Encoding(COLUMNS[i]))?;
    }

    let pickup = parse_timestamp(fields[1]);
    if pickup <= 0 {
        return Err(RowRejection::Unparseable("pickup datetime"));
    }
    let dropoff = parse_timestamp(fields[2]);
    if dropoff <= 0 {
        return Err(RowRejection::Unparseable("dropoff datetime"));
    }

    let builder = TripRecordBuilder::new(pickup, dropoff)
        .vendor_id(int_field(fields[0], COLUMNS[0])?)
        .passenger_count(int_field(fields[3], COLUMNS[3])?)
        .trip_distance(float_field(fields[4], COLUMNS[4])?)
        .rate_code_id(int_field(fields[5], COLUMNS[5])?)
        .store_and_fwd_flag(flag_field(fields[6])?)
        .pu_location_id(int_field(fields[7], COLUMNS[7])?)
        .do_location_id(int_field(fields[8], COLUMNS[8])?)
        .payment_type(int_field(fields[9], COLUMNS[9])?)
        .fare_amount(float_field(fields[10], COLUMNS[10])?)
        .extra(float_field(fields[11], COLUMNS[11])?)
        .mta_tax(float_field(fields[12], COLUMNS[12])?)
        .tip_amount(float_field(fields[13], COLUMNS[13])?)
        .tolls_amount(float_field(fields[14], COLUMNS[14])?)
        .improvement_surcharge(float_field(fields[15], COLUMNS[15])?)
        .total_amount(float_field(fields[16], COLUMNS[16])?);

    builder.build().map_err(RowRejection::Invalid)
}

fn int_field(text: &str, name: &'static str) -> Result<i32, RowRejection> {
    // Some exports write integer columns as "1.0"
    text.parse::<i32>()
        .ok()
        .or_else(|| {
            text.parse::<f64>()
                .ok()
                .filter(|v| v.fract() == 0.0 && v.abs() <= i32::MAX as f64)
                .map(|v| v as i32)
        })
        .ok_or(RowRejection::Unparseable(name))
}

fn float_field(text: &str, name: &'static str) -> Result<f64, RowRejection> {
    text.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or(RowRejection::Unparseable(name))
}

fn flag_field(text: &str) -> Result<bool, RowRejection> {
    match text {
        "Y" | "y" | "1" | "true" | "TRUE" => Ok(true),
        "N" | "n" | "0" | "false" | "FALSE" | "" => Ok(false),
        _ => Err(RowRejection::Unparseable("store_and_fwd_flag")),
    }
}
