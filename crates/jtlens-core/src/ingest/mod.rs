//! Decoding of JMeter CSV result logs (`.jtl`) into [`RequestRecord`]s.
//!
//! This is the upstream boundary of the engine: every field is type-checked
//! here once, so [`crate::engine::analyze`] can assume well-typed input.

pub mod io;

use std::str::FromStr;

use csv::StringRecord;
use regex::Regex;
use tracing::{debug, info};

use crate::error::JtlensError;
use crate::record::RequestRecord;

pub use io::read_jtl;

/// Options controlling how a result log is decoded.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Field delimiter byte.
    pub delimiter: u8,
    /// Keep only rows whose label matches.
    pub label_filter: Option<Regex>,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            label_filter: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Column layout
// ---------------------------------------------------------------------------

/// Position of each known JMeter column in the header row.
struct ColumnMap {
    timestamp: usize,
    elapsed: usize,
    label: Option<usize>,
    response_code: Option<usize>,
    success: Option<usize>,
    bytes: Option<usize>,
    sent_bytes: Option<usize>,
    grp_threads: Option<usize>,
    all_threads: Option<usize>,
    url: Option<usize>,
    latency: Option<usize>,
    idle_time: Option<usize>,
    connect: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Result<Self, JtlensError> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let required = |name: &'static str| {
            find(name).ok_or_else(|| {
                JtlensError::malformed(0, name, "column is missing from the header row")
            })
        };

        Ok(Self {
            timestamp: required("timeStamp")?,
            elapsed: required("elapsed")?,
            label: find("label"),
            response_code: find("responseCode"),
            success: find("success"),
            bytes: find("bytes"),
            sent_bytes: find("sentBytes"),
            grp_threads: find("grpThreads"),
            all_threads: find("allThreads"),
            url: find("URL"),
            latency: find("Latency"),
            idle_time: find("IdleTime"),
            connect: find("Connect"),
        })
    }
}

// ---------------------------------------------------------------------------
// Field decoding
// ---------------------------------------------------------------------------

/// Trimmed, non-empty value of a column, if the column exists.
fn cell(record: &StringRecord, idx: Option<usize>) -> Option<&str> {
    idx.and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn parse_number<T: FromStr>(
    value: Option<&str>,
    row: usize,
    field: &'static str,
) -> Result<Option<T>, JtlensError> {
    match value {
        None => Ok(None),
        Some(raw) => raw.parse::<T>().map(Some).map_err(|_| {
            JtlensError::malformed(row, field, format!("is not a valid number (got \"{raw}\")"))
        }),
    }
}

fn parse_required<T: FromStr>(
    value: Option<&str>,
    row: usize,
    field: &'static str,
) -> Result<T, JtlensError> {
    parse_number(value, row, field)?.ok_or_else(|| JtlensError::malformed(row, field, "is empty"))
}

fn parse_success(value: Option<&str>, row: usize) -> Result<bool, JtlensError> {
    match value {
        None => Ok(true),
        Some(raw) if raw.eq_ignore_ascii_case("true") => Ok(true),
        Some(raw) if raw.eq_ignore_ascii_case("false") => Ok(false),
        Some(raw) => Err(JtlensError::malformed(
            row,
            "success",
            format!("must be true or false (got \"{raw}\")"),
        )),
    }
}

/// JMeter writes text such as `Non HTTP response code: java.net.ConnectException`
/// when no HTTP status was received; those rows get code 0.
fn parse_response_code(value: Option<&str>, row: usize) -> Result<u16, JtlensError> {
    match value {
        None => Ok(0),
        Some(raw) if raw.starts_with("Non HTTP") => Ok(0),
        Some(raw) => parse_required(Some(raw), row, "responseCode"),
    }
}

fn decode_row(
    record: &StringRecord,
    cols: &ColumnMap,
    row: usize,
) -> Result<RequestRecord, JtlensError> {
    let number = |idx: Option<usize>, field: &'static str| -> Result<u64, JtlensError> {
        Ok(parse_number(cell(record, idx), row, field)?.unwrap_or(0))
    };
    let threads = |idx: Option<usize>, field: &'static str| -> Result<u32, JtlensError> {
        Ok(parse_number(cell(record, idx), row, field)?.unwrap_or(0))
    };

    Ok(RequestRecord {
        timestamp: parse_required(cell(record, Some(cols.timestamp)), row, "timeStamp")?,
        elapsed: parse_required(cell(record, Some(cols.elapsed)), row, "elapsed")?,
        label: cell(record, cols.label).unwrap_or_default().to_string(),
        response_code: parse_response_code(cell(record, cols.response_code), row)?,
        success: parse_success(cell(record, cols.success), row)?,
        bytes_received: number(cols.bytes, "bytes")?,
        bytes_sent: number(cols.sent_bytes, "sentBytes")?,
        active_threads_in_group: threads(cols.grp_threads, "grpThreads")?,
        active_threads_total: threads(cols.all_threads, "allThreads")?,
        latency: number(cols.latency, "Latency")?,
        connect_time: number(cols.connect, "Connect")?,
        url: cell(record, cols.url).map(str::to_string),
        idle_time: number(cols.idle_time, "IdleTime")?,
    })
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Decode a JMeter CSV result log (with header row) into request records.
///
/// Any row with a missing required value or an unparseable number fails the
/// whole parse; no partial result is returned.
pub fn parse_jtl(
    content: &str,
    options: &IngestOptions,
) -> Result<Vec<RequestRecord>, JtlensError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let cols = ColumnMap::from_headers(reader.headers()?)?;

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for (i, result) in reader.records().enumerate() {
        let raw = result?;
        let record = decode_row(&raw, &cols, i + 1)?;
        if let Some(filter) = &options.label_filter {
            if !filter.is_match(&record.label) {
                skipped += 1;
                continue;
            }
        }
        records.push(record);
    }

    if skipped > 0 {
        debug!(skipped, "rows excluded by label filter");
    }
    info!(records = records.len(), "decoded result log");
    Ok(records)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
