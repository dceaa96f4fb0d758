//! Exchange CSV loading.
//!
//! Reads the trade tape and the L1 depth export into typed records. Rows
//! with an unparseable timestamp are dropped and counted. Empty numeric cells
//! load as `None` and the row is kept. A missing column or a non-numeric cell
//! aborts the load.

use crate::session::{MarketHours, Timestamped};
use crate::timestamp::parse_timestamp;
use recon_core::{BookSnapshot, Error, Result, TimestampMs, Trade};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Timestamp column shared by both exports.
pub const DATE_TIME_COLUMN: &str = "Date-Time";

/// Required trade tape columns.
pub const TRADE_COLUMNS: &[&str] = &[DATE_TIME_COLUMN, "Price", "Volume"];

/// Required depth columns (level 1 only).
pub const BOOK_COLUMNS: &[&str] = &[
    DATE_TIME_COLUMN,
    "L1-BidPrice",
    "L1-BidSize",
    "L1-AskPrice",
    "L1-AskSize",
];

/// Counters collected while loading one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Data rows read (header excluded).
    pub rows_read: usize,
    /// Rows returned to the caller.
    pub rows_kept: usize,
    /// Rows dropped for an unparseable timestamp.
    pub bad_timestamps: usize,
    /// Kept rows with at least one empty numeric cell.
    pub missing_values: usize,
    /// Rows dropped by the market-hours filter.
    pub outside_session: usize,
    /// Earliest kept timestamp.
    pub first_ts: Option<TimestampMs>,
    /// Latest kept timestamp.
    pub last_ts: Option<TimestampMs>,
}

/// Records loaded from one feed plus the load counters.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub records: Vec<T>,
    pub report: LoadReport,
}

#[derive(Debug, Deserialize)]
struct TradeRow {
    #[serde(rename = "Date-Time")]
    date_time: String,
    #[serde(rename = "Price")]
    price: Option<f64>,
    #[serde(rename = "Volume")]
    volume: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct BookRow {
    #[serde(rename = "Date-Time")]
    date_time: String,
    #[serde(rename = "L1-BidPrice")]
    bid_px: Option<f64>,
    #[serde(rename = "L1-BidSize")]
    bid_sz: Option<f64>,
    #[serde(rename = "L1-AskPrice")]
    ask_px: Option<f64>,
    #[serde(rename = "L1-AskSize")]
    ask_sz: Option<f64>,
}

/// A raw CSV row that turns into one feed record.
trait FeedRow: DeserializeOwned {
    type Record: FeedRecord;

    fn date_time(&self) -> &str;

    fn into_record(self, ts_ms: TimestampMs) -> Self::Record;
}

/// A loaded record that may carry empty cells.
trait FeedRecord: Timestamped {
    fn is_complete(&self) -> bool;
}

impl FeedRecord for Trade {
    fn is_complete(&self) -> bool {
        self.fill().is_some()
    }
}

impl FeedRecord for BookSnapshot {
    fn is_complete(&self) -> bool {
        self.mid().is_some() && self.spread_crossing_volume().is_some()
    }
}

impl FeedRow for TradeRow {
    type Record = Trade;

    fn date_time(&self) -> &str {
        &self.date_time
    }

    fn into_record(self, ts_ms: TimestampMs) -> Trade {
        Trade {
            ts_ms,
            price: self.price,
            volume: self.volume,
        }
    }
}

impl FeedRow for BookRow {
    type Record = BookSnapshot;

    fn date_time(&self) -> &str {
        &self.date_time
    }

    fn into_record(self, ts_ms: TimestampMs) -> BookSnapshot {
        BookSnapshot {
            ts_ms,
            bid_px: self.bid_px,
            bid_sz: self.bid_sz,
            ask_px: self.ask_px,
            ask_sz: self.ask_sz,
        }
    }
}

fn read_feed<R, Row>(
    reader: R,
    source: &str,
    required: &[&str],
    hours: Option<&MarketHours>,
) -> Result<Loaded<Row::Record>>
where
    R: Read,
    Row: FeedRow,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|err| Error::data(format!("{source}: failed to read header: {err}")))?
        .clone();
    if let Some(missing) = required.iter().find(|col| !headers.iter().any(|h| h == **col)) {
        return Err(Error::data(format!("{source}: missing required column '{missing}'")));
    }

    let mut records = Vec::new();
    let mut report = LoadReport::default();

    for (idx, result) in csv_reader.deserialize::<Row>().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        let row = result.map_err(|err| Error::data(format!("{source}: line {line}: {err}")))?;
        report.rows_read += 1;

        let Some(ts_ms) = parse_timestamp(row.date_time()) else {
            report.bad_timestamps += 1;
            continue;
        };
        records.push(row.into_record(ts_ms));
    }

    if let Some(hours) = hours {
        let parsed = records.len();
        records = hours.filter(records);
        report.outside_session = parsed - records.len();
    }

    report.rows_kept = records.len();
    report.missing_values = records.iter().filter(|r| !r.is_complete()).count();
    report.first_ts = records.iter().map(Timestamped::ts_ms).min();
    report.last_ts = records.iter().map(Timestamped::ts_ms).max();

    if report.missing_values > 0 {
        tracing::warn!(
            source,
            rows = report.missing_values,
            "rows with empty numeric cells kept as undefined values"
        );
    }

    tracing::debug!(
        source,
        rows_read = report.rows_read,
        rows_kept = report.rows_kept,
        bad_timestamps = report.bad_timestamps,
        missing_values = report.missing_values,
        outside_session = report.outside_session,
        "feed loaded"
    );

    Ok(Loaded { records, report })
}

/// Read a trade tape from any reader.
pub fn read_trades<R: Read>(
    reader: R,
    source: &str,
    hours: Option<&MarketHours>,
) -> Result<Loaded<Trade>> {
    read_feed::<R, TradeRow>(reader, source, TRADE_COLUMNS, hours)
}

/// Read a depth export from any reader.
pub fn read_book<R: Read>(
    reader: R,
    source: &str,
    hours: Option<&MarketHours>,
) -> Result<Loaded<BookSnapshot>> {
    read_feed::<R, BookRow>(reader, source, BOOK_COLUMNS, hours)
}

/// Load a trade tape CSV file.
pub fn load_trades(path: &Path, hours: Option<&MarketHours>) -> Result<Loaded<Trade>> {
    let file = File::open(path)?;
    read_trades(file, &path.display().to_string(), hours)
}

/// Load a depth CSV file.
pub fn load_book(path: &Path, hours: Option<&MarketHours>) -> Result<Loaded<BookSnapshot>> {
    let file = File::open(path)?;
    read_book(file, &path.display().to_string(), hours)
}
