//! Result writers: comparison CSV, summary JSON and the console report.

use crate::summary::SessionSummary;
use chrono::DateTime;
use recon_core::{ComparisonRow, Measure, Result, TimestampMs};
use serde::Serialize;
use std::fmt::Write as _;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Comparison table header, in column order.
pub const COMPARISON_HEADER: [&str; 9] = [
    "Date-Time",
    "Trade VWAP",
    "Cumulative Trade Volume",
    "SCVWMP",
    "VWMP",
    "Mid Price",
    "Abs(VWAP - SCVWMP)",
    "Abs(VWAP - VWMP)",
    "Abs(VWAP - Mid Price)",
];

/// Bucket start as printed in the comparison table.
pub fn format_bucket_start(ts_ms: TimestampMs) -> String {
    DateTime::from_timestamp_millis(ts_ms)
        .map(|dt| dt.naive_utc().format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ts_ms.to_string())
}

#[derive(Serialize)]
struct ComparisonRecord {
    date_time: String,
    trade_vwap: Option<f64>,
    cumulative_trade_volume: f64,
    scvwmp: Option<f64>,
    vwmp: Option<f64>,
    mid_price: Option<f64>,
    abs_vwap_scvwmp: Option<f64>,
    abs_vwap_vwmp: Option<f64>,
    abs_vwap_mid: Option<f64>,
}

impl From<&ComparisonRow> for ComparisonRecord {
    fn from(row: &ComparisonRow) -> Self {
        Self {
            date_time: format_bucket_start(row.bucket_start),
            trade_vwap: row.trade_vwap,
            cumulative_trade_volume: row.cumulative_trade_volume,
            scvwmp: row.scvwmp,
            vwmp: row.vwmp,
            mid_price: row.mid_price,
            abs_vwap_scvwmp: row.abs_vwap_scvwmp,
            abs_vwap_vwmp: row.abs_vwap_vwmp,
            abs_vwap_mid: row.abs_vwap_mid,
        }
    }
}

/// Write the comparison table as CSV. Undefined values are empty cells.
pub fn write_comparison_csv<W: Write>(writer: W, rows: &[ComparisonRow]) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(COMPARISON_HEADER)?;
    for row in rows {
        csv_writer.serialize(ComparisonRecord::from(row))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the comparison table to a file.
pub fn save_comparison_csv(path: &Path, rows: &[ComparisonRow]) -> Result<()> {
    let file = File::create(path)?;
    write_comparison_csv(file, rows)
}

/// Write the summary as pretty JSON.
pub fn save_summary_json(path: &Path, summary: &SessionSummary) -> Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;
    file.write_all(b"\n")?;
    Ok(())
}

/// Human-readable session report.
pub fn render_report(summary: &SessionSummary) -> String {
    let mut out = String::from("Total Absolute Differences:\n");
    for measure in Measure::ALL {
        let total = summary
            .totals
            .get(measure)
            .map_or_else(|| "undefined".to_string(), |t| format!("{t:.6}"));
        let _ = writeln!(out, "{:<24}{:>16}", measure.deviation_label(), total);
    }
    let _ = writeln!(
        out,
        "Buckets compared: {} (trade: {}, book: {}, null VWAP: {})",
        summary.joined_buckets, summary.trade_buckets, summary.book_buckets, summary.null_vwap_buckets
    );
    match summary.closest {
        Some(measure) => {
            let _ = writeln!(out, "The measure closest to VWAP is: {measure}");
        }
        None => out.push_str("The measure closest to VWAP is: undefined (no comparable buckets)\n"),
    }
    out
}
