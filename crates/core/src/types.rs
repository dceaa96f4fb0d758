//! Core data types for the reconciliation pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Wall-clock timestamp in milliseconds since Unix epoch.
///
/// Feeds are stamped in exchange-local time; the value stores that wall time
/// as if it were UTC so bucket boundaries line up with the local clock.
pub type TimestampMs = i64;

/// Size/quantity type.
pub type Size = f64;

/// Milliseconds in one minute.
pub const MS_PER_MINUTE: i64 = 60_000;

/// Default bucket width: 5 minutes.
pub const DEFAULT_BUCKET_MS: i64 = 5 * MS_PER_MINUTE;

/// Truncate a timestamp to the start of its bucket.
///
/// Buckets are right-open, `[start, start + width_ms)`.
#[inline]
pub fn ts_to_bucket(ts_ms: TimestampMs, width_ms: i64) -> TimestampMs {
    ts_ms - ts_ms.rem_euclid(width_ms)
}

/// A single trade print from the tape.
///
/// Empty cells in the export load as `None`; such a print still opens its
/// bucket but adds nothing to the VWAP.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Timestamp in milliseconds.
    pub ts_ms: TimestampMs,
    /// Trade price.
    pub price: Option<f64>,
    /// Traded volume (non-negative).
    pub volume: Option<Size>,
}

impl Trade {
    /// Trade with both price and volume present.
    pub fn new(ts_ms: TimestampMs, price: f64, volume: Size) -> Self {
        Self {
            ts_ms,
            price: Some(price),
            volume: Some(volume),
        }
    }

    /// Price and volume, when both are present.
    #[inline]
    pub fn fill(&self) -> Option<(f64, Size)> {
        self.price.zip(self.volume)
    }
}

/// A top-of-book snapshot from the depth feed.
///
/// Any level-1 field may be missing; only the derived values that depend on
/// it become undefined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BookSnapshot {
    /// Timestamp in milliseconds.
    pub ts_ms: TimestampMs,
    /// Best bid price.
    pub bid_px: Option<f64>,
    /// Best bid size.
    pub bid_sz: Option<Size>,
    /// Best ask price.
    pub ask_px: Option<f64>,
    /// Best ask size.
    pub ask_sz: Option<Size>,
}

impl BookSnapshot {
    /// Snapshot with every level-1 field present.
    pub fn new(ts_ms: TimestampMs, bid_px: f64, bid_sz: Size, ask_px: f64, ask_sz: Size) -> Self {
        Self {
            ts_ms,
            bid_px: Some(bid_px),
            bid_sz: Some(bid_sz),
            ask_px: Some(ask_px),
            ask_sz: Some(ask_sz),
        }
    }

    /// Calculate mid price.
    #[inline]
    pub fn mid(&self) -> Option<f64> {
        self.bid_px.zip(self.ask_px).map(|(bid, ask)| (bid + ask) / 2.0)
    }

    /// Combined size resting at the touch on both sides.
    #[inline]
    pub fn spread_crossing_volume(&self) -> Option<Size> {
        self.bid_sz.zip(self.ask_sz).map(|(bid, ask)| bid + ask)
    }
}

/// Trade tape aggregated to one bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeBucket {
    /// Bucket start timestamp.
    pub bucket_start: TimestampMs,
    /// Volume-weighted average price, `None` when the bucket traded no volume.
    pub vwap: Option<f64>,
    /// Volume traded inside this bucket only.
    pub volume: Size,
    /// Number of prints in the bucket.
    pub trade_count: u32,
}

/// Per-snapshot values derived before resampling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BookMetricPoint {
    pub ts_ms: TimestampMs,
    pub mid_price: Option<f64>,
    /// Spread-crossing volume (bid size + ask size).
    pub weight: Option<Size>,
    /// Session-to-date volume-weighted mid price.
    pub scvwmp: Option<f64>,
    /// Session-to-date VWMP, see [`crate::config::VwmpMode`].
    pub vwmp: Option<f64>,
}

/// Book metrics resampled to one bucket (arithmetic means).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookBucket {
    pub bucket_start: TimestampMs,
    pub scvwmp: Option<f64>,
    pub vwmp: Option<f64>,
    pub mid_price: Option<f64>,
    /// Number of snapshots that fell into the bucket.
    pub snapshot_count: u32,
}

/// A book-derived price proxy compared against trade VWAP.
///
/// Declaration order is the tie-break preference order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Measure {
    /// Spread-crossing volume-weighted mid price.
    Scvwmp,
    /// Volume-weighted mid price.
    Vwmp,
    /// Plain mid price.
    MidPrice,
}

impl Measure {
    /// All measures in preference order.
    pub const ALL: [Measure; 3] = [Measure::Scvwmp, Measure::Vwmp, Measure::MidPrice];

    /// Short column name of the proxy.
    pub fn name(self) -> &'static str {
        match self {
            Measure::Scvwmp => "SCVWMP",
            Measure::Vwmp => "VWMP",
            Measure::MidPrice => "Mid Price",
        }
    }

    /// Column name of the absolute deviation against VWAP.
    pub fn deviation_label(self) -> &'static str {
        match self {
            Measure::Scvwmp => "Abs(VWAP - SCVWMP)",
            Measure::Vwmp => "Abs(VWAP - VWMP)",
            Measure::MidPrice => "Abs(VWAP - Mid Price)",
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.deviation_label())
    }
}

/// One joined bucket of the comparison table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub bucket_start: TimestampMs,
    pub trade_vwap: Option<f64>,
    pub cumulative_trade_volume: Size,
    pub scvwmp: Option<f64>,
    pub vwmp: Option<f64>,
    pub mid_price: Option<f64>,
    pub abs_vwap_scvwmp: Option<f64>,
    pub abs_vwap_vwmp: Option<f64>,
    pub abs_vwap_mid: Option<f64>,
}

impl ComparisonRow {
    /// Absolute deviation of trade VWAP from a measure.
    pub fn deviation(&self, measure: Measure) -> Option<f64> {
        match measure {
            Measure::Scvwmp => self.abs_vwap_scvwmp,
            Measure::Vwmp => self.abs_vwap_vwmp,
            Measure::MidPrice => self.abs_vwap_mid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ts_to_bucket() {
        // 2025-01-15 10:04:59.999 -> 10:00:00.000
        let open = 1736935200000i64;
        assert_eq!(ts_to_bucket(open + 299_999, DEFAULT_BUCKET_MS), open);
        // Right-open: 10:05:00.000 starts the next bucket
        assert_eq!(ts_to_bucket(open + 300_000, DEFAULT_BUCKET_MS), open + 300_000);
    }

    #[test]
    fn test_ts_to_bucket_before_epoch() {
        assert_eq!(ts_to_bucket(-1, DEFAULT_BUCKET_MS), -DEFAULT_BUCKET_MS);
    }

    #[test]
    fn test_book_mid_and_weight() {
        let snap = BookSnapshot::new(0, 99.0, 5.0, 101.0, 7.0);
        assert_eq!(snap.mid(), Some(100.0));
        assert_eq!(snap.spread_crossing_volume(), Some(12.0));
    }

    #[test]
    fn test_missing_size_keeps_mid() {
        let snap = BookSnapshot {
            bid_sz: None,
            ..BookSnapshot::new(0, 99.0, 5.0, 101.0, 7.0)
        };
        assert_eq!(snap.mid(), Some(100.0));
        assert!(snap.spread_crossing_volume().is_none());

        let snap = BookSnapshot {
            ask_px: None,
            ..BookSnapshot::new(0, 99.0, 5.0, 101.0, 7.0)
        };
        assert!(snap.mid().is_none());
        assert_eq!(snap.spread_crossing_volume(), Some(12.0));
    }

    #[test]
    fn test_trade_fill() {
        assert_eq!(Trade::new(0, 100.0, 2.0).fill(), Some((100.0, 2.0)));
        let blank = Trade {
            volume: None,
            ..Trade::new(0, 100.0, 2.0)
        };
        assert!(blank.fill().is_none());
    }

    #[test]
    fn test_measure_preference_order() {
        assert!(Measure::Scvwmp < Measure::Vwmp);
        assert!(Measure::Vwmp < Measure::MidPrice);
        assert_eq!(Measure::ALL[0], Measure::Scvwmp);
        assert_eq!(Measure::MidPrice.to_string(), "Abs(VWAP - Mid Price)");
    }
}
