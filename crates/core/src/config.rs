//! Configuration structures for the reconciliation pipeline.

use crate::error::{Error, Result};
use crate::types::MS_PER_MINUTE;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input file locations.
    pub input: InputConfig,
    /// Trading session window.
    pub session: SessionConfig,
    /// Aggregation and comparison settings.
    pub metrics: MetricsConfig,
    /// Output locations.
    pub output: OutputConfig,
}

impl Config {
    /// Check invariants that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.metrics.bucket_minutes == 0 {
            return Err(Error::config("metrics.bucket_minutes must be > 0"));
        }
        if self.session.market_open >= self.session.market_close {
            return Err(Error::config(format!(
                "session.market_open ({}) must be before session.market_close ({})",
                self.session.market_open, self.session.market_close
            )));
        }
        Ok(())
    }
}

/// Raw feed locations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Trade tape CSV.
    pub trades: Option<PathBuf>,
    /// Market depth CSV.
    pub book: Option<PathBuf>,
}

/// Market-hours window applied to both feeds while loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Session open (wall clock, inclusive).
    pub market_open: NaiveTime,
    /// Session close (wall clock, inclusive).
    pub market_close: NaiveTime,
    /// Drop records outside the window.
    pub filter_market_hours: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            market_open: NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default(),
            market_close: NaiveTime::from_hms_opt(16, 0, 0).unwrap_or_default(),
            filter_market_hours: true,
        }
    }
}

/// How the VWMP column is computed.
///
/// `SpreadCrossing` reproduces the reference output, where VWMP and SCVWMP
/// share one formula. `RunningMean` is the unweighted alternative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VwmpMode {
    /// Running Σ(mid·(bid_sz+ask_sz)) / Σ(bid_sz+ask_sz), same as SCVWMP.
    #[default]
    SpreadCrossing,
    /// Running Σmid / n.
    RunningMean,
}

/// Aggregation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Bucket width in minutes.
    pub bucket_minutes: u32,
    /// VWMP variant.
    pub vwmp_mode: VwmpMode,
}

impl MetricsConfig {
    /// Bucket width in milliseconds.
    #[inline]
    pub fn bucket_ms(&self) -> i64 {
        i64::from(self.bucket_minutes) * MS_PER_MINUTE
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            bucket_minutes: 5,
            vwmp_mode: VwmpMode::SpreadCrossing,
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Comparison table destination.
    pub comparison_csv: PathBuf,
    /// Optional machine-readable summary.
    pub summary_json: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            comparison_csv: PathBuf::from("VWAP_Comparison_5min.csv"),
            summary_json: None,
        }
    }
}
