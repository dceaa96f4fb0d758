//! Session-level deviation totals.
//!
//! Sums the per-bucket absolute deviations of each proxy and picks the
//! proxy closest to trade VWAP.

use ordered_float::OrderedFloat;
use recon_core::{ComparisonRow, Measure};
use serde::Serialize;

/// Summed absolute deviation per proxy.
///
/// A total is `None` when no joined bucket had a defined deviation for that
/// proxy, which is the case for an empty join.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DeviationTotals {
    pub scvwmp: Option<f64>,
    pub vwmp: Option<f64>,
    pub mid_price: Option<f64>,
}

impl DeviationTotals {
    /// Sum deviations column-wise, skipping undefined cells.
    pub fn from_rows(rows: &[ComparisonRow]) -> Self {
        let total = |measure: Measure| {
            rows.iter()
                .filter_map(|row| row.deviation(measure))
                .fold(None, |acc: Option<f64>, d| Some(acc.unwrap_or(0.0) + d))
        };

        Self {
            scvwmp: total(Measure::Scvwmp),
            vwmp: total(Measure::Vwmp),
            mid_price: total(Measure::MidPrice),
        }
    }

    /// Total for one measure.
    pub fn get(&self, measure: Measure) -> Option<f64> {
        match measure {
            Measure::Scvwmp => self.scvwmp,
            Measure::Vwmp => self.vwmp,
            Measure::MidPrice => self.mid_price,
        }
    }

    /// Measure with the smallest defined total.
    ///
    /// Ties go to the earlier measure in [`Measure::ALL`].
    pub fn closest(&self) -> Option<Measure> {
        Measure::ALL
            .iter()
            .filter_map(|&m| self.get(m).map(|total| (m, OrderedFloat(total))))
            .min_by_key(|&(_, total)| total)
            .map(|(m, _)| m)
    }
}

/// Summary of one reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionSummary {
    /// Summed absolute deviations.
    pub totals: DeviationTotals,
    /// Proxy closest to trade VWAP.
    pub closest: Option<Measure>,
    /// Buckets present in both series.
    pub joined_buckets: usize,
    /// Buckets in the trade series.
    pub trade_buckets: usize,
    /// Buckets in the book series.
    pub book_buckets: usize,
    /// Joined buckets whose trade VWAP was undefined.
    pub null_vwap_buckets: usize,
}

impl SessionSummary {
    /// Build the summary from the joined table and the input series sizes.
    pub fn from_rows(rows: &[ComparisonRow], trade_buckets: usize, book_buckets: usize) -> Self {
        let totals = DeviationTotals::from_rows(rows);
        Self {
            totals,
            closest: totals.closest(),
            joined_buckets: rows.len(),
            trade_buckets,
            book_buckets,
            null_vwap_buckets: rows.iter().filter(|r| r.trade_vwap.is_none()).count(),
        }
    }
}
