//! Bucket alignment of the trade and book series.

use crate::summary::SessionSummary;
use recon_core::{BookBucket, ComparisonRow, TimestampMs, TradeBucket};
use std::collections::BTreeMap;

/// Joined comparison table plus its session summary.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// One row per bucket present in both series, ascending.
    pub rows: Vec<ComparisonRow>,
    pub summary: SessionSummary,
}

/// `|vwap - proxy|`, undefined when either side is.
#[inline]
pub fn abs_deviation(vwap: Option<f64>, proxy: Option<f64>) -> Option<f64> {
    vwap.zip(proxy).map(|(v, p)| (v - p).abs())
}

/// Inner-joins trade and book buckets on bucket start.
#[derive(Debug, Clone, Default)]
pub struct Reconciler;

impl Reconciler {
    pub fn new() -> Self {
        Self
    }

    /// Build comparison rows for buckets present in both series.
    pub fn join(&self, trades: &[TradeBucket], book: &[BookBucket]) -> Vec<ComparisonRow> {
        let book_by_start: BTreeMap<TimestampMs, &BookBucket> =
            book.iter().map(|b| (b.bucket_start, b)).collect();

        let mut rows: Vec<ComparisonRow> = trades
            .iter()
            .filter_map(|t| {
                book_by_start
                    .get(&t.bucket_start)
                    .map(|b| Self::make_row(t, b))
            })
            .collect();
        rows.sort_by_key(|r| r.bucket_start);
        rows
    }

    fn make_row(trade: &TradeBucket, book: &BookBucket) -> ComparisonRow {
        ComparisonRow {
            bucket_start: trade.bucket_start,
            trade_vwap: trade.vwap,
            cumulative_trade_volume: trade.volume,
            scvwmp: book.scvwmp,
            vwmp: book.vwmp,
            mid_price: book.mid_price,
            abs_vwap_scvwmp: abs_deviation(trade.vwap, book.scvwmp),
            abs_vwap_vwmp: abs_deviation(trade.vwap, book.vwmp),
            abs_vwap_mid: abs_deviation(trade.vwap, book.mid_price),
        }
    }

    /// Join both series and summarize the session.
    pub fn reconcile(&self, trades: &[TradeBucket], book: &[BookBucket]) -> Reconciliation {
        let rows = self.join(trades, book);
        let summary = SessionSummary::from_rows(&rows, trades.len(), book.len());

        if rows.is_empty() {
            tracing::warn!(
                trade_buckets = trades.len(),
                book_buckets = book.len(),
                "no overlapping buckets between trade and book series"
            );
        } else {
            tracing::info!(
                joined = rows.len(),
                trade_only = trades.len() - rows.len(),
                book_only = book.len().saturating_sub(rows.len()),
                closest = ?summary.closest,
                "series reconciled"
            );
        }

        Reconciliation { rows, summary }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recon_core::Measure;

    fn trade_bucket(start: i64, vwap: Option<f64>) -> TradeBucket {
        TradeBucket {
            bucket_start: start,
            vwap,
            volume: if vwap.is_some() { 10.0 } else { 0.0 },
            trade_count: 1,
        }
    }

    fn book_bucket(start: i64, scvwmp: f64, vwmp: f64, mid: f64) -> BookBucket {
        BookBucket {
            bucket_start: start,
            scvwmp: Some(scvwmp),
            vwmp: Some(vwmp),
            mid_price: Some(mid),
            snapshot_count: 1,
        }
    }

    #[test]
    fn test_inner_join_drops_one_sided_buckets() {
        let trades = vec![
            trade_bucket(0, Some(100.0)),
            trade_bucket(300, Some(101.0)),
            trade_bucket(900, Some(102.0)),
        ];
        let book = vec![
            book_bucket(300, 100.5, 100.5, 101.5),
            book_bucket(600, 100.0, 100.0, 100.0),
            book_bucket(900, 101.0, 101.0, 102.5),
        ];

        let rows = Reconciler::new().join(&trades, &book);
        let starts: Vec<i64> = rows.iter().map(|r| r.bucket_start).collect();
        assert_eq!(starts, vec![300, 900]);
        assert_eq!(rows[0].abs_vwap_scvwmp, Some(0.5));
        assert_eq!(rows[0].abs_vwap_mid, Some(0.5));
        assert_eq!(rows[1].abs_vwap_scvwmp, Some(1.0));
        assert_eq!(rows[1].abs_vwap_mid, Some(0.5));
    }

    #[test]
    fn test_null_vwap_row_is_kept_but_not_summed() {
        let trades = vec![trade_bucket(0, None), trade_bucket(300, Some(100.0))];
        let book = vec![
            book_bucket(0, 50.0, 50.0, 50.0),
            book_bucket(300, 99.0, 99.0, 99.5),
        ];

        let result = Reconciler::new().reconcile(&trades, &book);
        assert_eq!(result.rows.len(), 2);
        assert!(result.rows[0].abs_vwap_scvwmp.is_none());
        assert!(result.rows[0].abs_vwap_vwmp.is_none());
        assert!(result.rows[0].abs_vwap_mid.is_none());

        let totals = result.summary.totals;
        assert_eq!(totals.scvwmp, Some(1.0));
        assert_eq!(totals.mid_price, Some(0.5));
        assert_eq!(result.summary.closest, Some(Measure::MidPrice));
        assert_eq!(result.summary.null_vwap_buckets, 1);
    }

    #[test]
    fn test_empty_join() {
        let trades = vec![trade_bucket(0, Some(100.0))];
        let book = vec![book_bucket(300, 100.0, 100.0, 100.0)];

        let result = Reconciler::new().reconcile(&trades, &book);
        assert!(result.rows.is_empty());
        assert!(result.summary.totals.scvwmp.is_none());
        assert!(result.summary.closest.is_none());
        assert_eq!(result.summary.trade_buckets, 1);
        assert_eq!(result.summary.book_buckets, 1);
    }

    #[test]
    fn test_abs_deviation() {
        assert_eq!(abs_deviation(Some(1.0), Some(3.5)), Some(2.5));
        assert_eq!(abs_deviation(None, Some(3.5)), None);
        assert_eq!(abs_deviation(Some(1.0), None), None);
    }
}
