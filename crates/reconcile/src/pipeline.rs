//! End-to-end reconciliation of one session.

use crate::reconciler::{Reconciler, Reconciliation};
use recon_core::{BookSnapshot, MetricsConfig, Trade};
use recon_features::{BookMetricAggregator, TradeAggregator};

/// Aggregate both feeds and reconcile them.
///
/// Pure over its inputs: the same trades, snapshots and config always give
/// the same rows and summary.
pub fn reconcile_session(
    trades: &[Trade],
    book: &[BookSnapshot],
    config: &MetricsConfig,
) -> Reconciliation {
    let bucket_ms = config.bucket_ms();

    let trade_buckets = TradeAggregator::new(bucket_ms).aggregate(trades);
    let book_buckets = BookMetricAggregator::new(bucket_ms, config.vwmp_mode).aggregate(book);

    Reconciler::new().reconcile(&trade_buckets, &book_buckets)
}
