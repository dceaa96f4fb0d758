//! Trade tape aggregation.
//!
//! Buckets trades into fixed wall-clock windows and computes VWAP and
//! traded volume per bucket.

use recon_core::{ts_to_bucket, TimestampMs, Trade, TradeBucket};
use std::collections::BTreeMap;

/// A bucket that's currently being accumulated.
#[derive(Debug, Clone, Default)]
struct BucketAccumulator {
    notional: f64,
    volume: f64,
    trade_count: u32,
}

impl BucketAccumulator {
    fn add_trade(&mut self, trade: &Trade) {
        if let Some((price, volume)) = trade.fill() {
            self.notional += price * volume;
            self.volume += volume;
        }
        self.trade_count += 1;
    }

    fn vwap(&self) -> Option<f64> {
        if self.volume > 0.0 {
            Some(self.notional / self.volume)
        } else {
            None
        }
    }

    fn to_bucket(&self, bucket_start: TimestampMs) -> TradeBucket {
        TradeBucket {
            bucket_start,
            vwap: self.vwap(),
            volume: self.volume,
            trade_count: self.trade_count,
        }
    }
}

/// Per-bucket VWAP aggregator.
#[derive(Debug, Clone)]
pub struct TradeAggregator {
    bucket_ms: i64,
}

impl TradeAggregator {
    /// Create an aggregator with the given bucket width in milliseconds.
    pub fn new(bucket_ms: i64) -> Self {
        Self {
            bucket_ms: bucket_ms.max(1),
        }
    }

    /// Aggregate a trade tape into buckets, ascending by bucket start.
    ///
    /// Only buckets holding at least one trade are emitted. A bucket whose
    /// trades carry zero total volume is emitted with `vwap: None`. Prints
    /// missing a price or volume are counted but not weighted.
    pub fn aggregate(&self, trades: &[Trade]) -> Vec<TradeBucket> {
        let mut sorted = trades.to_vec();
        sorted.sort_by_key(|t| t.ts_ms);

        let mut buckets: BTreeMap<TimestampMs, BucketAccumulator> = BTreeMap::new();
        for trade in &sorted {
            buckets
                .entry(ts_to_bucket(trade.ts_ms, self.bucket_ms))
                .or_default()
                .add_trade(trade);
        }

        let out: Vec<TradeBucket> = buckets
            .iter()
            .map(|(&start, acc)| acc.to_bucket(start))
            .collect();

        tracing::debug!(
            trades = trades.len(),
            buckets = out.len(),
            null_vwap = out.iter().filter(|b| b.vwap.is_none()).count(),
            "trade tape aggregated"
        );

        out
    }
}
