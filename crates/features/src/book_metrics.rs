//! Order-book mid-price metrics.
//!
//! Derives mid price and spread-crossing volume per snapshot, runs the
//! session-wide cumulative volume-weighted mid price, and resamples the
//! per-snapshot values to bucket means.

use recon_core::{
    ts_to_bucket, BookBucket, BookMetricPoint, BookSnapshot, TimestampMs, VwmpMode,
};
use std::collections::BTreeMap;

/// Session-to-date prefix sums over mid prices.
///
/// Never reset at bucket boundaries: every update extends the same prefix.
#[derive(Debug, Clone, Default)]
pub struct CumulativeMidTracker {
    /// Running Σ(mid · weight).
    weighted_sum: f64,
    /// Running Σweight.
    weight_sum: f64,
    /// Running Σmid.
    mid_sum: f64,
    /// Observations seen.
    count: u64,
}

impl CumulativeMidTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one observation and return the updated weighted ratio.
    pub fn update(&mut self, mid: f64, weight: f64) -> Option<f64> {
        self.weighted_sum += mid * weight;
        self.weight_sum += weight;
        self.push_mid(mid);
        self.weighted_ratio()
    }

    /// Add a mid price with no known weight; only the running mean moves.
    pub fn push_mid(&mut self, mid: f64) {
        self.mid_sum += mid;
        self.count += 1;
    }

    /// Σ(mid · weight) / Σweight, `None` while the cumulative weight is zero.
    pub fn weighted_ratio(&self) -> Option<f64> {
        if self.weight_sum == 0.0 {
            None
        } else {
            Some(self.weighted_sum / self.weight_sum)
        }
    }

    /// Unweighted running mean of mid prices.
    pub fn running_mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.mid_sum / self.count as f64)
        }
    }
}

/// Weighted mid ratio computed in one pass over a prefix of points.
///
/// Points missing either the mid price or the weight are skipped.
pub fn cumulative_ratio(points: &[BookMetricPoint]) -> Option<f64> {
    let (num, den) = points
        .iter()
        .filter_map(|p| p.mid_price.zip(p.weight))
        .fold((0.0, 0.0), |(num, den), (mid, w)| (num + mid * w, den + w));
    if den == 0.0 {
        None
    } else {
        Some(num / den)
    }
}

/// Arithmetic mean over the defined values pushed into it.
#[derive(Debug, Clone, Copy, Default)]
struct Mean {
    sum: f64,
    n: u32,
}

impl Mean {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.n += 1;
        }
    }

    fn value(&self) -> Option<f64> {
        if self.n > 0 {
            Some(self.sum / self.n as f64)
        } else {
            None
        }
    }
}

/// Accumulator for one resampled bucket.
#[derive(Debug, Clone, Default)]
struct BucketMeans {
    scvwmp: Mean,
    vwmp: Mean,
    mid_price: Mean,
    snapshot_count: u32,
}

impl BucketMeans {
    fn add(&mut self, point: &BookMetricPoint) {
        self.scvwmp.push(point.scvwmp);
        self.vwmp.push(point.vwmp);
        self.mid_price.push(point.mid_price);
        self.snapshot_count += 1;
    }

    fn to_bucket(&self, bucket_start: TimestampMs) -> BookBucket {
        BookBucket {
            bucket_start,
            scvwmp: self.scvwmp.value(),
            vwmp: self.vwmp.value(),
            mid_price: self.mid_price.value(),
            snapshot_count: self.snapshot_count,
        }
    }
}

/// Book metric aggregator.
#[derive(Debug, Clone)]
pub struct BookMetricAggregator {
    bucket_ms: i64,
    vwmp_mode: VwmpMode,
}

impl BookMetricAggregator {
    /// Create an aggregator with the given bucket width and VWMP variant.
    pub fn new(bucket_ms: i64, vwmp_mode: VwmpMode) -> Self {
        Self {
            bucket_ms: bucket_ms.max(1),
            vwmp_mode,
        }
    }

    /// Derive per-snapshot metrics in timestamp order.
    ///
    /// A snapshot missing a size keeps its mid price but has no SCVWMP; one
    /// missing a price has neither. Neither kind moves the weighted ratio.
    pub fn derive_points(&self, snapshots: &[BookSnapshot]) -> Vec<BookMetricPoint> {
        let mut sorted = snapshots.to_vec();
        sorted.sort_by_key(|s| s.ts_ms);

        let mut tracker = CumulativeMidTracker::new();
        sorted
            .iter()
            .map(|snap| {
                let mid_price = snap.mid();
                let weight = snap.spread_crossing_volume();
                let scvwmp = match (mid_price, weight) {
                    (Some(mid), Some(weight)) => tracker.update(mid, weight),
                    (Some(mid), None) => {
                        tracker.push_mid(mid);
                        None
                    }
                    (None, _) => None,
                };
                let vwmp = match self.vwmp_mode {
                    VwmpMode::SpreadCrossing => scvwmp,
                    VwmpMode::RunningMean => mid_price.and(tracker.running_mean()),
                };
                BookMetricPoint {
                    ts_ms: snap.ts_ms,
                    mid_price,
                    weight,
                    scvwmp,
                    vwmp,
                }
            })
            .collect()
    }

    /// Resample per-snapshot metrics to bucket means, ascending by bucket.
    pub fn resample(&self, points: &[BookMetricPoint]) -> Vec<BookBucket> {
        let mut buckets: BTreeMap<TimestampMs, BucketMeans> = BTreeMap::new();
        for point in points {
            buckets
                .entry(ts_to_bucket(point.ts_ms, self.bucket_ms))
                .or_default()
                .add(point);
        }

        buckets
            .iter()
            .map(|(&start, means)| means.to_bucket(start))
            .collect()
    }

    /// Derive and resample in one call.
    pub fn aggregate(&self, snapshots: &[BookSnapshot]) -> Vec<BookBucket> {
        let points = self.derive_points(snapshots);
        let buckets = self.resample(&points);

        tracing::debug!(
            snapshots = snapshots.len(),
            buckets = buckets.len(),
            vwmp_mode = ?self.vwmp_mode,
            "book metrics aggregated"
        );

        buckets
    }
}
