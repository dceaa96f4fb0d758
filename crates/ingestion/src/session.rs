//! Market-hours session filter.

use crate::timestamp::time_of_day;
use chrono::NaiveTime;
use recon_core::{BookSnapshot, SessionConfig, TimestampMs, Trade};

/// Records that carry a feed timestamp.
pub trait Timestamped {
    fn ts_ms(&self) -> TimestampMs;
}

impl Timestamped for Trade {
    #[inline]
    fn ts_ms(&self) -> TimestampMs {
        self.ts_ms
    }
}

impl Timestamped for BookSnapshot {
    #[inline]
    fn ts_ms(&self) -> TimestampMs {
        self.ts_ms
    }
}

/// Daily trading window, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketHours {
    pub open: NaiveTime,
    pub close: NaiveTime,
}

impl MarketHours {
    pub fn new(open: NaiveTime, close: NaiveTime) -> Self {
        Self { open, close }
    }

    /// Window from config, or `None` when filtering is disabled.
    pub fn from_config(config: &SessionConfig) -> Option<Self> {
        config
            .filter_market_hours
            .then(|| Self::new(config.market_open, config.market_close))
    }

    /// Whether the wall-clock time of `ts_ms` falls inside the window.
    pub fn contains(&self, ts_ms: TimestampMs) -> bool {
        time_of_day(ts_ms).is_some_and(|t| t >= self.open && t <= self.close)
    }

    /// Keep only in-session records, preserving order.
    pub fn filter<T: Timestamped>(&self, records: Vec<T>) -> Vec<T> {
        records
            .into_iter()
            .filter(|r| self.contains(r.ts_ms()))
            .collect()
    }
}

impl Default for MarketHours {
    fn default() -> Self {
        let session = SessionConfig::default();
        Self::new(session.market_open, session.market_close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIDNIGHT_MS: i64 = 1_736_899_200_000; // 2025-01-15 00:00:00
    const HOUR_MS: i64 = 3_600_000;

    fn trade_at(ts_ms: i64) -> Trade {
        Trade::new(ts_ms, 1.0, 1.0)
    }

    #[test]
    fn test_bounds_inclusive() {
        let hours = MarketHours::default();
        assert!(hours.contains(MIDNIGHT_MS + 10 * HOUR_MS));
        assert!(hours.contains(MIDNIGHT_MS + 16 * HOUR_MS));
        assert!(!hours.contains(MIDNIGHT_MS + 10 * HOUR_MS - 1));
        assert!(!hours.contains(MIDNIGHT_MS + 16 * HOUR_MS + 1));
    }

    #[test]
    fn test_filter_preserves_order() {
        let hours = MarketHours::default();
        let trades = vec![
            trade_at(MIDNIGHT_MS + 9 * HOUR_MS),
            trade_at(MIDNIGHT_MS + 12 * HOUR_MS),
            trade_at(MIDNIGHT_MS + 11 * HOUR_MS),
            trade_at(MIDNIGHT_MS + 17 * HOUR_MS),
        ];
        let kept = hours.filter(trades);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].ts_ms, MIDNIGHT_MS + 12 * HOUR_MS);
        assert_eq!(kept[1].ts_ms, MIDNIGHT_MS + 11 * HOUR_MS);
    }

    #[test]
    fn test_disabled_filter() {
        let config = SessionConfig {
            filter_market_hours: false,
            ..SessionConfig::default()
        };
        assert!(MarketHours::from_config(&config).is_none());
    }
}
