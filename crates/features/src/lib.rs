//! Bucketed feed aggregation for the VWAP reconciliation workspace.
//!
//! This crate handles:
//! - Trade VWAP and volume per bucket
//! - Per-snapshot mid price and cumulative volume-weighted mid prices
//! - Resampling of book metrics to bucket means

pub mod book_metrics;
pub mod trade_vwap;

pub use book_metrics::{cumulative_ratio, BookMetricAggregator, CumulativeMidTracker};
pub use trade_vwap::TradeAggregator;
