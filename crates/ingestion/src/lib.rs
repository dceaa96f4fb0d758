//! Data ingestion for the VWAP reconciliation workspace.
//!
//! This crate handles:
//! - Exchange CSV loading (trade tape, L1 depth)
//! - Timestamp parsing to wall-clock milliseconds
//! - Market-hours session filtering

pub mod loader;
pub mod session;
pub mod timestamp;

pub use loader::{load_book, load_trades, read_book, read_trades, LoadReport, Loaded};
pub use session::{MarketHours, Timestamped};
pub use timestamp::{parse_timestamp, time_of_day};
