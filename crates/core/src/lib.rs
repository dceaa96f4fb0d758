//! Core types and configuration for the VWAP reconciliation workspace.
//!
//! This crate provides shared types used across all other crates:
//! - Feed records (trades, top-of-book snapshots)
//! - Bucketed series rows and the comparison table row
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::{Config, MetricsConfig, SessionConfig, VwmpMode};
pub use error::{Error, Result};
pub use types::*;
