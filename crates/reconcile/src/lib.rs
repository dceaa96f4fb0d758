//! Trade VWAP vs. order-book proxy reconciliation.
//!
//! This crate provides:
//! - Inner join of trade and book bucket series
//! - Per-bucket absolute deviations and session totals
//! - Selection of the proxy closest to VWAP
//! - CSV/JSON writers and the console report

pub mod pipeline;
pub mod reconciler;
pub mod summary;
pub mod writer;

pub use pipeline::reconcile_session;
pub use reconciler::{abs_deviation, Reconciler, Reconciliation};
pub use summary::{DeviationTotals, SessionSummary};
pub use writer::{render_report, save_comparison_csv, save_summary_json, write_comparison_csv};
