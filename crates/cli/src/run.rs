//! One reconciliation run: load, reconcile, write.

use anyhow::{Context, Result};
use recon_core::Config;
use recon_ingestion::{load_book, load_trades, MarketHours};
use recon_reconcile::{reconcile_session, save_comparison_csv, save_summary_json, Reconciliation};

/// Load both feeds, reconcile them and write the configured outputs.
pub fn execute(config: &Config) -> Result<Reconciliation> {
    config.validate()?;

    let trades_path = config
        .input
        .trades
        .as_deref()
        .context("no trade file given (use --trades or input.trades)")?;
    let book_path = config
        .input
        .book
        .as_deref()
        .context("no depth file given (use --book or input.book)")?;

    let hours = MarketHours::from_config(&config.session);

    let trades = load_trades(trades_path, hours.as_ref())
        .with_context(|| format!("failed to load trades from {}", trades_path.display()))?;
    tracing::info!(
        path = %trades_path.display(),
        kept = trades.report.rows_kept,
        blank_cells = trades.report.missing_values,
        dropped_timestamps = trades.report.bad_timestamps,
        outside_session = trades.report.outside_session,
        "trade tape loaded"
    );

    let book = load_book(book_path, hours.as_ref())
        .with_context(|| format!("failed to load depth from {}", book_path.display()))?;
    tracing::info!(
        path = %book_path.display(),
        kept = book.report.rows_kept,
        blank_cells = book.report.missing_values,
        dropped_timestamps = book.report.bad_timestamps,
        outside_session = book.report.outside_session,
        "depth feed loaded"
    );

    let result = reconcile_session(&trades.records, &book.records, &config.metrics);

    let out = &config.output.comparison_csv;
    save_comparison_csv(out, &result.rows)
        .with_context(|| format!("failed to write {}", out.display()))?;
    tracing::info!(path = %out.display(), rows = result.rows.len(), "comparison table written");

    if let Some(path) = &config.output.summary_json {
        save_summary_json(path, &result.summary)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use recon_core::Measure;
    use std::fs;

    const TRADES_CSV: &str = "\
#RIC,Date-Time,Type,Price,Volume
PXA.X,2025-01-15T09:55:00.000000000+11:00,Trade,90.0,100
PXA.X,2025-01-15T10:00:01.000000000+11:00,Trade,100.0,10
PXA.X,2025-01-15T10:00:30.000000000+11:00,Trade,102.0,5
PXA.X,bad-stamp,Trade,500.0,5
PXA.X,2025-01-15T10:12:00.000000000+11:00,Trade,103.0,1
";

    const BOOK_CSV: &str = "\
#RIC,Date-Time,L1-BidPrice,L1-BidSize,L1-AskPrice,L1-AskSize
PXA.X,2025-01-15T10:00:00.000000000+11:00,99,5,101,5
PXA.X,2025-01-15T10:00:45.000000000+11:00,100,10,102,10
PXA.X,2025-01-15T10:06:00.000000000+11:00,100,10,102,10
";

    #[test]
    fn test_execute_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let trades = dir.path().join("trades.csv");
        let book = dir.path().join("book.csv");
        fs::write(&trades, TRADES_CSV).unwrap();
        fs::write(&book, BOOK_CSV).unwrap();

        let mut config = Config::default();
        config.input.trades = Some(trades);
        config.input.book = Some(book);
        config.output.comparison_csv = dir.path().join("comparison.csv");
        config.output.summary_json = Some(dir.path().join("summary.json"));

        let result = execute(&config).unwrap();

        // Only 10:00 has both trades and book updates.
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.summary.trade_buckets, 2);
        assert_eq!(result.summary.book_buckets, 2);
        assert_eq!(result.summary.closest, Some(Measure::MidPrice));

        let table = fs::read_to_string(dir.path().join("comparison.csv")).unwrap();
        assert_eq!(table.lines().count(), 2);
        assert!(table.lines().nth(1).unwrap().starts_with("2025-01-15 10:00:00,"));
        assert!(dir.path().join("summary.json").exists());
    }

    #[test]
    fn test_blank_cells_flow_through() {
        let dir = tempfile::tempdir().unwrap();
        let trades = dir.path().join("trades.csv");
        let book = dir.path().join("book.csv");
        fs::write(
            &trades,
            "\
Date-Time,Price,Volume
2025-01-15 10:00:10,100.0,10
2025-01-15 10:05:10,101.0,
",
        )
        .unwrap();
        fs::write(
            &book,
            "\
Date-Time,L1-BidPrice,L1-BidSize,L1-AskPrice,L1-AskSize
2025-01-15 10:00:00,99,5,101,5
2025-01-15 10:00:30,109,,111,5
2025-01-15 10:05:00,100,5,102,5
",
        )
        .unwrap();

        let mut config = Config::default();
        config.input.trades = Some(trades);
        config.input.book = Some(book);
        config.output.comparison_csv = dir.path().join("comparison.csv");

        let result = execute(&config).unwrap();

        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.rows[0].mid_price, Some(105.0));
        assert_eq!(result.rows[0].scvwmp, Some(100.0));
        assert!(result.rows[1].trade_vwap.is_none());
        assert_eq!(result.summary.null_vwap_buckets, 1);

        let table = fs::read_to_string(dir.path().join("comparison.csv")).unwrap();
        assert_eq!(
            table.lines().nth(2).unwrap(),
            "2025-01-15 10:05:00,,0.0,100.5,100.5,101.0,,,"
        );
    }

    #[test]
    fn test_missing_inputs() {
        let err = execute(&Config::default()).unwrap_err();
        assert!(err.to_string().contains("--trades"));
    }

    #[test]
    fn test_missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.input.trades = Some(dir.path().join("nope.csv"));
        config.input.book = Some(dir.path().join("nope-either.csv"));

        let err = execute(&config).unwrap_err();
        assert!(format!("{err:#}").contains("failed to load trades"));
    }
}
