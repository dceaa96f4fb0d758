//! `vwap-recon`: reconcile a trade tape against its depth feed.

mod config;
mod obs;
mod run;

use clap::{Parser, ValueEnum};
use obs::LogFormat;
use recon_core::{Config, VwmpMode};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "vwap-recon")]
#[command(
    about = "Compare trade VWAP against order-book mid-price proxies",
    version,
    arg_required_else_help = true
)]
#[command(
    after_help = "Examples:\n  vwap-recon --trades trades.csv --book depth.csv\n  vwap-recon --config recon.toml --out runs/comparison.csv --summary-json runs/summary.json\n"
)]
struct Cli {
    /// TOML config file; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Trade tape CSV.
    #[arg(long)]
    trades: Option<PathBuf>,
    /// Market depth CSV.
    #[arg(long)]
    book: Option<PathBuf>,
    /// Comparison table destination.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Write the session summary as JSON.
    #[arg(long)]
    summary_json: Option<PathBuf>,
    /// Bucket width in minutes.
    #[arg(long)]
    bucket_minutes: Option<u32>,
    /// How the VWMP column is computed.
    #[arg(long, value_enum)]
    vwmp_mode: Option<VwmpModeArg>,
    /// Keep records outside market hours.
    #[arg(long, default_value_t = false)]
    no_session_filter: bool,
    /// Log filter, e.g. `info` or `recon_features=debug`.
    #[arg(long, default_value = "info")]
    log_level: String,
    /// Log line format.
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum VwmpModeArg {
    SpreadCrossing,
    RunningMean,
}

impl From<VwmpModeArg> for VwmpMode {
    fn from(arg: VwmpModeArg) -> Self {
        match arg {
            VwmpModeArg::SpreadCrossing => VwmpMode::SpreadCrossing,
            VwmpModeArg::RunningMean => VwmpMode::RunningMean,
        }
    }
}

impl Cli {
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(path) = &self.trades {
            config.input.trades = Some(path.clone());
        }
        if let Some(path) = &self.book {
            config.input.book = Some(path.clone());
        }
        if let Some(path) = &self.out {
            config.output.comparison_csv = path.clone();
        }
        if let Some(path) = &self.summary_json {
            config.output.summary_json = Some(path.clone());
        }
        if let Some(minutes) = self.bucket_minutes {
            config.metrics.bucket_minutes = minutes;
        }
        if let Some(mode) = self.vwmp_mode {
            config.metrics.vwmp_mode = mode.into();
        }
        if self.no_session_filter {
            config.session.filter_market_hours = false;
        }
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = try_main(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn try_main(cli: Cli) -> anyhow::Result<()> {
    obs::init_tracing(&cli.log_level, cli.log_format)?;

    let mut config = config::load_config(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);

    let result = run::execute(&config)?;

    print!("{}", recon_reconcile::render_report(&result.summary));
    println!(
        "Comparison data saved to {}",
        config.output.comparison_csv.display()
    );
    Ok(())
}
