//! CLI argument definitions for tickboard.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `dashboard` | All panels for the selection |
//! | `prices` | Cleaned closing prices |
//! | `returns` | Normalized returns (start = 100) |
//! | `indicators` | SMA short/long and RSI for one ticker |
//! | `export` | Write cleaned prices to CSV |
//! | `companies` | List the company directory |
//!
//! # Global Options
//!
//! | Option | Default | Env |
//! |--------|---------|-----|
//! | `--format` | `table` | |
//! | `--pretty` | `false` | |
//! | `--offline` | `false` | `TICKBOARD_OFFLINE` |
//! | `--timeout-ms` | `10000` | `TICKBOARD_TIMEOUT_MS` |
//! | `--companies-file` | bundled | `TICKBOARD_COMPANIES_FILE` |
//! | `--unadjusted` | `false` | |
//! | `--rows` | `5` | |
//! | `--verbose` | `false` | |

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tickboard_core::{
    DEFAULT_PREVIEW_ROWS, DEFAULT_RSI_WINDOW, DEFAULT_SMA_LONG, DEFAULT_SMA_SHORT,
    DEFAULT_TIMEOUT_MS, EXPORT_FILE_NAME,
};

/// Stock dashboard: prices, normalized returns, SMA/RSI and company info.
#[derive(Debug, Parser)]
#[command(name = "tickboard", author, version, about)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Use deterministic synthetic prices instead of Yahoo Finance.
    #[arg(long, global = true, env = "TICKBOARD_OFFLINE")]
    pub offline: bool,

    /// Timeout for the price fetch in milliseconds.
    #[arg(long, global = true, env = "TICKBOARD_TIMEOUT_MS", default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// JSON file replacing the bundled company directory.
    #[arg(long, global = true, env = "TICKBOARD_COMPANIES_FILE")]
    pub companies_file: Option<PathBuf>,

    /// Use raw closes instead of split/dividend adjusted ones.
    #[arg(long, global = true, default_value_t = false)]
    pub unadjusted: bool,

    /// Rows shown in the raw data preview.
    #[arg(long, global = true, default_value_t = DEFAULT_PREVIEW_ROWS)]
    pub rows: usize,

    /// Debug logging on stderr (overrides RUST_LOG).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable panels.
    Table,
    /// Single JSON envelope.
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render every panel for the selection.
    ///
    ///   tickboard dashboard --symbols TCS.NS,AAPL
    ///   tickboard dashboard --symbols AAPL --start 2023-01-01
    Dashboard(DashboardArgs),

    /// Cleaned closing prices (complete rows only).
    Prices(SelectionArgs),

    /// Closing prices rescaled so every series starts at 100.
    Returns(SelectionArgs),

    /// SMA and RSI for exactly one ticker.
    ///
    ///   tickboard indicators --symbols AAPL --rsi-window 21
    Indicators(IndicatorArgs),

    /// Write cleaned closing prices to CSV.
    Export(ExportArgs),

    /// List known companies with sector and logo.
    Companies,
}

#[derive(Debug, Clone, Args)]
pub struct SelectionArgs {
    /// Comma-separated tickers.
    #[arg(long, value_delimiter = ',', default_value = "TCS.NS,AAPL")]
    pub symbols: Vec<String>,

    /// First date (YYYY-MM-DD).
    #[arg(long, default_value = "2020-01-01")]
    pub start: String,

    /// End date (YYYY-MM-DD), exclusive.
    #[arg(long, default_value = "2024-12-31")]
    pub end: String,
}

#[derive(Debug, Clone, Args)]
pub struct WindowArgs {
    #[arg(long, default_value_t = DEFAULT_SMA_SHORT)]
    pub sma_short: usize,

    #[arg(long, default_value_t = DEFAULT_SMA_LONG)]
    pub sma_long: usize,

    #[arg(long, default_value_t = DEFAULT_RSI_WINDOW)]
    pub rsi_window: usize,
}

#[derive(Debug, Clone, Args)]
pub struct DashboardArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    #[command(flatten)]
    pub windows: WindowArgs,
}

#[derive(Debug, Clone, Args)]
pub struct IndicatorArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    #[command(flatten)]
    pub windows: WindowArgs,
}

#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Destination file.
    #[arg(long, short, default_value = EXPORT_FILE_NAME)]
    pub output: PathBuf,
}
