//! Command-line arguments for the ratio dashboard.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use ratio_common::Token;

use crate::poller::DEFAULT_INTERVAL_SECS;

/// How the dashboard is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables.
    Text,
    /// The full evaluation as JSON.
    Json,
}

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to a JSON file with current prices, either `{"SOL": 150.2, ...}`
    /// or the CoinGecko `simple/price` shape `{"solana": {"usd": 150.2}, ...}`.
    #[clap(long)]
    pub prices: String,

    /// Path to the historical lookup table (`{"YYYY-MM-DD": {"SOL": 98.1, ...}, ...}`).
    /// Without it no comparison is shown.
    #[clap(long)]
    pub history: Option<String>,

    /// Reference date (YYYY-MM-DD). Defaults to one month ago.
    #[clap(long)]
    pub date: Option<NaiveDate>,

    /// Tokens to show, in order. Defaults to every supported token.
    #[clap(long = "token", value_enum, value_delimiter = ',', ignore_case = true)]
    pub tokens: Vec<Token>,

    /// Path to a text file with tokens to show, used when `--token` is absent.
    /// Tokens may be separated by commas, spaces, or new lines.
    #[clap(long)]
    pub tokens_file: Option<String>,

    /// Output format.
    #[clap(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Keep polling prices and accept new reference dates on stdin
    /// (one YYYY-MM-DD per line, an empty line clears the comparison).
    #[clap(long)]
    pub watch: bool,

    /// Seconds between price refreshes in watch mode.
    #[clap(long, default_value_t = DEFAULT_INTERVAL_SECS)]
    pub interval_secs: u64,
}
