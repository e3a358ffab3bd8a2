//! Ratio Dashboard — prints live HYPE/SUI/SOL price ratios, how they moved since a
//! reference date, and rule-based LP rotation insights.
//!
//! Current prices are read from a JSON file; reference prices come from a
//! date-indexed lookup table. In `--watch` mode the prices file is re-read on a
//! fixed interval and new reference dates can be typed on stdin, one per line.
//!
//! Usage example (CLI):
//! ```bash
//! ratio_dashboard --prices ./prices.json --history ./data/historical-prices.json --date 2026-09-18
//! ratio_dashboard --prices ./prices.json --history ./data/historical-prices.json --watch --interval-secs 30
//! ```
//!
//! The token list defaults to HYPE, SUI, SOL and can be narrowed or reordered
//! with `--token` or `--tokens-file`.
#![warn(missing_docs)]
mod args;
mod poller;
mod render;
mod source;
mod state;

use crate::args::{Args, OutputFormat};
use crate::poller::{DateInput, QuotePoller};
use crate::render::{render_json, render_text};
use crate::source::{FileQuoteSource, QuoteSource};
use crate::state::DashboardState;
use chrono::{Local, Months, NaiveDate};
use clap::Parser;
use crossbeam_channel::{never, select, tick, unbounded};
use log::{debug, info, warn};
use ratio_common::tokens::TokenParser;
use ratio_common::{RatioError, Result, Token};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;

/// How often the watch loop notices a shutdown request.
const SHUTDOWN_CHECK: Duration = Duration::from_millis(250);

fn main() -> Result<(), RatioError> {
    init_logger();
    let args = Args::parse();

    let tokens = resolve_tokens(&args)?;
    info!("Tokens: {:?}", tokens);

    let source = Arc::new(FileQuoteSource::new(
        normalize_path(&args.prices),
        args.history.as_deref().map(normalize_path),
    ));
    let has_history = source.has_history();

    let mut state = DashboardState::new(tokens);
    state.apply_current(source.current());

    if has_history {
        let date = args.date.unwrap_or_else(default_reference_date);
        let ticket = state.select_reference(date);
        state.complete_reference(ticket, source.historical(date));
    } else {
        info!("No --history file given; comparison disabled");
    }

    if !args.watch {
        return show(&state, args.format, true);
    }

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || {
            info!("Ctrl+C received. Shutting down dashboard...");
            shutdown.store(true, Ordering::SeqCst);
        })
        .map_err(|e| RatioError::Format(format!("Error setting Ctrl+C handler: {}", e)))?;
    }

    info!("Dashboard is running. Press Ctrl+C to exit.");
    run_watch_loop(state, source, has_history, &args, shutdown)
}

/// Re-render on every price refresh, date selection, or reference result until shutdown.
fn run_watch_loop(
    mut state: DashboardState,
    source: Arc<FileQuoteSource>,
    has_history: bool,
    args: &Args,
    shutdown: Arc<AtomicBool>,
) -> Result<(), RatioError> {
    let source: Arc<dyn QuoteSource> = source;
    let updates = QuotePoller::start(
        Arc::clone(&source),
        Duration::from_secs(args.interval_secs.max(1)),
        shutdown.clone(),
    );
    let selections = DateInput::start(shutdown.clone());
    let mut input_open = true;
    let (reference_tx, reference_rx) = unbounded();
    let heartbeat = tick(SHUTDOWN_CHECK);

    show(&state, args.format, false)?;

    while !shutdown.load(Ordering::Relaxed) {
        let dates = if input_open { selections.clone() } else { never() };
        select! {
            recv(updates) -> msg => match msg {
                Ok(result) => {
                    state.apply_current(result);
                    show(&state, args.format, false)?;
                }
                Err(e) if shutdown.load(Ordering::Relaxed) => debug!("Poller finished: {}", e),
                Err(e) => return Err(RatioError::ChannelRecv(e.to_string())),
            },
            recv(dates) -> msg => match msg {
                Ok(Some(date)) if has_history => {
                    let ticket = state.select_reference(date);
                    QuotePoller::fetch_reference(Arc::clone(&source), date, ticket, reference_tx.clone());
                    show(&state, args.format, false)?;
                }
                Ok(Some(date)) => warn!("Ignoring {}: no --history file given", date),
                Ok(None) => {
                    state.clear_reference();
                    show(&state, args.format, false)?;
                }
                Err(_) => {
                    debug!("Date input finished");
                    input_open = false;
                }
            },
            recv(reference_rx) -> msg => if let Ok((ticket, result)) = msg {
                if state.complete_reference(ticket, result) {
                    show(&state, args.format, false)?;
                }
            },
            recv(heartbeat) -> _ => {},
        }
    }
    info!("Dashboard stopping...");
    Ok(())
}

/// Print the current view to stdout.
fn show(state: &DashboardState, format: OutputFormat, pretty: bool) -> Result<(), RatioError> {
    match format {
        OutputFormat::Text => println!("{}", render_text(state)),
        OutputFormat::Json => println!("{}", render_json(state, pretty)?),
    }
    Ok(())
}

/// Token order from `--token`, else `--tokens-file`, else every supported token.
fn resolve_tokens(args: &Args) -> Result<Vec<Token>, RatioError> {
    if !args.tokens.is_empty() {
        let mut tokens = Vec::new();
        for token in &args.tokens {
            if !tokens.contains(token) {
                tokens.push(*token);
            }
        }
        return Ok(tokens);
    }
    match args.tokens_file.as_deref() {
        Some(raw) => {
            let path = normalize_path(raw);
            if !is_file_exist(&path) {
                return Err(RatioError::Format(format!(
                    "tokens file not found: {}",
                    path.display()
                )));
            }
            Token::parse_from_file(BufReader::new(File::open(path)?))
        }
        None => Ok(Token::ALL.to_vec()),
    }
}

/// One calendar month before today (local time).
fn default_reference_date() -> NaiveDate {
    let today = Local::now().date_naive();
    today.checked_sub_months(Months::new(1)).unwrap_or(today)
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

/// Normalize a CLI-provided path string by trimming whitespace and matching quotes.
///
/// This allows passing Windows paths in quotes without breaking parsing.
fn normalize_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    let no_quotes = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    PathBuf::from(no_quotes)
}

/// Returns `true` if the provided path exists and is a regular file.
fn is_file_exist(path: &Path) -> bool {
    path.exists() && path.is_file()
}
