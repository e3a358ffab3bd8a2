//! Background workers feeding the watch loop.
//!
//! - `QuotePoller::start` refreshes current prices on a fixed interval.
//! - `QuotePoller::fetch_reference` looks up one reference date off the main thread.
//! - `DateInput::start` turns stdin lines into reference-date selections.
//!
//! Every worker reports over a `crossbeam_channel` and stops once the shared
//! shutdown flag is set or its receiver is gone.
use chrono::NaiveDate;
use crossbeam_channel::{Receiver, Sender, unbounded};
use log::{debug, info, warn};
use ratio_common::{QuoteMap, Result};
use std::io::BufRead;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread;
use std::time::Duration;

use crate::source::QuoteSource;
use crate::state::Ticket;

/// Default seconds between current-price refreshes.
pub const DEFAULT_INTERVAL_SECS: u64 = 30;

/// Helper type for the price workers.
pub struct QuotePoller;

impl QuotePoller {
    /// Start the refresh thread and return the channel its results arrive on.
    ///
    /// The first refresh happens one `interval` after the call; callers load the
    /// initial quotes themselves.
    pub fn start(
        source: Arc<dyn QuoteSource>,
        interval: Duration,
        shutdown: Arc<AtomicBool>,
    ) -> Receiver<Result<QuoteMap>> {
        let (tx, rx) = unbounded();
        info!("Price poller started. Interval: {:?}", interval);
        thread::spawn(move || {
            while !shutdown.load(Ordering::Relaxed) {
                thread::sleep(interval);
                if shutdown.load(Ordering::Relaxed) {
                    break;
                }
                if tx.send(source.current()).is_err() {
                    debug!("Poll receiver dropped");
                    break;
                }
            }
            info!("Price poller stopping...");
        });
        rx
    }

    /// Look up `date` on a worker thread and send the result tagged with `ticket`.
    pub fn fetch_reference(
        source: Arc<dyn QuoteSource>,
        date: NaiveDate,
        ticket: Ticket,
        tx: Sender<(Ticket, Result<QuoteMap>)>,
    ) {
        thread::spawn(move || {
            debug!("Fetching reference quotes for {} ({:?})", date, ticket);
            if tx.send((ticket, source.historical(date))).is_err() {
                debug!("Reference receiver dropped");
            }
        });
    }
}

/// Reads reference-date selections from stdin.
pub struct DateInput;

impl DateInput {
    /// Start the stdin reader. The channel closes at end of input.
    pub fn start(shutdown: Arc<AtomicBool>) -> Receiver<Option<NaiveDate>> {
        let (tx, rx) = unbounded();
        thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                if shutdown.load(Ordering::Relaxed) {
                    break;
                }
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        warn!("Failed to read stdin: {}", e);
                        break;
                    }
                };
                match parse_date_input(&line) {
                    Ok(selection) => {
                        if tx.send(selection).is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!("Ignoring {:?}: {}", line.trim(), e),
                }
            }
            debug!("Date input closed");
        });
        rx
    }
}

/// Parse one line of date input; a blank line means "no reference".
pub fn parse_date_input(line: &str) -> Result<Option<NaiveDate>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    Ok(Some(trimmed.parse::<NaiveDate>()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratio_common::{RatioError, Token};
    use std::sync::atomic::AtomicUsize;

    struct CountingSource {
        calls: AtomicUsize,
    }

    impl QuoteSource for CountingSource {
        fn current(&self) -> Result<QuoteMap> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            QuoteMap::from_entries([(Token::SOL, n as f64)])
        }

        fn historical(&self, date: NaiveDate) -> Result<QuoteMap> {
            Err(RatioError::MissingDate(date))
        }
    }

    #[test]
    fn parses_date_lines() {
        assert_eq!(parse_date_input("  \n").unwrap(), None);
        assert_eq!(
            parse_date_input(" 2026-09-18\n").unwrap(),
            NaiveDate::from_ymd_opt(2026, 9, 18)
        );
        assert!(matches!(parse_date_input("yesterday"), Err(RatioError::DateParse(_))));
    }

    #[test]
    fn poller_delivers_successive_refreshes() {
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
        });
        let shutdown = Arc::new(AtomicBool::new(false));
        let rx = QuotePoller::start(source, Duration::from_millis(10), shutdown.clone());

        let first = rx.recv_timeout(Duration::from_secs(5)).unwrap().unwrap();
        let second = rx.recv_timeout(Duration::from_secs(5)).unwrap().unwrap();
        assert_eq!(first.get(Token::SOL), 1.0);
        assert_eq!(second.get(Token::SOL), 2.0);
        shutdown.store(true, Ordering::SeqCst);
    }

    #[test]
    fn reference_fetch_carries_its_ticket() {
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
        });
        let mut state = crate::state::DashboardState::new(Token::ALL.to_vec());
        let date = NaiveDate::from_ymd_opt(2026, 9, 18).unwrap();
        let ticket = state.select_reference(date);

        let (tx, rx) = unbounded();
        QuotePoller::fetch_reference(source, date, ticket, tx);
        let (got, result) = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(got, ticket);
        assert!(matches!(result, Err(RatioError::MissingDate(d)) if d == date));
    }
}
