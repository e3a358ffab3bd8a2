//! Presentation state owned by the dashboard.
//!
//! The engine is stateless; everything that changes over time lives here and is
//! handed to the engine as plain quote maps on every render:
//!
//! - the latest current quotes and when they arrived;
//! - the selected reference date and its quotes;
//! - the ticket of the reference request in flight.
//!
//! Reference requests are last-write-wins. Each selection issues a new
//! `Ticket`, and a result is applied only if it carries the latest ticket, so a
//! slow lookup for a date the user has already moved away from is dropped.

use chrono::{DateTime, Local, NaiveDate};
use log::{debug, error, info, warn};
use ratio_common::{QuoteMap, Result, Snapshot, Token};

/// Identifies one reference request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Everything the dashboard shows, minus the derived numbers.
pub struct DashboardState {
    tokens: Vec<Token>,
    current: QuoteMap,
    loading: bool,
    last_update: Option<DateTime<Local>>,
    reference_date: Option<NaiveDate>,
    reference: QuoteMap,
    pending: Option<Ticket>,
    next_ticket: u64,
}

impl DashboardState {
    /// Fresh state for the ordered `tokens`; nothing loaded yet.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            current: QuoteMap::new(),
            loading: true,
            last_update: None,
            reference_date: None,
            reference: QuoteMap::new(),
            pending: None,
            next_ticket: 0,
        }
    }

    /// Record the outcome of a current-price refresh.
    ///
    /// A failed refresh keeps the previous quotes.
    pub fn apply_current(&mut self, result: Result<QuoteMap>) {
        self.loading = false;
        match result {
            Ok(quotes) => {
                debug!("Current quotes refreshed ({} tokens)", quotes.len());
                self.current = quotes;
                self.last_update = Some(Local::now());
            }
            Err(e) => error!("Error fetching prices: {}", e),
        }
    }

    /// Start a reference request for `date`, superseding any request in flight.
    ///
    /// The previous reference quotes are dropped right away so they are never
    /// shown under the new date.
    pub fn select_reference(&mut self, date: NaiveDate) -> Ticket {
        self.next_ticket += 1;
        let ticket = Ticket(self.next_ticket);
        if let Some(stale) = self.pending.replace(ticket) {
            debug!("Reference request {:?} superseded by {:?}", stale, ticket);
        }
        self.reference_date = Some(date);
        self.reference = QuoteMap::new();
        ticket
    }

    /// Drop the reference date and any request in flight.
    pub fn clear_reference(&mut self) {
        info!("Reference cleared");
        self.reference_date = None;
        self.reference = QuoteMap::new();
        self.pending = None;
    }

    /// Apply the outcome of a reference request.
    ///
    /// Returns `false` (and changes nothing) when `ticket` is not the latest one.
    /// A failed lookup leaves the view without a comparison.
    pub fn complete_reference(&mut self, ticket: Ticket, result: Result<QuoteMap>) -> bool {
        if self.pending != Some(ticket) {
            debug!("Discarding stale reference result {:?}", ticket);
            return false;
        }
        self.pending = None;
        match result {
            Ok(quotes) => {
                info!(
                    "Reference quotes for {} applied ({} tokens)",
                    self.reference_label(),
                    quotes.len()
                );
                self.reference = quotes;
            }
            Err(e) => {
                warn!("Error fetching historical prices: {}", e);
                self.reference = QuoteMap::new();
            }
        }
        true
    }

    /// True until the first current refresh has finished.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// True while a reference request is in flight.
    pub fn is_loading_reference(&self) -> bool {
        self.pending.is_some()
    }

    /// Time of the last successful current refresh.
    pub fn last_update(&self) -> Option<DateTime<Local>> {
        self.last_update
    }

    /// Selected reference date.
    pub fn reference_date(&self) -> Option<NaiveDate> {
        self.reference_date
    }

    /// Reference date as used in insight text, e.g. `9/18/2026`.
    pub fn reference_label(&self) -> String {
        self.reference_date
            .map(|date| date.format("%-m/%-d/%Y").to_string())
            .unwrap_or_default()
    }

    /// Evaluate the engine over the latest quotes.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::evaluate(
            &self.tokens,
            &self.current,
            &self.reference,
            &self.reference_label(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratio_common::RatioError;

    fn quotes(entries: &[(Token, f64)]) -> QuoteMap {
        QuoteMap::from_entries(entries.iter().copied()).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn starts_loading_without_data() {
        let state = DashboardState::new(Token::ALL.to_vec());
        assert!(state.is_loading());
        assert!(!state.is_loading_reference());
        assert!(state.last_update().is_none());
        assert!(!state.snapshot().has_comparison());
    }

    #[test]
    fn failed_refresh_keeps_previous_quotes() {
        let mut state = DashboardState::new(Token::ALL.to_vec());
        state.apply_current(Ok(quotes(&[(Token::SOL, 150.0)])));
        let stamped = state.last_update();
        assert!(stamped.is_some());

        state.apply_current(Err(RatioError::Format("offline".to_string())));
        assert!(!state.is_loading());
        assert_eq!(state.last_update(), stamped);
        assert_eq!(state.snapshot().current.get(Token::SOL), 150.0);
    }

    #[test]
    fn failed_first_refresh_still_ends_loading() {
        let mut state = DashboardState::new(Token::ALL.to_vec());
        state.apply_current(Err(RatioError::Format("offline".to_string())));
        assert!(!state.is_loading());
        assert!(state.last_update().is_none());
    }

    #[test]
    fn latest_selection_wins() {
        let mut state = DashboardState::new(Token::ALL.to_vec());
        let first = state.select_reference(date("2026-08-01"));
        let second = state.select_reference(date("2026-09-01"));
        assert!(state.is_loading_reference());

        assert!(state.complete_reference(second, Ok(quotes(&[(Token::SOL, 120.0)]))));
        assert!(!state.complete_reference(first, Ok(quotes(&[(Token::SOL, 80.0)]))));

        assert_eq!(state.reference_date(), Some(date("2026-09-01")));
        assert_eq!(state.snapshot().reference.get(Token::SOL), 120.0);
        assert!(!state.is_loading_reference());
    }

    #[test]
    fn stale_result_arriving_first_is_dropped() {
        let mut state = DashboardState::new(Token::ALL.to_vec());
        let first = state.select_reference(date("2026-08-01"));
        let second = state.select_reference(date("2026-09-01"));

        assert!(!state.complete_reference(first, Ok(quotes(&[(Token::SOL, 80.0)]))));
        assert!(state.is_loading_reference());
        assert!(!state.snapshot().has_comparison());

        assert!(state.complete_reference(second, Ok(quotes(&[(Token::SOL, 120.0)]))));
        assert!(state.snapshot().has_comparison());
    }

    #[test]
    fn new_selection_hides_previous_reference() {
        let mut state = DashboardState::new(Token::ALL.to_vec());
        let ticket = state.select_reference(date("2026-08-01"));
        state.complete_reference(ticket, Ok(quotes(&[(Token::SOL, 80.0)])));
        assert!(state.snapshot().has_comparison());

        state.select_reference(date("2026-09-01"));
        assert!(!state.snapshot().has_comparison());
    }

    #[test]
    fn failed_lookup_clears_comparison() {
        let mut state = DashboardState::new(Token::ALL.to_vec());
        let ticket = state.select_reference(date("1999-01-01"));
        assert!(state.complete_reference(ticket, Err(RatioError::MissingDate(date("1999-01-01")))));
        assert!(!state.snapshot().has_comparison());
        assert!(!state.is_loading_reference());
    }

    #[test]
    fn clearing_invalidates_pending_request() {
        let mut state = DashboardState::new(Token::ALL.to_vec());
        let ticket = state.select_reference(date("2026-08-01"));
        state.clear_reference();
        assert!(!state.complete_reference(ticket, Ok(quotes(&[(Token::SOL, 80.0)]))));
        assert!(state.reference_date().is_none());
        assert_eq!(state.reference_label(), "");
    }

    #[test]
    fn label_uses_month_day_year() {
        let mut state = DashboardState::new(Token::ALL.to_vec());
        state.select_reference(date("2026-09-08"));
        assert_eq!(state.reference_label(), "9/8/2026");
    }
}
