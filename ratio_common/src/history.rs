//! Historical lookup table: calendar date to the quotes recorded that day.
//!
//! The JSON layout is an object keyed by `YYYY-MM-DD`, each value being a
//! symbol-to-quote object. Days may list only some tokens:
//!
//! ```json
//! { "2024-11-05": { "SOL": 166.2, "SUI": 2.01 }, "2024-11-06": { "SOL": 189.0, "SUI": 2.3, "HYPE": 5.1 } }
//! ```
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Read;

use crate::error::RatioError;
use crate::quotes::QuoteMap;
use crate::result::Result;
use crate::tokens::Token;

/// Date-indexed reference quotes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct HistoryTable {
    days: BTreeMap<NaiveDate, QuoteMap>,
}

impl HistoryTable {
    /// Decode a table from any JSON reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Quotes recorded on `date`. Tokens absent that day read as zero.
    pub fn quotes_on(&self, date: NaiveDate) -> Result<QuoteMap> {
        self.days
            .get(&date)
            .cloned()
            .ok_or(RatioError::MissingDate(date))
    }

    /// Number of dates in the table.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// True when the table holds no dates.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// First and last covered dates.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.days.keys().next()?;
        let last = self.days.keys().next_back()?;
        Some((*first, *last))
    }

    /// Number of days on which `token` has a quote.
    pub fn entries_for(&self, token: Token) -> usize {
        self.days.values().filter(|day| day.contains(token)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"{
        "2024-11-06": { "SOL": 189.0, "SUI": 2.3, "HYPE": 5.1 },
        "2024-11-05": { "SOL": 166.2, "SUI": 2.01 }
    }"#;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn looks_up_quotes_by_date() {
        let table = HistoryTable::from_reader(TABLE.as_bytes()).unwrap();
        let day = table.quotes_on(date("2024-11-05")).unwrap();
        assert_eq!(day.get(Token::SOL), 166.2);
        assert_eq!(day.get(Token::HYPE), 0.0);
    }

    #[test]
    fn missing_date_is_an_error() {
        let table = HistoryTable::from_reader(TABLE.as_bytes()).unwrap();
        match table.quotes_on(date("2023-01-01")) {
            Err(RatioError::MissingDate(d)) => assert_eq!(d, date("2023-01-01")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn summarises_coverage() {
        let table = HistoryTable::from_reader(TABLE.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.date_range(), Some((date("2024-11-05"), date("2024-11-06"))));
        assert_eq!(table.entries_for(Token::SOL), 2);
        assert_eq!(table.entries_for(Token::HYPE), 1);
    }

    #[test]
    fn malformed_date_key_fails_to_load() {
        assert!(HistoryTable::from_reader(r#"{"05-11-2024": {"SOL": 1}}"#.as_bytes()).is_err());
    }
}
