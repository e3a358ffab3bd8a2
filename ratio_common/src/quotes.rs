//! Quote maps: per-token prices in a shared unit (USD).
//!
//! A `QuoteMap` may be empty (nothing fetched yet) or partial (a source returned
//! nothing for some token). Absent tokens read as `0.0`, never as an error, which
//! is what the ratio engine relies on. Validation happens here, at construction:
//! negative, NaN and infinite quotes are rejected so the engine only ever sees
//! non-negative finite values.

use log::debug;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

use crate::error::RatioError;
use crate::result::Result;
use crate::tokens::Token;

/// Mapping from token to its quote.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>")]
pub struct QuoteMap {
    quotes: BTreeMap<Token, f64>,
}

impl QuoteMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from `(token, quote)` pairs, rejecting invalid quotes.
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Token, f64)>,
    {
        let mut map = Self::new();
        for (token, quote) in entries {
            map.insert(token, quote)?;
        }
        Ok(map)
    }

    /// Build a map from `(symbol, quote)` pairs.
    ///
    /// Symbols that are not supported tokens are skipped; price sources
    /// routinely carry assets the dashboard does not track.
    pub fn from_symbols<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let mut map = Self::new();
        for (symbol, quote) in entries {
            match symbol.as_ref().parse::<Token>() {
                Ok(token) => map.insert(token, quote)?,
                Err(_) => debug!("Skipping unsupported symbol {}", symbol.as_ref()),
            }
        }
        Ok(map)
    }

    /// Set the quote for `token`, replacing any previous value.
    pub fn insert(&mut self, token: Token, quote: f64) -> Result<()> {
        if !quote.is_finite() || quote < 0.0 {
            return Err(RatioError::InvalidQuote {
                token,
                value: quote,
            });
        }
        self.quotes.insert(token, quote);
        Ok(())
    }

    /// Quote for `token`; absent tokens read as `0.0`.
    pub fn get(&self, token: Token) -> f64 {
        self.quotes.get(&token).copied().unwrap_or(0.0)
    }

    /// Whether `token` has an explicit entry.
    pub fn contains(&self, token: Token) -> bool {
        self.quotes.contains_key(&token)
    }

    /// True when nothing has been loaded.
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Number of tokens with an explicit entry.
    pub fn len(&self) -> usize {
        self.quotes.len()
    }
}

impl TryFrom<BTreeMap<String, f64>> for QuoteMap {
    type Error = RatioError;

    fn try_from(raw: BTreeMap<String, f64>) -> Result<Self> {
        Self::from_symbols(raw)
    }
}

impl Serialize for QuoteMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.quotes.iter().map(|(token, quote)| (token.to_string(), quote)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_token_reads_as_zero() {
        let map = QuoteMap::from_entries([(Token::SOL, 150.0)]).unwrap();
        assert_eq!(map.get(Token::SOL), 150.0);
        assert_eq!(map.get(Token::SUI), 0.0);
        assert!(!map.contains(Token::SUI));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn rejects_negative_and_non_finite_quotes() {
        for bad in [-1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = QuoteMap::from_entries([(Token::HYPE, bad)]).unwrap_err();
            assert!(matches!(err, RatioError::InvalidQuote { token: Token::HYPE, .. }));
        }
    }

    #[test]
    fn zero_is_a_valid_quote() {
        let map = QuoteMap::from_entries([(Token::SUI, 0.0)]).unwrap();
        assert!(map.contains(Token::SUI));
        assert!(!map.is_empty());
    }

    #[test]
    fn json_skips_unknown_symbols() {
        let map: QuoteMap = serde_json::from_str(r#"{"sol": 150.5, "ETH": 3000, "SUI": 3}"#).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(Token::SOL), 150.5);
        assert_eq!(map.get(Token::SUI), 3.0);
    }

    #[test]
    fn json_rejects_negative_quote() {
        assert!(serde_json::from_str::<QuoteMap>(r#"{"SOL": -2}"#).is_err());
    }

    #[test]
    fn serializes_in_token_order() {
        let map = QuoteMap::from_entries([(Token::SOL, 1.5), (Token::HYPE, 2.0)]).unwrap();
        assert_eq!(serde_json::to_string(&map).unwrap(), r#"{"HYPE":2.0,"SOL":1.5}"#);
    }
}
