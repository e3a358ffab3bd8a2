//! Token symbols and helpers shared by the engine and the dashboard.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use strum_macros::{Display, EnumString};

use crate::error::RatioError;

/// Trait providing file parsing for token lists.
pub trait TokenParser {
    /// Parses an ordered token list from a buffered reader.
    ///
    /// Symbols may be separated by commas, spaces, or new lines and are matched
    /// case-insensitively. Repeated symbols keep their first position. Returns an
    /// error if any symbol cannot be parsed or the list is empty.
    fn parse_from_file<R: BufRead>(reader: R) -> Result<Vec<Token>, RatioError>;
}

impl TokenParser for Token {
    fn parse_from_file<R: BufRead>(reader: R) -> Result<Vec<Self>, RatioError> {
        let mut tokens = Vec::new();

        for line_result in reader.lines() {
            let line = line_result.map_err(RatioError::Io)?;
            for raw in line.split(|c: char| c == ',' || c.is_whitespace()) {
                let symbol = raw.trim();
                if symbol.is_empty() {
                    continue;
                }

                match symbol.parse::<Self>() {
                    Ok(token) if !tokens.contains(&token) => tokens.push(token),
                    Ok(_) => {}
                    Err(_) => return Err(RatioError::ParseTokensFile(symbol.to_string())),
                }
            }
        }

        if tokens.is_empty() {
            return Err(RatioError::ParseTokensFile("no tokens listed".to_string()));
        }
        Ok(tokens)
    }
}

/// Set of supported token symbols, in display order.
#[allow(missing_docs)]
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    ValueEnum,
    Display,
    EnumString,
    Hash,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
)]
#[clap(rename_all = "lower")]
#[strum(ascii_case_insensitive)]
pub enum Token {
    HYPE,
    SUI,
    SOL,
}

impl Token {
    /// Every supported token in display order.
    pub const ALL: [Token; 3] = [Token::HYPE, Token::SUI, Token::SOL];

    /// Asset id used by the CoinGecko price API.
    pub fn coingecko_id(&self) -> &'static str {
        match self {
            Token::HYPE => "hyperliquid",
            Token::SUI => "sui",
            Token::SOL => "solana",
        }
    }

    /// Reverse lookup of [`Self::coingecko_id`].
    pub fn from_coingecko_id(id: &str) -> Option<Token> {
        Token::ALL
            .into_iter()
            .find(|token| token.coingecko_id().eq_ignore_ascii_case(id))
    }
}
