//! Error types shared by the engine and the dashboard.
//!
//! The `RatioError` enum covers the failure cases found at the edges of the
//! system: reading quote files, decoding JSON, parsing token lists and dates,
//! and the channel plumbing of the dashboard. The engine itself is total and
//! never produces one.
use std::io;

use chrono::NaiveDate;
use thiserror::Error;

use crate::tokens::Token;

/// Unified error type shared by the library and the dashboard binary.
#[derive(Error, Debug)]
pub enum RatioError {
    /// I/O error originating from the standard library (files, stdin).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic formatting/validation error with a human-readable message.
    #[error("Format error: {0}")]
    Format(String),

    /// Error while parsing the token list file into `Token` values.
    #[error("Parse tokens file error: {0}")]
    ParseTokensFile(String),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// A calendar date could not be parsed (expected `YYYY-MM-DD`).
    #[error("Date parse error: {0}")]
    DateParse(#[from] chrono::ParseError),

    /// A quote was negative, NaN or infinite.
    #[error("Invalid quote for {token}: {value}")]
    InvalidQuote {
        /// Token the quote was supplied for.
        token: Token,
        /// The rejected value.
        value: f64,
    },

    /// The historical table has no entry for the requested date.
    #[error("No historical quotes for {0}")]
    MissingDate(NaiveDate),

    /// Channel receive failed (e.g., sender closed); contains a short context string.
    #[error("Channel receive failed: {0}")]
    ChannelRecv(String),
}
