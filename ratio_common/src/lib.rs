//!
//! Price ratio and insight engine shared by the dashboard.
//!
//! This crate aggregates:
//! - `error` — unified error type `RatioError` used across the workspace.
//! - `result` — handy `Result<T, RatioError>` alias.
//! - `tokens` — token symbols and token-list parsing.
//! - `quotes` — validated per-token quote maps.
//! - `history` — the date-indexed historical quote table.
//! - `engine` — pairwise ratio and change matrices.
//! - `insights` — rule-based trading insights.
//! - `snapshot` — one full evaluation of the above.
#![warn(missing_docs)]
pub mod engine;
pub mod error;
pub mod history;
pub mod insights;
pub mod quotes;
pub mod result;
pub mod snapshot;
pub mod tokens;

pub use error::RatioError;
pub use quotes::QuoteMap;
pub use result::Result;
pub use snapshot::Snapshot;
pub use tokens::Token;
