//! A complete evaluation of the engine over one pair of quote maps.
//!
//! Nothing is cached between evaluations: every call recomputes the matrices
//! and the insights from the maps it is given.
use serde::Serialize;

use crate::engine::{ChangeMatrix, RatioMatrix};
use crate::insights::{generate_insights, token_changes, Insight, TokenChange};
use crate::quotes::QuoteMap;
use crate::tokens::Token;

/// Everything a dashboard view needs, serializable as JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Row and column order.
    pub tokens: Vec<Token>,
    /// Current quotes.
    pub current: QuoteMap,
    /// Reference quotes; empty when no comparison is available.
    pub reference: QuoteMap,
    /// Reference date as shown to the user.
    pub reference_label: String,
    /// Current ratios.
    pub ratios: RatioMatrix,
    /// Ratio change against the reference.
    pub changes: ChangeMatrix,
    /// Per-token price change against the reference.
    pub performance: Vec<TokenChange>,
    /// Ordered insights.
    pub insights: Vec<Insight>,
}

impl Snapshot {
    /// Evaluate every engine output.
    pub fn evaluate(
        tokens: &[Token],
        current: &QuoteMap,
        reference: &QuoteMap,
        reference_label: &str,
    ) -> Self {
        Self {
            tokens: tokens.to_vec(),
            current: current.clone(),
            reference: reference.clone(),
            reference_label: reference_label.to_string(),
            ratios: RatioMatrix::compute(tokens, current),
            changes: ChangeMatrix::compute(tokens, current, reference),
            performance: token_changes(tokens, current, reference),
            insights: generate_insights(tokens, current, reference, reference_label),
        }
    }

    /// Whether a reference is loaded.
    pub fn has_comparison(&self) -> bool {
        self.changes.has_comparison
    }
}
