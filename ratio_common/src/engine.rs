//! Ratio and change matrices.
//!
//! `ratio(row, col, quotes)` is how many units of `col` one unit of `row` buys.
//! It is total: the diagonal is pinned to `1.0` and a zero (or missing)
//! denominator saturates to `0.0` instead of dividing. `change` compares the
//! current ratio with the reference ratio in percent, returning `0.0` whenever
//! no meaningful baseline exists.

use serde::Serialize;

use crate::quotes::QuoteMap;
use crate::tokens::Token;

/// Ratio of `row` priced in `col`.
pub fn ratio(row: Token, col: Token, quotes: &QuoteMap) -> f64 {
    if row == col {
        return 1.0;
    }
    let numerator = quotes.get(row);
    let denominator = quotes.get(col);
    if denominator == 0.0 {
        return 0.0;
    }
    numerator / denominator
}

/// Percent change of the `row`/`col` ratio from `reference` to `current`.
pub fn change(row: Token, col: Token, current: &QuoteMap, reference: &QuoteMap) -> f64 {
    if row == col || reference.is_empty() {
        return 0.0;
    }
    let current_ratio = displayed_ratio(ratio(row, col, current));
    let reference_ratio = displayed_ratio(ratio(row, col, reference));
    if reference_ratio == 0.0 {
        return 0.0;
    }
    (current_ratio - reference_ratio) / reference_ratio * 100.0
}

// Changes are taken between the ratios as shown, not the exact quotients.
fn displayed_ratio(value: f64) -> f64 {
    (value * 1e4).round() / 1e4
}

/// Ratio as displayed: four fractional digits.
pub fn format_ratio(value: f64) -> String {
    format!("{:.4}", value)
}

/// Change as displayed: direction glyph plus magnitude with two digits.
pub fn format_change(percent: f64) -> String {
    if percent > 0.0 {
        format!("▲ {:.2}%", percent.abs())
    } else if percent < 0.0 {
        format!("▼ {:.2}%", percent.abs())
    } else {
        "0.00%".to_string()
    }
}

/// Heat band of a change cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeTier {
    /// Above +20%.
    StrongGain,
    /// Above +10%.
    Gain,
    /// Above zero.
    SlightGain,
    /// Exactly zero.
    Flat,
    /// Below zero.
    SlightLoss,
    /// Below -10%.
    Loss,
    /// Below -20%.
    StrongLoss,
}

impl ChangeTier {
    /// Band for a percent change.
    pub fn classify(percent: f64) -> Self {
        if percent > 20.0 {
            ChangeTier::StrongGain
        } else if percent > 10.0 {
            ChangeTier::Gain
        } else if percent > 0.0 {
            ChangeTier::SlightGain
        } else if percent < -20.0 {
            ChangeTier::StrongLoss
        } else if percent < -10.0 {
            ChangeTier::Loss
        } else if percent < 0.0 {
            ChangeTier::SlightLoss
        } else {
            ChangeTier::Flat
        }
    }
}

/// Full `N x N` ratio matrix over an ordered token list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatioMatrix {
    /// Row and column order.
    pub tokens: Vec<Token>,
    /// `cells[i][j] == ratio(tokens[i], tokens[j])`.
    pub cells: Vec<Vec<f64>>,
}

impl RatioMatrix {
    /// Compute every ordered pair of `tokens` against `quotes`.
    pub fn compute(tokens: &[Token], quotes: &QuoteMap) -> Self {
        let cells = tokens
            .iter()
            .map(|&row| tokens.iter().map(|&col| ratio(row, col, quotes)).collect())
            .collect();
        Self {
            tokens: tokens.to_vec(),
            cells,
        }
    }

    /// Cell for `(row, col)` if both are part of the matrix.
    pub fn get(&self, row: Token, col: Token) -> Option<f64> {
        let i = self.tokens.iter().position(|t| *t == row)?;
        let j = self.tokens.iter().position(|t| *t == col)?;
        Some(self.cells[i][j])
    }
}

/// One cell of the change matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChangeCell {
    /// Signed percent change.
    pub percent: f64,
    /// Heat band of `percent`.
    pub tier: ChangeTier,
}

/// Full `N x N` change matrix comparing current ratios with reference ratios.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeMatrix {
    /// Row and column order.
    pub tokens: Vec<Token>,
    /// False when no reference quotes are loaded; every cell is then zero.
    pub has_comparison: bool,
    /// `cells[i][j].percent == change(tokens[i], tokens[j])`.
    pub cells: Vec<Vec<ChangeCell>>,
}

impl ChangeMatrix {
    /// Compute every ordered pair of `tokens`.
    pub fn compute(tokens: &[Token], current: &QuoteMap, reference: &QuoteMap) -> Self {
        let cells = tokens
            .iter()
            .map(|&row| {
                tokens
                    .iter()
                    .map(|&col| {
                        let percent = change(row, col, current, reference);
                        ChangeCell {
                            percent,
                            tier: ChangeTier::classify(percent),
                        }
                    })
                    .collect()
            })
            .collect();
        Self {
            tokens: tokens.to_vec(),
            has_comparison: !reference.is_empty(),
            cells,
        }
    }

    /// Cell for `(row, col)` if both are part of the matrix.
    pub fn get(&self, row: Token, col: Token) -> Option<ChangeCell> {
        let i = self.tokens.iter().position(|t| *t == row)?;
        let j = self.tokens.iter().position(|t| *t == col)?;
        Some(self.cells[i][j])
    }
}
