//! Rule-based market insights.
//!
//! Rules run in a fixed order over per-token and pairwise changes:
//!
//! 1. rotate LP from the best performer to the worst, or else take profit on the best;
//! 2. buy the dip on the worst performer;
//! 3. directional rotation for each watched pair whose ratio moved enough;
//! 4. a single "markets stable" message when nothing above fired.
//!
//! Only rule 1 has an either/or shape. Everything else is independent.

use serde::{Serialize, Serializer};
use std::fmt;

use crate::engine::change;
use crate::quotes::QuoteMap;
use crate::tokens::Token;

/// Best performer gain needed to suggest rotating into a loser.
pub const ROTATE_GAIN_PCT: f64 = 5.0;
/// Best performer gain needed to suggest taking profit.
pub const TAKE_PROFIT_PCT: f64 = 10.0;
/// Worst performer loss needed to flag a dip.
pub const DIP_PCT: f64 = -10.0;
/// Absolute pair ratio move needed to suggest a rotation.
pub const PAIR_MOVE_PCT: f64 = 10.0;

/// Ordered pairs whose ratio moves are reported. HYPE/SOL is not among them.
pub const WATCHED_PAIRS: [(Token, Token); 3] = [
    (Token::SUI, Token::SOL),
    (Token::HYPE, Token::SUI),
    (Token::SOL, Token::HYPE),
];

/// Price move of a single token against the reference quotes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TokenChange {
    /// The token.
    pub token: Token,
    /// Signed percent change; zero without a reference quote.
    pub change: f64,
}

/// One observed market condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Insight {
    /// Best performer is up and the worst is down: move liquidity across.
    Rotate {
        /// Token to take profit from.
        from: Token,
        /// Its (positive) change.
        gained: f64,
        /// Token to buy.
        to: Token,
        /// Its (negative) change.
        declined: f64,
    },
    /// Best performer surged since the reference date.
    TakeProfit {
        /// The surging token.
        token: Token,
        /// Its change.
        gained: f64,
        /// Reference date as shown to the user.
        since: String,
    },
    /// Worst performer dropped hard.
    BuyDip {
        /// The falling token.
        token: Token,
        /// Its (negative) change.
        dropped: f64,
    },
    /// A watched pair ratio moved enough to rotate out of the expensive side.
    PairRotation {
        /// Token that got expensive relative to `cheap`.
        expensive: Token,
        /// Token that got cheap relative to `expensive`.
        cheap: Token,
        /// Ratio move, either sign.
        moved: f64,
    },
    /// Nothing crossed a threshold.
    Stable,
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Insight::Rotate {
                from,
                gained,
                to,
                declined,
            } => write!(
                f,
                "🎯 LP Strategy: {from} gained {:.1}% while {to} declined {:.1}%. \
                 Consider taking profit from {from} LP and moving to {to} LP to buy the dip.",
                gained.abs(),
                declined.abs()
            ),
            Insight::TakeProfit {
                token,
                gained,
                since,
            } => write!(
                f,
                "💰 Take Profit: {token} surged {:.1}% since {since}. \
                 Consider rebalancing LP to lock in gains.",
                gained.abs()
            ),
            Insight::BuyDip { token, dropped } => write!(
                f,
                "📉 Buy Opportunity: {token} dropped {:.1}%. \
                 Good entry point for LP position - buy low, sell high strategy.",
                dropped.abs()
            ),
            Insight::PairRotation {
                expensive,
                cheap,
                moved,
            } => write!(
                f,
                "🔄 {expensive}/{cheap}: Ratio up {:.1}%. {expensive} is expensive relative to \
                 {cheap} - consider rotating {expensive} LP → {cheap} LP.",
                moved.abs()
            ),
            Insight::Stable => f.write_str(
                "📊 Markets are relatively stable. All pairs showing minimal volatility - \
                 good time to hold current LP positions.",
            ),
        }
    }
}

impl Serialize for Insight {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Per-token change for every token in `tokens`, in list order.
pub fn token_changes(tokens: &[Token], current: &QuoteMap, reference: &QuoteMap) -> Vec<TokenChange> {
    tokens
        .iter()
        .map(|&token| {
            let then = reference.get(token);
            let change = if then == 0.0 {
                0.0
            } else {
                (current.get(token) - then) / then * 100.0
            };
            TokenChange { token, change }
        })
        .collect()
}

/// Evaluate every rule. Returns nothing when `reference` is empty.
///
/// `since` is the reference date as it should appear in the text.
pub fn generate_insights(
    tokens: &[Token],
    current: &QuoteMap,
    reference: &QuoteMap,
    since: &str,
) -> Vec<Insight> {
    let mut insights = Vec::new();
    if reference.is_empty() || tokens.is_empty() {
        return insights;
    }

    let mut ranked = token_changes(tokens, current, reference);
    ranked.sort_by(|a, b| b.change.total_cmp(&a.change));
    let best = ranked[0];
    let worst = ranked[ranked.len() - 1];

    if best.change > ROTATE_GAIN_PCT && worst.change < 0.0 {
        insights.push(Insight::Rotate {
            from: best.token,
            gained: best.change,
            to: worst.token,
            declined: worst.change,
        });
    } else if best.change > TAKE_PROFIT_PCT {
        insights.push(Insight::TakeProfit {
            token: best.token,
            gained: best.change,
            since: since.to_string(),
        });
    }

    if worst.change < DIP_PCT {
        insights.push(Insight::BuyDip {
            token: worst.token,
            dropped: worst.change,
        });
    }

    for (row, col) in WATCHED_PAIRS {
        if !tokens.contains(&row) || !tokens.contains(&col) {
            continue;
        }
        let moved = change(row, col, current, reference);
        if moved.abs() <= PAIR_MOVE_PCT {
            continue;
        }
        let (expensive, cheap) = if moved > 0.0 { (row, col) } else { (col, row) };
        insights.push(Insight::PairRotation {
            expensive,
            cheap,
            moved,
        });
    }

    if insights.is_empty() {
        insights.push(Insight::Stable);
    }
    insights
}
