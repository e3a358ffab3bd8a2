//! Text and JSON views of the dashboard.
use ratio_common::engine::{format_change, format_ratio};
use ratio_common::{Result, Snapshot, Token};

use crate::state::DashboardState;

/// Pairs shown above the matrix.
const HEADLINE_PAIRS: [(Token, Token); 3] = [
    (Token::HYPE, Token::SUI),
    (Token::SOL, Token::HYPE),
    (Token::SOL, Token::SUI),
];

const TITLE: &str = "Crypto Comparison For LP-ing";
const FOOTNOTE: &str = "Matrix shows how many units of the column coin equals 1 unit of the row coin";

/// Full evaluation as JSON.
pub fn render_json(state: &DashboardState, pretty: bool) -> Result<String> {
    let snapshot = state.snapshot();
    let json = if pretty {
        serde_json::to_string_pretty(&snapshot)?
    } else {
        serde_json::to_string(&snapshot)?
    };
    Ok(json)
}

/// Human-readable dashboard.
pub fn render_text(state: &DashboardState) -> String {
    let snapshot = state.snapshot();
    let loading = state.is_loading();
    let mut lines = vec![TITLE.to_string()];

    lines.push(match state.last_update() {
        Some(at) if !loading => format!("Last updated: {}", at.format("%H:%M:%S")),
        _ if loading => "Loading prices...".to_string(),
        _ => "Last updated: never".to_string(),
    });
    lines.push(String::new());

    let prices: Vec<String> = snapshot
        .tokens
        .iter()
        .map(|&token| {
            if loading {
                format!("{}: ...", token)
            } else {
                format!("{}: ${:.2}", token, snapshot.current.get(token))
            }
        })
        .collect();
    lines.push(prices.join(" • "));

    let headline: Vec<String> = HEADLINE_PAIRS
        .iter()
        .filter_map(|&(row, col)| {
            let value = snapshot.ratios.get(row, col)?;
            let shown = if loading { "...".to_string() } else { format_ratio(value) };
            Some(format!("{}/{}: {}", row, col, shown))
        })
        .collect();
    if !headline.is_empty() {
        lines.push(headline.join(" | "));
    }
    lines.push(String::new());

    lines.push(comparison_caption(state));
    lines.extend(matrix_table(&snapshot, loading));

    if !snapshot.insights.is_empty() {
        lines.push(String::new());
        lines.push("💡 Market Insights".to_string());
        lines.extend(snapshot.insights.iter().map(|insight| format!("  - {}", insight)));
    }

    lines.push(String::new());
    lines.push(FOOTNOTE.to_string());

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn comparison_caption(state: &DashboardState) -> String {
    match state.reference_date() {
        None => "Compare with: (no date selected)".to_string(),
        Some(date) if state.is_loading_reference() => {
            format!("Compare with: {}  Loading...", date)
        }
        Some(date) => format!(
            "Compare with: {}  Comparing current prices with {}",
            date,
            date.format("%a %b %d %Y")
        ),
    }
}

fn matrix_table(snapshot: &Snapshot, loading: bool) -> Vec<String> {
    let tokens = &snapshot.tokens;
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(tokens.len() + 1);

    let mut header = vec!["Pair Ratio".to_string()];
    header.extend(tokens.iter().map(|t| t.to_string()));
    rows.push(header);

    for (i, row) in tokens.iter().enumerate() {
        let mut cells = vec![row.to_string()];
        for (j, _) in tokens.iter().enumerate() {
            let ratio = if loading {
                "...".to_string()
            } else {
                format_ratio(snapshot.ratios.cells[i][j])
            };
            if i != j && snapshot.changes.has_comparison {
                let change = format_change(snapshot.changes.cells[i][j].percent);
                cells.push(format!("{} ({})", ratio, change));
            } else {
                cells.push(ratio);
            }
        }
        rows.push(cells);
    }

    let columns = rows[0].len();
    let widths: Vec<usize> = (0..columns)
        .map(|c| rows.iter().map(|r| r[c].chars().count()).max().unwrap_or(0))
        .collect();

    let mut lines = Vec::with_capacity(rows.len() + 1);
    for (n, cells) in rows.iter().enumerate() {
        let line: Vec<String> = cells
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(c, (cell, &width))| {
                if c == 0 {
                    format!("{:<width$}", cell)
                } else {
                    format!("{:>width$}", cell)
                }
            })
            .collect();
        lines.push(line.join(" | "));
        if n == 0 {
            let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
            lines.push(rule.join("-+-"));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ratio_common::QuoteMap;

    fn loaded_state() -> DashboardState {
        let mut state = DashboardState::new(Token::ALL.to_vec());
        state.apply_current(QuoteMap::from_entries([
            (Token::HYPE, 30.0),
            (Token::SUI, 3.0),
            (Token::SOL, 150.0),
        ]));
        state
    }

    #[test]
    fn shows_loading_placeholders() {
        let state = DashboardState::new(Token::ALL.to_vec());
        let text = render_text(&state);
        assert!(text.contains("Loading prices..."));
        assert!(text.contains("HYPE: ... • SUI: ... • SOL: ..."));
        assert!(text.contains("HYPE/SUI: ..."));
        assert!(!text.contains("Market Insights"));
    }

    #[test]
    fn shows_prices_ratios_and_footnote() {
        let text = render_text(&loaded_state());
        assert!(text.contains("HYPE: $30.00 • SUI: $3.00 • SOL: $150.00"));
        assert!(text.contains("HYPE/SUI: 10.0000 | SOL/HYPE: 5.0000 | SOL/SUI: 50.0000"));
        assert!(text.contains("Compare with: (no date selected)"));
        assert!(text.contains(FOOTNOTE));
        assert!(!text.contains('▲'));
    }

    #[test]
    fn shows_changes_and_insights_with_reference() {
        let mut state = loaded_state();
        let date = NaiveDate::from_ymd_opt(2026, 9, 18).unwrap();
        let ticket = state.select_reference(date);
        assert!(render_text(&state).contains("Compare with: 2026-09-18  Loading..."));

        state.complete_reference(
            ticket,
            QuoteMap::from_entries([(Token::HYPE, 30.0), (Token::SUI, 5.0), (Token::SOL, 100.0)]),
        );
        let text = render_text(&state);
        assert!(text.contains("Comparing current prices with Fri Sep 18 2026"));
        assert!(text.contains("50.0000 (▲ 150.00%)"));
        assert!(text.contains("0.0200 (▼ 60.00%)"));
        assert!(text.contains("💡 Market Insights"));
        assert!(text.contains("SUI dropped 40.0%"));
    }

    #[test]
    fn lays_out_sections_line_by_line() {
        let text = render_text(&loaded_state());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], TITLE);
        assert!(lines[1].starts_with("Last updated: "));
        assert_eq!(lines[2], "");
        assert_eq!(lines[5], "");
        assert_eq!(lines[6], "Compare with: (no date selected)");
        assert!(lines[7].starts_with("Pair Ratio | "));
        assert!(lines[8].chars().all(|c| c == '-' || c == '+'));
        assert_eq!(lines[8].chars().count(), lines[7].chars().count());
        assert!(text.ends_with(&format!("\n\n{}\n", FOOTNOTE)));
    }

    #[test]
    fn headline_skips_pairs_outside_the_token_list() {
        let mut state = DashboardState::new(vec![Token::SOL, Token::SUI]);
        state.apply_current(QuoteMap::from_entries([(Token::SUI, 3.0), (Token::SOL, 150.0)]));
        let text = render_text(&state);
        assert!(text.contains("SOL/SUI: 50.0000"));
        assert!(!text.contains("HYPE"));
    }

    #[test]
    fn json_contains_full_snapshot() {
        let json = render_json(&loaded_state(), false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["current"]["SOL"], 150.0);
        assert_eq!(value["ratios"]["cells"][0][1], 10.0);
        assert_eq!(value["changes"]["has_comparison"], false);
    }
}
