//! Quote sources backing the dashboard.
//!
//! `QuoteSource` is the seam between the dashboard and wherever prices come
//! from. `FileQuoteSource` reads JSON files from disk and re-reads them on every
//! call, so an external process refreshing the files is picked up by polling.
use chrono::NaiveDate;
use log::debug;
use ratio_common::history::HistoryTable;
use ratio_common::{QuoteMap, RatioError, Result, Token};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

/// Supplies current and historical quote maps.
pub trait QuoteSource: Send + Sync {
    /// Latest spot quotes.
    fn current(&self) -> Result<QuoteMap>;
    /// Quotes recorded on `date`.
    fn historical(&self, date: NaiveDate) -> Result<QuoteMap>;
}

/// Accepted layouts of the current-price file.
#[derive(Deserialize)]
#[serde(untagged)]
enum PriceFile {
    /// `{"SOL": 150.2}`
    Symbols(BTreeMap<String, f64>),
    /// `{"solana": {"usd": 150.2}}`
    Provider(BTreeMap<String, ProviderQuote>),
}

#[derive(Deserialize)]
struct ProviderQuote {
    usd: Option<f64>,
}

impl PriceFile {
    fn into_quotes(self) -> Result<QuoteMap> {
        match self {
            PriceFile::Symbols(raw) => QuoteMap::from_symbols(raw),
            PriceFile::Provider(raw) => {
                let mut quotes = QuoteMap::new();
                for (id, quote) in raw {
                    let Some(token) = Token::from_coingecko_id(&id) else {
                        debug!("Skipping unsupported asset id {}", id);
                        continue;
                    };
                    match quote.usd {
                        Some(usd) => quotes.insert(token, usd)?,
                        None => debug!("No USD quote for {}", token),
                    }
                }
                Ok(quotes)
            }
        }
    }
}

/// File-backed quote source.
pub struct FileQuoteSource {
    prices: PathBuf,
    history: Option<PathBuf>,
}

impl FileQuoteSource {
    /// Source reading current prices from `prices` and the lookup table from `history`.
    pub fn new(prices: PathBuf, history: Option<PathBuf>) -> Self {
        Self { prices, history }
    }

    /// Whether historical lookups can succeed at all.
    pub fn has_history(&self) -> bool {
        self.history.is_some()
    }

    fn load_history(&self) -> Result<HistoryTable> {
        let path = self
            .history
            .as_ref()
            .ok_or_else(|| RatioError::Format("no history file configured".to_string()))?;
        let table = HistoryTable::from_reader(BufReader::new(File::open(path)?))?;
        if let Some((first, last)) = table.date_range() {
            debug!(
                "History table {}: {} dates from {} to {}",
                path.display(),
                table.len(),
                first,
                last
            );
            for token in Token::ALL {
                debug!("{} entries: {}", token, table.entries_for(token));
            }
        }
        Ok(table)
    }
}

impl QuoteSource for FileQuoteSource {
    fn current(&self) -> Result<QuoteMap> {
        let file = File::open(&self.prices)?;
        let parsed: PriceFile = serde_json::from_reader(BufReader::new(file))?;
        let quotes = parsed.into_quotes()?;
        debug!("Loaded {} current quotes from {}", quotes.len(), self.prices.display());
        Ok(quotes)
    }

    fn historical(&self, date: NaiveDate) -> Result<QuoteMap> {
        self.load_history()?.quotes_on(date)
    }
}
