//! Price quote client for taxlot
//!
//! Fetches latest closing prices for ticker symbols from online sources.
//! Sources implement the [`PriceSource`] trait; [`QuoteBatch`] carries the
//! partial-results contract — every requested symbol lands either in
//! `prices` or in `errors`, never silently missing.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Price source trait for different data providers.
pub trait PriceSource: Send + Sync {
    /// Fetch the latest price for a symbol. `Ok(None)` means the provider
    /// answered but had no price for the symbol.
    fn fetch_price(&self, symbol: &str) -> Result<Option<f64>>;

    /// Fetch prices for multiple symbols.
    fn fetch_prices(&self, symbols: &[String]) -> HashMap<String, Result<f64>> {
        let mut results = HashMap::new();
        for symbol in symbols {
            let result = self.fetch_price(symbol).and_then(|price| {
                price.ok_or_else(|| anyhow::anyhow!("No price found for {symbol}"))
            });
            results.insert(symbol.clone(), result);
        }
        results
    }

    /// Source name.
    fn name(&self) -> &'static str;
}

/// Resolved prices plus per-symbol failures for one batch request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteBatch {
    /// Symbol to latest closing price.
    pub prices: BTreeMap<String, f64>,
    /// Symbol to failure message for symbols that could not be resolved.
    pub errors: BTreeMap<String, String>,
}

impl QuoteBatch {
    /// Partition per-symbol fetch results into prices and errors.
    #[must_use]
    pub fn from_results(results: HashMap<String, Result<f64>>) -> Self {
        let mut batch = Self::default();
        for (symbol, result) in results {
            match result {
                Ok(price) => {
                    batch.prices.insert(symbol, price);
                }
                Err(e) => {
                    batch.errors.insert(symbol, format!("{e:#}"));
                }
            }
        }
        batch
    }

    /// Whether no symbol resolved at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

/// Fetch a batch of quotes from a source.
pub fn fetch_batch(source: &dyn PriceSource, symbols: &[String]) -> QuoteBatch {
    QuoteBatch::from_results(source.fetch_prices(symbols))
}

/// Normalize a comma-separated ticker list: trim, uppercase, drop empties,
/// dedup preserving first occurrence.
#[must_use]
pub fn normalize_symbols(raw: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    raw.split(',')
        .map(|s| s.trim().to_ascii_uppercase())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

/// Yahoo Finance price source.
pub struct YahooFinance {
    agent: ureq::Agent,
}

impl YahooFinance {
    /// Create a new Yahoo Finance price source.
    #[must_use]
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout(std::time::Duration::from_secs(10))
                .build(),
        }
    }

    /// Build the Yahoo Finance chart API URL.
    fn build_url(symbol: &str) -> String {
        format!("https://query1.finance.yahoo.com/v8/finance/chart/{symbol}?interval=1d&range=1d")
    }
}

impl Default for YahooFinance {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceSource for YahooFinance {
    fn fetch_price(&self, symbol: &str) -> Result<Option<f64>> {
        let url = Self::build_url(symbol);

        let response = self
            .agent
            .get(&url)
            .set("User-Agent", "Mozilla/5.0 (compatible; taxlot/0.1)")
            .call()
            .with_context(|| format!("Failed to fetch price for {symbol}"))?;

        let json: serde_json::Value = response
            .into_json()
            .with_context(|| format!("Failed to parse response for {symbol}"))?;

        let price = json
            .get("chart")
            .and_then(|c| c.get("result"))
            .and_then(|r| r.get(0))
            .and_then(|r| r.get("meta"))
            .and_then(|m| m.get("regularMarketPrice"))
            .and_then(serde_json::Value::as_f64);

        Ok(price)
    }

    fn name(&self) -> &'static str {
        "yahoo"
    }
}
