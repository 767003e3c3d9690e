//! Per-account result assembly.
//!
//! [`compute_capital_gains`] is the outer driver: it groups raw records by
//! instrument, runs one [`LotBook`] pass per instrument, and merges the
//! outputs into a [`CapitalGainsReport`]. Instruments are fully independent;
//! the loop is sequential but nothing couples one instrument's pass to
//! another's.

use crate::date::DateParseError;
use crate::engine::LotBook;
use crate::event::{build_events, TradeRecord};
use crate::lot::Lot;
use crate::realized::RealizedGain;
use crate::summary::{summarize, GainsSummary};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The merged result of processing every instrument in an account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapitalGainsReport {
    /// Realized gains per instrument, in emission order.
    pub gains: BTreeMap<String, Vec<RealizedGain>>,
    /// Past vs. current-year totals across all instruments.
    pub summary: GainsSummary,
    /// Every lot still open after processing, flattened across instruments.
    pub unsold_lots: Vec<Lot>,
    /// Distinct, alphabetically sorted instruments with at least one unsold
    /// lot. Kept for consumers that only need ticker names.
    pub remaining_tickers: Vec<String>,
}

/// Compute realized and unrealized capital gains from raw activity records.
///
/// `as_of` is the reference date for the past/current-year summary split.
/// Records may cover any number of instruments in any order; each
/// instrument's rows are ordered and processed independently. A single
/// unparseable activity date aborts the whole computation.
pub fn compute_capital_gains(
    records: &[TradeRecord],
    as_of: NaiveDate,
) -> Result<CapitalGainsReport, DateParseError> {
    let mut by_instrument: BTreeMap<String, Vec<TradeRecord>> = BTreeMap::new();
    for record in records {
        by_instrument
            .entry(record.instrument.clone())
            .or_default()
            .push(record.clone());
    }

    let mut gains: BTreeMap<String, Vec<RealizedGain>> = BTreeMap::new();
    let mut unsold_lots = Vec::new();
    let mut remaining_tickers = Vec::new();

    for (instrument, rows) in by_instrument {
        let events = build_events(&rows)?;
        let mut book = LotBook::new(instrument.clone());
        let realized = book.process(&events);

        let open = book.into_open_lots();
        if !open.is_empty() {
            remaining_tickers.push(instrument.clone());
        }
        unsold_lots.extend(open);
        gains.insert(instrument, realized);
    }

    let summary = summarize(gains.values().flatten(), as_of);

    Ok(CapitalGainsReport {
        gains,
        summary,
        unsold_lots,
        remaining_tickers,
    })
}
