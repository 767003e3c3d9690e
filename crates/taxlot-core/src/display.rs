//! Boundary rounding and the external report shape.
//!
//! The engine works in full precision; the fixed rounding policy — monetary
//! values to 2 decimal places, share quantities to 5 — is applied only here,
//! when a report leaves the process as JSON or text.

use crate::lot::{Lot, LotId};
use crate::realized::{GainTerm, RealizedGain};
use crate::report::CapitalGainsReport;
use crate::summary::GainsSummary;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Round a monetary value to 2 decimal places.
#[must_use]
pub fn round_money(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round a share quantity to 5 decimal places.
#[must_use]
pub fn round_quantity(value: f64) -> f64 {
    (value * 100_000.0).round() / 100_000.0
}

/// A realized gain with boundary rounding applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedGain {
    /// Instrument symbol.
    pub instrument: String,
    /// Sell date.
    pub sell_date: NaiveDate,
    /// Matched lot's purchase date.
    pub buy_date: NaiveDate,
    /// Matched quantity, 5 decimal places.
    pub quantity: f64,
    /// Per-share cost basis, 2 decimal places.
    pub buy_price: f64,
    /// Per-share sell price, 2 decimal places.
    pub sell_price: f64,
    /// Signed gain/loss, 2 decimal places.
    pub gain_loss: f64,
    /// Holding-period classification.
    pub gain_type: GainTerm,
}

impl From<&RealizedGain> for RenderedGain {
    fn from(gain: &RealizedGain) -> Self {
        Self {
            instrument: gain.instrument.clone(),
            sell_date: gain.sell_date,
            buy_date: gain.buy_date,
            quantity: round_quantity(gain.quantity),
            buy_price: round_money(gain.buy_price),
            sell_price: round_money(gain.sell_price),
            gain_loss: round_money(gain.gain_loss),
            gain_type: gain.gain_type,
        }
    }
}

/// Summary totals with boundary rounding applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderedSummary {
    /// Realized gain/loss before the reference year, 2 decimal places.
    pub past_gains: f64,
    /// Realized gain/loss in or after the reference year, 2 decimal places.
    pub current_year_gains: f64,
}

impl From<&GainsSummary> for RenderedSummary {
    fn from(summary: &GainsSummary) -> Self {
        Self {
            past_gains: round_money(summary.past_gains),
            current_year_gains: round_money(summary.current_year_gains),
        }
    }
}

/// An open lot with boundary rounding applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedLot {
    /// Stable lot identifier.
    pub lot_id: LotId,
    /// Instrument symbol.
    pub instrument: String,
    /// Unsold quantity, 5 decimal places.
    pub quantity: f64,
    /// Per-share cost basis, 2 decimal places.
    pub cost_basis_per_share: f64,
    /// Purchase date.
    pub purchase_date: NaiveDate,
}

impl From<&Lot> for RenderedLot {
    fn from(lot: &Lot) -> Self {
        Self {
            lot_id: lot.id.clone(),
            instrument: lot.instrument.clone(),
            quantity: round_quantity(lot.remaining_quantity),
            cost_basis_per_share: round_money(lot.cost_basis_per_share),
            purchase_date: lot.purchase_date,
        }
    }
}

/// The full report as exposed externally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedReport {
    /// Realized gains per instrument.
    pub gains: BTreeMap<String, Vec<RenderedGain>>,
    /// Summary totals.
    pub summary: RenderedSummary,
    /// Open lots across all instruments.
    pub unsold_lots: Vec<RenderedLot>,
    /// Sorted tickers with at least one unsold lot.
    pub remaining_tickers: Vec<String>,
}

impl From<&CapitalGainsReport> for RenderedReport {
    fn from(report: &CapitalGainsReport) -> Self {
        Self {
            gains: report
                .gains
                .iter()
                .map(|(instrument, gains)| {
                    (
                        instrument.clone(),
                        gains.iter().map(RenderedGain::from).collect(),
                    )
                })
                .collect(),
            summary: RenderedSummary::from(&report.summary),
            unsold_lots: report.unsold_lots.iter().map(RenderedLot::from).collect(),
            remaining_tickers: report.remaining_tickers.clone(),
        }
    }
}
