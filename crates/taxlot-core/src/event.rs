//! Trade records and the typed event stream.
//!
//! Ingestion produces flat [`TradeRecord`] rows in an extensible normalized
//! vocabulary ([`TradeKind`]). [`build_events`] turns the rows for one
//! instrument into the chronologically ordered [`TradeEvent`] stream the
//! engine consumes: inventory-neutral kinds are dropped, dates are
//! normalized, and same-day events settle splits before trades.

use crate::date::{parse_trade_date, DateParseError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Normalized transaction vocabulary.
///
/// Broker-specific codes are mapped here by the ingestion layer; the set is
/// non-exhaustive so new kinds can be added without breaking downstream
/// matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum TradeKind {
    /// Purchase of shares.
    Buy,
    /// Sale of shares.
    Sell,
    /// Cash dividend. Carries no quantity or price effect.
    CashDividend,
    /// Stock split crediting extra shares.
    Split,
}

impl FromStr for TradeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Buy" | "BUY" | "buy" => Ok(Self::Buy),
            "Sell" | "SELL" | "sell" => Ok(Self::Sell),
            "CDIV" | "cdiv" => Ok(Self::CashDividend),
            "SPL" | "Split" | "SPLIT" | "split" => Ok(Self::Split),
            _ => Err(format!("unknown transaction code: {s}")),
        }
    }
}

impl fmt::Display for TradeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "Buy"),
            Self::Sell => write!(f, "Sell"),
            Self::CashDividend => write!(f, "CDIV"),
            Self::Split => write!(f, "SPL"),
        }
    }
}

/// A raw ingested activity row for one instrument.
///
/// The activity date is kept as the broker supplied it; normalization
/// happens in [`build_events`] so a bad date surfaces exactly where the
/// engine needs it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Normalized transaction kind.
    pub kind: TradeKind,
    /// Activity date string as exported.
    pub activity_date: String,
    /// Instrument symbol.
    pub instrument: String,
    /// Share quantity. Extra shares credited for splits; zero for dividends.
    pub quantity: f64,
    /// Per-share price. Zero for splits and dividends.
    pub price: f64,
    /// Total cash amount of the row, signed.
    pub amount: f64,
}

impl TradeRecord {
    /// Create a record with a zero cash amount.
    #[must_use]
    pub fn new(
        kind: TradeKind,
        activity_date: impl Into<String>,
        instrument: impl Into<String>,
        quantity: f64,
        price: f64,
    ) -> Self {
        Self {
            kind,
            activity_date: activity_date.into(),
            instrument: instrument.into(),
            quantity,
            price,
            amount: 0.0,
        }
    }

    /// Set the signed cash amount.
    #[must_use]
    pub const fn with_amount(mut self, amount: f64) -> Self {
        self.amount = amount;
        self
    }
}

/// An inventory-affecting event, ready for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TradeEvent {
    /// Purchase opening a new lot.
    Buy {
        /// Settlement date.
        date: NaiveDate,
        /// Shares bought.
        quantity: f64,
        /// Per-share price paid.
        price: f64,
    },
    /// Sale consuming open lots front-first.
    Sell {
        /// Settlement date.
        date: NaiveDate,
        /// Shares sold.
        quantity: f64,
        /// Per-share price received.
        price: f64,
    },
    /// Stock split crediting extra shares across all open lots.
    Split {
        /// Effective date.
        date: NaiveDate,
        /// Extra shares credited.
        extra_shares: f64,
    },
}

impl TradeEvent {
    /// The event's settlement/effective date.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        match self {
            Self::Buy { date, .. } | Self::Sell { date, .. } | Self::Split { date, .. } => *date,
        }
    }

    /// Same-day ordering rank. A split effective on a given day adjusts
    /// holdings before that day's trading activity.
    const fn precedence(&self) -> u8 {
        match self {
            Self::Split { .. } => 0,
            Self::Buy { .. } => 1,
            Self::Sell { .. } => 2,
        }
    }
}

/// Build the ordered event stream for one instrument's records.
///
/// Kinds outside Buy/Sell/Split are dropped silently. A single unparseable
/// date aborts with [`DateParseError`]. The sort is stable: same-date
/// same-kind events keep their original relative order, and same-date
/// different-kind events settle in `Split < Buy < Sell` order.
pub fn build_events(records: &[TradeRecord]) -> Result<Vec<TradeEvent>, DateParseError> {
    let mut events = Vec::with_capacity(records.len());
    for record in records {
        let event = match record.kind {
            TradeKind::Buy => TradeEvent::Buy {
                date: parse_trade_date(&record.activity_date)?,
                quantity: record.quantity,
                price: record.price,
            },
            TradeKind::Sell => TradeEvent::Sell {
                date: parse_trade_date(&record.activity_date)?,
                quantity: record.quantity,
                price: record.price,
            },
            TradeKind::Split => TradeEvent::Split {
                date: parse_trade_date(&record.activity_date)?,
                extra_shares: record.quantity,
            },
            _ => continue,
        };
        events.push(event);
    }

    events.sort_by_key(|event| (event.date(), event.precedence()));
    Ok(events)
}
