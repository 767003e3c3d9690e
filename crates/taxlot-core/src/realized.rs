//! Realized gain records.
//!
//! One [`RealizedGain`] is emitted per (sell, matched-lot-portion) pair; a
//! single sell splits across multiple records when it drains more than one
//! lot.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tax holding-period classification of a realized gain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GainTerm {
    /// Held 365 days or fewer.
    ShortTerm,
    /// Held strictly more than 365 days.
    LongTerm,
}

impl GainTerm {
    /// Classify by holding period. A sell exactly 365 days after its matched
    /// buy is short-term; 366 days is long-term.
    #[must_use]
    pub fn from_holding_period(buy_date: NaiveDate, sell_date: NaiveDate) -> Self {
        if sell_date.signed_duration_since(buy_date).num_days() > 365 {
            Self::LongTerm
        } else {
            Self::ShortTerm
        }
    }
}

impl fmt::Display for GainTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShortTerm => write!(f, "short_term"),
            Self::LongTerm => write!(f, "long_term"),
        }
    }
}

/// An immutable record of a sell matched against (part of) one lot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealizedGain {
    /// Instrument symbol.
    pub instrument: String,
    /// Date of the sell event.
    pub sell_date: NaiveDate,
    /// Purchase date of the matched lot.
    pub buy_date: NaiveDate,
    /// Shares matched from the lot.
    pub quantity: f64,
    /// Per-share cost basis of the matched lot.
    pub buy_price: f64,
    /// Per-share sell price.
    pub sell_price: f64,
    /// `(sell_price − buy_price) × quantity`, signed.
    pub gain_loss: f64,
    /// Holding-period classification.
    pub gain_type: GainTerm,
}

impl RealizedGain {
    /// Build a record for `quantity` shares matched against a lot bought at
    /// `buy_price` on `buy_date`. Gain/loss and term are derived.
    #[must_use]
    pub fn new(
        instrument: impl Into<String>,
        sell_date: NaiveDate,
        buy_date: NaiveDate,
        quantity: f64,
        buy_price: f64,
        sell_price: f64,
    ) -> Self {
        Self {
            instrument: instrument.into(),
            sell_date,
            buy_date,
            quantity,
            buy_price,
            sell_price,
            gain_loss: (sell_price - buy_price) * quantity,
            gain_type: GainTerm::from_holding_period(buy_date, sell_date),
        }
    }
}

impl fmt::Display for RealizedGain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} sell {} quantity:{:.5} bought {} @ {:.2} sold @ {:.2} gain_loss:{:.2} ({})",
            self.instrument,
            self.sell_date,
            self.quantity,
            self.buy_date,
            self.buy_price,
            self.sell_price,
            self.gain_loss,
            self.gain_type
        )
    }
}

/// Signed sum of gain/loss over a slice of records.
#[must_use]
pub fn total_gain_loss(gains: &[RealizedGain]) -> f64 {
    gains.iter().map(|g| g.gain_loss).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn gain_loss_is_spread_times_quantity() {
        let gain = RealizedGain::new("AAPL", date(2022, 2, 1), date(2022, 1, 1), 5.0, 10.0, 12.0);
        assert!((gain.gain_loss - 10.0).abs() < 1e-12);
        assert_eq!(gain.gain_type, GainTerm::ShortTerm);
    }

    #[test]
    fn losses_are_negative() {
        let gain = RealizedGain::new("AAPL", date(2022, 2, 1), date(2022, 1, 1), 5.0, 12.0, 10.0);
        assert!((gain.gain_loss + 10.0).abs() < 1e-12);
    }

    #[test]
    fn holding_period_boundary() {
        let buy = date(2022, 1, 1);
        // Exactly 365 days held: short-term.
        assert_eq!(
            GainTerm::from_holding_period(buy, date(2023, 1, 1)),
            GainTerm::ShortTerm
        );
        // 366 days held: long-term.
        assert_eq!(
            GainTerm::from_holding_period(buy, date(2023, 1, 2)),
            GainTerm::LongTerm
        );
    }

    #[test]
    fn total_over_mixed_records() {
        let gains = [
            RealizedGain::new("AAPL", date(2022, 2, 1), date(2022, 1, 1), 5.0, 10.0, 12.0),
            RealizedGain::new("MSFT", date(2022, 3, 1), date(2022, 1, 1), 2.0, 100.0, 90.0),
        ];
        assert!((total_gain_loss(&gains) - (10.0 - 20.0)).abs() < 1e-12);
    }

    #[test]
    fn term_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&GainTerm::LongTerm).unwrap(),
            "\"long_term\""
        );
        assert_eq!(format!("{}", GainTerm::ShortTerm), "short_term");
    }
}
