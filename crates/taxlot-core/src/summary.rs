//! Aggregation of realized gains into past vs. current-year totals.

use crate::realized::RealizedGain;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Running totals of realized gain/loss split by the reference year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GainsSummary {
    /// Sum of gain/loss for sells settled before the reference year.
    pub past_gains: f64,
    /// Sum of gain/loss for sells settled in or after the reference year.
    pub current_year_gains: f64,
}

/// Split realized gains into past vs. current-year totals.
///
/// `as_of` is the observer's reference date; callers that want wall-clock
/// behavior pass today's date. Records with `sell_date.year >= as_of.year`
/// count as current-year, everything earlier as past. Both totals are
/// simple signed sums, so re-running over the same records always yields
/// identical results.
pub fn summarize<'a, I>(gains: I, as_of: NaiveDate) -> GainsSummary
where
    I: IntoIterator<Item = &'a RealizedGain>,
{
    let current_year = as_of.year();
    let mut summary = GainsSummary::default();
    for gain in gains {
        if gain.sell_date.year() >= current_year {
            summary.current_year_gains += gain.gain_loss;
        } else {
            summary.past_gains += gain.gain_loss;
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn gain(sell: NaiveDate, gain_loss: f64) -> RealizedGain {
        let mut g = RealizedGain::new("AAPL", sell, date(2020, 1, 1), 1.0, 0.0, 0.0);
        g.gain_loss = gain_loss;
        g
    }

    #[test]
    fn splits_by_sell_year() {
        let gains = [
            gain(date(2022, 5, 1), 100.0),
            gain(date(2023, 2, 1), 40.0),
            gain(date(2021, 12, 31), -30.0),
        ];
        let summary = summarize(&gains, date(2023, 6, 1));
        assert!((summary.past_gains - 70.0).abs() < 1e-12);
        assert!((summary.current_year_gains - 40.0).abs() < 1e-12);
    }

    #[test]
    fn sells_after_the_reference_year_count_as_current() {
        let gains = [gain(date(2024, 1, 2), 10.0)];
        let summary = summarize(&gains, date(2023, 6, 1));
        assert!((summary.current_year_gains - 10.0).abs() < 1e-12);
        assert_eq!(summary.past_gains, 0.0);
    }

    #[test]
    fn losses_subtract() {
        let gains = [gain(date(2023, 2, 1), 40.0), gain(date(2023, 3, 1), -55.0)];
        let summary = summarize(&gains, date(2023, 6, 1));
        assert!((summary.current_year_gains + 15.0).abs() < 1e-12);
    }

    #[test]
    fn rerunning_yields_identical_totals() {
        let gains = [
            gain(date(2022, 5, 1), 100.0),
            gain(date(2023, 2, 1), 40.0),
        ];
        let first = summarize(&gains, date(2023, 6, 1));
        let second = summarize(&gains, date(2023, 6, 1));
        assert_eq!(first, second);
    }

    #[test]
    fn empty_input_is_all_zero() {
        let none: [RealizedGain; 0] = [];
        let summary = summarize(&none, date(2023, 6, 1));
        assert_eq!(summary, GainsSummary::default());
    }
}
