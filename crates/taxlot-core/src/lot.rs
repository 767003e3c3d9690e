//! Open cost-basis lots.
//!
//! A [`Lot`] is a discrete block of purchased shares tracked with its own
//! per-share cost basis and purchase date, consumed front-first by later
//! sells and rescaled in place by splits.

use crate::QUANTITY_EPSILON;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Deterministic lot identifier.
///
/// Derived from the instrument symbol, the purchase date, and a 0-based
/// intra-day sequence number assigned in creation order, so ids are stable
/// and reproducible across runs given identical input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LotId(String);

impl LotId {
    /// Build the id for the `sequence`-th lot of `instrument` opened on `date`.
    #[must_use]
    pub fn new(instrument: &str, date: NaiveDate, sequence: u32) -> Self {
        Self(format!("{instrument}-{}-{sequence}", date.format("%Y%m%d")))
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An open, partially-consumable purchase record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lot {
    /// Stable identifier.
    pub id: LotId,
    /// Instrument symbol.
    pub instrument: String,
    /// Date the lot was opened.
    pub purchase_date: NaiveDate,
    /// Cost basis per share. Rescaled by splits.
    pub cost_basis_per_share: f64,
    /// Shares still unsold. Decreased by matching sells, rescaled by splits.
    pub remaining_quantity: f64,
}

impl Lot {
    /// Open a new lot.
    #[must_use]
    pub fn open(
        id: LotId,
        instrument: impl Into<String>,
        purchase_date: NaiveDate,
        cost_basis_per_share: f64,
        remaining_quantity: f64,
    ) -> Self {
        Self {
            id,
            instrument: instrument.into(),
            purchase_date,
            cost_basis_per_share,
            remaining_quantity,
        }
    }

    /// Total remaining cost basis (`remaining_quantity × cost_basis_per_share`).
    /// Invariant under split rescaling.
    #[must_use]
    pub fn total_basis(&self) -> f64 {
        self.remaining_quantity * self.cost_basis_per_share
    }

    /// Whether the lot is used up (remaining quantity at or below the dust
    /// margin).
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining_quantity <= QUANTITY_EPSILON
    }
}

impl fmt::Display for Lot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:.5} {} @ {:.2} ({})",
            self.id, self.remaining_quantity, self.instrument, self.cost_basis_per_share,
            self.purchase_date
        )
    }
}
