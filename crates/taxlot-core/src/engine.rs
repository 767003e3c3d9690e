//! The FIFO lot-matching and split-adjustment state machine.
//!
//! A [`LotBook`] owns one instrument's inventory: a FIFO queue of open
//! [`Lot`]s plus per-date sequence counters for id assignment. It consumes
//! an ordered [`TradeEvent`] stream left to right with no backtracking,
//! emitting [`RealizedGain`] records as sells drain the queue.

use crate::event::TradeEvent;
use crate::lot::{Lot, LotId};
use crate::realized::RealizedGain;
use crate::QUANTITY_EPSILON;
use chrono::NaiveDate;
use std::collections::{HashMap, VecDeque};

/// Per-instrument FIFO inventory of open lots.
///
/// Lots are created only by buys, consumed only by sells, and rescaled in
/// place by splits. Relative order never changes once a lot is created.
#[derive(Debug, Clone, Default)]
pub struct LotBook {
    instrument: String,
    lots: VecDeque<Lot>,
    date_sequence: HashMap<NaiveDate, u32>,
}

impl LotBook {
    /// Create an empty book for one instrument.
    #[must_use]
    pub fn new(instrument: impl Into<String>) -> Self {
        Self {
            instrument: instrument.into(),
            lots: VecDeque::new(),
            date_sequence: HashMap::new(),
        }
    }

    /// The instrument this book tracks.
    #[must_use]
    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    /// Open lots in FIFO order, oldest first.
    pub fn open_lots(&self) -> impl Iterator<Item = &Lot> {
        self.lots.iter()
    }

    /// Total unsold quantity across all open lots.
    #[must_use]
    pub fn open_quantity(&self) -> f64 {
        self.lots.iter().map(|lot| lot.remaining_quantity).sum()
    }

    /// Total remaining cost basis across all open lots.
    #[must_use]
    pub fn open_basis(&self) -> f64 {
        self.lots.iter().map(Lot::total_basis).sum()
    }

    /// Process a whole event stream, returning realized gains in emission
    /// order. Runs in O(events + lots-consumed): each sell only dequeues
    /// lots until it is satisfied or the queue is empty.
    pub fn process(&mut self, events: &[TradeEvent]) -> Vec<RealizedGain> {
        let mut realized = Vec::new();
        for event in events {
            realized.extend(self.apply(event));
        }
        realized
    }

    /// Apply a single event.
    ///
    /// A sell that exceeds total recorded buys silently discards the excess
    /// quantity: no error and no negative-inventory record. This is a
    /// deliberate allowance for incomplete trade histories, not a defect.
    pub fn apply(&mut self, event: &TradeEvent) -> Vec<RealizedGain> {
        match *event {
            TradeEvent::Buy {
                date,
                quantity,
                price,
            } => {
                self.on_buy(date, quantity, price);
                Vec::new()
            }
            TradeEvent::Split { extra_shares, .. } => {
                self.on_split(extra_shares);
                Vec::new()
            }
            TradeEvent::Sell {
                date,
                quantity,
                price,
            } => self.on_sell(date, quantity, price),
        }
    }

    /// Consume the book, yielding the surviving open lots in FIFO order.
    #[must_use]
    pub fn into_open_lots(self) -> Vec<Lot> {
        self.lots
            .into_iter()
            .filter(|lot| !lot.is_exhausted())
            .collect()
    }

    fn on_buy(&mut self, date: NaiveDate, quantity: f64, price: f64) {
        let sequence = self.date_sequence.entry(date).or_insert(0);
        let lot = Lot::open(
            LotId::new(&self.instrument, date, *sequence),
            self.instrument.clone(),
            date,
            price,
            quantity,
        );
        *sequence += 1;
        self.lots.push_back(lot);
    }

    /// Rescale every open lot so the share-count increase is reflected while
    /// each lot's total cost basis stays unchanged.
    fn on_split(&mut self, extra_shares: f64) {
        if extra_shares <= 0.0 || self.lots.is_empty() {
            return;
        }
        let pre_total = self.open_quantity();
        if pre_total <= 0.0 {
            return;
        }
        let ratio = 1.0 + extra_shares / pre_total;
        for lot in &mut self.lots {
            lot.remaining_quantity *= ratio;
            if ratio != 0.0 {
                lot.cost_basis_per_share /= ratio;
            }
        }
    }

    fn on_sell(&mut self, date: NaiveDate, quantity: f64, price: f64) -> Vec<RealizedGain> {
        let mut remaining_to_sell = quantity;
        let mut realized = Vec::new();

        while remaining_to_sell > QUANTITY_EPSILON {
            let Some(front) = self.lots.front_mut() else {
                // Oversold: the rest of the sell has nothing to match.
                break;
            };

            let matched = remaining_to_sell.min(front.remaining_quantity);
            if matched > QUANTITY_EPSILON {
                realized.push(RealizedGain::new(
                    self.instrument.clone(),
                    date,
                    front.purchase_date,
                    matched,
                    front.cost_basis_per_share,
                    price,
                ));
            }

            remaining_to_sell -= matched;
            front.remaining_quantity -= matched;
            if front.is_exhausted() {
                self.lots.pop_front();
            }
        }

        realized
    }
}
