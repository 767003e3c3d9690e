//! Core types for taxlot
//!
//! This crate provides the capital-gains engine used throughout the taxlot
//! project:
//!
//! - [`TradeRecord`] / [`TradeKind`] - raw ingested activity rows
//! - [`TradeEvent`] - the typed, ordered event stream ([`build_events`])
//! - [`Lot`] / [`LotId`] - open cost-basis lots with deterministic ids
//! - [`LotBook`] - the FIFO matching and split-adjustment state machine
//! - [`RealizedGain`] / [`GainTerm`] - per-match realized gain records
//! - [`GainsSummary`] / [`CapitalGainsReport`] - aggregated results
//!
//! The engine is a pure function of its input: no I/O, no clocks, no shared
//! state between instruments. Display rounding lives in [`display`] and is
//! never applied to internal arithmetic.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use taxlot_core::{compute_capital_gains, GainTerm, TradeKind, TradeRecord};
//!
//! let records = vec![
//!     TradeRecord::new(TradeKind::Buy, "1/1/2022", "AAPL", 10.0, 10.0),
//!     TradeRecord::new(TradeKind::Split, "6/1/2022", "AAPL", 10.0, 0.0),
//!     TradeRecord::new(TradeKind::Sell, "1/10/2023", "AAPL", 15.0, 8.0),
//! ];
//!
//! let as_of = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
//! let report = compute_capital_gains(&records, as_of).unwrap();
//!
//! // The split doubled the lot to 20 shares at $5; selling 15 at $8
//! // realizes a long-term gain of $45 and leaves 5 shares open.
//! let gains = &report.gains["AAPL"];
//! assert_eq!(gains.len(), 1);
//! assert!((gains[0].gain_loss - 45.0).abs() < 1e-9);
//! assert_eq!(gains[0].gain_type, GainTerm::LongTerm);
//! assert_eq!(report.unsold_lots.len(), 1);
//! assert!((report.unsold_lots[0].remaining_quantity - 5.0).abs() < 1e-9);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Quantities within this margin of zero are treated as exhausted. Share
/// counts become non-integral after split rescaling, so exact zero checks
/// would leave dust lots at the front of the queue.
pub const QUANTITY_EPSILON: f64 = 1e-10;

pub mod date;
pub mod display;
pub mod engine;
pub mod event;
pub mod lot;
pub mod realized;
pub mod report;
pub mod summary;

pub use date::{parse_trade_date, DateParseError};
pub use display::{round_money, round_quantity, RenderedReport};
pub use engine::LotBook;
pub use event::{build_events, TradeEvent, TradeKind, TradeRecord};
pub use lot::{Lot, LotId};
pub use realized::{total_gain_loss, GainTerm, RealizedGain};
pub use report::{compute_capital_gains, CapitalGainsReport};
pub use summary::{summarize, GainsSummary};

// Re-export commonly used external types
pub use chrono::NaiveDate;
