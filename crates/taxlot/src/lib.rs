//! taxlot - capital gains from brokerage activity exports.
//!
//! The heavy lifting lives in `taxlot-core` (FIFO lot engine),
//! `taxlot-importer` (CSV ingestion), and `taxlot-quotes` (price lookup).
//! This crate ties them into command-line tools; each command module can be
//! invoked by a thin wrapper binary.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cmd;
