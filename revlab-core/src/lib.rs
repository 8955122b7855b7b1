//! RevLab Core — deterministic single-asset SMA-reversion backtesting.
//!
//! This crate contains the heart of the simulator:
//! - Domain types (bars, portfolio state, the trade ledger)
//! - Price-series validation and the SMA feed
//! - Decision policies behind one trait (cost-basis and deployed-cash exits)
//! - The two-state replay loop with eager validation
//!
//! The core is silent and deterministic: no I/O, no logging, no clocks, no
//! randomness. Given the same bars and config it produces the same result,
//! ledger included. Reporting belongs to callers (the CLI).

pub mod domain;
pub mod engine;
pub mod feed;
pub mod indicators;
pub mod strategy;
