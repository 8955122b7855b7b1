//! BacktestResult — everything a run hands back to the caller.
//!
//! The engine never prints or logs; this struct (plus the error type) is its
//! entire output surface. Reporting is the caller's business.

use serde::{Deserialize, Serialize};

use crate::domain::Ledger;

/// Final valuation and the full trade tape of one replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Cash balance after the last processed bar.
    pub final_cash: f64,
    /// Units still held at the end; 0.0 when the run ended flat.
    pub final_position_size: f64,
    /// `final_cash + final_position_size * last_close`, where `last_close`
    /// is the last bar of the input sequence even if the replay halted early.
    pub final_value: f64,
    /// `final_value / initial_cash`.
    pub return_ratio: f64,
    /// Bars actually replayed; less than the input length iff `halted_early`.
    pub bars_processed: usize,
    /// Whether the dead-capital halt ended the replay before the last bar.
    pub halted_early: bool,
    /// Every executed trade, in execution order.
    pub trades: Ledger,
}

impl BacktestResult {
    /// Return as a signed percentage (+20.5 means up 20.5%).
    pub fn return_pct(&self) -> f64 {
        (self.return_ratio - 1.0) * 100.0
    }

    /// Whether the run ended with an open position.
    pub fn ended_holding(&self) -> bool {
        self.final_position_size > 0.0
    }
}

/// Mark a terminal state to market.
///
/// Pure and idempotent: recomputing from the result's own fields returns the
/// result's own `final_value`, bit for bit.
pub fn final_value(cash: f64, position_size: f64, last_close: f64) -> f64 {
    cash + position_size * last_close
}
