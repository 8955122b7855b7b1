//! Backtest engine — config validation, the replay loop, and its result.
//!
//! The engine consumes feed bars (close + trailing average, already
//! validated) and replays them through a two-state machine:
//!
//! 1. Flat: consult the policy's entry test; a hit deploys the whole balance
//! 2. Holding: consult the exit test; a hit liquidates the position
//!
//! At most one transition per bar. A halt check ahead of each bar stops the
//! replay once a flat book has no cash left to ever re-enter.

pub mod config;
pub mod result;
pub mod run;

pub use config::{ExitAnchor, StrategyConfig};
pub use result::{final_value, BacktestResult};
pub use run::{run, run_with_policy};

use thiserror::Error;

/// Errors surfaced before the replay starts.
///
/// Both kinds are fatal and detected eagerly: once the loop takes its first
/// bar, no further failure is possible and the engine runs to completion.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },
}

impl EngineError {
    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}
