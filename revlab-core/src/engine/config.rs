//! StrategyConfig — run tunables, their domains, and the config hash.

use serde::{Deserialize, Serialize};

use super::EngineError;

/// Which base value the exit ratios multiply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitAnchor {
    /// Cost basis of the open position (`position_size * entry_price`).
    /// Exits are labeled `sell_profit` / `sell_loss`.
    #[default]
    CostBasis,
    /// Cash deployed at entry. Exits are undifferentiated `sell` records.
    DeployedCash,
}

/// Tunables for a single backtest run.
///
/// Every field has a documented domain; [`validate`](Self::validate) checks
/// them all and reports the first violation. The engine validates before
/// touching any bar, so a bad config can never produce a partial ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Starting cash. Must be finite and > 0.
    pub initial_cash: f64,
    /// Entry trigger: buy when `close < sma * buy_discount`. Must be in (0, 1).
    pub buy_discount: f64,
    /// Profit exit when position value reaches this multiple of the anchor.
    /// Must be > 1.
    pub take_profit_ratio: f64,
    /// Loss exit when position value falls to this multiple of the anchor.
    /// Must be in (0, 1).
    pub stop_loss_ratio: f64,
    /// Exit anchor selection; cost basis is the canonical mode.
    #[serde(default)]
    pub exit_anchor: ExitAnchor,
}

impl Default for StrategyConfig {
    /// The classic parameter set: buy 10% below the average, take profit at
    /// +10% on cost basis, stop out at -5%.
    fn default() -> Self {
        Self {
            initial_cash: 2_000.0,
            buy_discount: 0.9,
            take_profit_ratio: 1.1,
            stop_loss_ratio: 0.95,
            exit_anchor: ExitAnchor::CostBasis,
        }
    }
}

impl StrategyConfig {
    /// Check every tunable against its domain.
    ///
    /// Reports parameter name, required domain, and the offending value, so
    /// the message is actionable without a debugger.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(self.initial_cash.is_finite() && self.initial_cash > 0.0) {
            return Err(EngineError::invalid_config(format!(
                "initial_cash must be finite and > 0, got {}",
                self.initial_cash
            )));
        }
        if !(self.buy_discount.is_finite()
            && self.buy_discount > 0.0
            && self.buy_discount < 1.0)
        {
            return Err(EngineError::invalid_config(format!(
                "buy_discount must be in (0, 1), got {}",
                self.buy_discount
            )));
        }
        if !(self.take_profit_ratio.is_finite() && self.take_profit_ratio > 1.0) {
            return Err(EngineError::invalid_config(format!(
                "take_profit_ratio must be > 1, got {}",
                self.take_profit_ratio
            )));
        }
        if !(self.stop_loss_ratio.is_finite()
            && self.stop_loss_ratio > 0.0
            && self.stop_loss_ratio < 1.0)
        {
            return Err(EngineError::invalid_config(format!(
                "stop_loss_ratio must be in (0, 1), got {}",
                self.stop_loss_ratio
            )));
        }
        Ok(())
    }

    /// Deterministic identity: blake3 over the canonical JSON serialization.
    ///
    /// Two configs hash equal iff every tunable (anchor mode included) is
    /// equal, which is what run artifacts are keyed by.
    pub fn config_hash(&self) -> String {
        let canonical =
            serde_json::to_string(self).expect("StrategyConfig serialization cannot fail");
        blake3::hash(canonical.as_bytes()).to_hex().to_string()
    }
}
