//! Decision policies — the entry/exit rules the replay loop is generic over.
//!
//! A policy answers exactly two questions: "enter here?" while the book is
//! flat, and "exit here, and as what kind of sell?" while it is holding.
//! Everything else (sizing, cash accounting, the ledger) belongs to the
//! engine; policies stay pure predicates over a bar and the current book.

pub mod cost_basis;
pub mod deployed_cash;

pub use cost_basis::CostBasisPolicy;
pub use deployed_cash::DeployedCashPolicy;

use crate::domain::{Bar, PortfolioState, TradeKind};
use crate::engine::{ExitAnchor, StrategyConfig};

/// Trait for decision policies.
///
/// # Architecture invariant
/// Entry decisions never see portfolio state: a buy is triggered by the close
/// against its discounted average, nothing else. Exit decisions see the book
/// read-only — they pick a sell kind, the engine executes it.
pub trait DecisionPolicy: Send + Sync {
    /// Human-readable name (e.g., "cost_basis").
    fn name(&self) -> &str;

    /// Entry test, consulted only while flat.
    fn should_enter(&self, bar: &Bar) -> bool;

    /// Exit test, consulted only while holding.
    ///
    /// Returns the ledger kind for the sell, or `None` to keep holding.
    /// Take-profit is evaluated before stop-loss.
    fn check_exit(&self, bar: &Bar, portfolio: &PortfolioState) -> Option<TradeKind>;
}

/// Build the policy a config selects.
///
/// Infallible: the anchor selector is an enum and the thresholds are assumed
/// validated (the engine validates before calling).
pub fn build_policy(config: &StrategyConfig) -> Box<dyn DecisionPolicy> {
    match config.exit_anchor {
        ExitAnchor::CostBasis => Box::new(CostBasisPolicy::new(
            config.buy_discount,
            config.take_profit_ratio,
            config.stop_loss_ratio,
        )),
        ExitAnchor::DeployedCash => Box::new(DeployedCashPolicy::new(
            config.buy_discount,
            config.take_profit_ratio,
            config.stop_loss_ratio,
        )),
    }
}
