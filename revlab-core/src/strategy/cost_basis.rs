//! Cost-basis policy — exits measured against the position's entry cost.
//!
//! Take profit when the position is worth `take_profit_ratio` times its cost
//! basis, stop out at `stop_loss_ratio` times. Exits carry the
//! `SellProfit` / `SellLoss` labels so the ledger distinguishes them.

use crate::domain::{Bar, PortfolioState, TradeKind};

use super::DecisionPolicy;

/// The canonical policy: anchor exits to `position_size * entry_price`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostBasisPolicy {
    /// Entry trigger as a fraction of the average (e.g., 0.9 buys 10% below).
    pub buy_discount: f64,
    /// Profit exit when position value reaches this multiple of cost basis.
    pub take_profit_ratio: f64,
    /// Loss exit when position value falls to this multiple of cost basis.
    pub stop_loss_ratio: f64,
}

impl CostBasisPolicy {
    pub fn new(buy_discount: f64, take_profit_ratio: f64, stop_loss_ratio: f64) -> Self {
        assert!(
            buy_discount > 0.0 && buy_discount < 1.0,
            "buy_discount must be in (0, 1)"
        );
        assert!(take_profit_ratio > 1.0, "take_profit_ratio must be > 1");
        assert!(
            stop_loss_ratio > 0.0 && stop_loss_ratio < 1.0,
            "stop_loss_ratio must be in (0, 1)"
        );
        Self {
            buy_discount,
            take_profit_ratio,
            stop_loss_ratio,
        }
    }
}

impl DecisionPolicy for CostBasisPolicy {
    fn name(&self) -> &str {
        "cost_basis"
    }

    fn should_enter(&self, bar: &Bar) -> bool {
        // Strict: touching the discounted average is not a dip below it.
        bar.close < bar.sma * self.buy_discount
    }

    fn check_exit(&self, bar: &Bar, portfolio: &PortfolioState) -> Option<TradeKind> {
        if portfolio.is_flat() {
            return None;
        }
        let value = portfolio.market_value(bar.close);
        let basis = portfolio.entry_value();
        if value >= basis * self.take_profit_ratio {
            Some(TradeKind::SellProfit)
        } else if value <= basis * self.stop_loss_ratio {
            Some(TradeKind::SellLoss)
        } else {
            None
        }
    }
}
