//! Deployed-cash policy — exits measured against the cash spent at entry.
//!
//! Same entry rule as the cost-basis policy; the exit bands multiply the
//! cash that was deployed when the position opened, not the position's cost
//! basis. Under full-cash deployment the two anchors coincide. Exits are
//! recorded as plain `Sell` — this variant does not label profit vs loss.

use crate::domain::{Bar, PortfolioState, TradeKind};

use super::DecisionPolicy;

/// Alternate policy: anchor exits to `Entry::deployed_cash`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeployedCashPolicy {
    /// Entry trigger as a fraction of the average.
    pub buy_discount: f64,
    /// Profit exit when position value reaches this multiple of deployed cash.
    pub take_profit_ratio: f64,
    /// Loss exit when position value falls to this multiple of deployed cash.
    pub stop_loss_ratio: f64,
}

impl DeployedCashPolicy {
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

impl DecisionPolicy for DeployedCashPolicy {
    fn name(&self) -> &str {
        "deployed_cash"
    }

    fn should_enter(&self, bar: &Bar) -> bool {
        bar.close < bar.sma * self.buy_discount
    }

    fn check_exit(&self, bar: &Bar, portfolio: &PortfolioState) -> Option<TradeKind> {
        // The anchor is frozen at entry time. Comparing against the running
        // cash balance instead would compare against ~0 after a full
        // deployment and trip the stop on the very next bar.
        let anchor = portfolio.entry?.deployed_cash;
        let value = portfolio.market_value(bar.close);
        if value >= anchor * self.take_profit_ratio || value <= anchor * self.stop_loss_ratio {
            Some(TradeKind::Sell)
        } else {
            None
        }
    }
}
