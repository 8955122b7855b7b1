//! PortfolioState — cash plus the single open position.

use serde::{Deserialize, Serialize};

/// Entry snapshot, present exactly while a position is open.
///
/// Captured at buy time and never updated afterwards, so exit policies can
/// anchor against either the cost basis or the cash that was deployed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Close price the position was opened at.
    pub price: f64,
    /// Cash committed at entry (the full balance at that moment).
    pub deployed_cash: f64,
}

/// The engine's mutable book: cash and at most one long position.
///
/// `entry` is `Some` iff `position_size > 0` — flat and holding are the only
/// two states. All mutation goes through [`apply_buy`](Self::apply_buy) and
/// [`apply_sell`](Self::apply_sell), which preserve that pairing and the cash
/// conservation identities checked by the property tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioState {
    pub cash: f64,
    /// Units of the asset held; 0.0 while flat. Fractional sizes are normal.
    pub position_size: f64,
    pub entry: Option<Entry>,
}

impl PortfolioState {
    pub fn new(initial_cash: f64) -> Self {
        Self {
            cash: initial_cash,
            position_size: 0.0,
            entry: None,
        }
    }

    pub fn is_flat(&self) -> bool {
        self.position_size == 0.0
    }

    pub fn is_holding(&self) -> bool {
        !self.is_flat()
    }

    /// Market value of the held position at `close`.
    pub fn market_value(&self, close: f64) -> f64 {
        self.position_size * close
    }

    /// Cash plus position market value at `close`.
    pub fn equity(&self, close: f64) -> f64 {
        self.cash + self.market_value(close)
    }

    /// Cost basis of the open position, or 0.0 while flat.
    pub fn entry_value(&self) -> f64 {
        match self.entry {
            Some(entry) => self.position_size * entry.price,
            None => 0.0,
        }
    }

    /// Deploy the entire cash balance into a position at `close`.
    ///
    /// Returns the quantity bought. Cash is decremented by `quantity * close`
    /// rather than zeroed: that keeps `cash_after + quantity * close ==
    /// cash_before` exact in floating point, leaving at most a rounding ulp
    /// behind.
    pub fn apply_buy(&mut self, close: f64) -> f64 {
        debug_assert!(self.is_flat(), "buy while already holding");
        let deployed = self.cash;
        let quantity = deployed / close;
        self.position_size = quantity;
        self.entry = Some(Entry {
            price: close,
            deployed_cash: deployed,
        });
        self.cash -= quantity * close;
        quantity
    }

    /// Liquidate the whole position at `close`.
    ///
    /// Returns the quantity sold. Proceeds are `quantity * close`; the book
    /// returns to flat.
    pub fn apply_sell(&mut self, close: f64) -> f64 {
        debug_assert!(self.is_holding(), "sell while flat");
        let quantity = self.position_size;
        self.cash += quantity * close;
        self.position_size = 0.0;
        self.entry = None;
        quantity
    }
}
