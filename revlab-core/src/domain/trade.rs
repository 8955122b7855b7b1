//! TradeRecord and Ledger — the append-only trade tape.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// What a ledger entry records.
///
/// The cost-basis policy labels its exits `SellProfit` / `SellLoss`; the
/// deployed-cash policy records undifferentiated `Sell` exits. Entries are
/// always `Buy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeKind {
    Buy,
    Sell,
    SellProfit,
    SellLoss,
}

impl TradeKind {
    pub fn is_entry(&self) -> bool {
        matches!(self, TradeKind::Buy)
    }

    pub fn is_exit(&self) -> bool {
        !self.is_entry()
    }
}

/// One executed simulated trade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub date: NaiveDate,
    pub kind: TradeKind,
    /// Close price the trade executed at.
    pub price: f64,
    /// Units of the asset transacted.
    pub quantity: f64,
}

impl TradeRecord {
    /// Cash moved by this record: negative for a buy, positive for a sell.
    pub fn cash_flow(&self) -> f64 {
        let gross = self.price * self.quantity;
        if self.kind.is_entry() {
            -gross
        } else {
            gross
        }
    }
}

/// Ordered, append-only sequence of executed trades.
///
/// Records can only be pushed, never mutated or removed, and dates never go
/// backwards. The engine pushes at most one record per bar, so in practice
/// dates are strictly increasing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    records: Vec<TradeRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record. Dates must be non-decreasing.
    pub fn push(&mut self, record: TradeRecord) {
        debug_assert!(
            self.records.last().map_or(true, |prev| prev.date <= record.date),
            "ledger dates must be non-decreasing"
        );
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&TradeRecord> {
        self.records.last()
    }

    pub fn as_slice(&self) -> &[TradeRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TradeRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a TradeRecord;
    type IntoIter = std::slice::Iter<'a, TradeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
