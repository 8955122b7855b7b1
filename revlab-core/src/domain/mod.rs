//! Domain types — bars, portfolio state, and the trade ledger.
//!
//! Everything here is plain data: no I/O, no logging, no clocks. The engine
//! owns all mutation and does it through the narrow `apply_*` methods on
//! [`PortfolioState`] and [`Ledger::push`].

pub mod bar;
pub mod portfolio;
pub mod trade;

pub use bar::Bar;
pub use portfolio::{Entry, PortfolioState};
pub use trade::{Ledger, TradeKind, TradeRecord};
