//! Bar — one trading day as the engine sees it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily close plus its trailing simple moving average.
///
/// The feed layer guarantees the `sma` is already valid (never NaN) for every
/// bar handed to the engine; warmup days are filtered out upstream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub close: f64,
    pub sma: f64,
}

impl Bar {
    /// Basic sanity check: both prices finite and strictly positive.
    pub fn is_sane(&self) -> bool {
        self.close.is_finite() && self.close > 0.0 && self.sma.is_finite() && self.sma > 0.0
    }
}
