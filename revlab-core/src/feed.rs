//! Feed — turns a raw close series into engine-ready bars.
//!
//! Two stages: [`PriceSeries`] validates the raw dates/closes once, then
//! [`SmaFeed`] computes the trailing average over the whole series and emits
//! only the bars the engine should replay. Computing over the whole series
//! before clipping means history earlier than the replay start still seeds
//! the window, so the first replayed bar already carries a full-window
//! average.

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::Bar;
use crate::indicators::Sma;

/// Structured error types for series validation.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("price series is empty")]
    Empty,

    #[error("dates and closes differ in length: {dates} vs {closes}")]
    LengthMismatch { dates: usize, closes: usize },

    #[error("non-positive or non-finite close {close} at {date}")]
    BadClose { date: NaiveDate, close: f64 },

    #[error("dates must be strictly increasing: {date} follows {prev}")]
    DateOrder { prev: NaiveDate, date: NaiveDate },
}

/// A validated daily close-price series.
///
/// Construction is the single validation point: strictly increasing dates,
/// every close finite and positive, non-empty. Downstream code (indicators,
/// feed, engine) relies on these holding and never re-checks.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    dates: Vec<NaiveDate>,
    closes: Vec<f64>,
}

impl PriceSeries {
    pub fn new(dates: Vec<NaiveDate>, closes: Vec<f64>) -> Result<Self, FeedError> {
        if dates.len() != closes.len() {
            return Err(FeedError::LengthMismatch {
                dates: dates.len(),
                closes: closes.len(),
            });
        }
        if dates.is_empty() {
            return Err(FeedError::Empty);
        }
        for (i, (&date, &close)) in dates.iter().zip(&closes).enumerate() {
            if !(close.is_finite() && close > 0.0) {
                return Err(FeedError::BadClose { date, close });
            }
            if i > 0 && date <= dates[i - 1] {
                return Err(FeedError::DateOrder {
                    prev: dates[i - 1],
                    date,
                });
            }
        }
        Ok(Self { dates, closes })
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn closes(&self) -> &[f64] {
        &self.closes
    }

    pub fn first_date(&self) -> NaiveDate {
        self.dates[0]
    }

    pub fn last_date(&self) -> NaiveDate {
        self.dates[self.dates.len() - 1]
    }
}

/// Bar producer: close + trailing SMA, warmup and pre-start days filtered out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmaFeed {
    /// Trailing window length in bars. Must be >= 1.
    pub window: usize,
    /// First date to replay; earlier days only seed the average.
    pub start: Option<NaiveDate>,
}

impl Default for SmaFeed {
    /// The classic setup: a 100-day average, replaying the whole series.
    fn default() -> Self {
        Self {
            window: 100,
            start: None,
        }
    }
}

impl SmaFeed {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            start: None,
        }
    }

    /// Produce the engine's bar sequence: one bar per input day with a valid
    /// average, dated within the replay window.
    pub fn bars(&self, series: &PriceSeries) -> Vec<Bar> {
        let smas = Sma::new(self.window).compute(series.closes());
        let mut bars = Vec::new();
        for i in 0..series.len() {
            let sma = smas[i];
            if sma.is_nan() {
                continue;
            }
            let date = series.dates()[i];
            if let Some(start) = self.start {
                if date < start {
                    continue;
                }
            }
            bars.push(Bar {
                date,
                close: series.closes()[i],
                sma,
            });
        }
        bars
    }
}
