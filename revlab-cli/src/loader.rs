//! CSV price loading — `date,close` rows into a validated series.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use revlab_core::feed::PriceSeries;
use serde::Deserialize;

/// One row of the input file. Columns beyond `date` and `close` are ignored.
#[derive(Debug, Deserialize)]
struct PriceRow {
    date: NaiveDate,
    close: f64,
}

/// Read a headered `date,close` CSV into a validated price series.
///
/// Dates must be `YYYY-MM-DD`. Ordering and close sanity are enforced by
/// [`PriceSeries::new`], so a bad file fails before any bar is produced.
pub fn load_price_series(path: &Path) -> Result<PriceSeries> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open price file: {}", path.display()))?;

    let mut dates = Vec::new();
    let mut closes = Vec::new();
    for row in reader.deserialize() {
        let row: PriceRow = row.context("failed to parse price row")?;
        dates.push(row.date);
        closes.push(row.close);
    }

    PriceSeries::new(dates, closes)
        .with_context(|| format!("invalid price series in {}", path.display()))
}
