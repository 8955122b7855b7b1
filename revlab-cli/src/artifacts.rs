//! Artifact export — JSON and CSV renderings of a finished run.
//!
//! Two string exporters plus a bundle writer:
//! - **JSON**: full `BacktestResult` round-trip serialization
//! - **CSV**: the executed trade tape for external analysis tools
//!
//! Bundles land in a directory keyed by the config hash, so re-running the
//! same parameters overwrites the same artifacts instead of piling up copies.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use revlab_core::domain::{Ledger, TradeKind};
use revlab_core::engine::{BacktestResult, StrategyConfig};

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `BacktestResult` to pretty JSON.
pub fn export_json(result: &BacktestResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize BacktestResult to JSON")
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Wire label for a trade kind, matching the JSON serialization.
pub fn kind_label(kind: TradeKind) -> &'static str {
    match kind {
        TradeKind::Buy => "buy",
        TradeKind::Sell => "sell",
        TradeKind::SellProfit => "sell_profit",
        TradeKind::SellLoss => "sell_loss",
    }
}

/// Export the trade tape as CSV.
///
/// Columns: date, kind, price, quantity
pub fn export_trades_csv(trades: &Ledger) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["date", "kind", "price", "quantity"])?;

    for t in trades {
        wtr.write_record([
            &t.date.to_string(),
            &kind_label(t.kind).to_string(),
            &format!("{:.6}", t.price),
            &format!("{:.6}", t.quantity),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the artifact set for a single run.
///
/// Creates a directory named `run_{hash}/` under `output_dir` (first eight
/// hex digits of the config hash) containing:
/// - `config.json` — the exact `StrategyConfig` that produced the run
/// - `result.json` — the full `BacktestResult`
/// - `trades.csv` — the executed trade tape
///
/// Returns the path to the created directory.
pub fn save_artifacts(
    result: &BacktestResult,
    config: &StrategyConfig,
    output_dir: &Path,
) -> Result<PathBuf> {
    let hash = config.config_hash();
    let run_dir = output_dir.join(format!("run_{}", &hash[..8]));
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    let config_json =
        serde_json::to_string_pretty(config).context("failed to serialize StrategyConfig")?;
    std::fs::write(run_dir.join("config.json"), &config_json)?;

    let json = export_json(result)?;
    std::fs::write(run_dir.join("result.json"), &json)?;

    let trades_csv = export_trades_csv(&result.trades)?;
    std::fs::write(run_dir.join("trades.csv"), &trades_csv)?;

    Ok(run_dir)
}
