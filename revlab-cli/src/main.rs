//! RevLab CLI — run and sweep commands.
//!
//! Commands:
//! - `run` — replay one strategy config over a CSV price file
//! - `sweep` — cross a parameter grid over the same file and rank by return

mod artifacts;
mod config;
mod loader;
mod sweep;

use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use revlab_core::domain::{Bar, Ledger};
use revlab_core::engine::{self, BacktestResult, ExitAnchor, StrategyConfig};
use revlab_core::feed::SmaFeed;

use crate::config::{FeedSection, RunFileConfig};

#[derive(Parser)]
#[command(
    name = "revlab",
    about = "RevLab CLI — mean-reversion backtesting engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay one strategy configuration over a CSV price file.
    Run {
        /// Path to a headered date,close CSV price file.
        #[arg(long)]
        prices: PathBuf,

        /// Path to a TOML run file ([strategy] and [feed] tables).
        #[arg(long)]
        config: Option<PathBuf>,

        /// Starting cash. Overrides the run file.
        #[arg(long)]
        initial_cash: Option<f64>,

        /// Entry threshold as a fraction of the average (e.g. 0.9).
        #[arg(long)]
        buy_discount: Option<f64>,

        /// Profit exit multiple (e.g. 1.1).
        #[arg(long)]
        take_profit: Option<f64>,

        /// Loss exit multiple (e.g. 0.95).
        #[arg(long)]
        stop_loss: Option<f64>,

        /// Exit anchor: cost_basis or deployed_cash.
        #[arg(long)]
        exit_anchor: Option<String>,

        /// Averaging window in bars. Overrides the run file.
        #[arg(long)]
        window: Option<usize>,

        /// First replayed date (YYYY-MM-DD). Earlier bars only seed the window.
        #[arg(long)]
        from: Option<String>,

        /// Print the executed trade tape.
        #[arg(long, default_value_t = false)]
        trades: bool,

        /// Directory to save config.json / result.json / trades.csv into.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Cross a parameter grid over one price file and rank by return.
    Sweep {
        /// Path to a headered date,close CSV price file.
        #[arg(long)]
        prices: PathBuf,

        /// Path to a TOML run file providing the base config.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Comma-separated entry thresholds to try (e.g. 0.85,0.9,0.95).
        #[arg(long, value_delimiter = ',')]
        buy_discounts: Vec<f64>,

        /// Comma-separated profit exit multiples to try.
        #[arg(long, value_delimiter = ',')]
        take_profits: Vec<f64>,

        /// Comma-separated loss exit multiples to try.
        #[arg(long, value_delimiter = ',')]
        stop_losses: Vec<f64>,

        /// Averaging window in bars. Overrides the run file.
        #[arg(long)]
        window: Option<usize>,

        /// First replayed date (YYYY-MM-DD).
        #[arg(long)]
        from: Option<String>,

        /// How many top rows to print.
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            prices,
            config,
            initial_cash,
            buy_discount,
            take_profit,
            stop_loss,
            exit_anchor,
            window,
            from,
            trades,
            output_dir,
        } => run_cmd(
            prices,
            config,
            initial_cash,
            buy_discount,
            take_profit,
            stop_loss,
            exit_anchor,
            window,
            from,
            trades,
            output_dir,
        ),
        Commands::Sweep {
            prices,
            config,
            buy_discounts,
            take_profits,
            stop_losses,
            window,
            from,
            top,
        } => sweep_cmd(
            prices,
            config,
            buy_discounts,
            take_profits,
            stop_losses,
            window,
            from,
            top,
        ),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_cmd(
    prices: PathBuf,
    config_path: Option<PathBuf>,
    initial_cash: Option<f64>,
    buy_discount: Option<f64>,
    take_profit: Option<f64>,
    stop_loss: Option<f64>,
    exit_anchor: Option<String>,
    window: Option<usize>,
    from: Option<String>,
    trades: bool,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    let file = load_run_file(config_path.as_deref())?;

    let strategy = apply_overrides(
        file.strategy,
        initial_cash,
        buy_discount,
        take_profit,
        stop_loss,
        exit_anchor.as_deref(),
    )?;
    let feed = build_feed(&file.feed, window, from.as_deref())?;

    let series = loader::load_price_series(&prices)?;
    let bars = feed.bars(&series);
    if bars.is_empty() {
        bail!(
            "price file yields no replayable bars (rows: {}, window: {})",
            series.len(),
            feed.window
        );
    }

    let result = engine::run(&bars, &strategy)?;

    print_summary(&result, &bars, &strategy);
    if trades {
        print_trades(&result.trades);
    }

    if let Some(dir) = output_dir {
        let run_dir = artifacts::save_artifacts(&result, &strategy, &dir)?;
        println!("Artifacts saved to: {}", run_dir.display());
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn sweep_cmd(
    prices: PathBuf,
    config_path: Option<PathBuf>,
    buy_discounts: Vec<f64>,
    take_profits: Vec<f64>,
    stop_losses: Vec<f64>,
    window: Option<usize>,
    from: Option<String>,
    top: usize,
) -> Result<()> {
    if buy_discounts.is_empty() && take_profits.is_empty() && stop_losses.is_empty() {
        bail!("at least one of --buy-discounts, --take-profits, --stop-losses is required");
    }

    let file = load_run_file(config_path.as_deref())?;
    let feed = build_feed(&file.feed, window, from.as_deref())?;

    let series = loader::load_price_series(&prices)?;
    let bars = feed.bars(&series);
    if bars.is_empty() {
        bail!(
            "price file yields no replayable bars (rows: {}, window: {})",
            series.len(),
            feed.window
        );
    }

    let grid = sweep::ParamGrid {
        buy_discounts,
        take_profit_ratios: take_profits,
        stop_loss_ratios: stop_losses,
    };

    println!(
        "Sweeping {} configurations over {} bars...",
        grid.size(),
        bars.len()
    );
    let rows = sweep::sweep(&bars, &file.strategy, &grid)?;
    print_sweep_table(&rows, top);

    Ok(())
}

fn load_run_file(path: Option<&Path>) -> Result<RunFileConfig> {
    match path {
        Some(path) => RunFileConfig::from_file(path),
        None => Ok(RunFileConfig::default()),
    }
}

/// Fold flag overrides into the file config. Flags win.
fn apply_overrides(
    mut strategy: StrategyConfig,
    initial_cash: Option<f64>,
    buy_discount: Option<f64>,
    take_profit: Option<f64>,
    stop_loss: Option<f64>,
    exit_anchor: Option<&str>,
) -> Result<StrategyConfig> {
    if let Some(cash) = initial_cash {
        strategy.initial_cash = cash;
    }
    if let Some(discount) = buy_discount {
        strategy.buy_discount = discount;
    }
    if let Some(ratio) = take_profit {
        strategy.take_profit_ratio = ratio;
    }
    if let Some(ratio) = stop_loss {
        strategy.stop_loss_ratio = ratio;
    }
    if let Some(anchor) = exit_anchor {
        strategy.exit_anchor = parse_anchor(anchor)?;
    }
    Ok(strategy)
}

fn parse_anchor(name: &str) -> Result<ExitAnchor> {
    match name {
        "cost_basis" => Ok(ExitAnchor::CostBasis),
        "deployed_cash" => Ok(ExitAnchor::DeployedCash),
        _ => bail!("unknown exit anchor '{name}'. Valid: cost_basis, deployed_cash"),
    }
}

/// Resolve feed settings: run file first, then flag overrides.
fn build_feed(section: &FeedSection, window: Option<usize>, from: Option<&str>) -> Result<SmaFeed> {
    let window = window.unwrap_or(section.window);
    if window == 0 {
        bail!("window must be >= 1");
    }

    let start = from
        .or(section.start.as_deref())
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()?;

    Ok(SmaFeed { window, start })
}

fn print_summary(result: &BacktestResult, bars: &[Bar], config: &StrategyConfig) {
    println!();
    println!("=== Backtest Result ===");
    if let (Some(first), Some(last)) = (bars.first(), bars.last()) {
        println!("Period:         {} to {}", first.date, last.date);
    }
    println!("Bars:           {}", result.bars_processed);
    println!("Trades:         {}", result.trades.len());
    println!();
    println!("--- Valuation ---");
    println!("Initial cash:   {:.2}", config.initial_cash);
    println!("Final cash:     {:.2}", result.final_cash);
    println!("Position:       {:.6}", result.final_position_size);
    println!("Final value:    {:.2}", result.final_value);
    println!("Return:         {:.2}%", result.return_pct());
    if result.halted_early {
        println!();
        println!(
            "WARNING: replay halted after {} of {} bars: flat book with no cash",
            result.bars_processed,
            bars.len()
        );
    }
    println!();
}

fn print_trades(trades: &Ledger) {
    if trades.is_empty() {
        println!("No trades executed.");
        println!();
        return;
    }

    println!("--- Trades ---");
    println!(
        "{:<12} {:<12} {:>12} {:>14}",
        "Date", "Kind", "Price", "Quantity"
    );
    println!("{}", "-".repeat(53));
    for t in trades {
        println!(
            "{:<12} {:<12} {:>12.4} {:>14.6}",
            t.date.to_string(),
            artifacts::kind_label(t.kind),
            t.price,
            t.quantity
        );
    }
    println!();
}

fn print_sweep_table(rows: &[sweep::SweepRow], top: usize) {
    println!();
    println!(
        "{:<10} {:<12} {:<10} {:>12} {:>10} {:>8}",
        "Discount", "TakeProfit", "StopLoss", "FinalValue", "Return", "Trades"
    );
    println!("{}", "-".repeat(67));
    for row in rows.iter().take(top) {
        println!(
            "{:<10.4} {:<12.4} {:<10.4} {:>12.2} {:>9.2}% {:>8}",
            row.config.buy_discount,
            row.config.take_profit_ratio,
            row.config.stop_loss_ratio,
            row.result.final_value,
            row.result.return_pct(),
            row.result.trades.len()
        );
    }
    println!();
    println!(
        "Showing top {} of {} configurations.",
        top.min(rows.len()),
        rows.len()
    );
}
