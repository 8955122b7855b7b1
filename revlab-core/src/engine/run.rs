//! The replay loop — a sequential fold over the bar sequence.
//!
//! One run executes in four steps:
//! 1. Validate the config (fail before touching any bar)
//! 2. Validate the bar sequence (sane prices, strictly increasing dates)
//! 3. Replay the two-state machine, at most one transition per bar
//! 4. Mark the terminal state against the input's last close

use crate::domain::{Bar, Ledger, PortfolioState, TradeKind, TradeRecord};
use crate::strategy::{build_policy, DecisionPolicy};

use super::result::{final_value, BacktestResult};
use super::{EngineError, StrategyConfig};

/// Run a backtest over prevalidated feed bars.
///
/// This is the main entry point. Validation is eager: a config or input
/// error returns before any bar is processed, so a failed run can never
/// leave a partial ledger behind.
pub fn run(bars: &[Bar], config: &StrategyConfig) -> Result<BacktestResult, EngineError> {
    config.validate()?;
    let policy = build_policy(config);
    run_with_policy(bars, config.initial_cash, policy.as_ref())
}

/// Run under an explicit decision policy.
///
/// The polymorphism seam: [`run`] builds its policy from the config's anchor
/// selection and lands here; callers with their own [`DecisionPolicy`] can
/// plug in directly. `initial_cash` must be finite and positive, and `bars`
/// must satisfy the feed contract.
pub fn run_with_policy(
    bars: &[Bar],
    initial_cash: f64,
    policy: &dyn DecisionPolicy,
) -> Result<BacktestResult, EngineError> {
    if !(initial_cash.is_finite() && initial_cash > 0.0) {
        return Err(EngineError::invalid_config(format!(
            "initial_cash must be finite and > 0, got {initial_cash}"
        )));
    }
    validate_bars(bars)?;
    Ok(replay(bars, PortfolioState::new(initial_cash), policy))
}

/// Check the feed contract: non-empty, strictly increasing dates, every
/// close and average finite and positive.
fn validate_bars(bars: &[Bar]) -> Result<(), EngineError> {
    if bars.is_empty() {
        return Err(EngineError::invalid_input("bar sequence is empty"));
    }
    for (i, bar) in bars.iter().enumerate() {
        if !bar.is_sane() {
            return Err(EngineError::invalid_input(format!(
                "bar {i} ({}): close {} and sma {} must be finite and > 0",
                bar.date, bar.close, bar.sma
            )));
        }
        if i > 0 && bar.date <= bars[i - 1].date {
            return Err(EngineError::invalid_input(format!(
                "bar dates must be strictly increasing: {} follows {}",
                bar.date,
                bars[i - 1].date
            )));
        }
    }
    Ok(())
}

/// The fold itself. Callers guarantee `bars` is non-empty and validated.
///
/// Taking the starting book explicitly keeps the halt branch testable: via
/// the public entry points the starting cash is always positive and every
/// sell deposits positive proceeds, so a flat-and-drained book cannot arise.
/// The guard is the terminal condition for any future sizing scheme that
/// does not return the whole balance.
fn replay(
    bars: &[Bar],
    mut portfolio: PortfolioState,
    policy: &dyn DecisionPolicy,
) -> BacktestResult {
    debug_assert!(!bars.is_empty());
    let initial_cash = portfolio.cash;

    let mut ledger = Ledger::new();
    let mut bars_processed = 0;
    let mut halted_early = false;

    for bar in bars {
        // ─── Halt check: dead capital ───
        // A flat book with nothing to deploy can never trade again; the
        // rest of the series is irrelevant.
        if portfolio.is_flat() && portfolio.cash <= 0.0 {
            halted_early = true;
            break;
        }

        // ─── Transition: at most one per bar ───
        if portfolio.is_flat() {
            if policy.should_enter(bar) {
                let quantity = portfolio.apply_buy(bar.close);
                ledger.push(TradeRecord {
                    date: bar.date,
                    kind: TradeKind::Buy,
                    price: bar.close,
                    quantity,
                });
            }
        } else if let Some(kind) = policy.check_exit(bar, &portfolio) {
            let quantity = portfolio.apply_sell(bar.close);
            ledger.push(TradeRecord {
                date: bar.date,
                kind,
                price: bar.close,
                quantity,
            });
        }

        bars_processed += 1;
    }

    // ─── Terminal valuation ───
    // Always against the last close of the *input* sequence, even when the
    // halt fired before reaching it.
    let last_close = bars[bars.len() - 1].close;
    let value = final_value(portfolio.cash, portfolio.position_size, last_close);

    BacktestResult {
        final_cash: portfolio.cash,
        final_position_size: portfolio.position_size,
        final_value: value,
        return_ratio: value / initial_cash,
        bars_processed,
        halted_early,
        trades: ledger,
    }
}
