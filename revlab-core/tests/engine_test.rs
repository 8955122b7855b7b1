//! Integration tests for the replay loop.
//!
//! Tests:
//! 1. Entry threshold: strict inequality against the discounted average
//! 2. Round trips: take-profit and stop-loss at exact band boundaries
//! 3. Valuation: last input close, flat or holding, ledger intact
//! 4. Validation taxonomy: InvalidConfig vs InvalidInput, checked eagerly
//! 5. Anchor modes: cost-basis vs deployed-cash labels and equivalence
//! 6. Feed-to-engine pipeline on a hand-computed series

use chrono::NaiveDate;
use revlab_core::domain::{Bar, TradeKind};
use revlab_core::engine::{run, BacktestResult, EngineError, ExitAnchor, StrategyConfig};
use revlab_core::feed::{PriceSeries, SmaFeed};

/// Helper: bar on a January 2024 day.
fn bar(day: u32, close: f64, sma: f64) -> Bar {
    Bar {
        date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
        close,
        sma,
    }
}

/// Helper: the classic thresholds over 1000 starting cash.
///
/// Entry below 90% of the average; exits at +10% / -5% of cost basis.
fn config() -> StrategyConfig {
    StrategyConfig {
        initial_cash: 1_000.0,
        buy_discount: 0.9,
        take_profit_ratio: 1.1,
        stop_loss_ratio: 0.95,
        exit_anchor: ExitAnchor::CostBasis,
    }
}

fn run_ok(bars: &[Bar], config: &StrategyConfig) -> BacktestResult {
    run(bars, config).expect("run should succeed")
}

// ──────────────────────────────────────────────
// Entry threshold
// ──────────────────────────────────────────────

#[test]
fn quiet_series_trades_nothing() {
    // Every close sits at or above the discounted average.
    let bars = [
        bar(2, 100.0, 100.0),
        bar(3, 95.0, 100.0),
        bar(4, 90.0, 100.0), // exactly at sma * 0.9: no entry
    ];
    let result = run_ok(&bars, &config());

    assert!(result.trades.is_empty());
    assert_eq!(result.final_cash, 1_000.0);
    assert_eq!(result.final_position_size, 0.0);
    assert_eq!(result.final_value, 1_000.0);
    assert_eq!(result.return_ratio, 1.0);
    assert_eq!(result.bars_processed, 3);
    assert!(!result.halted_early);
}

#[test]
fn dip_below_discounted_average_buys_with_all_cash() {
    let bars = [bar(2, 100.0, 100.0), bar(3, 80.0, 100.0)];
    let result = run_ok(&bars, &config());

    assert_eq!(result.trades.len(), 1);
    let buy = result.trades.last().unwrap();
    assert_eq!(buy.kind, TradeKind::Buy);
    assert_eq!(buy.date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
    assert_eq!(buy.price, 80.0);
    assert!((buy.quantity - 12.5).abs() < 1e-10);

    // Full deployment: remaining cash plus position cost recovers the
    // starting balance exactly.
    assert_eq!(result.final_cash + buy.quantity * 80.0, 1_000.0);
    assert!(result.ended_holding());
}

#[test]
fn one_buy_per_dip_no_pyramiding() {
    // Three consecutive cheap bars: only the first can buy, the book is
    // holding afterwards and inside the exit band.
    let bars = [
        bar(2, 80.0, 100.0),
        bar(3, 80.0, 100.0),
        bar(4, 80.0, 100.0),
    ];
    let result = run_ok(&bars, &config());

    assert_eq!(result.trades.len(), 1);
    assert_eq!(result.trades.last().unwrap().kind, TradeKind::Buy);
}

// ──────────────────────────────────────────────
// Round trips at exact band boundaries
// ──────────────────────────────────────────────

#[test]
fn take_profit_round_trip_multiplies_cash() {
    // Buy at 80 (12.5 units, basis 1000); 88 puts the position at exactly
    // basis * 1.1, and >= fires the profit exit.
    let bars = [
        bar(2, 80.0, 100.0),
        bar(3, 88.0, 100.0),
        bar(4, 200.0, 100.0), // flat afterwards, close irrelevant to cash
    ];
    let result = run_ok(&bars, &config());

    assert_eq!(result.trades.len(), 2);
    let kinds: Vec<TradeKind> = result.trades.iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![TradeKind::Buy, TradeKind::SellProfit]);

    assert!((result.final_cash - 1_100.0).abs() < 1e-9);
    assert_eq!(result.final_position_size, 0.0);
    // Flat book: the final close marks nothing.
    assert_eq!(result.final_value, result.final_cash);
    assert!((result.return_ratio - 1.1).abs() < 1e-9);
}

#[test]
fn stop_loss_round_trip_shrinks_cash() {
    // Buy at 80; 76 puts the position at exactly basis * 0.95.
    let bars = [bar(2, 80.0, 100.0), bar(3, 76.0, 100.0)];
    let result = run_ok(&bars, &config());

    let kinds: Vec<TradeKind> = result.trades.iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![TradeKind::Buy, TradeKind::SellLoss]);
    assert!((result.final_cash - 950.0).abs() < 1e-9);
    assert!((result.return_ratio - 0.95).abs() < 1e-9);
}

#[test]
fn inside_the_band_keeps_holding() {
    // Between 76 and 88 after an 80 entry, nothing fires.
    let bars = [
        bar(2, 80.0, 100.0),
        bar(3, 84.0, 100.0),
        bar(4, 87.9, 100.0),
        bar(5, 76.1, 100.0),
    ];
    let result = run_ok(&bars, &config());

    assert_eq!(result.trades.len(), 1);
    assert!(result.ended_holding());
}

#[test]
fn round_trips_compound_multiplicatively() {
    // Two full take-profit cycles: 1000 -> 1100 -> 1210.
    let bars = [
        bar(2, 80.0, 100.0),   // buy: 12.5 units
        bar(3, 88.0, 100.0),   // +10%: cash 1100
        bar(8, 80.0, 100.0),   // buy: 13.75 units
        bar(9, 88.0, 100.0),   // +10%: cash 1210
    ];
    let result = run_ok(&bars, &config());

    assert_eq!(result.trades.len(), 4);
    let kinds: Vec<TradeKind> = result.trades.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TradeKind::Buy,
            TradeKind::SellProfit,
            TradeKind::Buy,
            TradeKind::SellProfit,
        ]
    );
    assert!((result.final_cash - 1_210.0).abs() < 1e-9);
    assert!((result.return_ratio - 1.21).abs() < 1e-9);
}

// ──────────────────────────────────────────────
// Terminal valuation
// ──────────────────────────────────────────────

#[test]
fn open_position_marks_against_last_close() {
    let bars = [
        bar(2, 80.0, 100.0),  // buy 12.5 units
        bar(3, 84.0, 100.0),  // inside the band
    ];
    let result = run_ok(&bars, &config());

    assert!(result.ended_holding());
    let expected = result.final_cash + result.final_position_size * 84.0;
    assert_eq!(result.final_value, expected);
    assert!((result.final_value - 1_050.0).abs() < 1e-9);
    assert!((result.return_ratio - 1.05).abs() < 1e-9);
}

#[test]
fn ledger_preserves_execution_order_and_prices() {
    let bars = [
        bar(2, 100.0, 100.0),
        bar(3, 80.0, 100.0),
        bar(4, 76.0, 100.0),
        bar(5, 60.0, 100.0), // re-entry after the stop
    ];
    let result = run_ok(&bars, &config());

    let dates: Vec<NaiveDate> = result.trades.iter().map(|t| t.date).collect();
    let mut sorted = dates.clone();
    sorted.sort();
    assert_eq!(dates, sorted);

    let prices: Vec<f64> = result.trades.iter().map(|t| t.price).collect();
    assert_eq!(prices, vec![80.0, 76.0, 60.0]);
}

// ──────────────────────────────────────────────
// Validation taxonomy
// ──────────────────────────────────────────────

#[test]
fn bad_config_fails_before_any_bar() {
    let bars = [bar(2, 80.0, 100.0)];
    let config = StrategyConfig {
        take_profit_ratio: 0.9,
        ..config()
    };
    let err = run(&bars, &config).unwrap_err();
    assert!(
        matches!(&err, EngineError::InvalidConfig { reason } if reason.contains("take_profit_ratio")),
        "{err}"
    );
}

#[test]
fn empty_bar_sequence_is_invalid_input() {
    let err = run(&[], &config()).unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput { .. }), "{err}");
}

#[test]
fn non_finite_sma_is_invalid_input() {
    let bars = [bar(2, 100.0, 100.0), bar(3, 100.0, f64::NAN)];
    let err = run(&bars, &config()).unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput { .. }), "{err}");
}

#[test]
fn duplicate_and_backwards_dates_are_invalid_input() {
    let duplicated = [bar(2, 100.0, 100.0), bar(2, 101.0, 100.0)];
    assert!(matches!(
        run(&duplicated, &config()).unwrap_err(),
        EngineError::InvalidInput { .. }
    ));

    let backwards = [bar(5, 100.0, 100.0), bar(2, 101.0, 100.0)];
    assert!(matches!(
        run(&backwards, &config()).unwrap_err(),
        EngineError::InvalidInput { .. }
    ));
}

#[test]
fn config_errors_take_precedence_over_input_errors() {
    // Both are broken; the config check runs first.
    let config = StrategyConfig {
        initial_cash: -5.0,
        ..config()
    };
    let err = run(&[], &config).unwrap_err();
    assert!(matches!(err, EngineError::InvalidConfig { .. }), "{err}");
}

// ──────────────────────────────────────────────
// Anchor modes
// ──────────────────────────────────────────────

#[test]
fn deployed_cash_mode_emits_plain_sells() {
    let config = StrategyConfig {
        exit_anchor: ExitAnchor::DeployedCash,
        ..config()
    };
    let profit = [bar(2, 80.0, 100.0), bar(3, 88.0, 100.0)];
    let result = run_ok(&profit, &config);
    let kinds: Vec<TradeKind> = result.trades.iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![TradeKind::Buy, TradeKind::Sell]);

    let loss = [bar(2, 80.0, 100.0), bar(3, 76.0, 100.0)];
    let result = run_ok(&loss, &config);
    let kinds: Vec<TradeKind> = result.trades.iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![TradeKind::Buy, TradeKind::Sell]);
}

#[test]
fn anchor_modes_agree_under_full_deployment() {
    // Full-cash entries make cost basis and deployed cash the same number,
    // so both modes trade the same bars and end with the same value.
    let bars = [
        bar(2, 100.0, 100.0),
        bar(3, 80.0, 100.0),
        bar(4, 85.0, 100.0),
        bar(5, 88.0, 100.0),
        bar(6, 70.0, 100.0),
        bar(7, 66.0, 100.0),
        bar(8, 90.0, 100.0),
    ];
    let cost_basis = run_ok(&bars, &config());
    let deployed = run_ok(
        &bars,
        &StrategyConfig {
            exit_anchor: ExitAnchor::DeployedCash,
            ..config()
        },
    );

    assert_eq!(cost_basis.trades.len(), deployed.trades.len());
    let dates_a: Vec<NaiveDate> = cost_basis.trades.iter().map(|t| t.date).collect();
    let dates_b: Vec<NaiveDate> = deployed.trades.iter().map(|t| t.date).collect();
    assert_eq!(dates_a, dates_b);
    assert!((cost_basis.final_value - deployed.final_value).abs() < 1e-9);
}

// ──────────────────────────────────────────────
// Feed-to-engine pipeline
// ──────────────────────────────────────────────

#[test]
fn pipeline_from_raw_closes_to_ledger() {
    // Two-day average, hand-computed:
    //   day 1: 100        (warmup, filtered out)
    //   day 2: 100  sma 100   no entry
    //   day 3:  80  sma  90   80 < 81: buy 12.5 units at 80
    //   day 4:  96  sma  88   value 1200 >= 1100: take profit
    //   day 5: 150  sma 123   150 > 110.7: no entry
    let dates: Vec<NaiveDate> = (1..=5)
        .map(|d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap())
        .collect();
    let closes = vec![100.0, 100.0, 80.0, 96.0, 150.0];
    let series = PriceSeries::new(dates, closes).unwrap();
    let bars = SmaFeed::new(2).bars(&series);
    assert_eq!(bars.len(), 4);

    let result = run_ok(&bars, &config());

    let kinds: Vec<TradeKind> = result.trades.iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![TradeKind::Buy, TradeKind::SellProfit]);
    assert_eq!(result.bars_processed, 4);
    assert!((result.final_cash - 1_200.0).abs() < 1e-9);
    assert!((result.return_ratio - 1.2).abs() < 1e-9);
}

#[test]
fn same_input_same_result() {
    // Determinism: byte-for-byte identical output across runs.
    let bars = [
        bar(2, 80.0, 100.0),
        bar(3, 88.0, 100.0),
        bar(4, 70.0, 100.0),
        bar(5, 84.0, 100.0),
    ];
    let first = run_ok(&bars, &config());
    let second = run_ok(&bars, &config());
    assert_eq!(first, second);
}
