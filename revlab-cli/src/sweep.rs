//! Parameter sweep — grid expansion and parallel ranked execution.

use anyhow::Result;
use rayon::prelude::*;
use revlab_core::domain::Bar;
use revlab_core::engine::{run, BacktestResult, StrategyConfig};

/// Parameter grid specification.
///
/// Each axis lists the values to try; the grid is their cross product. An
/// empty axis holds the base config's value, so sweeping a single knob does
/// not require spelling out the other two.
#[derive(Debug, Clone, Default)]
pub struct ParamGrid {
    /// Entry thresholds to test
    pub buy_discounts: Vec<f64>,

    /// Profit exit multiples to test
    pub take_profit_ratios: Vec<f64>,

    /// Loss exit multiples to test
    pub stop_loss_ratios: Vec<f64>,
}

fn axis(values: &[f64], base: f64) -> Vec<f64> {
    if values.is_empty() {
        vec![base]
    } else {
        values.to_vec()
    }
}

impl ParamGrid {
    /// Returns the total number of configurations in this grid.
    pub fn size(&self) -> usize {
        self.buy_discounts.len().max(1)
            * self.take_profit_ratios.len().max(1)
            * self.stop_loss_ratios.len().max(1)
    }

    /// Generates all configurations in the grid, overriding the base per axis.
    ///
    /// No domain filtering happens here; an out-of-range value surfaces as a
    /// config error when its run starts.
    pub fn configs(&self, base: &StrategyConfig) -> Vec<StrategyConfig> {
        let discounts = axis(&self.buy_discounts, base.buy_discount);
        let profits = axis(&self.take_profit_ratios, base.take_profit_ratio);
        let losses = axis(&self.stop_loss_ratios, base.stop_loss_ratio);

        let mut configs = Vec::with_capacity(self.size());
        for &buy_discount in &discounts {
            for &take_profit_ratio in &profits {
                for &stop_loss_ratio in &losses {
                    let mut config = base.clone();
                    config.buy_discount = buy_discount;
                    config.take_profit_ratio = take_profit_ratio;
                    config.stop_loss_ratio = stop_loss_ratio;

                    configs.push(config);
                }
            }
        }

        configs
    }
}

/// One completed grid point, ready for ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepRow {
    pub config: StrategyConfig,
    pub result: BacktestResult,
}

/// Run every grid point against the same bar sequence, in parallel.
///
/// Rows come back sorted by return ratio, best first. Any invalid config
/// fails the whole sweep rather than producing a partial ranking.
pub fn sweep(bars: &[Bar], base: &StrategyConfig, grid: &ParamGrid) -> Result<Vec<SweepRow>> {
    let configs = grid.configs(base);

    let mut rows: Vec<SweepRow> = configs
        .into_par_iter()
        .map(|config| {
            let result = run(bars, &config)?;
            Ok(SweepRow { config, result })
        })
        .collect::<Result<Vec<_>>>()?;

    rows.sort_by(|a, b| {
        b.result
            .return_ratio
            .partial_cmp(&a.result.return_ratio)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(rows)
}
