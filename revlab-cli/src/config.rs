//! Run file — TOML with `[strategy]` and `[feed]` tables.
//!
//! Both tables are optional; a missing table falls back to the classic
//! defaults (2000 starting cash, 100-day window). Dates travel as
//! `YYYY-MM-DD` strings and are parsed at the command layer, so a typo
//! surfaces as a flag-style error rather than a serde one.

use std::path::Path;

use anyhow::{Context, Result};
use revlab_core::engine::StrategyConfig;
use serde::{Deserialize, Serialize};

/// Contents of a run file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunFileConfig {
    /// Strategy tunables; validated by the engine, not here.
    #[serde(default)]
    pub strategy: StrategyConfig,

    /// Feed settings: averaging window and replay start.
    #[serde(default)]
    pub feed: FeedSection,
}

/// The `[feed]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedSection {
    /// Trailing average window in bars.
    #[serde(default = "default_window")]
    pub window: usize,

    /// First replayed date (`YYYY-MM-DD`); earlier bars only seed the window.
    #[serde(default)]
    pub start: Option<String>,
}

fn default_window() -> usize {
    100
}

impl Default for FeedSection {
    fn default() -> Self {
        Self {
            window: default_window(),
            start: None,
        }
    }
}

impl RunFileConfig {
    /// Load a run file from disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read run file: {}", path.display()))?;
        Self::from_toml(&content)
    }

    /// Parse a run file from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("failed to parse run file TOML")
    }
}
