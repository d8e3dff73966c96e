// =============================================================================
// Data providers: where bars and pre-computed decisions come from
// =============================================================================
//
// The engine never fetches anything.  Callers hand it data obtained through
// these traits; `JsonFileStore` is the file-backed implementation used by the
// batch binary and tests.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::snapshot::DecisionSnapshot;
use crate::types::PriceBar;

/// Inclusive calendar-date range; an open end is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |f| date >= f) && self.to.map_or(true, |t| date <= t)
    }
}

/// Source of ordered price history for a ticker.
pub trait PriceHistoryProvider: Send + Sync {
    /// Bars for `ticker` within `range`, oldest first.  Unknown tickers yield
    /// an empty vector.
    fn price_history(&self, ticker: &str, range: &DateRange) -> Result<Vec<PriceBar>>;
}

/// Source of pre-computed decision snapshots.
pub trait DecisionProvider: Send + Sync {
    fn decision(&self, ticker: &str) -> Result<Option<DecisionSnapshot>>;
}

/// Bars and snapshots loaded once from local JSON files.
///
/// Prices file: `{ "<ticker>": [ { "date": ..., "Open": ..., ... }, ... ] }`.
/// Decisions file: `[ { "ticker": ..., "votes": ..., "overall": ... }, ... ]`.
#[derive(Debug, Clone, Default)]
pub struct JsonFileStore {
    bars: BTreeMap<String, Vec<PriceBar>>,
    decisions: BTreeMap<String, DecisionSnapshot>,
}

impl JsonFileStore {
    /// Load prices (required) and decisions (optional).
    ///
    /// An unreadable decisions file is logged and skipped: every ticker then
    /// falls back to local ratings.
    pub fn load(prices_path: impl AsRef<Path>, decisions_path: Option<&Path>) -> Result<Self> {
        let prices_path = prices_path.as_ref();
        let content = std::fs::read_to_string(prices_path)
            .with_context(|| format!("failed to read prices from {}", prices_path.display()))?;
        let bars: BTreeMap<String, Vec<PriceBar>> = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse prices from {}", prices_path.display()))?;

        let decisions = match decisions_path.map(read_decisions) {
            Some(Ok(decisions)) => decisions,
            Some(Err(e)) => {
                warn!(error = %e, "Failed to load decisions, using local ratings only");
                Vec::new()
            }
            None => Vec::new(),
        };

        info!(
            tickers = bars.len(),
            decisions = decisions.len(),
            path = %prices_path.display(),
            "price store loaded"
        );

        Ok(Self::from_parts(bars, decisions))
    }

    /// Build a store from in-memory data.  Bars are sorted by time; a later
    /// snapshot for the same ticker replaces an earlier one.
    pub fn from_parts(
        mut bars: BTreeMap<String, Vec<PriceBar>>,
        decisions: Vec<DecisionSnapshot>,
    ) -> Self {
        for series in bars.values_mut() {
            series.sort_by_key(|b| b.date.sort_key());
        }
        let decisions = decisions.into_iter().map(|d| (d.ticker.clone(), d)).collect();
        Self { bars, decisions }
    }

    /// Tickers with price history, in ascending order.
    pub fn tickers(&self) -> Vec<String> {
        self.bars.keys().cloned().collect()
    }
}

fn read_decisions(path: &Path) -> Result<Vec<DecisionSnapshot>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read decisions from {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse decisions from {}", path.display()))
}

impl PriceHistoryProvider for JsonFileStore {
    fn price_history(&self, ticker: &str, range: &DateRange) -> Result<Vec<PriceBar>> {
        let bars: Vec<PriceBar> = self
            .bars
            .get(ticker)
            .map(|series| {
                series
                    .iter()
                    .filter(|b| range.contains(b.date.date()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        debug!(ticker, bars = bars.len(), "price history served");
        Ok(bars)
    }
}

impl DecisionProvider for JsonFileStore {
    fn decision(&self, ticker: &str) -> Result<Option<DecisionSnapshot>> {
        Ok(self.decisions.get(ticker).cloned())
    }
}
