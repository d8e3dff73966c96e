// =============================================================================
// Technical Report: per-ticker detail view
// =============================================================================
//
// Assembles everything the detail page shows for one ticker:
//
//   1. Oscillator rows (RSI, %b, MACD histogram, SMA deviation), with snapshot
//      values preferred, local values otherwise.  The MACD histogram is only
//      ever taken from the snapshot.
//   2. Moving-average rows: one EMA and one SMA row per configured period,
//      each judged against the last close.
//   3. Ichimoku rows: price vs cloud, tenkan vs kijun, chikou vs price.
//   4. Summary: overall / oscillator / MA / Ichimoku composites.  With a
//      snapshot these come from the feed as published; without one they are
//      built locally from the rows above.
//
// A summary entry with no evidence at all stays `None` and renders "no data".
// =============================================================================

use anyhow::Context;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::Result;
use crate::indicators::{
    cloud_delta, ema, ichimoku_with, ma_deviation_pct, percent_b, rsi, sma, sma_deviation_pct,
    IchimokuLevels,
};
use crate::provider::{DateRange, DecisionProvider, PriceHistoryProvider};
use crate::runtime_config::EngineConfig;
use crate::signals::{
    average_score, composite_from_ratings, judge_chikou, judge_cloud, judge_ma, judge_oscillator,
    judge_tenkan_kijun, oscillator_delta, resolve_overall, tally, tally_ratings, threshold_label,
    Counts3, OscillatorRule, Rating3, VoteEntry,
};
use crate::snapshot::DecisionSnapshot;
use crate::types::{self, finite, BarTime, PriceBar};

/// Display text for a missing value or rating.
pub const NO_DATA: &str = "no data";

/// Format an optional number, rendering missing values as [`NO_DATA`].
pub fn display_value(v: Option<f64>, decimals: usize) -> String {
    match finite(v) {
        Some(x) => format!("{x:.decimals$}"),
        None => NO_DATA.to_string(),
    }
}

/// One line of a detail table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorRow {
    pub name: String,
    /// Current indicator value.
    pub value: Option<f64>,
    /// What the value is compared against, rendered for display.
    pub threshold: String,
    /// Signed distance to the threshold (percent for moving averages).
    pub delta: Option<f64>,
    pub action: Rating3,
}

/// Where the summary composites came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingSource {
    Feed,
    Local,
}

/// Headline composites.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub overall: Option<VoteEntry>,
    pub oscillator: Option<VoteEntry>,
    pub moving_average: Option<VoteEntry>,
    pub ichimoku: Option<VoteEntry>,
    pub source: RatingSource,
}

/// Full technical breakdown for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TechnicalReport {
    pub ticker: String,
    pub as_of: Option<BarTime>,
    pub last_close: Option<f64>,
    pub summary: Summary,
    /// Buy / neutral / sell counts behind the oscillator gauge.
    pub oscillator_counts: Option<Counts3>,
    pub oscillators: Vec<IndicatorRow>,
    pub moving_averages: Vec<IndicatorRow>,
    pub ichimoku: Option<IchimokuLevels>,
    pub ichimoku_rows: Vec<IndicatorRow>,
}

impl TechnicalReport {
    /// Build the report from `bars` (oldest first) and an optional snapshot.
    ///
    /// # Errors
    /// Only contract violations from the indicator layer; missing data never
    /// fails.
    pub fn build(
        ticker: &str,
        bars: &[PriceBar],
        snapshot: Option<&DecisionSnapshot>,
        config: &EngineConfig,
    ) -> Result<Self> {
        let closes = types::closes(bars);
        let highs = types::highs(bars);
        let lows = types::lows(bars);
        let last_close = types::last_close(bars);

        // ── 1. Oscillators ───────────────────────────────────────────────
        let oscillators: Vec<IndicatorRow> = OscillatorRule::ALL
            .iter()
            .map(|&rule| {
                let value = snapshot
                    .and_then(|s| s.values.get(rule))
                    .or_else(|| local_oscillator(rule, &closes, config));
                oscillator_row(rule, value)
            })
            .collect();

        // ── 2. Moving averages ───────────────────────────────────────────
        let moving_averages = moving_average_rows(&closes, last_close, &config.ma_periods);

        // ── 3. Ichimoku ──────────────────────────────────────────────────
        let ichimoku = ichimoku_with(&highs, &lows, &closes, config.ichimoku)?;
        let ichimoku_rows = ichimoku.as_ref().map(ichimoku_table).unwrap_or_default();

        // ── 4. Summary ───────────────────────────────────────────────────
        let (summary, oscillator_counts) = match snapshot {
            Some(s) => {
                let summary = Summary {
                    overall: Some(resolve_overall(Some(s.overall), || s.technical())),
                    oscillator: Some(s.technical()),
                    moving_average: s.votes.get("ma").copied(),
                    ichimoku: s.votes.get("ichimoku").copied(),
                    source: RatingSource::Feed,
                };
                (summary, tally(&s.votes, &config.gauge_key_refs()))
            }
            None => {
                let oscillator = group_composite(&oscillators);
                let moving_average = group_composite(&moving_averages);
                let ichimoku_vote = group_composite(&ichimoku_rows);
                let groups = [oscillator, moving_average, ichimoku_vote];
                let overall = groups.iter().any(Option::is_some).then(|| {
                    resolve_overall(None, || {
                        VoteEntry::from_score(average_score(groups.iter().flatten().map(|g| g.score)))
                    })
                });
                let summary = Summary {
                    overall,
                    oscillator,
                    moving_average,
                    ichimoku: ichimoku_vote,
                    source: RatingSource::Local,
                };
                let actions: Vec<Rating3> = oscillators.iter().map(|r| r.action).collect();
                (summary, tally_ratings(&actions))
            }
        };

        debug!(
            ticker,
            bars = bars.len(),
            source = ?summary.source,
            overall = ?summary.overall.map(|v| v.label),
            ichimoku = ichimoku.is_some(),
            "technical report built"
        );

        Ok(Self {
            ticker: ticker.to_string(),
            as_of: bars.last().map(|b| b.date.clone()),
            last_close,
            summary,
            oscillator_counts,
            oscillators,
            moving_averages,
            ichimoku,
            ichimoku_rows,
        })
    }
}

/// Fetch bars and the optional snapshot for `ticker`, then build its report.
///
/// Returns `Ok(None)` when the provider has no bars.  A failing decision
/// provider degrades to local ratings instead of failing the ticker.
pub fn evaluate_ticker(
    prices: &dyn PriceHistoryProvider,
    decisions: &dyn DecisionProvider,
    ticker: &str,
    range: &DateRange,
    config: &EngineConfig,
) -> anyhow::Result<Option<TechnicalReport>> {
    let bars = prices
        .price_history(ticker, range)
        .with_context(|| format!("failed to load price history for {ticker}"))?;
    if bars.is_empty() {
        warn!(ticker, "no price history, skipping");
        return Ok(None);
    }

    let snapshot = decisions.decision(ticker).unwrap_or_else(|e| {
        warn!(ticker, error = %e, "decision feed unavailable, using local ratings");
        None
    });

    let report = TechnicalReport::build(ticker, &bars, snapshot.as_ref(), config)?;
    Ok(Some(report))
}

// =============================================================================
// Row builders
// =============================================================================

fn local_oscillator(rule: OscillatorRule, closes: &[f64], config: &EngineConfig) -> Option<f64> {
    match rule {
        OscillatorRule::Rsi => rsi(closes, config.rsi_window),
        OscillatorRule::PercentB => percent_b(closes, config.bollinger_window, config.bollinger_k),
        OscillatorRule::SmaDeviation => sma_deviation_pct(closes, config.sma_dev_window),
        OscillatorRule::MacdHist => None,
    }
}

fn oscillator_row(rule: OscillatorRule, value: Option<f64>) -> IndicatorRow {
    let (a, b) = rule.delta_thresholds();
    IndicatorRow {
        name: rule.display_name().to_string(),
        value,
        threshold: threshold_label(a, b),
        delta: oscillator_delta(rule, value).map(|d| d.delta),
        action: judge_oscillator(rule, value),
    }
}

fn moving_average_rows(closes: &[f64], last_close: Option<f64>, periods: &[usize]) -> Vec<IndicatorRow> {
    periods
        .iter()
        .flat_map(|&p| [(format!("EMA({p})"), ema(closes, p)), (format!("SMA({p})"), sma(closes, p))])
        .map(|(name, ma)| IndicatorRow {
            name,
            value: ma,
            threshold: format!("close {}", display_value(last_close, 2)),
            delta: ma_deviation_pct(last_close, ma),
            action: judge_ma(last_close, ma),
        })
        .collect()
}

fn ichimoku_table(ichi: &IchimokuLevels) -> Vec<IndicatorRow> {
    let last = Some(ichi.last_close);
    vec![
        IndicatorRow {
            name: "Price vs Cloud".to_string(),
            value: last,
            threshold: format!(
                "cloud {} - {}",
                display_value(Some(ichi.cloud_bottom), 2),
                display_value(Some(ichi.cloud_top), 2)
            ),
            delta: cloud_delta(last, Some(ichi.cloud_top), Some(ichi.cloud_bottom)),
            action: judge_cloud(last, Some(ichi.cloud_top), Some(ichi.cloud_bottom)),
        },
        IndicatorRow {
            name: "Tenkan vs Kijun".to_string(),
            value: Some(ichi.tenkan_sen),
            threshold: format!("kijun {}", display_value(Some(ichi.kijun_sen), 2)),
            delta: Some(ichi.tenkan_sen - ichi.kijun_sen),
            action: judge_tenkan_kijun(Some(ichi.tenkan_sen), Some(ichi.kijun_sen)),
        },
        IndicatorRow {
            name: "Chikou vs Price".to_string(),
            value: ichi.chikou_span,
            threshold: format!("price {}", display_value(last, 2)),
            delta: ichi.chikou_span.map(|c| c - ichi.last_close),
            action: judge_chikou(ichi.chikou_span, last),
        },
    ]
}

/// Local composite of a table's verdicts; `None` when every row lacks data.
fn group_composite(rows: &[IndicatorRow]) -> Option<VoteEntry> {
    let actions: Vec<Rating3> = rows.iter().map(|r| r.action).collect();
    if actions.iter().all(|a| a.is_no_data()) {
        return None;
    }
    Some(composite_from_ratings(&actions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::{Rating5, Votes};
    use chrono::NaiveDate;

    /// Daily bars from a close series; high/low one unit around the close.
    fn bars_from(closes: &[f64]) -> Vec<PriceBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PriceBar {
                date: BarTime::Date(start + chrono::Days::new(i as u64)),
                ticker: None,
                open: Some(c),
                high: Some(c + 1.0),
                low: Some(c - 1.0),
                close: Some(c),
                volume: None,
            })
            .collect()
    }

    fn rising(n: usize) -> Vec<f64> {
        (1..=n).map(|i| 100.0 + i as f64).collect()
    }

    #[test]
    fn display_value_renders_no_data() {
        assert_eq!(display_value(None, 2), "no data");
        assert_eq!(display_value(Some(f64::NAN), 1), "no data");
        assert_eq!(display_value(Some(1.234), 1), "1.2");
    }

    #[test]
    fn short_history_reports_no_data() {
        let bars = bars_from(&[10.0, 11.0, 12.0]);
        let report = TechnicalReport::build("T", &bars, None, &EngineConfig::default()).unwrap();

        assert!(report.oscillators.iter().all(|r| r.action == Rating3::NoData));
        assert!(report.moving_averages.iter().all(|r| r.action == Rating3::NoData));
        assert!(report.ichimoku.is_none());
        assert!(report.ichimoku_rows.is_empty());
        assert_eq!(report.summary.overall, None);
        assert_eq!(report.summary.oscillator, None);
        assert_eq!(report.oscillator_counts, None);
        assert_eq!(report.last_close, Some(12.0));
    }

    #[test]
    fn rising_market_local_ratings() {
        let bars = bars_from(&rising(220));
        let report = TechnicalReport::build("T", &bars, None, &EngineConfig::default()).unwrap();

        assert_eq!(report.summary.source, RatingSource::Local);
        // 6 periods x (EMA, SMA)
        assert_eq!(report.moving_averages.len(), 12);
        assert!(report.moving_averages.iter().all(|r| r.action == Rating3::Buy));
        assert_eq!(report.summary.moving_average.unwrap().label, Rating5::Buy);

        let rsi_row = &report.oscillators[0];
        assert_eq!(rsi_row.value, Some(100.0));
        assert_eq!(rsi_row.action, Rating3::Sell);
        // MACD histogram is never computed locally.
        assert_eq!(report.oscillators[2].action, Rating3::NoData);

        let ichi = report.ichimoku.unwrap();
        assert!(ichi.cloud_top >= ichi.cloud_bottom);
        assert_eq!(report.ichimoku_rows[0].action, Rating3::Buy);
        assert_eq!(report.ichimoku_rows[1].action, Rating3::Buy);
        // The lagging close sits below today's price in a rising market.
        assert_eq!(report.ichimoku_rows[2].action, Rating3::Sell);
        assert!(report.summary.overall.is_some());
    }

    #[test]
    fn snapshot_ratings_take_precedence() {
        let bars = bars_from(&rising(60));
        let mut votes = Votes::new();
        votes.insert("rsi14", VoteEntry::from_score(-2));
        votes.insert("ma", VoteEntry::from_score(-1));
        let snapshot = DecisionSnapshot {
            ticker: "T".into(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            values: crate::snapshot::DecisionValues {
                rsi14: Some(75.0),
                macd_hist: Some(0.5),
                percent_b: None,
                sma25_dev_pct: None,
            },
            votes,
            overall: VoteEntry::from_score(2),
        };

        let report =
            TechnicalReport::build("T", &bars, Some(&snapshot), &EngineConfig::default()).unwrap();

        assert_eq!(report.summary.source, RatingSource::Feed);
        // Passed through even though local MA rows are all Buy.
        assert_eq!(report.summary.overall.unwrap().label, Rating5::StrongBuy);
        assert_eq!(report.summary.moving_average.unwrap().label, Rating5::Sell);
        assert_eq!(report.summary.oscillator.unwrap().label, Rating5::StrongSell);
        assert_eq!(report.summary.ichimoku, None);

        assert_eq!(report.oscillators[0].value, Some(75.0));
        assert_eq!(report.oscillators[2].action, Rating3::Buy);
        // %b missing from the feed falls back to the local value.
        assert!(report.oscillators[1].value.is_some());
    }

    #[test]
    fn oscillator_delta_uses_nearest_threshold() {
        let row = oscillator_row(OscillatorRule::Rsi, Some(50.0));
        assert_eq!(row.delta, Some(20.0));
        assert_eq!(row.threshold, "30.00 / 70.00");
        let missing = oscillator_row(OscillatorRule::Rsi, None);
        assert_eq!(missing.delta, None);
        assert_eq!(missing.action, Rating3::NoData);
    }

    #[test]
    fn evaluate_ticker_skips_empty_history() {
        let store = crate::provider::JsonFileStore::default();
        let out = evaluate_ticker(&store, &store, "NONE", &DateRange::all(), &EngineConfig::default())
            .unwrap();
        assert!(out.is_none());
    }
}
