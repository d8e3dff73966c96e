// =============================================================================
// Decision Snapshot: pre-computed feed records and list-wide rows
// =============================================================================
//
// The market-data service can publish an already-aggregated decision per
// ticker: raw oscillator values, per-rule votes and an overall vote.  When a
// snapshot is available its votes and overall rating take precedence over
// anything computed locally; they are passed through, never recomputed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::signals::{technical_composite, OscillatorRule, Rating5, VoteEntry, Votes};
use crate::types::finite;

/// Raw oscillator readings published with a decision.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionValues {
    #[serde(default)]
    pub rsi14: Option<f64>,
    #[serde(default)]
    pub macd_hist: Option<f64>,
    #[serde(default)]
    pub percent_b: Option<f64>,
    #[serde(default)]
    pub sma25_dev_pct: Option<f64>,
}

impl DecisionValues {
    /// Reading for `rule`, with non-finite values reported as missing.
    pub fn get(&self, rule: OscillatorRule) -> Option<f64> {
        finite(match rule {
            OscillatorRule::Rsi => self.rsi14,
            OscillatorRule::PercentB => self.percent_b,
            OscillatorRule::MacdHist => self.macd_hist,
            OscillatorRule::SmaDeviation => self.sma25_dev_pct,
        })
    }
}

/// One ticker's pre-computed decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionSnapshot {
    pub ticker: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub values: DecisionValues,
    #[serde(default)]
    pub votes: Votes,
    pub overall: VoteEntry,
}

impl DecisionSnapshot {
    /// Oscillator composite built from the snapshot's own per-rule votes.
    pub fn technical(&self) -> VoteEntry {
        technical_composite(&self.votes)
    }

    /// Label of a group vote (`ma`, `ichimoku`, ...), if published.
    pub fn group_label(&self, key: &str) -> Option<Rating5> {
        self.votes.get(key).map(|v| v.label)
    }
}

/// One row of the list-wide technical table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechRow {
    pub ticker: String,
    pub date: NaiveDate,
    pub rsi14: Option<f64>,
    pub macd_hist: Option<f64>,
    pub bb_percent_b: Option<f64>,
    pub sma25_dev_pct: Option<f64>,
    pub tech_rating: Rating5,
    pub ma_rating: Rating5,
    pub ichimoku_rating: Rating5,
    pub overall_rating: Rating5,
}

impl TechRow {
    /// Flatten a snapshot.  Missing group votes read as Neutral in the list.
    pub fn from_snapshot(s: &DecisionSnapshot) -> Self {
        Self {
            ticker: s.ticker.clone(),
            date: s.date,
            rsi14: s.values.get(OscillatorRule::Rsi),
            macd_hist: s.values.get(OscillatorRule::MacdHist),
            bb_percent_b: s.values.get(OscillatorRule::PercentB),
            sma25_dev_pct: s.values.get(OscillatorRule::SmaDeviation),
            tech_rating: s.technical().label,
            ma_rating: s.group_label("ma").unwrap_or(Rating5::Neutral),
            ichimoku_rating: s.group_label("ichimoku").unwrap_or(Rating5::Neutral),
            overall_rating: s.overall.label,
        }
    }
}

/// Rating columns of [`TechRow`] available for sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingColumn {
    Overall,
    Technical,
    MovingAverage,
    Ichimoku,
}

impl RatingColumn {
    fn of(self, row: &TechRow) -> Rating5 {
        match self {
            Self::Overall => row.overall_rating,
            Self::Technical => row.tech_rating,
            Self::MovingAverage => row.ma_rating,
            Self::Ichimoku => row.ichimoku_rating,
        }
    }
}

/// Convert a batch of snapshots into list rows, ordered by ticker.
pub fn tech_rows(snapshots: &[DecisionSnapshot]) -> Vec<TechRow> {
    let mut rows: Vec<TechRow> = snapshots.iter().map(TechRow::from_snapshot).collect();
    rows.sort_by(|a, b| a.ticker.cmp(&b.ticker));
    rows
}

/// Stable sort by a rating column, bullish first when `descending`.
pub fn sort_by_rating(rows: &mut [TechRow], column: RatingColumn, descending: bool) {
    rows.sort_by(|a, b| {
        let ord = column.of(a).cmp(&column.of(b));
        if descending {
            ord.reverse()
        } else {
            ord
        }
    });
}
