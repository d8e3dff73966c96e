// =============================================================================
// Rating vocabularies
// =============================================================================
//
// Two closed vocabularies:
//   - `Rating3`: the verdict of a single threshold rule, with an explicit
//     `NoData` variant kept separate from `Neutral`.
//   - `Rating5`: composite verdicts, mapped from an integer score in -2..=2.
//
// The upstream decision feed labels ratings in Japanese; those spellings are
// accepted as serde aliases so snapshots deserialize directly.

use serde::{Deserialize, Serialize};

/// Verdict of one threshold rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rating3 {
    #[serde(alias = "買い")]
    Buy,
    #[serde(alias = "中立")]
    Neutral,
    #[serde(alias = "売り")]
    Sell,
    #[serde(alias = "データなし")]
    NoData,
}

impl Rating3 {
    /// Vote contributed by this verdict; `NoData` contributes nothing.
    pub fn vote_score(self) -> Option<i32> {
        match self {
            Self::Buy => Some(1),
            Self::Neutral => Some(0),
            Self::Sell => Some(-1),
            Self::NoData => None,
        }
    }

    pub fn is_no_data(self) -> bool {
        self == Self::NoData
    }
}

impl std::fmt::Display for Rating3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "Buy"),
            Self::Neutral => write!(f, "Neutral"),
            Self::Sell => write!(f, "Sell"),
            Self::NoData => write!(f, "no data"),
        }
    }
}

/// Composite five-level verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rating5 {
    #[serde(alias = "強い買い")]
    StrongBuy,
    #[serde(alias = "買い")]
    Buy,
    #[serde(alias = "中立")]
    Neutral,
    #[serde(alias = "売り")]
    Sell,
    #[serde(alias = "強い売り")]
    StrongSell,
}

impl Rating5 {
    /// Map an integer score to a label: `>= 2` strong buy, `<= -2` strong sell.
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= 2 => Self::StrongBuy,
            1 => Self::Buy,
            0 => Self::Neutral,
            -1 => Self::Sell,
            _ => Self::StrongSell,
        }
    }

    pub fn score(self) -> i32 {
        match self {
            Self::StrongBuy => 2,
            Self::Buy => 1,
            Self::Neutral => 0,
            Self::Sell => -1,
            Self::StrongSell => -2,
        }
    }

    /// Collapse to the three-level gauge vocabulary.
    pub fn to_three(self) -> Rating3 {
        match self {
            Self::StrongBuy | Self::Buy => Rating3::Buy,
            Self::Neutral => Rating3::Neutral,
            Self::Sell | Self::StrongSell => Rating3::Sell,
        }
    }
}

impl PartialOrd for Rating5 {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Bearish to bullish: `StrongSell < Sell < Neutral < Buy < StrongBuy`.
impl Ord for Rating5 {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.score().cmp(&other.score())
    }
}

impl std::fmt::Display for Rating5 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StrongBuy => write!(f, "Strong Buy"),
            Self::Buy => write!(f, "Buy"),
            Self::Neutral => write!(f, "Neutral"),
            Self::Sell => write!(f, "Sell"),
            Self::StrongSell => write!(f, "Strong Sell"),
        }
    }
}
