// =============================================================================
// Vote Aggregator: composite ratings from per-rule votes
// =============================================================================
//
// Each named rule contributes a `VoteEntry` (integer score in -2..=2 plus its
// five-level label).  A composite is built by:
//
//   1. selecting the requested keys that carry a score,
//   2. averaging those scores,
//   3. clamping the mean to [-2, 2],
//   4. rounding half away from zero (`f64::round`),
//   5. mapping the integer to a `Rating5`.
//
// No present score at all gives Neutral: absence of evidence is not a
// missing composite.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::rating::{Rating3, Rating5};

/// Vote keys of the oscillator family.
pub const TECH_KEYS: [&str; 4] = ["rsi14", "percent_b", "macd_hist", "sma25_dev_pct"];

/// Group keys combined into the overall rating.
pub const OVERALL_KEYS: [&str; 3] = ["tech", "ma", "ichimoku"];

/// One rule's contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteEntry {
    pub score: i32,
    pub label: Rating5,
}

impl VoteEntry {
    /// Build an entry from a raw score, clamping it into -2..=2 first.
    pub fn from_score(score: i32) -> Self {
        let score = score.clamp(-2, 2);
        Self {
            score,
            label: Rating5::from_score(score),
        }
    }

    pub fn neutral() -> Self {
        Self::from_score(0)
    }
}

/// Named votes, keyed by rule (`rsi14`, `ma`, `ichimoku`, ...).
///
/// Feeds may send `null` for a rule they could not evaluate; such entries are
/// dropped on deserialization so that "present" always means "has a score".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Votes(BTreeMap<String, VoteEntry>);

impl<'de> Deserialize<'de> for Votes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Option<VoteEntry>>::deserialize(deserializer)?;
        Ok(Self(raw.into_iter().filter_map(|(k, v)| Some((k, v?))).collect()))
    }
}

impl Votes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, entry: VoteEntry) {
        self.0.insert(key.into(), entry);
    }

    pub fn get(&self, key: &str) -> Option<&VoteEntry> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &VoteEntry)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, VoteEntry)> for Votes {
    fn from_iter<I: IntoIterator<Item = (K, VoteEntry)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Average, clamp and round a set of scores.  Empty input scores 0.
pub fn average_score(scores: impl IntoIterator<Item = i32>) -> i32 {
    let (sum, n) = scores
        .into_iter()
        .fold((0_i64, 0_u32), |(s, n), x| (s + i64::from(x), n + 1));
    if n == 0 {
        return 0;
    }
    let mean = sum as f64 / f64::from(n);
    mean.clamp(-2.0, 2.0).round() as i32
}

/// Composite over the given keys of `votes`.
pub fn composite(votes: &Votes, keys: &[&str]) -> VoteEntry {
    let scores = keys.iter().filter_map(|k| votes.get(k)).map(|v| v.score);
    VoteEntry::from_score(average_score(scores))
}

/// Technical (oscillator) composite from RSI, %b, MACD histogram and SMA deviation.
pub fn technical_composite(votes: &Votes) -> VoteEntry {
    composite(votes, &TECH_KEYS)
}

/// Composite of locally evaluated rule verdicts; `NoData` verdicts are skipped.
pub fn composite_from_ratings(ratings: &[Rating3]) -> VoteEntry {
    VoteEntry::from_score(average_score(ratings.iter().filter_map(|r| r.vote_score())))
}

/// Use the feed's pre-aggregated entry when there is one; otherwise compute.
///
/// A feed value is passed through untouched, even if a local recomputation
/// would disagree.
pub fn resolve_overall(feed: Option<VoteEntry>, local: impl FnOnce() -> VoteEntry) -> VoteEntry {
    feed.unwrap_or_else(local)
}

/// Buy / neutral / sell counts for a gauge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts3 {
    pub buy: u32,
    pub neutral: u32,
    pub sell: u32,
}

/// Count present keys after collapsing each label to three levels.
///
/// `None` when none of `keys` is present.
pub fn tally(votes: &Votes, keys: &[&str]) -> Option<Counts3> {
    let mut counts = Counts3::default();
    let mut seen = false;
    for entry in keys.iter().filter_map(|k| votes.get(k)) {
        seen = true;
        match entry.label.to_three() {
            Rating3::Buy => counts.buy += 1,
            Rating3::Sell => counts.sell += 1,
            _ => counts.neutral += 1,
        }
    }
    seen.then_some(counts)
}

/// Counts of locally evaluated verdicts; `NoData` is not counted.
pub fn tally_ratings(ratings: &[Rating3]) -> Option<Counts3> {
    let mut counts = Counts3::default();
    let mut seen = false;
    for r in ratings {
        match r {
            Rating3::Buy => counts.buy += 1,
            Rating3::Neutral => counts.neutral += 1,
            Rating3::Sell => counts.sell += 1,
            Rating3::NoData => continue,
        }
        seen = true;
    }
    seen.then_some(counts)
}
