// =============================================================================
// Signals Module
// =============================================================================
//
// Turns indicator values into discrete verdicts:
// - Rating vocabularies (three-level rule verdicts, five-level composites)
// - Threshold classifier (one value -> Buy / Neutral / Sell / NoData)
// - Vote aggregation (named votes -> composite five-level rating)
// - Proximity helper (signed distance to the nearest threshold)

pub mod classifier;
pub mod proximity;
pub mod rating;
pub mod votes;

pub use classifier::{
    judge_chikou, judge_cloud, judge_ma, judge_oscillator, judge_tenkan_kijun, OscillatorRule,
};
pub use proximity::{nearest_delta, oscillator_delta, threshold_label, NearestDelta};
pub use rating::{Rating3, Rating5};
pub use votes::{
    average_score, composite, composite_from_ratings, resolve_overall, tally, tally_ratings,
    technical_composite, Counts3, VoteEntry, Votes,
};
