// =============================================================================
// Proximity helper: signed distance to the nearest decision threshold
// =============================================================================
//
// Display aid only: it says how far past (or short of) a boundary a value
// sits, and never changes a verdict.  Pair it with the classifier's own
// constants (`OscillatorRule::delta_thresholds`).

use serde::{Deserialize, Serialize};

use super::classifier::OscillatorRule;
use crate::types::finite;

/// Result of [`nearest_delta`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NearestDelta {
    /// First threshold as supplied.
    pub a: f64,
    /// Second threshold, if one was supplied.
    pub b: Option<f64>,
    /// The threshold the delta is measured against.
    pub chosen: f64,
    /// `value - chosen`.
    pub delta: f64,
}

impl NearestDelta {
    /// `"30.00 / 70.00"` for a pair, `"30.00"` for a single threshold.
    pub fn reference_label(&self) -> String {
        threshold_label(self.a, self.b)
    }
}

/// Render one or two thresholds with two decimals.
pub fn threshold_label(a: f64, b: Option<f64>) -> String {
    match b {
        Some(b) => format!("{a:.2} / {b:.2}"),
        None => format!("{a:.2}"),
    }
}

/// Signed distance from `value` to whichever threshold is nearer.
///
/// `None` when `value` or `a` is not finite.  A non-finite `b` is ignored.
/// When `value` is equidistant from both, `a` wins.
pub fn nearest_delta(value: f64, a: f64, b: Option<f64>) -> Option<NearestDelta> {
    if !value.is_finite() || !a.is_finite() {
        return None;
    }
    let b = finite(b);
    let chosen = match b {
        Some(b) if (value - b).abs() < (value - a).abs() => b,
        _ => a,
    };
    Some(NearestDelta {
        a,
        b,
        chosen,
        delta: value - chosen,
    })
}

/// `nearest_delta` against an oscillator's thresholds; `None` for missing input.
pub fn oscillator_delta(rule: OscillatorRule, value: Option<f64>) -> Option<NearestDelta> {
    let (a, b) = rule.delta_thresholds();
    nearest_delta(finite(value)?, a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_threshold() {
        let d = nearest_delta(0.3, 0.0, None).unwrap();
        assert_eq!(d.chosen, 0.0);
        assert!((d.delta - 0.3).abs() < 1e-12);
        assert_eq!(d.reference_label(), "0.00");
    }

    #[test]
    fn picks_nearer_threshold() {
        assert_eq!(nearest_delta(25.0, 30.0, Some(70.0)).unwrap().delta, -5.0);
        assert_eq!(nearest_delta(80.0, 30.0, Some(70.0)).unwrap().delta, 10.0);
        assert_eq!(nearest_delta(65.0, 30.0, Some(70.0)).unwrap().chosen, 70.0);
    }

    #[test]
    fn tie_goes_to_first_threshold() {
        let d = nearest_delta(50.0, 30.0, Some(70.0)).unwrap();
        assert_eq!(d.chosen, 30.0);
        assert_eq!(d.delta, 20.0);
        assert_eq!(d.reference_label(), "30.00 / 70.00");
    }

    #[test]
    fn non_finite_second_threshold_ignored() {
        let d = nearest_delta(50.0, 30.0, Some(f64::NAN)).unwrap();
        assert_eq!(d.b, None);
        assert_eq!(d.delta, 20.0);
    }

    #[test]
    fn non_finite_value_has_no_delta() {
        assert_eq!(nearest_delta(f64::NAN, 30.0, Some(70.0)), None);
        assert_eq!(nearest_delta(f64::INFINITY, 30.0, None), None);
        assert_eq!(nearest_delta(50.0, f64::NAN, Some(70.0)), None);
    }

    #[test]
    fn oscillator_delta_uses_rule_constants() {
        let d = oscillator_delta(OscillatorRule::SmaDeviation, Some(-3.0)).unwrap();
        assert_eq!(d.chosen, -2.0);
        assert_eq!(d.delta, -1.0);
        assert!(oscillator_delta(OscillatorRule::Rsi, None).is_none());
    }
}
