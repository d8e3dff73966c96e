// =============================================================================
// Relative Strength Index (RSI): simple rolling window
// =============================================================================
//
// For every index i >= window the last `window` close-to-close deltas are
// recomputed from scratch:
//
//   gains    = Σ max(d, 0)          losses = Σ max(-d, 0)
//   avg_gain = gains / window       avg_loss = losses / window
//   RSI      = 100 - 100 / (1 + avg_gain / avg_loss)
//
// avg_loss == 0 gives exactly 100.  No Wilder smoothing: each window stands
// alone, so a value is reproducible from its own trailing window.
//
// Thresholds (see `signals::classifier`): RSI < 30 buy, RSI > 70 sell.
// =============================================================================

/// Default RSI look-back.
pub const DEFAULT_WINDOW: usize = 14;

/// RSI for the window of deltas ending at `closes[end]`.
fn rsi_at(closes: &[f64], end: usize, window: usize) -> Option<f64> {
    let mut gains = 0.0_f64;
    let mut losses = 0.0_f64;
    for j in end + 1 - window..=end {
        let delta = closes[j] - closes[j - 1];
        if !delta.is_finite() {
            return None;
        }
        if delta > 0.0 {
            gains += delta;
        } else {
            losses -= delta;
        }
    }

    let w = window as f64;
    let avg_gain = gains / w;
    let avg_loss = losses / w;

    let rsi = if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    };
    rsi.is_finite().then_some(rsi)
}

/// Index-aligned RSI series.
///
/// Indices `< window` are `None` (fewer than `window` deltas are available),
/// as is any index whose window of deltas touches a non-finite close.
pub fn rsi_series(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    (0..closes.len())
        .map(|i| {
            if window == 0 || i < window {
                None
            } else {
                rsi_at(closes, i, window)
            }
        })
        .collect()
}

/// Most recent RSI value.
pub fn rsi(closes: &[f64], window: usize) -> Option<f64> {
    if window == 0 || closes.len() <= window {
        return None;
    }
    rsi_at(closes, closes.len() - 1, window)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_empty_input() {
        assert!(rsi(&[], 14).is_none());
        assert!(rsi_series(&[], 14).is_empty());
    }

    #[test]
    fn rsi_window_zero() {
        assert!(rsi(&[1.0, 2.0, 3.0], 0).is_none());
    }

    #[test]
    fn rsi_insufficient_data() {
        // 14 closes => 13 deltas < 14.
        let closes: Vec<f64> = (1..=14).map(f64::from).collect();
        assert!(rsi(&closes, 14).is_none());
        assert!(rsi(&closes[..5], 14).is_none());
    }

    #[test]
    fn rsi_strictly_increasing_is_exactly_100() {
        let closes: Vec<f64> = (1..=15).map(f64::from).collect();
        assert_eq!(rsi(&closes, 14), Some(100.0));
    }

    #[test]
    fn rsi_flat_market_is_100() {
        // No losses at all => avg_loss == 0 => 100, even without gains.
        assert_eq!(rsi(&[100.0; 20], 14), Some(100.0));
    }

    #[test]
    fn rsi_all_losses_is_zero() {
        let closes: Vec<f64> = (1..=30).rev().map(f64::from).collect();
        for v in rsi_series(&closes, 14).into_iter().flatten() {
            assert!(v.abs() < 1e-10, "expected 0.0, got {v}");
        }
    }

    #[test]
    fn rsi_known_window() {
        // Deltas: +2, -1, +1, -2  => gains 3, losses 3 => RSI 50
        let closes = [10.0, 12.0, 11.0, 12.0, 10.0];
        let v = rsi(&closes, 4).unwrap();
        assert!((v - 50.0).abs() < 1e-10);
    }

    #[test]
    fn rsi_is_not_smoothed() {
        // A big early drop leaves the window entirely; only gains remain.
        let closes = [100.0, 50.0, 51.0, 52.0, 53.0];
        let series = rsi_series(&closes, 3);
        assert!(series[3].unwrap() < 100.0);
        assert_eq!(series[4], Some(100.0));
    }

    #[test]
    fn rsi_range_check() {
        let closes = [
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08, 45.89, 46.03,
            44.18, 44.22, 44.57, 43.42, 42.66, 43.13,
        ];
        let series = rsi_series(&closes, 14);
        assert_eq!(series.len(), closes.len());
        assert!(series[..14].iter().all(Option::is_none));
        for v in series.into_iter().flatten() {
            assert!((0.0..=100.0).contains(&v), "RSI {v} out of range");
        }
    }

    #[test]
    fn rsi_nan_in_window_is_missing() {
        let mut closes: Vec<f64> = (1..=20).map(f64::from).collect();
        closes[18] = f64::NAN;
        assert!(rsi(&closes, 14).is_none());
        let series = rsi_series(&closes, 14);
        assert!(series[17].is_some());
        assert!(series[18].is_none() && series[19].is_none());
    }

    #[test]
    fn scalar_matches_series_tail() {
        let closes = [5.0, 6.0, 5.5, 7.0, 6.5, 6.8, 7.2, 7.0, 6.9];
        assert_eq!(rsi(&closes, 4), *rsi_series(&closes, 4).last().unwrap());
    }
}
