// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Middle band = SMA(window), upper/lower = middle ± k·σ where σ is the
// population standard deviation of the same window.  %b places the latest
// value inside the band: 0 = lower band, 1 = upper band.

use serde::{Deserialize, Serialize};

use super::sma::{window_mean, window_std_dev};

/// Default look-back for the bands and %b.
pub const DEFAULT_WINDOW: usize = 20;
/// Default band width in standard deviations.
pub const DEFAULT_K: f64 = 2.0;

/// Result of a Bollinger Band calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

fn bands_for_window(window: &[f64], k: f64) -> Option<BollingerBands> {
    let middle = window_mean(window)?;
    let sd = window_std_dev(window, middle)?;
    let upper = middle + k * sd;
    let lower = middle - k * sd;
    if !(upper.is_finite() && lower.is_finite()) {
        return None;
    }
    Some(BollingerBands { upper, middle, lower })
}

/// Bands over the last `window` values.
///
/// All three bands are missing together whenever the middle band is.  For
/// `k >= 0` the result always satisfies `upper >= middle >= lower`.
pub fn bollinger_bands(series: &[f64], window: usize, k: f64) -> Option<BollingerBands> {
    if window == 0 || series.len() < window {
        return None;
    }
    bands_for_window(&series[series.len() - window..], k)
}

/// Index-aligned band series for chart overlays.
pub fn bollinger_series(series: &[f64], window: usize, k: f64) -> Vec<Option<BollingerBands>> {
    if window == 0 {
        return vec![None; series.len()];
    }
    (0..series.len())
        .map(|i| {
            if i + 1 < window {
                None
            } else {
                bands_for_window(&series[i + 1 - window..=i], k)
            }
        })
        .collect()
}

/// %b of the last value: `(last - lower) / (upper - lower)`.
///
/// A zero-width band (flat window) gives `0.5`: the last value sits on the
/// middle band.
pub fn percent_b(series: &[f64], window: usize, k: f64) -> Option<f64> {
    let bands = bollinger_bands(series, window, k)?;
    let last = *series.last()?;
    let width = bands.upper - bands.lower;
    if width == 0.0 {
        return Some(0.5);
    }
    let pb = (last - bands.lower) / width;
    pb.is_finite().then_some(pb)
}
