// =============================================================================
// Simple Moving Average (SMA) and rolling standard deviation
// =============================================================================
//
//   SMA_t = (x_{t-w+1} + ... + x_t) / w
//   σ_t   = sqrt( Σ (x_i - SMA_t)^2 / w )      (population, divide by w)
//
// Only trailing values are used.  A window that contains any non-finite value
// yields `None`.

/// Mean of a full window, or `None` if any element (or the sum) is non-finite.
pub(crate) fn window_mean(window: &[f64]) -> Option<f64> {
    if window.is_empty() || window.iter().any(|x| !x.is_finite()) {
        return None;
    }
    let mean = window.iter().sum::<f64>() / window.len() as f64;
    mean.is_finite().then_some(mean)
}

/// Population standard deviation of `window` around `mean`.
///
/// A flat window is exactly zero; the floating-point mean of a constant run
/// is not always the constant itself.
pub(crate) fn window_std_dev(window: &[f64], mean: f64) -> Option<f64> {
    if window.iter().all(|&x| x == window[0]) {
        return Some(0.0);
    }
    let variance = window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / window.len() as f64;
    let sd = variance.sqrt();
    sd.is_finite().then_some(sd)
}

/// Average of the last `window` values of `series`.
///
/// Returns `None` when `window == 0`, the series is shorter than `window`, or
/// the trailing window contains a non-finite value.
pub fn sma(series: &[f64], window: usize) -> Option<f64> {
    if window == 0 || series.len() < window {
        return None;
    }
    window_mean(&series[series.len() - window..])
}

/// Index-aligned SMA series: element `i` is the SMA of `series[i+1-window..=i]`.
pub fn sma_series(series: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; series.len()];
    }
    (0..series.len())
        .map(|i| {
            if i + 1 < window {
                None
            } else {
                window_mean(&series[i + 1 - window..=i])
            }
        })
        .collect()
}

/// Population standard deviation of the last `window` values.
pub fn rolling_std_dev(series: &[f64], window: usize) -> Option<f64> {
    let mean = sma(series, window)?;
    window_std_dev(&series[series.len() - window..], mean)
}

/// Percentage distance of the last value from its own `window` SMA.
///
/// `None` when the SMA is missing or exactly zero.
pub fn sma_deviation_pct(series: &[f64], window: usize) -> Option<f64> {
    let ma = sma(series, window)?;
    let last = *series.last()?;
    ma_deviation_pct(Some(last), Some(ma))
}

/// `(close - ma) / ma * 100`, with a zero MA treated as missing.
pub fn ma_deviation_pct(close: Option<f64>, ma: Option<f64>) -> Option<f64> {
    let close = close.filter(|c| c.is_finite())?;
    let ma = ma.filter(|m| m.is_finite())?;
    if ma == 0.0 {
        return None;
    }
    let pct = (close - ma) / ma * 100.0;
    pct.is_finite().then_some(pct)
}
