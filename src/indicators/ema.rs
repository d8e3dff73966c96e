// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// Formula:
//   alpha  = 2 / (span + 1)
//   EMA_t  = alpha * x_t + (1 - alpha) * EMA_{t-1}
//
// The first EMA value (at index `span - 1`) is seeded with the SMA of the
// first `span` values.  If the seed is missing the whole EMA is missing.
// =============================================================================

use super::sma::window_mean;

/// Index-aligned EMA series for chart overlays.
///
/// Elements before `span - 1` are `None`.  Once a non-finite value enters the
/// recurrence every later element is `None`: the series cannot recover from a
/// broken seed chain.
///
/// # Edge cases
/// - `span == 0` => all `None`
/// - `series.len() < span` => all `None`
/// - non-finite value inside the seed window => all `None`
pub fn ema_series(series: &[f64], span: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; series.len()];
    if span == 0 || series.len() < span {
        return out;
    }

    let Some(seed) = window_mean(&series[..span]) else {
        return out;
    };
    let alpha = 2.0 / (span as f64 + 1.0);

    out[span - 1] = Some(seed);
    let mut prev = seed;
    for (i, &x) in series.iter().enumerate().skip(span) {
        let e = alpha * x + (1.0 - alpha) * prev;
        if !e.is_finite() {
            break;
        }
        out[i] = Some(e);
        prev = e;
    }
    out
}

/// Most recent EMA value, or `None` if it cannot be computed from `series`.
pub fn ema(series: &[f64], span: usize) -> Option<f64> {
    ema_series(series, span).last().copied().flatten()
}
