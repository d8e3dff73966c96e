// =============================================================================
// Ichimoku Kinko Hyo: latest levels
// =============================================================================
//
//   tenkan  = (highest high + lowest low) / 2 over `tenkan` bars   (9)
//   kijun   = same over `kijun` bars                               (26)
//   span A  = (tenkan + kijun) / 2
//   span B  = (highest high + lowest low) / 2 over `senkou` bars   (52)
//   cloud   = [min(A, B), max(A, B)]
//   chikou  = close `kijun` bars before the last one
//
// Only the most recent values are produced (the detail table view), not the
// forward-projected plot.  The block is all-or-nothing: fewer than `senkou`
// bars, or a non-finite value inside any required window, gives `None`.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Look-back windows for the three Ichimoku lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IchimokuWindows {
    pub tenkan: usize,
    pub kijun: usize,
    pub senkou: usize,
}

impl Default for IchimokuWindows {
    fn default() -> Self {
        Self {
            tenkan: 9,
            kijun: 26,
            senkou: 52,
        }
    }
}

/// Latest Ichimoku levels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IchimokuLevels {
    pub last_close: f64,
    pub tenkan_sen: f64,
    pub kijun_sen: f64,
    pub span_a: f64,
    pub span_b: f64,
    pub cloud_top: f64,
    pub cloud_bottom: f64,
    /// `None` when history is not longer than the kijun window or that close is missing.
    pub chikou_span: Option<f64>,
}

/// Midpoint of the highest high and lowest low over the last `n` bars.
fn midpoint(highs: &[f64], lows: &[f64], n: usize) -> Option<f64> {
    if n == 0 || highs.len() < n {
        return None;
    }
    let hs = &highs[highs.len() - n..];
    let ls = &lows[lows.len() - n..];
    if hs.iter().chain(ls).any(|x| !x.is_finite()) {
        return None;
    }
    let hi = hs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let lo = ls.iter().copied().fold(f64::INFINITY, f64::min);
    let mid = (hi + lo) / 2.0;
    mid.is_finite().then_some(mid)
}

/// Compute Ichimoku levels with the classic 9/26/52 windows.
pub fn ichimoku_levels(highs: &[f64], lows: &[f64], closes: &[f64]) -> Result<Option<IchimokuLevels>> {
    ichimoku_with(highs, lows, closes, IchimokuWindows::default())
}

/// Compute Ichimoku levels with explicit windows.
///
/// # Errors
/// [`EngineError::SeriesLengthMismatch`] when the three series are not the
/// same length.  Short history is not an error: it yields `Ok(None)`.
pub fn ichimoku_with(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    windows: IchimokuWindows,
) -> Result<Option<IchimokuLevels>> {
    if highs.len() != lows.len() || highs.len() != closes.len() {
        return Err(EngineError::SeriesLengthMismatch {
            highs: highs.len(),
            lows: lows.len(),
            closes: closes.len(),
        });
    }
    if closes.len() < windows.senkou {
        return Ok(None);
    }

    let Some(&last_close) = closes.last().filter(|c| c.is_finite()) else {
        return Ok(None);
    };

    let levels = (|| {
        let tenkan_sen = midpoint(highs, lows, windows.tenkan)?;
        let kijun_sen = midpoint(highs, lows, windows.kijun)?;
        let span_b = midpoint(highs, lows, windows.senkou)?;
        let span_a = (tenkan_sen + kijun_sen) / 2.0;

        let chikou_span = if closes.len() > windows.kijun {
            Some(closes[closes.len() - 1 - windows.kijun]).filter(|c| c.is_finite())
        } else {
            None
        };

        Some(IchimokuLevels {
            last_close,
            tenkan_sen,
            kijun_sen,
            span_a,
            span_b,
            cloud_top: span_a.max(span_b),
            cloud_bottom: span_a.min(span_b),
            chikou_span,
        })
    })();

    Ok(levels)
}

/// Signed distance of `last` beyond the cloud edge it has crossed.
///
/// Positive above the cloud (`last - top`), negative below it
/// (`last - bottom`), zero inside.
pub fn cloud_delta(last: Option<f64>, top: Option<f64>, bottom: Option<f64>) -> Option<f64> {
    let (last, top, bottom) = (
        last.filter(|v| v.is_finite())?,
        top.filter(|v| v.is_finite())?,
        bottom.filter(|v| v.is_finite())?,
    );
    Some(if last > top {
        last - top
    } else if last < bottom {
        last - bottom
    } else {
        0.0
    })
}
