// =============================================================================
// Threshold Classifier
// =============================================================================
//
// Maps one indicator value to a three-level verdict.  Missing (or non-finite)
// operands are checked first and always yield `NoData`, never `Neutral`.
//
//   Rule               Buy when          Sell when          else
//   RSI(14)            v < 30            v > 70             Neutral
//   %b                 v < 0.05          v > 0.95           Neutral
//   MACD histogram     v > +0.01         v < -0.01          Neutral
//   SMA deviation %    v > +2.0          v < -2.0           Neutral
//   price vs MA        close > ma        close < ma         Neutral
//   price vs cloud     last > top        last < bottom      Neutral
//   tenkan vs kijun    tenkan > kijun    tenkan < kijun     Neutral
//   chikou vs price    chikou > price    chikou < price     Neutral
//
// All comparisons are strict: a value sitting exactly on a threshold is
// Neutral.
// =============================================================================

use serde::{Deserialize, Serialize};

use super::rating::Rating3;
use crate::types::finite;

pub const RSI_OVERSOLD: f64 = 30.0;
pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const PERCENT_B_LOWER: f64 = 0.05;
pub const PERCENT_B_UPPER: f64 = 0.95;
pub const MACD_HIST_EPS: f64 = 0.01;
pub const SMA_DEV_PCT: f64 = 2.0;

/// Oscillator-family rules that feed the technical composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OscillatorRule {
    Rsi,
    PercentB,
    MacdHist,
    SmaDeviation,
}

impl OscillatorRule {
    pub const ALL: [OscillatorRule; 4] = [
        OscillatorRule::Rsi,
        OscillatorRule::PercentB,
        OscillatorRule::MacdHist,
        OscillatorRule::SmaDeviation,
    ];

    /// Key of this rule in a decision feed's vote map.
    pub fn vote_key(self) -> &'static str {
        match self {
            Self::Rsi => "rsi14",
            Self::PercentB => "percent_b",
            Self::MacdHist => "macd_hist",
            Self::SmaDeviation => "sma25_dev_pct",
        }
    }

    /// Table label.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Rsi => "RSI(14)",
            Self::PercentB => "%b (20,2σ)",
            Self::MacdHist => "MACD Hist",
            Self::SmaDeviation => "SMA Dev %(25)",
        }
    }

    /// Threshold pair handed to `nearest_delta`, in display order.
    ///
    /// These are the same constants the classifier compares against, so the
    /// distance column and the verdict column never disagree.
    pub fn delta_thresholds(self) -> (f64, Option<f64>) {
        match self {
            Self::Rsi => (RSI_OVERSOLD, Some(RSI_OVERBOUGHT)),
            Self::PercentB => (PERCENT_B_LOWER, Some(PERCENT_B_UPPER)),
            Self::MacdHist => (MACD_HIST_EPS, Some(-MACD_HIST_EPS)),
            Self::SmaDeviation => (SMA_DEV_PCT, Some(-SMA_DEV_PCT)),
        }
    }
}

impl std::fmt::Display for OscillatorRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Classify an oscillator reading.
pub fn judge_oscillator(rule: OscillatorRule, value: Option<f64>) -> Rating3 {
    let Some(v) = finite(value) else {
        return Rating3::NoData;
    };
    let (buy, sell) = match rule {
        OscillatorRule::Rsi => (v < RSI_OVERSOLD, v > RSI_OVERBOUGHT),
        OscillatorRule::PercentB => (v < PERCENT_B_LOWER, v > PERCENT_B_UPPER),
        OscillatorRule::MacdHist => (v > MACD_HIST_EPS, v < -MACD_HIST_EPS),
        OscillatorRule::SmaDeviation => (v > SMA_DEV_PCT, v < -SMA_DEV_PCT),
    };
    if buy {
        Rating3::Buy
    } else if sell {
        Rating3::Sell
    } else {
        Rating3::Neutral
    }
}

/// Buy when `a > b`, sell when `a < b`, neutral when equal.
fn above_below(a: Option<f64>, b: Option<f64>) -> Rating3 {
    match (finite(a), finite(b)) {
        (Some(a), Some(b)) if a > b => Rating3::Buy,
        (Some(a), Some(b)) if a < b => Rating3::Sell,
        (Some(_), Some(_)) => Rating3::Neutral,
        _ => Rating3::NoData,
    }
}

/// Price against a single moving average.
pub fn judge_ma(close: Option<f64>, ma: Option<f64>) -> Rating3 {
    above_below(close, ma)
}

/// Price against the Ichimoku cloud; inside the cloud is neutral.
pub fn judge_cloud(last: Option<f64>, top: Option<f64>, bottom: Option<f64>) -> Rating3 {
    let (Some(last), Some(top), Some(bottom)) = (finite(last), finite(top), finite(bottom)) else {
        return Rating3::NoData;
    };
    if last > top {
        Rating3::Buy
    } else if last < bottom {
        Rating3::Sell
    } else {
        Rating3::Neutral
    }
}

/// Conversion line against base line.
pub fn judge_tenkan_kijun(tenkan: Option<f64>, kijun: Option<f64>) -> Rating3 {
    above_below(tenkan, kijun)
}

/// Lagging span against the current price.
pub fn judge_chikou(chikou: Option<f64>, price: Option<f64>) -> Rating3 {
    above_below(chikou, price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use OscillatorRule::*;

    #[test]
    fn missing_is_no_data_for_every_rule() {
        for rule in OscillatorRule::ALL {
            assert_eq!(judge_oscillator(rule, None), Rating3::NoData);
            assert_eq!(judge_oscillator(rule, Some(f64::NAN)), Rating3::NoData);
        }
        assert_eq!(judge_ma(None, Some(1.0)), Rating3::NoData);
        assert_eq!(judge_ma(Some(1.0), Some(f64::INFINITY)), Rating3::NoData);
        assert_eq!(judge_cloud(Some(1.0), None, Some(0.0)), Rating3::NoData);
        assert_eq!(judge_tenkan_kijun(Some(1.0), None), Rating3::NoData);
        assert_eq!(judge_chikou(None, None), Rating3::NoData);
    }

    #[test]
    fn rsi_boundaries() {
        assert_eq!(judge_oscillator(Rsi, Some(29.999)), Rating3::Buy);
        assert_eq!(judge_oscillator(Rsi, Some(30.0)), Rating3::Neutral);
        assert_eq!(judge_oscillator(Rsi, Some(70.0)), Rating3::Neutral);
        assert_eq!(judge_oscillator(Rsi, Some(70.001)), Rating3::Sell);
    }

    #[test]
    fn percent_b_boundaries() {
        assert_eq!(judge_oscillator(PercentB, Some(0.049)), Rating3::Buy);
        assert_eq!(judge_oscillator(PercentB, Some(0.05)), Rating3::Neutral);
        assert_eq!(judge_oscillator(PercentB, Some(0.95)), Rating3::Neutral);
        assert_eq!(judge_oscillator(PercentB, Some(1.2)), Rating3::Sell);
    }

    #[test]
    fn macd_hist_boundaries() {
        assert_eq!(judge_oscillator(MacdHist, Some(0.011)), Rating3::Buy);
        assert_eq!(judge_oscillator(MacdHist, Some(0.01)), Rating3::Neutral);
        assert_eq!(judge_oscillator(MacdHist, Some(0.0)), Rating3::Neutral);
        assert_eq!(judge_oscillator(MacdHist, Some(-0.01)), Rating3::Neutral);
        assert_eq!(judge_oscillator(MacdHist, Some(-0.5)), Rating3::Sell);
    }

    #[test]
    fn sma_deviation_is_trend_following() {
        assert_eq!(judge_oscillator(SmaDeviation, Some(2.5)), Rating3::Buy);
        assert_eq!(judge_oscillator(SmaDeviation, Some(2.0)), Rating3::Neutral);
        assert_eq!(judge_oscillator(SmaDeviation, Some(-2.0)), Rating3::Neutral);
        assert_eq!(judge_oscillator(SmaDeviation, Some(-3.0)), Rating3::Sell);
    }

    #[test]
    fn price_vs_ma() {
        assert_eq!(judge_ma(Some(101.0), Some(100.0)), Rating3::Buy);
        assert_eq!(judge_ma(Some(99.0), Some(100.0)), Rating3::Sell);
        assert_eq!(judge_ma(Some(100.0), Some(100.0)), Rating3::Neutral);
    }

    #[test]
    fn price_vs_cloud() {
        assert_eq!(judge_cloud(Some(11.0), Some(10.0), Some(8.0)), Rating3::Buy);
        assert_eq!(judge_cloud(Some(7.0), Some(10.0), Some(8.0)), Rating3::Sell);
        assert_eq!(judge_cloud(Some(10.0), Some(10.0), Some(8.0)), Rating3::Neutral);
        assert_eq!(judge_cloud(Some(8.0), Some(10.0), Some(8.0)), Rating3::Neutral);
        // A missing bottom is no data even when the price is above the top.
        assert_eq!(judge_cloud(Some(11.0), Some(10.0), None), Rating3::NoData);
    }

    #[test]
    fn ichimoku_line_relations() {
        assert_eq!(judge_tenkan_kijun(Some(5.0), Some(4.0)), Rating3::Buy);
        assert_eq!(judge_tenkan_kijun(Some(4.0), Some(4.0)), Rating3::Neutral);
        assert_eq!(judge_chikou(Some(3.0), Some(4.0)), Rating3::Sell);
    }

    #[test]
    fn delta_thresholds_match_classifier_constants() {
        assert_eq!(Rsi.delta_thresholds(), (30.0, Some(70.0)));
        assert_eq!(PercentB.delta_thresholds(), (0.05, Some(0.95)));
        assert_eq!(SmaDeviation.delta_thresholds(), (2.0, Some(-2.0)));
        assert_eq!(MacdHist.delta_thresholds(), (0.01, Some(-0.01)));
    }
}
