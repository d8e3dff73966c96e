// =============================================================================
// Shared types used across the rating engine
// =============================================================================

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Opaque ordering key attached to a bar.
///
/// The feed sends either a plain calendar date (`2024-05-17`) for daily bars
/// or a full RFC 3339 timestamp for intraday bars.  Indicator math never looks
/// at it; providers use [`BarTime::date`] for range filtering only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BarTime {
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
}

impl BarTime {
    /// Calendar date of the bar, in the bar's own offset.
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::Date(d) => *d,
            Self::DateTime(dt) => dt.date_naive(),
        }
    }

    /// Chronological ordering key: calendar date first, then the instant
    /// within that day.  A plain date sorts before any timestamp on the same
    /// day.
    pub fn sort_key(&self) -> (NaiveDate, Option<DateTime<Utc>>) {
        match self {
            Self::Date(d) => (*d, None),
            Self::DateTime(dt) => (dt.date_naive(), Some(dt.with_timezone(&Utc))),
        }
    }
}

impl std::fmt::Display for BarTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Date(d) => write!(f, "{d}"),
            Self::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
        }
    }
}

/// One OHLC observation.
///
/// Price fields are optional because the upstream feed sends `null` for
/// halted sessions and partial rows.  `high >= max(open, close)` is expected
/// but not enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: BarTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    #[serde(default, rename = "Open", alias = "open")]
    pub open: Option<f64>,
    #[serde(default, rename = "High", alias = "high")]
    pub high: Option<f64>,
    #[serde(default, rename = "Low", alias = "low")]
    pub low: Option<f64>,
    #[serde(default, rename = "Close", alias = "close")]
    pub close: Option<f64>,
    #[serde(default, rename = "Volume", alias = "volume", skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

// -----------------------------------------------------------------------------
// Series extraction
// -----------------------------------------------------------------------------
//
// Indicator functions operate on `&[f64]` and treat any non-finite element as
// missing.  An absent field is therefore mapped to NaN here; it never escapes
// the engine because every window containing it produces `None`.

fn field_series(bars: &[PriceBar], field: impl Fn(&PriceBar) -> Option<f64>) -> Vec<f64> {
    bars.iter().map(|b| field(b).unwrap_or(f64::NAN)).collect()
}

/// Close prices, index-aligned with `bars`.
pub fn closes(bars: &[PriceBar]) -> Vec<f64> {
    field_series(bars, |b| b.close)
}

/// High prices, index-aligned with `bars`.
pub fn highs(bars: &[PriceBar]) -> Vec<f64> {
    field_series(bars, |b| b.high)
}

/// Low prices, index-aligned with `bars`.
pub fn lows(bars: &[PriceBar]) -> Vec<f64> {
    field_series(bars, |b| b.low)
}

/// The most recent close, if it is a finite number.
pub fn last_close(bars: &[PriceBar]) -> Option<f64> {
    bars.last()?.close.filter(|c| c.is_finite())
}

/// Normalise an optional operand: non-finite numbers count as missing.
pub fn finite(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_daily_feed_row() {
        let json = r#"{ "date": "2024-05-17", "ticker": "7203.T",
                        "Open": 3400.0, "High": 3450.0, "Low": 3390.0, "Close": 3420.0 }"#;
        let bar: PriceBar = serde_json::from_str(json).unwrap();
        assert_eq!(bar.date.date(), NaiveDate::from_ymd_opt(2024, 5, 17).unwrap());
        assert_eq!(bar.close, Some(3420.0));
        assert_eq!(bar.volume, None);
    }

    #[test]
    fn parses_intraday_row_with_nulls() {
        let json = r#"{ "date": "2024-05-17T09:05:00+09:00",
                        "open": null, "high": 10.0, "low": 9.0, "close": null }"#;
        let bar: PriceBar = serde_json::from_str(json).unwrap();
        assert!(matches!(bar.date, BarTime::DateTime(_)));
        assert_eq!(bar.date.date(), NaiveDate::from_ymd_opt(2024, 5, 17).unwrap());
        assert_eq!(bar.open, None);
        assert_eq!(bar.close, None);
    }

    #[test]
    fn intraday_bars_order_by_time_within_a_day() {
        let at = |s: &str| BarTime::DateTime(DateTime::parse_from_rfc3339(s).unwrap());
        let day = BarTime::Date(NaiveDate::from_ymd_opt(2024, 5, 17).unwrap());
        let mut times = vec![
            at("2024-05-17T14:00:00+09:00"),
            at("2024-05-18T09:00:00+09:00"),
            at("2024-05-17T09:05:00+09:00"),
            day.clone(),
        ];
        times.sort_by_key(BarTime::sort_key);
        assert_eq!(
            times,
            vec![
                day,
                at("2024-05-17T09:05:00+09:00"),
                at("2024-05-17T14:00:00+09:00"),
                at("2024-05-18T09:00:00+09:00"),
            ]
        );
    }

    #[test]
    fn missing_close_becomes_non_finite_marker() {
        let bars = vec![
            PriceBar {
                date: BarTime::Date(NaiveDate::from_ymd_opt(2024, 1, 4).unwrap()),
                ticker: None,
                open: None,
                high: Some(2.0),
                low: Some(1.0),
                close: None,
                volume: None,
            },
        ];
        let c = closes(&bars);
        assert!(c[0].is_nan());
        assert_eq!(highs(&bars), vec![2.0]);
        assert_eq!(last_close(&bars), None);
    }

    #[test]
    fn finite_filters_nan_and_infinity() {
        assert_eq!(finite(Some(1.5)), Some(1.5));
        assert_eq!(finite(Some(f64::NAN)), None);
        assert_eq!(finite(Some(f64::INFINITY)), None);
        assert_eq!(finite(None), None);
    }
}
