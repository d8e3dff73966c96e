// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators behind the chart
// overlays and the technical detail tables.  Scalar functions return
// `Option<f64>` so callers are forced to handle insufficient history and
// non-finite input; the `*_series` twins return index-aligned
// `Vec<Option<_>>` for plotting.

pub mod bollinger;
pub mod ema;
pub mod ichimoku;
pub mod rsi;
pub mod sma;

pub use bollinger::{bollinger_bands, bollinger_series, percent_b, BollingerBands};
pub use ema::{ema, ema_series};
pub use ichimoku::{cloud_delta, ichimoku_levels, ichimoku_with, IchimokuLevels, IchimokuWindows};
pub use rsi::{rsi, rsi_series};
pub use sma::{ma_deviation_pct, rolling_std_dev, sma, sma_deviation_pct, sma_series};
