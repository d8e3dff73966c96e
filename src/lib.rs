// =============================================================================
// Rating Engine: technical indicators and buy/sell ratings
// =============================================================================
//
// Pure computation over in-memory price series:
//   indicators  - SMA, EMA, rolling σ, Bollinger Bands, RSI, Ichimoku
//   signals     - threshold classifier, vote aggregation, proximity helper
//   snapshot    - pre-computed decision feed records and list rows
//   report      - per-ticker detail report combining all of the above
//
// Nothing here holds state between calls, so tickers can be evaluated from
// any number of threads at once.

pub mod error;
pub mod indicators;
pub mod provider;
pub mod report;
pub mod runtime_config;
pub mod signals;
pub mod snapshot;
pub mod types;

pub use error::EngineError;
pub use report::{evaluate_ticker, TechnicalReport};
pub use runtime_config::EngineConfig;
pub use types::PriceBar;
