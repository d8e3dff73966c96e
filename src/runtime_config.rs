// =============================================================================
// Engine Configuration: indicator windows and report layout
// =============================================================================
//
// Every tunable look-back lives here.  Persistence uses an atomic tmp + rename
// pattern, and all fields carry `#[serde(default)]` so that adding new fields
// never breaks loading an older config file.
//
// The classifier thresholds are deliberately NOT configurable: they are
// shared constants in `signals::classifier` so that every call site agrees.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::indicators::IchimokuWindows;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_rsi_window() -> usize {
    14
}

fn default_bollinger_window() -> usize {
    20
}

fn default_bollinger_k() -> f64 {
    2.0
}

fn default_sma_dev_window() -> usize {
    25
}

fn default_ma_periods() -> Vec<usize> {
    vec![10, 20, 30, 50, 100, 200]
}

fn default_gauge_keys() -> Vec<String> {
    ["rsi14", "macd_hist", "percent_b", "roc12", "obv_slope", "cmf"]
        .into_iter()
        .map(String::from)
        .collect()
}

// =============================================================================
// EngineConfig
// =============================================================================

/// Look-backs used when indicators are computed locally from price bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// RSI look-back in bars.
    #[serde(default = "default_rsi_window")]
    pub rsi_window: usize,

    /// Bollinger / %b look-back in bars.
    #[serde(default = "default_bollinger_window")]
    pub bollinger_window: usize,

    /// Bollinger band width in standard deviations.
    #[serde(default = "default_bollinger_k")]
    pub bollinger_k: f64,

    /// SMA used for the deviation-% oscillator.
    #[serde(default = "default_sma_dev_window")]
    pub sma_dev_window: usize,

    /// Periods listed in the moving-average table (one EMA and one SMA row each).
    #[serde(default = "default_ma_periods")]
    pub ma_periods: Vec<usize>,

    /// Ichimoku conversion / base / leading-span windows.
    #[serde(default)]
    pub ichimoku: IchimokuWindows,

    /// Feed vote keys counted in the oscillator gauge; keys a feed does not
    /// publish are ignored.
    #[serde(default = "default_gauge_keys")]
    pub gauge_keys: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rsi_window: default_rsi_window(),
            bollinger_window: default_bollinger_window(),
            bollinger_k: default_bollinger_k(),
            sma_dev_window: default_sma_dev_window(),
            ma_periods: default_ma_periods(),
            ichimoku: IchimokuWindows::default(),
            gauge_keys: default_gauge_keys(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// A missing file is an error so the caller can fall back to defaults
    /// with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read engine config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse engine config from {}", path.display()))?;

        info!(
            path = %path.display(),
            rsi_window = config.rsi_window,
            ma_periods = ?config.ma_periods,
            "engine config loaded"
        );

        Ok(config)
    }

    /// Persist the configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise engine config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "engine config saved (atomic)");
        Ok(())
    }

    /// Gauge keys as string slices, for `signals::tally`.
    pub fn gauge_key_refs(&self) -> Vec<&str> {
        self.gauge_keys.iter().map(String::as_str).collect()
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.rsi_window, 14);
        assert_eq!(cfg.bollinger_window, 20);
        assert!((cfg.bollinger_k - 2.0).abs() < f64::EPSILON);
        assert_eq!(cfg.sma_dev_window, 25);
        assert_eq!(cfg.ma_periods, vec![10, 20, 30, 50, 100, 200]);
        assert_eq!(cfg.ichimoku, IchimokuWindows { tenkan: 9, kijun: 26, senkou: 52 });
        assert_eq!(cfg.gauge_keys.len(), 6);
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, EngineConfig::default());
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{ "rsi_window": 9, "ma_periods": [5, 25] }"#;
        let cfg: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.rsi_window, 9);
        assert_eq!(cfg.ma_periods, vec![5, 25]);
        assert_eq!(cfg.bollinger_window, 20);
        assert_eq!(cfg.ichimoku.senkou, 52);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rating_config.json");

        let mut cfg = EngineConfig::default();
        cfg.sma_dev_window = 50;
        cfg.save(&path).unwrap();

        assert!(!path.with_extension("json.tmp").exists());
        let loaded = EngineConfig::load(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn load_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(EngineConfig::load(dir.path().join("absent.json")).is_err());
    }
}
