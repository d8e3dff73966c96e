// =============================================================================
// Rating Engine: batch entry point
// =============================================================================
//
// Usage: rating-engine <prices.json> [decisions.json]
//
// Builds a technical report for every ticker in the prices file and prints
// them as a JSON array.  Tickers are evaluated concurrently on blocking
// worker threads; a ticker that fails is logged and left out.
// =============================================================================

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tokio::task::JoinSet;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use rating_engine::provider::{DateRange, JsonFileStore};
use rating_engine::{evaluate_ticker, EngineConfig};

const DEFAULT_CONFIG_PATH: &str = "rating_config.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path =
        std::env::var("RATING_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = EngineConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        EngineConfig::default()
    });

    let mut args = std::env::args().skip(1);
    let prices_path = args
        .next()
        .context("usage: rating-engine <prices.json> [decisions.json]")?;
    let decisions_path = args.next();

    // ── 2. Load data ─────────────────────────────────────────────────────
    let store = Arc::new(JsonFileStore::load(
        &prices_path,
        decisions_path.as_deref().map(Path::new),
    )?);
    let config = Arc::new(config);
    let tickers = store.tickers();

    info!(tickers = tickers.len(), "Evaluating tickers");

    // ── 3. Evaluate concurrently ─────────────────────────────────────────
    let mut tasks = JoinSet::new();
    for ticker in tickers {
        let store = store.clone();
        let config = config.clone();
        tasks.spawn_blocking(move || {
            let result = evaluate_ticker(&*store, &*store, &ticker, &DateRange::all(), &config);
            (ticker, result)
        });
    }

    let mut reports = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((_, Ok(Some(report)))) => reports.push(report),
            Ok((_, Ok(None))) => {}
            Ok((ticker, Err(e))) => error!(ticker = %ticker, error = %e, "Ticker evaluation failed"),
            Err(e) => error!(error = %e, "Evaluation task panicked"),
        }
    }
    reports.sort_by(|a, b| a.ticker.cmp(&b.ticker));

    info!(reports = reports.len(), "Evaluation complete");

    // ── 4. Output ────────────────────────────────────────────────────────
    let json = serde_json::to_string_pretty(&reports).context("failed to serialise reports")?;
    println!("{json}");

    Ok(())
}
