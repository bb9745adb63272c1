use bullscan::config::AnalysisConfig;
use bullscan::services::{AnalysisParams, Analyzer, MemorySeriesStore};
use bullscan::types::PriceBar;
use chrono::{Duration, NaiveDate};
use rand::Rng;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Days of synthetic history seeded per symbol.
const HISTORY_DAYS: i64 = 400;

/// Random-walk daily bars ending on `end`.
fn synthetic_bars(end: NaiveDate, start_price: f64) -> Vec<PriceBar> {
    let mut rng = rand::thread_rng();
    let mut close = start_price;

    (0..HISTORY_DAYS)
        .map(|i| {
            let date = end - Duration::days(HISTORY_DAYS - 1 - i);
            let open = close;
            close = (close * (1.0 + rng.gen_range(-0.02..0.021))).max(1.0);
            let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
            let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
            let volume = rng.gen_range(500_000.0..1_500_000.0)
                * if rng.gen_bool(0.03) { 3.0 } else { 1.0 };
            PriceBar {
                date,
                open,
                high,
                low,
                close,
                volume,
            }
        })
        .collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bullscan=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AnalysisConfig::from_env();
    let params = config.params()?;
    let today = AnalysisParams::today();
    info!(
        "Analyzing {} symbols over the last {} days",
        config.symbols.len(),
        config.days
    );

    // Seed the store with synthetic history
    let store = Arc::new(MemorySeriesStore::new());
    for symbol in &config.symbols {
        let start_price = rand::thread_rng().gen_range(20.0..300.0);
        store.insert_bars(symbol, synthetic_bars(today, start_price))?;
    }

    let analyzer = Analyzer::new(store, params);
    let batch = analyzer.run_batch(&config.symbols, today).await;
    println!("{}", serde_json::to_string_pretty(&batch)?);

    for symbol in &config.symbols {
        match analyzer.backtest(symbol) {
            Ok(report) => println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "symbol": symbol,
                    "backtest": report,
                }))?
            ),
            Err(e) => warn!("Backtest failed for {}: {}", symbol, e),
        }
    }

    let tradeable: Vec<&str> = batch.tradeable().map(|r| r.symbol.as_str()).collect();
    info!("Tradeable: {:?}", tradeable);

    Ok(())
}
