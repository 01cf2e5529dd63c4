//! Vendor Aggregator - command line entry point

use anyhow::{Context, Result};
use clap::Parser;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use vendor_aggregator::AggregationService;
use vendor_aggregator::application::services::log_breaker_metrics;
use vendor_aggregator::bootstrap::build_service;
use vendor_aggregator::config::AppConfig;
use vendor_aggregator::domain::value_objects::ProductKey;

/// Resolve product keys to the best vendor offer.
#[derive(Debug, Parser)]
#[command(name = "vendor-aggregator", version, about)]
struct Args {
    /// Product keys to resolve.
    #[arg(required = true)]
    keys: Vec<String>,

    /// Directory holding `default.toml` and per-environment overrides.
    #[arg(short, long, default_value = "config")]
    config_dir: String,

    /// Re-resolve every N seconds until interrupted.
    #[arg(short, long, value_name = "SECS")]
    watch: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = AppConfig::load_from(&args.config_dir).context("failed to load configuration")?;
    init_tracing(config.logging.json);

    let service = build_service(&config)
        .await
        .context("failed to build aggregation service")?;
    let keys: Vec<ProductKey> = args.keys.iter().map(ProductKey::new).collect();

    resolve_all(&service, &keys).await?;

    let Some(watch_secs) = args.watch else {
        log_breaker_metrics(service.registry());
        return Ok(());
    };

    let mut resolve_tick = tokio::time::interval(Duration::from_secs(watch_secs.max(1)));
    let mut metrics_tick = tokio::time::interval(Duration::from_secs(config.metrics_interval_secs));
    resolve_tick.tick().await;

    loop {
        tokio::select! {
            _ = resolve_tick.tick() => resolve_all(&service, &keys).await?,
            _ = metrics_tick.tick() => {
                log_breaker_metrics(service.registry());
                let stats = service.cache_stats();
                tracing::info!(
                    hits = stats.hits,
                    misses = stats.misses,
                    hit_rate_percent = stats.hit_rate_percent,
                    "Cache statistics"
                );
            }
            result = tokio::signal::ctrl_c() => {
                result.context("failed to listen for Ctrl-C")?;
                tracing::info!("Shutting down");
                break;
            }
        }
    }

    log_breaker_metrics(service.registry());
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn resolve_all(service: &AggregationService, keys: &[ProductKey]) -> Result<()> {
    for key in keys {
        let result = service.resolve(key).await;
        println!("{}", serde_json::to_string_pretty(&result)?);
    }
    Ok(())
}
