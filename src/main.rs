//! Bone Age App Server
//!
//! Run with: cargo run --bin boneage-dashboard
//!
//! # Configuration
//!
//! Read from `config.toml`. When no config file exists, a commented default
//! is written to the per-user config directory. Environment overrides:
//! - `BONEAGE_HOST`: Host to bind to (default: 127.0.0.1)
//! - `BONEAGE_PORT`: Port to listen on (default: 8888)
//! - `BONEAGE_DATASET`: Training CSV (default: boneage-training-dataset.csv)
//! - `BONEAGE_MODEL1_URL`, `BONEAGE_MODEL2_URL`: Model service endpoints
//! - `BONEAGE_LOG_LEVEL`: Log filter (overridden by `RUST_LOG`)
//! - `BONEAGE_LOG_FORMAT`: `pretty` or `json`

use anyhow::Context;
use boneage_dashboard::{serve, Analytics, AppState, Config, ConfigSource, LoggingConfig, ModelPair};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, source) = Config::load_default();

    init_tracing(&config.logging);

    tracing::info!("Starting Bone Age App v{}", env!("CARGO_PKG_VERSION"));
    for skipped in source.skipped() {
        tracing::warn!("{}", skipped);
    }
    match &source {
        ConfigSource::File(path, _) => tracing::info!("Loaded config from {:?}", path),
        ConfigSource::Environment(skipped) => {
            tracing::info!("Using default config with environment overrides");
            if skipped.is_empty() {
                write_default_config();
            }
        }
    }

    // The dataset is required; a missing or malformed file aborts startup
    let analytics = Analytics::load(&config.dataset.path)
        .with_context(|| format!("loading dataset {:?}", config.dataset.path))?;

    let models = ModelPair::from_config(&config.models).context("configuring models")?;

    let state = AppState::new(analytics, models, config.models.input_size, config.server);
    serve(state).await?;

    tracing::info!("Bone Age App stopped");
    Ok(())
}

/// Leave a starter config behind for the next run. Failure is not fatal.
fn write_default_config() {
    let Some(path) = Config::user_config_path() else {
        return;
    };
    match Config::write_default(&path) {
        Ok(true) => tracing::info!("Wrote default config to {:?}", path),
        Ok(false) => {}
        Err(e) => tracing::warn!("Could not write default config: {}", e),
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.level));

    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
