//! Trend alert server
//!
//! Runs one evaluation cycle at startup, then on the configured interval,
//! and serves the status surface over HTTP.

use std::sync::Arc;
use std::time::Instant;

use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};

use trendwatch::config::AppConfig;
use trendwatch::core::http::{start_server, AppState, ServiceInfo};
use trendwatch::core::runtime::AlertRuntime;
use trendwatch::core::scheduler::JobScheduler;
use trendwatch::db::FileStateStore;
use trendwatch::jobs::context::{CycleSettings, JobContext};
use trendwatch::logging;
use trendwatch::metrics::Metrics;
use trendwatch::services::market_data::CandleSource;
use trendwatch::services::{MexcClient, TelegramNotifier};
use trendwatch::signals::SnapshotEngine;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    let config = AppConfig::from_env()?;
    logging::init_logging(&config.environment);

    info!("Starting trend alert server");
    info!(environment = %config.environment, "Environment");
    info!(
        coins = config.coins.len(),
        direction = %config.direction,
        interval_minutes = config.check_interval_minutes,
        "Tracking {} coins every {} minute(s)",
        config.coins.len(),
        config.check_interval_minutes
    );

    let notifier = TelegramNotifier::new(
        config.telegram_api_url.clone(),
        config.telegram_token.clone(),
        config.telegram_chat_id.clone(),
    );
    if !notifier.is_configured() {
        warn!("TELEGRAM_TOKEN or TELEGRAM_CHAT_ID missing - notifications will be dropped");
    }

    let provider = MexcClient::new(config.exchange_base_url.clone(), config.quote_asset.clone())?;
    let exchange = provider.name().to_string();
    let store = FileStateStore::new(config.state_dir.clone()).await?;
    info!(state_dir = %config.state_dir.display(), "State directory ready");

    let metrics = Arc::new(Metrics::new()?);
    let context = JobContext::new(
        Arc::new(provider),
        Arc::new(notifier),
        Arc::new(store),
        SnapshotEngine::new(config.indicators, config.direction),
        CycleSettings::from_config(&config),
    )
    .with_metrics(metrics.clone());
    let runtime = Arc::new(AlertRuntime::new(context));

    let scheduler = JobScheduler::new(runtime.clone(), config.check_interval_minutes)?;

    let state = AppState {
        metrics,
        start_time: Arc::new(Instant::now()),
        runtime: runtime.clone(),
        info: Arc::new(ServiceInfo::from_config(&config, exchange)),
    };
    let port = config.port;
    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(state, port).await {
            error!(error = %e, "HTTP server error");
        }
    });

    runtime.run_evaluation_cycle().await;
    scheduler.start().await;

    info!("Bot started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down...");
            scheduler.stop().await;
            info!("Bot stopped");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
            scheduler.stop().await;
        }
    }

    Ok(())
}
