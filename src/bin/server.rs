//! Ovenwatch HTTP Server Binary
//!
//! Entry point for the oven prediction REST API server. It loads the
//! configuration from the environment, wires up the calendar, model
//! registry, and prediction service, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin ovenwatch-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `STORE_UTC_OFFSET_HOURS`: store zone offset (default: -5)
//! - `OVEN_COUNT`: number of ovens (default: 4)
//! - `STORE_HOURS` / `REST_DAY`: weekly hours override
//! - `RUST_LOG`: Log filter (default: info)

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ovenwatch::config::AppConfig;
use ovenwatch::http::{create_router, AppState};
use ovenwatch::models::calendar::OperatingCalendar;
use ovenwatch::models::time::StoreZone;
use ovenwatch::services::{
    FinishTableRegistry, ObserverHub, PredictionAdjuster, PredictionChainEngine, PredictionService,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    info!("Starting Ovenwatch HTTP Server");

    let config = AppConfig::from_env().map_err(|e| anyhow::anyhow!(e))?;
    let zone = StoreZone::from_offset_hours(config.store_offset_hours)
        .ok_or_else(|| anyhow::anyhow!("invalid STORE_UTC_OFFSET_HOURS"))?;

    let calendar = OperatingCalendar::new(
        zone,
        config.weekly_hours.clone(),
        Duration::minutes(config.last_call_buffer_min),
        config.rest_day,
    );
    let registry = Arc::new(FinishTableRegistry::with_defaults(config.oven_count));
    let engine = PredictionChainEngine::new(
        PredictionAdjuster::new(calendar),
        registry,
        config.max_chain_steps,
    );
    let service = Arc::new(PredictionService::new(
        engine,
        ObserverHub::default(),
        Duration::minutes(config.confirm_window_min),
    ));
    info!(ovens = config.oven_count, "prediction service initialized");

    let app = create_router(AppState::new(service));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
