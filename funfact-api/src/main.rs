//! Daily Fun Fact API Server Entry Point
//!
//! Loads configuration, wires the store, lock and generator into a
//! [`FactService`] and starts the Axum HTTP server.

use std::sync::Arc;

use axum::Router;
use funfact_api::telemetry::{init_tracing, TelemetryConfig};
use funfact_api::{create_router, ApiConfig, ApiError, ApiResult, AppState, StoreKind};
use funfact_core::{
    DailyLock, FactService, FactStore, ServiceConfig, SystemClock,
};
use funfact_llm::{MistralConfig, MistralGenerator};
use funfact_storage::{
    connect, InMemoryDailyLock, InMemoryFactStore, RedisDailyLock, RedisFactStore,
};

#[tokio::main]
async fn main() -> ApiResult<()> {
    let telemetry_config = TelemetryConfig::default();
    init_tracing(&telemetry_config)?;

    let api_config = ApiConfig::from_env().map_err(config_error)?;
    let service_config = ServiceConfig::from_env().map_err(config_error)?;
    let mistral_config = MistralConfig::from_env().map_err(config_error)?;

    let (store, lock) = build_backends(&api_config).await?;

    let generator = MistralGenerator::from_config(mistral_config);
    if !generator.is_configured() {
        tracing::warn!("MISTRAL_API_KEY is not set; fact generation will fail until it is");
    }

    let clock = SystemClock::new(service_config.day_boundary);
    let service = Arc::new(FactService::new(
        store,
        lock,
        Arc::new(generator),
        Arc::new(clock),
        service_config,
    ));

    let app: Router = create_router(AppState::new(service), &api_config);

    let addr = api_config.bind_addr().map_err(config_error)?;
    tracing::info!(%addr, "Starting Daily Fun Fact API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

/// Store and lock for the configured backend. Redis shares one
/// multiplexed connection between both.
async fn build_backends(
    config: &ApiConfig,
) -> ApiResult<(Arc<dyn FactStore>, Arc<dyn DailyLock>)> {
    match config.store {
        StoreKind::Memory => {
            tracing::warn!("Using in-memory store; facts are lost on restart and not shared");
            Ok((
                Arc::new(InMemoryFactStore::new()),
                Arc::new(InMemoryDailyLock::new()),
            ))
        }
        StoreKind::Redis => {
            let conn = connect(&config.redis_url).await?;
            Ok((
                Arc::new(RedisFactStore::new(conn.clone())),
                Arc::new(RedisDailyLock::new(conn)),
            ))
        }
    }
}

fn config_error(err: funfact_core::ConfigError) -> ApiError {
    ApiError::internal_error(format!("Invalid configuration: {}", err))
}
