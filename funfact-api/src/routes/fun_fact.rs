//! Fun Fact REST API Routes

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use funfact_core::FactService;

use crate::{
    error::{ApiError, ApiResult, ErrorBody},
    state::AppState,
    telemetry::metrics,
    types::FunFactDto,
};

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// GET /v1/fun-facts/today - Today's fun fact, generating it if needed
///
/// Returns 404 while another caller holds the day's generation lock.
#[utoipa::path(
    get,
    path = "/v1/fun-facts/today",
    tag = "Fun Facts",
    responses(
        (status = 200, description = "Today's fun fact", body = FunFactDto),
        (status = 404, description = "Fact is being generated elsewhere", body = ErrorBody),
        (status = 500, description = "Storage or generation failed", body = ErrorBody),
        (status = 503, description = "Generation backend is rate limited", body = ErrorBody),
    ),
)]
pub async fn get_today(State(service): State<Arc<FactService>>) -> ApiResult<Json<FunFactDto>> {
    tracing::info!("Retrieving today's fun fact");

    // Detached so a client disconnect cannot cancel a run that holds the
    // lock between acquire and release.
    let resolution = tokio::spawn(async move { service.resolve_today().await })
        .await
        .map_err(|e| ApiError::internal_error(format!("Fact resolution task failed: {}", e)))?;

    let resolution = match resolution {
        Ok(resolution) => resolution,
        Err(err) => {
            if let Some(metrics) = metrics() {
                metrics.record_generation_failure();
            }
            return Err(err.into());
        }
    };

    if let Some(metrics) = metrics() {
        metrics.record_lookup(resolution.outcome);
    }

    let fact = resolution.fact.ok_or_else(ApiError::fact_not_found)?;
    Ok(Json(FunFactDto::from(fact)))
}

/// GET /v1/fun-facts/recent - The most recent stored facts, newest first
#[utoipa::path(
    get,
    path = "/v1/fun-facts/recent",
    tag = "Fun Facts",
    responses(
        (status = 200, description = "Recent fun facts, newest first", body = Vec<FunFactDto>),
        (status = 500, description = "Storage failed", body = ErrorBody),
    ),
)]
pub async fn get_recent(
    State(service): State<Arc<FactService>>,
) -> ApiResult<Json<Vec<FunFactDto>>> {
    let facts = service
        .get_recent_fun_facts(service.config().recent_limit)
        .await?;

    Ok(Json(facts.into_iter().map(FunFactDto::from).collect()))
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the fun fact routes router.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/today", get(get_today))
        .route("/recent", get(get_recent))
}
