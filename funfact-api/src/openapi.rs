//! OpenAPI Specification for the Daily Fun Fact API
//!
//! Generated by utoipa from the route annotations and schema derives.

use utoipa::OpenApi;

use crate::error::ErrorBody;
use crate::routes::{fun_fact, health};
use crate::telemetry::metrics;
use crate::types::FunFactDto;

/// OpenAPI document for the Daily Fun Fact API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Daily Fun Fact API",
        version = "0.1.0",
        description = "One generated fun fact per calendar day, shared by every caller"
    ),
    servers(
        (url = "http://localhost:8000", description = "Local Development")
    ),
    tags(
        (name = "Fun Facts", description = "Today's fact and recent history"),
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Observability", description = "Prometheus metrics")
    ),
    paths(
        fun_fact::get_today,
        fun_fact::get_recent,
        health::ping,
        health::liveness,
        health::readiness,
        metrics::metrics_handler,
    ),
    components(
        schemas(
            FunFactDto,
            ErrorBody,
            health::HealthResponse,
            health::HealthStatus,
            health::HealthDetails,
            health::ComponentHealth,
        )
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Pretty-printed JSON document.
    pub fn to_json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::openapi())
    }
}
