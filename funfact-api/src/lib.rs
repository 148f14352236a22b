//! Daily Fun Fact API - HTTP Layer
//!
//! Axum routes over a shared [`funfact_core::FactService`], plus health
//! probes, Prometheus metrics and the OpenAPI document.

#[macro_use]
mod macros;

pub mod config;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod telemetry;
pub mod types;

// Re-export commonly used types
pub use config::{ApiConfig, StoreKind};
pub use error::{ApiError, ApiResult, ErrorBody, ErrorCode};
pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;
pub use types::FunFactDto;
