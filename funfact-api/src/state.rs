//! Shared application state for Axum routers.

use std::sync::Arc;
use std::time::Instant;

use funfact_core::FactService;

/// Application-wide state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    /// The single service instance built at startup.
    pub service: Arc<FactService>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(service: Arc<FactService>) -> Self {
        Self {
            service,
            start_time: Instant::now(),
        }
    }
}

crate::impl_from_ref!(Arc<FactService>, service);
crate::impl_from_ref!(Instant, start_time);
