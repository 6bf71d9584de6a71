use std::sync::Arc;

use axum::{routing::get, Router};

use crate::core::database::DatabaseProbe;
use crate::features::health::handlers;

/// Create routes for the health feature (no authentication required)
pub fn routes(probe: Arc<dyn DatabaseProbe>) -> Router {
    Router::new()
        .route("/api/health-check", get(handlers::health_check))
        .with_state(probe)
}
