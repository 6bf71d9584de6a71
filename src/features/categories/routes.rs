use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::features::categories::handlers;
use crate::features::categories::services::CategoryService;

/// Create routes for the categories feature
///
/// Note: This feature is public (no authentication required)
pub fn routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route(
            "/api/v1/categories",
            get(handlers::list_categories).post(handlers::add_category),
        )
        .route(
            "/api/v1/categories/{id}",
            get(handlers::fetch_subtree).delete(handlers::remove_category),
        )
        .route("/api/v1/categories/{id}/move", patch(handlers::move_subtree))
        .with_state(service)
}
