#[cfg(test)]
use crate::core::config::Environment;
#[cfg(test)]
use crate::core::middleware::error_envelope;
#[cfg(test)]
use crate::features::categories::{routes as categories_routes, CategoryService, CategoryStore};

#[cfg(test)]
use axum::{middleware::from_fn_with_state, Router};
#[cfg(test)]
use std::sync::Arc;

/// Wrap a router with the same error envelope the server installs
#[cfg(test)]
pub fn with_error_envelope(router: Router) -> Router {
    router.layer(from_fn_with_state(Environment::Test, error_envelope))
}

/// Category routes backed by the given store, ready for `axum_test::TestServer`
#[cfg(test)]
pub fn category_test_app(store: Arc<dyn CategoryStore>) -> Router {
    let service = Arc::new(CategoryService::new(store));
    with_error_envelope(categories_routes::routes(service))
}
