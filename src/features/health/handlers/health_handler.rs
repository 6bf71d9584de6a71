use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::core::database::DatabaseProbe;
use crate::features::health::dtos::{ComponentHealthDto, HealthInfoDto, HealthResponseDto};

/// Health check
///
/// Pings the database; responds 503 when it is unreachable.
#[utoipa::path(
    get,
    path = "/api/health-check",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponseDto),
        (status = 503, description = "Database unreachable", body = HealthResponseDto)
    ),
    tag = "health"
)]
pub async fn health_check(
    State(probe): State<Arc<dyn DatabaseProbe>>,
) -> (StatusCode, Json<HealthResponseDto>) {
    let database = match probe.ping().await {
        Ok(()) => ComponentHealthDto::up(Some("Database connection is healthy".to_string())),
        Err(e) => {
            tracing::error!("Database health check failed: {}", e);
            ComponentHealthDto::down("Database connection is not healthy")
        }
    };
    let server = ComponentHealthDto::up(Some("Category tree server is live".to_string()));

    let healthy = database.is_up() && server.is_up();
    let (status, label) = if healthy {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "error")
    };

    (
        status,
        Json(HealthResponseDto {
            status: label.to_string(),
            info: HealthInfoDto { database, server },
        }),
    )
}
