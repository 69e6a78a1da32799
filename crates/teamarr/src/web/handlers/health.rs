//! Liveness/readiness probe for the admin surface.

use std::sync::atomic::Ordering;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::web::responses::HealthResponse;
use crate::web::AppState;

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    summary = "Reports database connectivity and scheduler liveness",
    responses((status = 200, description = "Service health", body = HealthResponse))
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let db_health = state.database.health_check().await;
    let scheduler_running = state.scheduler_running.load(Ordering::Relaxed);

    if db_health.is_healthy {
        Json(HealthResponse::healthy(scheduler_running))
    } else {
        Json(HealthResponse::unhealthy(
            db_health.error.as_deref().unwrap_or("database unreachable"),
        ))
    }
}
