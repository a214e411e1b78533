pub mod admin;
pub mod auth;
pub mod projects;
pub mod uploads;
pub mod users;

use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

pub const ROOT_MESSAGE: &str = "Editorial CMS server running";

pub async fn root() -> &'static str {
    ROOT_MESSAGE
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy or degraded", body = crate::health::HealthResponse),
        (status = 503, description = "A critical dependency is down", body = crate::health::HealthResponse)
    ),
    tag = "Health"
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let report = state.health.check().await;
    let status_code = if report.is_unhealthy() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    (status_code, Json(report))
}
