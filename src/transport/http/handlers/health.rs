use crate::transport::http::handlers::common::{failure, success};
use crate::transport::http::types::{ApiResponse, AppState};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use tracing::warn;

/// Liveness plus store reachability.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Record store reachable", body = ApiResponse),
        (status = 503, description = "Record store unreachable", body = ApiResponse)
    )
)]
pub async fn healthcheck_handler(State(state): State<AppState>) -> Response {
    if let Err(e) = state.student_service.store().ping().await {
        warn!(error = %e, "health check: store ping failed");
        return failure(StatusCode::SERVICE_UNAVAILABLE, format!("Store ping failed: {}", e));
    }
    success(StatusCode::OK, serde_json::json!({ "status": "ok" }))
}
