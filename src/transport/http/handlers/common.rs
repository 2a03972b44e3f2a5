use crate::app::student_service::ServiceError;
use crate::domain::student::StudentId;
use crate::domain::validation::Violations;
use crate::storage::student::StoreError;
use crate::transport::http::types::{ApiResponse, RejectionEnvelope};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::warn;

pub const REJECTION_MESSAGE: &str = "Please correct the errors below.";

pub fn success<T: Serialize>(status: StatusCode, data: T) -> Response {
    match serde_json::to_value(data) {
        Ok(value) => (
            status,
            Json(ApiResponse {
                success: true,
                data: Some(value),
                error: None,
            }),
        )
            .into_response(),
        Err(e) => failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to serialize response: {}", e),
        ),
    }
}

pub fn failure(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ApiResponse {
            success: false,
            data: None,
            error: Some(error.into()),
        }),
    )
        .into_response()
}

/// 422 with the ordered violation list at `data.violations`.
pub fn rejected(violations: Violations) -> Response {
    let data = serde_json::to_value(RejectionEnvelope { violations }).ok();
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiResponse {
            success: false,
            data,
            error: Some(REJECTION_MESSAGE.to_string()),
        }),
    )
        .into_response()
}

pub fn not_found(id: StudentId) -> Response {
    failure(StatusCode::NOT_FOUND, format!("Student {} not found", id))
}

pub fn service_error(err: ServiceError) -> Response {
    match err {
        ServiceError::NotFound(id) => not_found(id),
        ServiceError::Store(e) => store_error(e),
    }
}

/// Store problems are infrastructure failures, never "fix your input".
pub fn store_error(err: StoreError) -> Response {
    match err {
        StoreError::NotFound(id) => not_found(id),
        StoreError::DuplicateEmail(email) => failure(
            StatusCode::CONFLICT,
            format!("A student with email '{}' already exists", email),
        ),
        StoreError::Unavailable(reason) => {
            warn!(reason = %reason, "record store unavailable");
            failure(
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Record store unavailable: {}", reason),
            )
        }
    }
}

pub fn json_422(err: JsonRejection, expected: &str) -> Response {
    failure(
        StatusCode::UNPROCESSABLE_ENTITY,
        format!("Invalid JSON body: {} (expected: {})", err, expected),
    )
}

pub fn path_400(err: PathRejection) -> Response {
    failure(StatusCode::BAD_REQUEST, format!("Invalid student id: {}", err))
}

pub fn query_400(err: QueryRejection) -> Response {
    failure(StatusCode::BAD_REQUEST, format!("Invalid query string: {}", err))
}
