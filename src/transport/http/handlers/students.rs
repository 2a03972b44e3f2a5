use crate::app::student_service::SaveOutcome;
use crate::domain::student::{StudentForm, StudentId};
use crate::domain::validation::Validation;
use crate::storage::student::{ListQuery, MAX_PER_PAGE};
use crate::transport::http::handlers::common::{
    failure, json_422, path_400, query_400, rejected, service_error, success,
};
use crate::transport::http::types::{
    ApiResponse, AppState, ListStudentsParams, StudentEnvelope, ValidateStudentRequest,
};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;

const STUDENT_BODY: &str = "{\"name\", \"email\", \"age\", \"grade\", \"enrollment_date\", \"is_active\"}";

#[utoipa::path(
    get,
    path = "/api/students",
    params(ListStudentsParams),
    responses(
        (status = 200, description = "One page of students, newest enrollment first", body = ApiResponse),
        (status = 400, description = "Bad request (invalid paging or filter)", body = ApiResponse),
        (status = 503, description = "Record store unavailable", body = ApiResponse)
    )
)]
pub async fn list_students_handler(
    State(state): State<AppState>,
    params: Result<Query<ListStudentsParams>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(v) => v,
        Err(e) => return query_400(e),
    };

    let page = params.page.unwrap_or(1);
    if page == 0 {
        return failure(StatusCode::BAD_REQUEST, "page must be 1 or greater");
    }
    let per_page = params.per_page.unwrap_or(state.page_size);
    if per_page == 0 {
        return failure(StatusCode::BAD_REQUEST, "per_page must be 1 or greater");
    }

    let query = ListQuery {
        page,
        per_page: per_page.min(MAX_PER_PAGE),
        is_active: params.is_active,
        search: params.search,
    };

    match state.student_service.list(&query).await {
        Ok(page) => success(StatusCode::OK, page),
        Err(e) => service_error(e),
    }
}

#[utoipa::path(
    post,
    path = "/api/students",
    request_body = StudentForm,
    responses(
        (status = 201, description = "Student created", body = ApiResponse),
        (status = 422, description = "Validation failed (see data.violations) or invalid JSON body", body = ApiResponse),
        (status = 503, description = "Record store unavailable", body = ApiResponse)
    )
)]
pub async fn create_student_handler(
    State(state): State<AppState>,
    request: Result<Json<StudentForm>, JsonRejection>,
) -> Response {
    let Json(form) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, STUDENT_BODY),
    };

    match state.student_service.create(&form).await {
        Ok(SaveOutcome::Saved(student)) => success(
            StatusCode::CREATED,
            StudentEnvelope {
                message: Some("Student created successfully!".to_string()),
                student,
            },
        ),
        Ok(SaveOutcome::Rejected(violations)) => rejected(violations),
        Err(e) => service_error(e),
    }
}

#[utoipa::path(
    post,
    path = "/api/students/validate",
    request_body = ValidateStudentRequest,
    responses(
        (status = 200, description = "Candidate would be accepted (data.student is the normalized record)", body = ApiResponse),
        (status = 422, description = "Validation failed (see data.violations) or invalid JSON body", body = ApiResponse),
        (status = 503, description = "Record store unavailable", body = ApiResponse)
    )
)]
pub async fn validate_student_handler(
    State(state): State<AppState>,
    request: Result<Json<ValidateStudentRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, "{\"student\": {...}, \"existing_id\": null}"),
    };

    match state
        .student_service
        .validate(&request.student, request.existing_id)
        .await
    {
        Ok(Validation::Accepted(record)) => success(
            StatusCode::OK,
            serde_json::json!({ "valid": true, "student": record }),
        ),
        Ok(Validation::Rejected(violations)) => rejected(violations),
        Err(e) => service_error(e),
    }
}

#[utoipa::path(
    get,
    path = "/api/students/{id}",
    params(
        ("id" = i64, Path, description = "Student id")
    ),
    responses(
        (status = 200, description = "Student detail", body = ApiResponse),
        (status = 400, description = "Invalid id", body = ApiResponse),
        (status = 404, description = "Not found", body = ApiResponse),
        (status = 503, description = "Record store unavailable", body = ApiResponse)
    )
)]
pub async fn get_student_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Response {
    let Path(id) = match id {
        Ok(v) => v,
        Err(e) => return path_400(e),
    };

    match state.student_service.get(StudentId(id)).await {
        Ok(student) => success(
            StatusCode::OK,
            StudentEnvelope {
                message: None,
                student,
            },
        ),
        Err(e) => service_error(e),
    }
}

#[utoipa::path(
    put,
    path = "/api/students/{id}",
    params(
        ("id" = i64, Path, description = "Student id")
    ),
    request_body = StudentForm,
    responses(
        (status = 200, description = "Student updated", body = ApiResponse),
        (status = 400, description = "Invalid id", body = ApiResponse),
        (status = 404, description = "Not found", body = ApiResponse),
        (status = 422, description = "Validation failed (see data.violations) or invalid JSON body", body = ApiResponse),
        (status = 503, description = "Record store unavailable", body = ApiResponse)
    )
)]
pub async fn update_student_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    request: Result<Json<StudentForm>, JsonRejection>,
) -> Response {
    let Path(id) = match id {
        Ok(v) => v,
        Err(e) => return path_400(e),
    };
    let Json(form) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, STUDENT_BODY),
    };

    match state.student_service.update(StudentId(id), &form).await {
        Ok(SaveOutcome::Saved(student)) => success(
            StatusCode::OK,
            StudentEnvelope {
                message: Some("Student updated successfully!".to_string()),
                student,
            },
        ),
        Ok(SaveOutcome::Rejected(violations)) => rejected(violations),
        Err(e) => service_error(e),
    }
}

#[utoipa::path(
    delete,
    path = "/api/students/{id}",
    params(
        ("id" = i64, Path, description = "Student id")
    ),
    responses(
        (status = 200, description = "Student deleted", body = ApiResponse),
        (status = 400, description = "Invalid id", body = ApiResponse),
        (status = 404, description = "Not found", body = ApiResponse),
        (status = 503, description = "Record store unavailable", body = ApiResponse)
    )
)]
pub async fn delete_student_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Response {
    let Path(id) = match id {
        Ok(v) => v,
        Err(e) => return path_400(e),
    };

    match state.student_service.delete(StudentId(id)).await {
        Ok(()) => success(
            StatusCode::OK,
            serde_json::json!({ "message": "Student deleted successfully!", "id": id }),
        ),
        Err(e) => service_error(e),
    }
}
