use crate::domain::student::{Student, StudentForm, StudentId, StudentRecord};
use crate::domain::validation::{Field, Violation, ViolationKind, Violations};
use crate::storage::student::StudentPage;
use crate::transport::http::handlers::{health, students};
use crate::transport::http::types::{
    ApiResponse, RejectionEnvelope, StudentEnvelope, ValidateStudentRequest,
};
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        students::list_students_handler,
        students::create_student_handler,
        students::validate_student_handler,
        students::get_student_handler,
        students::update_student_handler,
        students::delete_student_handler
    ),
    components(schemas(
        ApiResponse,
        StudentForm,
        StudentId,
        StudentRecord,
        Student,
        StudentPage,
        StudentEnvelope,
        ValidateStudentRequest,
        RejectionEnvelope,
        Violations,
        Violation,
        ViolationKind,
        Field
    ))
)]
#[allow(dead_code)]
pub struct ApiDoc;

pub fn create_router(app_state: crate::transport::http::types::AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route(
            "/api/students",
            get(students::list_students_handler).post(students::create_student_handler),
        )
        .route("/api/students/validate", post(students::validate_student_handler))
        .route(
            "/api/students/:id",
            get(students::get_student_handler)
                .put(students::update_student_handler)
                .delete(students::delete_student_handler),
        )
        .with_state(app_state)
}
