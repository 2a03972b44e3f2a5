use crate::app::student_service::StudentService;
use crate::domain::student::{Student, StudentForm, StudentId};
use crate::domain::validation::Violations;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

#[derive(Clone)]
pub struct AppState {
    pub student_service: Arc<StudentService>,
    /// Listing page size used when a request does not pass `per_page`.
    pub page_size: u32,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Query string of `GET /api/students`.
#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListStudentsParams {
    /// 1-based page number (default 1).
    pub page: Option<u32>,
    /// Page size (default from `PAGE_SIZE`, capped at 100).
    pub per_page: Option<u32>,
    /// Only active (`true`) or inactive (`false`) students.
    pub is_active: Option<bool>,
    /// Case-insensitive substring of name or email.
    pub search: Option<String>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct ValidateStudentRequest {
    pub student: StudentForm,
    /// Identity of the record being edited; exempts it from the email uniqueness check.
    #[serde(default)]
    pub existing_id: Option<StudentId>,
}

/// `data` payload of a successful create/update/detail response.
#[derive(Serialize, Debug, ToSchema)]
pub struct StudentEnvelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub student: Student,
}

/// `data` payload of a rejected create/update/validate request.
#[derive(Serialize, Debug, ToSchema)]
pub struct RejectionEnvelope {
    pub violations: Violations,
}
