pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::student_service::{SaveOutcome, ServiceError, StudentService};
pub use domain::student::{Student, StudentForm, StudentId, StudentRecord};
pub use domain::validation::{Validation, Validator, Violation, ViolationKind, Violations};
pub use infra::config::AppConfig;
pub use storage::student::{
    open_store, InMemoryStudentStore, ListQuery, PostgresStudentStore, StoreError, StudentPage,
    StudentStore,
};
