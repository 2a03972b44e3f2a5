//! The record store contract for students.

use crate::domain::student::{Student, StudentId, StudentRecord};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

pub const DEFAULT_PER_PAGE: u32 = 10;
pub const MAX_PER_PAGE: u32 = 100;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("student {0} not found")]
    NotFound(StudentId),
    /// Storage-level uniqueness backstop for the validator's email pre-check.
    #[error("a student with email '{0}' already exists")]
    DuplicateEmail(String),
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Unavailable(e.to_string())
    }
}

/// Listing parameters. `page` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub per_page: u32,
    pub is_active: Option<bool>,
    /// Case-insensitive substring matched against name and email.
    pub search: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            is_active: None,
            search: None,
        }
    }
}

impl ListQuery {
    /// Number of rows to skip.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.max(1) - 1) * u64::from(self.per_page)
    }

    /// Trimmed search term, `None` if blank.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// One page of students, ordered by enrollment date (newest first), then id.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct StudentPage {
    pub items: Vec<Student>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub total_pages: u32,
    /// True when a later page exists.
    pub has_next: bool,
}

impl StudentPage {
    pub fn new(items: Vec<Student>, query: &ListQuery, total: u64) -> Self {
        let per_page = u64::from(query.per_page.max(1));
        let total_pages = u32::try_from(total.div_ceil(per_page)).unwrap_or(u32::MAX);
        Self {
            items,
            page: query.page,
            per_page: query.per_page,
            total,
            total_pages,
            has_next: query.page < total_pages,
        }
    }
}

/// Persistence and lookup for student records.
///
/// Implementations must reject a second record with the same email on `insert`/`update`
/// (`StoreError::DuplicateEmail`): the validator's lookup alone does not close the race
/// between concurrent writers.
#[async_trait]
pub trait StudentStore: Send + Sync {
    /// True if a record other than `excluding` already uses `email` (exact, case-sensitive).
    async fn exists_with_email(
        &self,
        email: &str,
        excluding: Option<StudentId>,
    ) -> Result<bool, StoreError>;

    /// Persists a new record and returns it with its assigned identity.
    async fn insert(&self, record: &StudentRecord) -> Result<Student, StoreError>;

    /// Overwrites all fields of an existing record.
    async fn update(&self, id: StudentId, record: &StudentRecord) -> Result<Student, StoreError>;

    async fn get(&self, id: StudentId) -> Result<Option<Student>, StoreError>;

    async fn list(&self, query: &ListQuery) -> Result<StudentPage, StoreError>;

    async fn delete(&self, id: StudentId) -> Result<(), StoreError>;

    /// Cheap reachability check used by the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}
