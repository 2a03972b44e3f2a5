//! The Student Service.
//!
//! This module sits between the HTTP layer and the record store. It is responsible for:
//! 1.  Running the validator on every create/update before anything is written.
//! 2.  Persisting accepted records through the injected `StudentStore`.
//! 3.  Turning a storage-level duplicate email (a lost race between concurrent writers)
//!     back into an ordinary `EMAIL_DUPLICATE` rejection.

use crate::domain::student::{Student, StudentForm, StudentId, StudentRecord};
use crate::domain::validation::rules::EMAIL_DUPLICATE_MESSAGE;
use crate::domain::validation::{Field, Validation, Validator, Violation, ViolationKind, Violations};
use crate::storage::student::{ListQuery, StoreError, StudentPage, StudentStore};
use chrono::{Local, NaiveDate};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

/// Result of a create/update that reached the validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(Student),
    Rejected(Violations),
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("student {0} not found")]
    NotFound(StudentId),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => ServiceError::NotFound(id),
            other => ServiceError::Store(other),
        }
    }
}

pub struct StudentService {
    store: Arc<dyn StudentStore>,
    validator: Validator,
}

impl StudentService {
    pub fn new(store: Arc<dyn StudentStore>) -> Self {
        let validator = Validator::new(store.clone());
        Self { store, validator }
    }

    pub fn store(&self) -> &Arc<dyn StudentStore> {
        &self.store
    }

    /// Dry run: validates without writing.
    pub async fn validate(
        &self,
        form: &StudentForm,
        existing: Option<StudentId>,
    ) -> Result<Validation, ServiceError> {
        self.validate_on(form, existing, today()).await
    }

    pub async fn validate_on(
        &self,
        form: &StudentForm,
        existing: Option<StudentId>,
        today: NaiveDate,
    ) -> Result<Validation, ServiceError> {
        self.validator
            .validate_on(form, existing, today)
            .await
            .map_err(|e| {
                error!(error = %e, "email uniqueness lookup failed");
                ServiceError::Store(e)
            })
    }

    pub async fn create(&self, form: &StudentForm) -> Result<SaveOutcome, ServiceError> {
        self.create_on(form, today()).await
    }

    pub async fn create_on(
        &self,
        form: &StudentForm,
        today: NaiveDate,
    ) -> Result<SaveOutcome, ServiceError> {
        let record = match self.validate_on(form, None, today).await? {
            Validation::Accepted(record) => record,
            Validation::Rejected(violations) => {
                debug!(violations = %violations, "student create rejected");
                return Ok(SaveOutcome::Rejected(violations));
            }
        };

        match self.store.insert(&record).await {
            Ok(student) => {
                info!(id = %student.id, student = %student, "student created");
                Ok(SaveOutcome::Saved(student))
            }
            Err(e) => self.persist_failure(e, &record),
        }
    }

    pub async fn update(
        &self,
        id: StudentId,
        form: &StudentForm,
    ) -> Result<SaveOutcome, ServiceError> {
        self.update_on(id, form, today()).await
    }

    pub async fn update_on(
        &self,
        id: StudentId,
        form: &StudentForm,
        today: NaiveDate,
    ) -> Result<SaveOutcome, ServiceError> {
        if self.store.get(id).await?.is_none() {
            return Err(ServiceError::NotFound(id));
        }

        let record = match self.validate_on(form, Some(id), today).await? {
            Validation::Accepted(record) => record,
            Validation::Rejected(violations) => {
                debug!(id = %id, violations = %violations, "student update rejected");
                return Ok(SaveOutcome::Rejected(violations));
            }
        };

        match self.store.update(id, &record).await {
            Ok(student) => {
                info!(id = %student.id, student = %student, "student updated");
                Ok(SaveOutcome::Saved(student))
            }
            Err(e) => self.persist_failure(e, &record),
        }
    }

    pub async fn get(&self, id: StudentId) -> Result<Student, ServiceError> {
        self.store
            .get(id)
            .await?
            .ok_or(ServiceError::NotFound(id))
    }

    pub async fn list(&self, query: &ListQuery) -> Result<StudentPage, ServiceError> {
        Ok(self.store.list(query).await?)
    }

    pub async fn delete(&self, id: StudentId) -> Result<(), ServiceError> {
        self.store.delete(id).await?;
        info!(id = %id, "student deleted");
        Ok(())
    }

    fn persist_failure(
        &self,
        e: StoreError,
        record: &StudentRecord,
    ) -> Result<SaveOutcome, ServiceError> {
        match e {
            StoreError::DuplicateEmail(_) => {
                debug!(email = %record.email, "email claimed by a concurrent write");
                Ok(SaveOutcome::Rejected(Violations::from(vec![Violation::field(
                    Field::Email,
                    ViolationKind::EmailDuplicate,
                    EMAIL_DUPLICATE_MESSAGE,
                )])))
            }
            other => {
                error!(error = %other, "failed to persist student");
                Err(ServiceError::from(other))
            }
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
