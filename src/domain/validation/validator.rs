//! The student validator.
//!
//! `validate` runs every rule on a candidate and either accepts it as a normalized
//! [`StudentRecord`] or rejects it with every violation found. Rules never short-circuit
//! across fields; within a field, a value that cannot be read reports `REQUIRED` or
//! `INVALID_VALUE` instead of its business rules.
//!
//! The email uniqueness lookup is the only interaction with the record store. It is a
//! pre-check: two concurrent create requests for the same address can both pass it before
//! either is persisted, so stores must enforce uniqueness themselves as well.

use crate::domain::student::{StudentForm, StudentId, StudentRecord};
use crate::domain::validation::parse;
use crate::domain::validation::rules::{self, AgeAndGrade, Rule, RuleContext};
use crate::domain::validation::violation::{Field, Violation, ViolationKind, Violations};
use crate::storage::student::{StoreError, StudentStore};
use chrono::{Local, NaiveDate};
use std::borrow::Borrow;
use std::sync::Arc;

/// Outcome of a validation run. Store failures are reported separately as `Err(StoreError)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Accepted(StudentRecord),
    Rejected(Violations),
}

impl Validation {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Validation::Accepted(_))
    }

    /// Violations of a rejected candidate; `None` when accepted.
    pub fn violations(&self) -> Option<&Violations> {
        match self {
            Validation::Accepted(_) => None,
            Validation::Rejected(v) => Some(v),
        }
    }
}

/// A field value together with whether it passed its own rules.
struct Checked<T> {
    value: Option<T>,
    passed: bool,
}

fn check_field<T, R>(
    field: Field,
    parsed: Result<T, Violation>,
    field_rules: &[Rule<R>],
    ctx: &RuleContext,
    out: &mut Violations,
) -> Checked<T>
where
    T: Borrow<R>,
    R: ?Sized,
{
    match parsed {
        Ok(value) => {
            let passed = rules::apply(field, field_rules, value.borrow(), ctx, out);
            Checked {
                value: Some(value),
                passed,
            }
        }
        Err(violation) => {
            out.push(violation);
            Checked {
                value: None,
                passed: false,
            }
        }
    }
}

#[derive(Clone)]
pub struct Validator {
    store: Arc<dyn StudentStore>,
}

impl Validator {
    pub fn new(store: Arc<dyn StudentStore>) -> Self {
        Self { store }
    }

    /// Validates `form` against today's local date.
    ///
    /// `existing` is the identity of the record being updated, if any; it is only used to
    /// exempt that record from the email uniqueness lookup.
    pub async fn validate(
        &self,
        form: &StudentForm,
        existing: Option<StudentId>,
    ) -> Result<Validation, StoreError> {
        self.validate_on(form, existing, Local::now().date_naive())
            .await
    }

    /// Same as [`Validator::validate`] with an explicit "today".
    pub async fn validate_on(
        &self,
        form: &StudentForm,
        existing: Option<StudentId>,
        today: NaiveDate,
    ) -> Result<Validation, StoreError> {
        let ctx = RuleContext { today };
        let mut violations = Violations::new();

        let name = check_field(
            Field::Name,
            parse::text(Field::Name, form.name.as_deref()),
            rules::NAME_RULES,
            &ctx,
            &mut violations,
        );

        let email = check_field(
            Field::Email,
            parse::text(Field::Email, form.email.as_deref()),
            rules::EMAIL_RULES,
            &ctx,
            &mut violations,
        );
        if let Some(address) = email.value.as_deref() {
            if self.store.exists_with_email(address, existing).await? {
                violations.push(Violation::field(
                    Field::Email,
                    ViolationKind::EmailDuplicate,
                    rules::EMAIL_DUPLICATE_MESSAGE,
                ));
            }
        }

        let age = check_field(
            Field::Age,
            parse::integer(Field::Age, form.age.as_ref()),
            rules::AGE_RULES,
            &ctx,
            &mut violations,
        );

        let grade = check_field(
            Field::Grade,
            parse::decimal(Field::Grade, form.grade.as_ref()),
            rules::GRADE_RULES,
            &ctx,
            &mut violations,
        );

        let enrollment_date = check_field(
            Field::EnrollmentDate,
            parse::date(Field::EnrollmentDate, form.enrollment_date.as_ref()),
            rules::ENROLLMENT_DATE_RULES,
            &ctx,
            &mut violations,
        );

        let is_active = match parse::boolean(Field::IsActive, form.is_active.as_ref(), true) {
            Ok(v) => Some(v),
            Err(violation) => {
                violations.push(violation);
                None
            }
        };

        // Only plausible values are compared; a failed range rule already explains the problem.
        if let (true, true, Some(age), Some(grade)) = (age.passed, grade.passed, age.value, grade.value) {
            rules::apply_record(
                rules::RECORD_RULES,
                &AgeAndGrade { age, grade },
                &ctx,
                &mut violations,
            );
        }

        if !violations.is_empty() {
            return Ok(Validation::Rejected(violations));
        }

        match (name.value, email.value, age.value, grade.value, enrollment_date.value, is_active) {
            (Some(name), Some(email), Some(age), Some(grade), Some(enrollment_date), Some(is_active)) => {
                match i32::try_from(age) {
                    Ok(age) => Ok(Validation::Accepted(StudentRecord {
                        name,
                        email,
                        age,
                        grade,
                        enrollment_date,
                        is_active,
                    })),
                    Err(_) => Ok(Validation::Rejected(Violations::from(vec![Violation::field(
                        Field::Age,
                        ViolationKind::AgeOutOfRange,
                        "Age cannot exceed 100",
                    )]))),
                }
            }
            // Every missing value above has pushed a violation.
            _ => Ok(Validation::Rejected(violations)),
        }
    }
}
