//! Violation types produced by the student validator.
//!
//! A violation is data, not an error: it describes one failed rule so that a caller can
//! annotate the submitted form field by field.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Student fields a violation can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Email,
    Age,
    Grade,
    EnrollmentDate,
    IsActive,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Age => "age",
            Field::Grade => "grade",
            Field::EnrollmentDate => "enrollment_date",
            Field::IsActive => "is_active",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a failed rule.
///
/// `Required` and `InvalidValue` describe input that could not be read at all; every other
/// kind is a business rule evaluated on a readable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationKind {
    Required,
    InvalidValue,
    NameTooShort,
    NameMissingPart,
    NameInvalidCharacter,
    EmailInvalidFormat,
    EmailDuplicate,
    AgeOutOfRange,
    GradeOutOfRange,
    EnrollmentDateFuture,
    EnrollmentDateTooOld,
    AgeGradeMismatch,
}

impl ViolationKind {
    /// Stable code, identical to the serialized form.
    pub fn code(&self) -> &'static str {
        match self {
            ViolationKind::Required => "REQUIRED",
            ViolationKind::InvalidValue => "INVALID_VALUE",
            ViolationKind::NameTooShort => "NAME_TOO_SHORT",
            ViolationKind::NameMissingPart => "NAME_MISSING_PART",
            ViolationKind::NameInvalidCharacter => "NAME_INVALID_CHARACTER",
            ViolationKind::EmailInvalidFormat => "EMAIL_INVALID_FORMAT",
            ViolationKind::EmailDuplicate => "EMAIL_DUPLICATE",
            ViolationKind::AgeOutOfRange => "AGE_OUT_OF_RANGE",
            ViolationKind::GradeOutOfRange => "GRADE_OUT_OF_RANGE",
            ViolationKind::EnrollmentDateFuture => "ENROLLMENT_DATE_FUTURE",
            ViolationKind::EnrollmentDateTooOld => "ENROLLMENT_DATE_TOO_OLD",
            ViolationKind::AgeGradeMismatch => "AGE_GRADE_MISMATCH",
        }
    }

    /// True for missing/unparsable input as opposed to a failed business rule.
    pub fn is_input_error(&self) -> bool {
        matches!(self, ViolationKind::Required | ViolationKind::InvalidValue)
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One failed rule. `field` is `None` for record-level (cross-field) rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Violation {
    pub field: Option<Field>,
    pub kind: ViolationKind,
    pub message: String,
}

impl Violation {
    pub fn field(field: Field, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            field: Some(field),
            kind,
            message: message.into(),
        }
    }

    pub fn record(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            field: None,
            kind,
            message: message.into(),
        }
    }

    pub fn required(field: Field) -> Self {
        Self::field(field, ViolationKind::Required, "This field is required.")
    }

    pub fn invalid(field: Field, message: impl Into<String>) -> Self {
        Self::field(field, ViolationKind::InvalidValue, message)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.field {
            Some(field) => write!(f, "{}: {} ({})", field, self.kind, self.message),
            None => write!(f, "{} ({})", self.kind, self.message),
        }
    }
}

/// Ordered list of violations, in the order the rules were evaluated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, violation: Violation) {
        self.0.push(violation);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    pub fn contains(&self, kind: ViolationKind) -> bool {
        self.0.iter().any(|v| v.kind == kind)
    }

    pub fn kinds(&self) -> Vec<ViolationKind> {
        self.0.iter().map(|v| v.kind).collect()
    }

    /// Violations attached to `field`, in order.
    pub fn for_field(&self, field: Field) -> impl Iterator<Item = &Violation> {
        self.0.iter().filter(move |v| v.field == Some(field))
    }

    /// Record-level violations, in order.
    pub fn record_level(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter().filter(|v| v.field.is_none())
    }

    pub fn into_inner(self) -> Vec<Violation> {
        self.0
    }
}

impl From<Vec<Violation>> for Violations {
    fn from(value: Vec<Violation>) -> Self {
        Violations(value)
    }
}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|v| v.to_string()).collect();
        f.write_str(&parts.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_code_matches_serialized_form() {
        for kind in [
            ViolationKind::Required,
            ViolationKind::NameMissingPart,
            ViolationKind::EnrollmentDateTooOld,
            ViolationKind::AgeGradeMismatch,
        ] {
            assert_eq!(serde_json::to_value(kind).unwrap(), json!(kind.code()));
        }
    }

    #[test]
    fn test_violation_serialization() {
        let field_level = Violation::field(Field::EnrollmentDate, ViolationKind::EnrollmentDateFuture, "nope");
        assert_eq!(
            serde_json::to_value(&field_level).unwrap(),
            json!({ "field": "enrollment_date", "kind": "ENROLLMENT_DATE_FUTURE", "message": "nope" })
        );

        let record_level = Violation::record(ViolationKind::AgeGradeMismatch, "nope");
        assert_eq!(
            serde_json::to_value(&record_level).unwrap(),
            json!({ "field": null, "kind": "AGE_GRADE_MISMATCH", "message": "nope" })
        );
    }

    #[test]
    fn test_violations_filters() {
        let violations = Violations::from(vec![
            Violation::required(Field::Name),
            Violation::field(Field::Age, ViolationKind::AgeOutOfRange, "too young"),
            Violation::record(ViolationKind::AgeGradeMismatch, "mismatch"),
        ]);
        assert_eq!(violations.len(), 3);
        assert!(violations.contains(ViolationKind::Required));
        assert!(!violations.contains(ViolationKind::EmailDuplicate));
        assert_eq!(violations.for_field(Field::Age).count(), 1);
        assert_eq!(violations.record_level().count(), 1);
        assert!(violations.kinds()[0].is_input_error());
        assert!(!violations.kinds()[1].is_input_error());
    }
}
