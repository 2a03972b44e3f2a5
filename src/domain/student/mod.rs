//! Domain types for the `students` entity.
//!
//! There are three shapes of a student:
//! - [`StudentForm`]: raw, unvalidated input exactly as a client submitted it.
//! - [`StudentRecord`]: the normalized field values the validator accepted.
//! - [`Student`]: a stored record, i.e. a [`StudentRecord`] plus its store-assigned [`StudentId`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use utoipa::ToSchema;

/// Opaque identity assigned by the record store on creation. Never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct StudentId(pub i64);

impl StudentId {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for StudentId {
    fn from(value: i64) -> Self {
        StudentId(value)
    }
}

/// A candidate student as submitted by a client.
///
/// Every field is optional: a missing value is a validation violation, not a
/// deserialization failure. Numeric and date fields are kept as raw JSON scalars so that
/// both `20` and `"20"` are accepted and coercion errors can be reported per field.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, ToSchema)]
pub struct StudentForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Whole number, e.g. `20` or `"20"`.
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub age: Option<JsonValue>,
    /// Decimal with at most two fractional digits, e.g. `8.5` or `"8.50"`.
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub grade: Option<JsonValue>,
    /// ISO calendar date (`YYYY-MM-DD`).
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub enrollment_date: Option<JsonValue>,
    /// Defaults to `true` when absent.
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub is_active: Option<JsonValue>,
}

impl From<&StudentRecord> for StudentForm {
    /// Pre-fills a form from an existing record (the "edit" form).
    fn from(record: &StudentRecord) -> Self {
        StudentForm {
            name: Some(record.name.clone()),
            email: Some(record.email.clone()),
            age: Some(JsonValue::from(record.age)),
            grade: Some(JsonValue::from(record.grade.to_string())),
            enrollment_date: Some(JsonValue::from(
                record.enrollment_date.format("%Y-%m-%d").to_string(),
            )),
            is_active: Some(JsonValue::from(record.is_active)),
        }
    }
}

/// Field values of a student that passed validation.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct StudentRecord {
    pub name: String,
    pub email: String,
    pub age: i32,
    /// Always carries scale 2 (e.g. `"8.50"`).
    #[schema(value_type = String, example = "8.50")]
    pub grade: Decimal,
    #[schema(value_type = String, format = Date, example = "2024-09-01")]
    pub enrollment_date: NaiveDate,
    pub is_active: bool,
}

/// A persisted student.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Student {
    pub id: StudentId,
    #[serde(flatten)]
    pub record: StudentRecord,
}

impl Student {
    pub fn new(id: StudentId, record: StudentRecord) -> Self {
        Self { id, record }
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.record.name, self.record.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> StudentRecord {
        StudentRecord {
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            age: 20,
            grade: Decimal::new(850, 2),
            enrollment_date: NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
            is_active: true,
        }
    }

    #[test]
    fn test_student_display() {
        let student = Student::new(StudentId(7), record());
        assert_eq!(student.to_string(), "John Doe (john@example.com)");
    }

    #[test]
    fn test_student_serializes_flat() {
        let student = Student::new(StudentId(7), record());
        let value = serde_json::to_value(&student).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 7,
                "name": "John Doe",
                "email": "john@example.com",
                "age": 20,
                "grade": "8.50",
                "enrollment_date": "2024-09-01",
                "is_active": true
            })
        );
    }

    #[test]
    fn test_form_accepts_missing_fields() {
        let form: StudentForm = serde_json::from_value(json!({ "name": "Jane Smith" })).unwrap();
        assert_eq!(form.name.as_deref(), Some("Jane Smith"));
        assert!(form.email.is_none());
        assert!(form.age.is_none());
        assert!(form.is_active.is_none());
    }

    #[test]
    fn test_form_prefilled_from_record() {
        let form = StudentForm::from(&record());
        assert_eq!(form.age, Some(json!(20)));
        assert_eq!(form.grade, Some(json!("8.50")));
        assert_eq!(form.enrollment_date, Some(json!("2024-09-01")));
    }
}
