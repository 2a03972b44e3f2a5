//! Table-driven student rules.
//!
//! Each field owns an ordered list of independent predicates. A predicate returns the
//! message to report when it fails, `None` when it passes. Record-level rules run on values
//! that already passed their own field rules.

use crate::domain::validation::email::is_valid_email;
use crate::domain::validation::violation::{Field, Violation, ViolationKind, Violations};
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

pub const MIN_NAME_CHARS: usize = 2;
pub const MIN_AGE: i64 = 15;
pub const MAX_AGE: i64 = 100;
/// Below this age the grade is capped, see [`minor_grade_cap`].
pub const ADULT_AGE: i64 = 18;
/// 50 years, counted as 50 * 365 days (not calendar years).
pub const MAX_ENROLLMENT_AGE_DAYS: i64 = 365 * 50;

pub fn min_grade() -> Decimal {
    Decimal::ZERO
}

pub fn max_grade() -> Decimal {
    Decimal::TEN
}

pub fn minor_grade_cap() -> Decimal {
    Decimal::new(8, 0)
}

/// Inputs shared by every rule of one validation run.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext {
    pub today: NaiveDate,
}

impl RuleContext {
    /// Oldest enrollment date still accepted (inclusive).
    pub fn oldest_enrollment_date(&self) -> NaiveDate {
        self.today - Duration::days(MAX_ENROLLMENT_AGE_DAYS)
    }
}

/// A single predicate over a value of type `T`.
pub struct Rule<T: ?Sized> {
    pub kind: ViolationKind,
    pub check: fn(&T, &RuleContext) -> Option<&'static str>,
}

/// Runs every rule in order, recording each failure against `field`.
/// Returns true when all rules passed.
pub fn apply<T: ?Sized>(
    field: Field,
    rules: &[Rule<T>],
    value: &T,
    ctx: &RuleContext,
    out: &mut Violations,
) -> bool {
    let mut passed = true;
    for rule in rules {
        if let Some(message) = (rule.check)(value, ctx) {
            out.push(Violation::field(field, rule.kind, message));
            passed = false;
        }
    }
    passed
}

/// Runs record-level rules in order. Returns true when all rules passed.
pub fn apply_record<T: ?Sized>(
    rules: &[Rule<T>],
    value: &T,
    ctx: &RuleContext,
    out: &mut Violations,
) -> bool {
    let mut passed = true;
    for rule in rules {
        if let Some(message) = (rule.check)(value, ctx) {
            out.push(Violation::record(rule.kind, message));
            passed = false;
        }
    }
    passed
}

// --- name ---

pub const NAME_RULES: &[Rule<str>] = &[
    Rule {
        kind: ViolationKind::NameTooShort,
        check: name_min_length,
    },
    Rule {
        kind: ViolationKind::NameMissingPart,
        check: name_has_two_parts,
    },
    Rule {
        kind: ViolationKind::NameInvalidCharacter,
        check: name_characters,
    },
];

fn name_min_length(name: &str, _: &RuleContext) -> Option<&'static str> {
    (name.chars().count() < MIN_NAME_CHARS).then_some("Name must be at least 2 characters long.")
}

fn name_has_two_parts(name: &str, _: &RuleContext) -> Option<&'static str> {
    (name.split_whitespace().count() < 2).then_some("Please enter both first and last name.")
}

fn name_characters(name: &str, _: &RuleContext) -> Option<&'static str> {
    (!name.chars().all(|c| c.is_alphabetic() || c.is_whitespace()))
        .then_some("Name should only contain letters and spaces.")
}

// --- email ---

/// Syntax only; uniqueness needs the record store and is checked by the validator.
pub const EMAIL_RULES: &[Rule<str>] = &[Rule {
    kind: ViolationKind::EmailInvalidFormat,
    check: email_format,
}];

pub const EMAIL_DUPLICATE_MESSAGE: &str = "A student with this email already exists.";

fn email_format(email: &str, _: &RuleContext) -> Option<&'static str> {
    (!is_valid_email(email)).then_some("Enter a valid email address.")
}

// --- age ---

pub const AGE_RULES: &[Rule<i64>] = &[Rule {
    kind: ViolationKind::AgeOutOfRange,
    check: age_range,
}];

fn age_range(age: &i64, _: &RuleContext) -> Option<&'static str> {
    if *age < MIN_AGE {
        Some("Student must be at least 15 years old")
    } else if *age > MAX_AGE {
        Some("Age cannot exceed 100")
    } else {
        None
    }
}

// --- grade ---

pub const GRADE_RULES: &[Rule<Decimal>] = &[Rule {
    kind: ViolationKind::GradeOutOfRange,
    check: grade_range,
}];

fn grade_range(grade: &Decimal, _: &RuleContext) -> Option<&'static str> {
    if *grade < min_grade() {
        Some("Grade cannot be negative")
    } else if *grade > max_grade() {
        Some("Grade cannot exceed 10.0")
    } else {
        None
    }
}

// --- enrollment date ---

pub const ENROLLMENT_DATE_RULES: &[Rule<NaiveDate>] = &[
    Rule {
        kind: ViolationKind::EnrollmentDateFuture,
        check: enrollment_not_future,
    },
    Rule {
        kind: ViolationKind::EnrollmentDateTooOld,
        check: enrollment_not_too_old,
    },
];

fn enrollment_not_future(date: &NaiveDate, ctx: &RuleContext) -> Option<&'static str> {
    (*date > ctx.today).then_some("Enrollment date cannot be in the future.")
}

fn enrollment_not_too_old(date: &NaiveDate, ctx: &RuleContext) -> Option<&'static str> {
    (*date < ctx.oldest_enrollment_date()).then_some("Enrollment date is too old.")
}

// --- record level ---

/// Age and grade that both passed their own range rules.
#[derive(Debug, Clone, Copy)]
pub struct AgeAndGrade {
    pub age: i64,
    pub grade: Decimal,
}

pub const RECORD_RULES: &[Rule<AgeAndGrade>] = &[Rule {
    kind: ViolationKind::AgeGradeMismatch,
    check: minor_grade_limit,
}];

fn minor_grade_limit(v: &AgeAndGrade, _: &RuleContext) -> Option<&'static str> {
    (v.age < ADULT_AGE && v.grade > minor_grade_cap())
        .then_some("Students under 18 cannot have a grade higher than 8.0")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> RuleContext {
        RuleContext {
            today: NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
        }
    }

    fn kinds_for_name(name: &str) -> Vec<ViolationKind> {
        let mut out = Violations::new();
        apply(Field::Name, NAME_RULES, name, &ctx(), &mut out);
        out.kinds()
    }

    #[test]
    fn test_name_rules() {
        assert!(kinds_for_name("John Doe").is_empty());
        assert!(kinds_for_name("José Álvarez").is_empty());
        assert!(kinds_for_name("Mary Ann  Smith").is_empty());
        assert_eq!(
            kinds_for_name("A"),
            vec![ViolationKind::NameTooShort, ViolationKind::NameMissingPart]
        );
        assert_eq!(kinds_for_name("SingleName"), vec![ViolationKind::NameMissingPart]);
        assert_eq!(kinds_for_name("John 123"), vec![ViolationKind::NameInvalidCharacter]);
        assert_eq!(
            kinds_for_name("O'Brien"),
            vec![ViolationKind::NameMissingPart, ViolationKind::NameInvalidCharacter]
        );
    }

    #[test]
    fn test_name_length_counts_characters() {
        // Two characters, four bytes.
        let mut out = Violations::new();
        assert!(!apply(Field::Name, NAME_RULES, "Éé", &ctx(), &mut out));
        assert_eq!(out.kinds(), vec![ViolationKind::NameMissingPart]);
    }

    #[test]
    fn test_age_bounds() {
        let mut out = Violations::new();
        for age in [15, 16, 50, 100] {
            assert!(apply(Field::Age, AGE_RULES, &age, &ctx(), &mut out), "age {}", age);
        }
        for age in [-1, 0, 14, 101, 1_000] {
            assert!(!apply(Field::Age, AGE_RULES, &age, &ctx(), &mut out), "age {}", age);
        }
        assert_eq!(out.len(), 5);
        assert_eq!(out.iter().next().unwrap().message, "Student must be at least 15 years old");
        assert_eq!(out.iter().last().unwrap().message, "Age cannot exceed 100");
    }

    #[test]
    fn test_grade_bounds() {
        let mut out = Violations::new();
        for grade in [Decimal::new(0, 2), Decimal::new(1000, 2), Decimal::new(750, 2)] {
            assert!(apply(Field::Grade, GRADE_RULES, &grade, &ctx(), &mut out));
        }
        for grade in [Decimal::new(-1, 2), Decimal::new(1001, 2)] {
            assert!(!apply(Field::Grade, GRADE_RULES, &grade, &ctx(), &mut out));
        }
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_enrollment_date_window() {
        let c = ctx();
        let mut out = Violations::new();
        let oldest = c.oldest_enrollment_date();
        assert_eq!(oldest, c.today - Duration::days(18_250));

        assert!(apply(Field::EnrollmentDate, ENROLLMENT_DATE_RULES, &c.today, &c, &mut out));
        assert!(apply(Field::EnrollmentDate, ENROLLMENT_DATE_RULES, &oldest, &c, &mut out));
        assert!(out.is_empty());

        let tomorrow = c.today + Duration::days(1);
        apply(Field::EnrollmentDate, ENROLLMENT_DATE_RULES, &tomorrow, &c, &mut out);
        let too_old = oldest - Duration::days(1);
        apply(Field::EnrollmentDate, ENROLLMENT_DATE_RULES, &too_old, &c, &mut out);
        assert_eq!(
            out.kinds(),
            vec![ViolationKind::EnrollmentDateFuture, ViolationKind::EnrollmentDateTooOld]
        );
    }

    #[test]
    fn test_minor_grade_limit() {
        let mut out = Violations::new();
        let ok = [
            AgeAndGrade { age: 17, grade: Decimal::new(750, 2) },
            AgeAndGrade { age: 17, grade: Decimal::new(800, 2) },
            AgeAndGrade { age: 18, grade: Decimal::new(950, 2) },
        ];
        for v in ok {
            assert!(apply_record(RECORD_RULES, &v, &ctx(), &mut out), "{:?}", v);
        }
        let bad = AgeAndGrade { age: 17, grade: Decimal::new(801, 2) };
        assert!(!apply_record(RECORD_RULES, &bad, &ctx(), &mut out));
        let violation = out.iter().next().unwrap();
        assert_eq!(violation.field, None);
        assert_eq!(violation.kind, ViolationKind::AgeGradeMismatch);
    }
}
