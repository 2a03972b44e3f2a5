//! Coercion of raw form values into typed field values.
//!
//! Each function either yields a typed value or exactly one `REQUIRED` / `INVALID_VALUE`
//! violation for the field. JSON numbers and numeric strings are both accepted.

use crate::domain::validation::violation::{Field, Violation};
use chrono::NaiveDate;
use lazy_regex::regex_is_match;
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use std::str::FromStr;

/// Fractional digits stored for a grade.
pub const GRADE_SCALE: u32 = 2;

/// Trimmed, non-empty text.
pub fn text(field: Field, raw: Option<&str>) -> Result<String, Violation> {
    match raw.map(str::trim) {
        Some(s) if !s.is_empty() => Ok(s.to_string()),
        _ => Err(Violation::required(field)),
    }
}

/// Whole number. `"20"`, `20` and `20.0` are accepted; `20.5` is not.
///
/// Whole numbers beyond `i64` saturate to `i64::MIN`/`i64::MAX` instead of failing to parse.
pub fn integer(field: Field, raw: Option<&JsonValue>) -> Result<i64, Violation> {
    const MESSAGE: &str = "Enter a whole number.";
    match raw {
        None | Some(JsonValue::Null) => Err(Violation::required(field)),
        Some(JsonValue::Number(n)) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            if n.is_u64() {
                return Ok(i64::MAX);
            }
            // `as` saturates, so huge whole numbers still reach the range rule.
            match n.as_f64() {
                Some(f) if f.is_finite() && f.fract() == 0.0 => Ok(f as i64),
                _ => Err(Violation::invalid(field, MESSAGE)),
            }
        }
        Some(JsonValue::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Err(Violation::required(field));
            }
            // Allow a trailing ".0", ".00", ...
            let digits = match s.split_once('.') {
                Some((whole, frac)) if frac.chars().all(|c| c == '0') => whole,
                _ => s,
            };
            match digits.parse::<i64>() {
                Ok(i) => Ok(i),
                Err(_) if regex_is_match!(r"^[+-]?[0-9]+$", digits) => {
                    Ok(if digits.starts_with('-') { i64::MIN } else { i64::MAX })
                }
                Err(_) => Err(Violation::invalid(field, MESSAGE)),
            }
        }
        Some(_) => Err(Violation::invalid(field, MESSAGE)),
    }
}

/// Decimal with at most `GRADE_SCALE` fractional digits, rescaled to exactly `GRADE_SCALE`.
///
/// Trailing zeros do not count towards the limit (`"8.500"` is `8.50`). Numbers too large for
/// `Decimal` saturate to `Decimal::MIN`/`Decimal::MAX` and are returned unscaled.
pub fn decimal(field: Field, raw: Option<&JsonValue>) -> Result<Decimal, Violation> {
    const MESSAGE: &str = "Enter a number.";
    let repr = match raw {
        None | Some(JsonValue::Null) => return Err(Violation::required(field)),
        // Go through the textual form so 8.1 stays 8.1 instead of its f64 expansion.
        Some(JsonValue::Number(n)) => n.to_string(),
        Some(JsonValue::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Err(Violation::required(field));
            }
            s.to_string()
        }
        Some(_) => return Err(Violation::invalid(field, MESSAGE)),
    };

    let too_precise = || {
        Violation::invalid(
            field,
            format!("Ensure that there are no more than {} decimal places.", GRADE_SCALE),
        )
    };

    let value = match Decimal::from_str(&repr).or_else(|_| Decimal::from_scientific(&repr)) {
        Ok(value) => value,
        Err(_) if regex_is_match!(r"^[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?$", &repr) => {
            // A well-formed literal outside `Decimal`'s range: either too large, which is
            // saturated so the range rule reports it, or too many fractional digits.
            return match repr.parse::<f64>() {
                Ok(f) if f.abs() >= 1.0 => Ok(if f < 0.0 { Decimal::MIN } else { Decimal::MAX }),
                _ => Err(too_precise()),
            };
        }
        Err(_) => return Err(Violation::invalid(field, MESSAGE)),
    };

    let mut value = value.normalize();
    if value.scale() > GRADE_SCALE {
        return Err(too_precise());
    }
    value.rescale(GRADE_SCALE);
    Ok(value)
}

/// ISO calendar date (`YYYY-MM-DD`).
pub fn date(field: Field, raw: Option<&JsonValue>) -> Result<NaiveDate, Violation> {
    const MESSAGE: &str = "Enter a valid date.";
    match raw {
        None | Some(JsonValue::Null) => Err(Violation::required(field)),
        Some(JsonValue::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Err(Violation::required(field));
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| Violation::invalid(field, MESSAGE))
        }
        Some(_) => Err(Violation::invalid(field, MESSAGE)),
    }
}

/// Boolean flag; absent means `default`.
pub fn boolean(field: Field, raw: Option<&JsonValue>, default: bool) -> Result<bool, Violation> {
    const MESSAGE: &str = "Enter a valid boolean.";
    match raw {
        None | Some(JsonValue::Null) => Ok(default),
        Some(JsonValue::Bool(b)) => Ok(*b),
        Some(JsonValue::Number(n)) => match n.as_i64() {
            Some(1) => Ok(true),
            Some(0) => Ok(false),
            _ => Err(Violation::invalid(field, MESSAGE)),
        },
        Some(JsonValue::String(s)) => match s.trim().to_lowercase().as_str() {
            "" => Ok(default),
            "true" | "t" | "1" | "on" | "yes" => Ok(true),
            "false" | "f" | "0" | "off" | "no" => Ok(false),
            _ => Err(Violation::invalid(field, MESSAGE)),
        },
        Some(_) => Err(Violation::invalid(field, MESSAGE)),
    }
}
