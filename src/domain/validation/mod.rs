//! Student validation: field coercion, table-driven rules and the validator that runs them.

pub mod email;
pub mod parse;
pub mod rules;
pub mod validator;
pub mod violation;

pub use validator::{Validation, Validator};
pub use violation::{Field, Violation, ViolationKind, Violations};
