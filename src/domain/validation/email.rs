//! Email address syntax check.

use lazy_regex::{lazy_regex, Lazy, Regex};

/// Dot-atom local part, `@`, then one or more domain labels and a top-level label of at
/// least two characters. Labels start and end with an alphanumeric character.
static EMAIL_REGEX: Lazy<Regex> = lazy_regex!(
    r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])$"
);

/// Maximum total length of an address (RFC 5321 forward-path limit).
const MAX_EMAIL_LENGTH: usize = 254;

/// Returns true if `email` is a syntactically valid address.
pub fn is_valid_email(email: &str) -> bool {
    email.len() <= MAX_EMAIL_LENGTH && EMAIL_REGEX.is_match(email)
}
