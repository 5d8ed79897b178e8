//! Shape checks for the login form fields.
//!
//! These are syntactic only. A well-formed email may still be undeliverable
//! or unknown to the identity provider.

use std::sync::OnceLock;

use regex::Regex;

pub const INVALID_EMAIL_MESSAGE: &str = "Invalid email";
pub const PASSWORD_REQUIRED_MESSAGE: &str = "Password is required";

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern is valid"))
}

/// Non-empty local part, `@`, non-empty domain, `.`, non-empty suffix.
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

pub fn is_valid_password(password: &str) -> bool {
    !password.is_empty()
}

/// Inline message for the email field. Empty input shows nothing.
pub fn email_error(email: &str) -> Option<&'static str> {
    if !email.is_empty() && !is_valid_email(email) {
        Some(INVALID_EMAIL_MESSAGE)
    } else {
        None
    }
}

pub fn password_error(password: &str) -> Option<&'static str> {
    if is_valid_password(password) {
        None
    } else {
        Some(PASSWORD_REQUIRED_MESSAGE)
    }
}
