//! Email address validation.

use std::sync::OnceLock;

use regex::Regex;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"))
}

/// Loose shape check: something, `@`, something, `.`, something, with no
/// whitespace and a single `@`.
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}
