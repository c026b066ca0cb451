//! User identity model.
//!
//! # Responsibility
//! - Define the email-identified user record and its email value type.
//!
//! # Invariants
//! - `Email` is trimmed and shaped like `local@domain`; case is preserved.
//! - `uid` is generated once at creation and never reused.
//!
//! Identity is email presence only. No credential is stored or checked.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+$").expect("email pattern should compile")
});

/// Validated email address used as the user identity key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Parses and trims an email string.
    pub fn parse(value: &str) -> Result<Self, InvalidEmail> {
        let trimmed = value.trim();
        if !EMAIL_PATTERN.is_match(trimmed) {
            return Err(InvalidEmail(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Email {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = InvalidEmail;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

/// Rejected email input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidEmail(pub String);

impl Display for InvalidEmail {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid email address `{}`", self.0)
    }
}

impl Error for InvalidEmail {}

/// Email-identified user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: Email,
    /// Stable record id, independent of the email key.
    pub uid: Uuid,
    /// Unix epoch milliseconds.
    pub created_at_ms: i64,
    /// Unix epoch milliseconds of the last sign-in, when one was recorded.
    pub last_login_ms: Option<i64>,
}

impl User {
    /// Creates a fresh user record stamped with the current time.
    pub fn new(email: Email) -> Self {
        Self {
            email,
            uid: Uuid::new_v4(),
            created_at_ms: now_epoch_ms(),
            last_login_ms: None,
        }
    }
}

/// Current wall-clock time as Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::Email;

    #[test]
    fn parse_trims_and_keeps_case() {
        let email = Email::parse("  Ada@Example.com ").unwrap();
        assert_eq!(email.as_str(), "Ada@Example.com");
    }

    #[test]
    fn parse_rejects_malformed_values() {
        assert!(Email::parse("").is_err());
        assert!(Email::parse("no-at-sign").is_err());
        assert!(Email::parse("two words@x.com").is_err());
        assert!(Email::parse("a@b@c").is_err());
    }
}
