//! Validated value types for domain primitives.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use validator::ValidateEmail;

/// Error type for value type parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueTypeError {
    /// The email address is invalid.
    InvalidEmail(String),
}

impl std::error::Error for ValueTypeError {}

impl fmt::Display for ValueTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEmail(msg) => write!(f, "Invalid email: {}", msg),
        }
    }
}

/// A validated email address.
///
/// Equality and hashing are case-insensitive: the backend treats emails as
/// unique ignoring case, so `A@x.com` and `a@x.com` refer to the same user.
/// The original casing is preserved for display.
#[derive(Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Create a new Email from a string, validating it.
    ///
    /// Returns `Err` if the email is invalid.
    pub fn new(email: impl Into<String>) -> Result<Self, ValueTypeError> {
        let email = email.into();
        Self::validate(&email)?;
        Ok(Self(email))
    }

    /// Create an Email without validation.
    ///
    /// Intended for values loaded from a trusted source (the backend), where
    /// validation was already performed. This is also what `Deserialize`
    /// produces, so a single malformed address cannot fail a whole user-list
    /// fetch.
    #[inline]
    pub fn new_unchecked(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    /// Get the email as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume self and return the inner String.
    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }

    fn validate(email: &str) -> Result<(), ValueTypeError> {
        if email.is_empty() {
            return Err(ValueTypeError::InvalidEmail("empty".to_string()));
        }
        if !email.validate_email() {
            return Err(ValueTypeError::InvalidEmail(email.to_string()));
        }
        Ok(())
    }
}

impl PartialEq for Email {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for Email {}

impl Hash for Email {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_ascii_lowercase().hash(state);
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Email({})", self.0)
    }
}

impl FromStr for Email {
    type Err = ValueTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_email_parses() {
        let email: Email = "admin@taskdeck.io".parse().unwrap();
        assert_eq!(email.as_str(), "admin@taskdeck.io");
    }

    #[test]
    fn invalid_email_rejected() {
        assert!("not-an-email".parse::<Email>().is_err());
        assert!("".parse::<Email>().is_err());
    }

    #[test]
    fn equality_ignores_case() {
        let a = Email::new_unchecked("RM@Example.com");
        let b = Email::new_unchecked("rm@example.com");
        assert_eq!(a, b);
    }
}
