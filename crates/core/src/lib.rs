//! Shared primitives for all Rust crates in Prunewell.

#![forbid(unsafe_code)]

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across Prunewell crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated SQL identifier safe to interpolate into a statement.
///
/// Accepts ASCII letters, digits, and underscores; must not be empty and must
/// not start with a digit. Anything else (quoting, spaces, dots) is rejected,
/// so a value of this type can be placed into DDL/DML without escaping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SqlIdentifier(String);

impl SqlIdentifier {
    /// Creates a validated SQL identifier.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(AppError::Validation(
                "identifier must not be empty".to_owned(),
            ));
        }

        let mut characters = value.chars();
        let leading_valid = characters
            .next()
            .is_some_and(|first| first.is_ascii_alphabetic() || first == '_');
        if !leading_valid {
            return Err(AppError::Validation(format!(
                "identifier '{value}' must start with a letter or underscore"
            )));
        }

        if let Some(invalid) = characters.find(|ch| !ch.is_ascii_alphanumeric() && *ch != '_') {
            return Err(AppError::Validation(format!(
                "identifier '{value}' contains forbidden character '{invalid}'"
            )));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<SqlIdentifier> for String {
    fn from(value: SqlIdentifier) -> Self {
        value.0
    }
}

impl Display for SqlIdentifier {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A required backing service cannot be reached.
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::SqlIdentifier;

    #[test]
    fn sql_identifier_accepts_plain_names() {
        assert!(SqlIdentifier::new("events").is_ok());
        assert!(SqlIdentifier::new("_staging").is_ok());
        assert!(SqlIdentifier::new("events_p20230101_000000").is_ok());
    }

    #[test]
    fn sql_identifier_rejects_empty() {
        assert!(SqlIdentifier::new("").is_err());
    }

    #[test]
    fn sql_identifier_rejects_leading_digit() {
        assert!(SqlIdentifier::new("1events").is_err());
    }

    #[test]
    fn sql_identifier_rejects_quoting_and_separators() {
        assert!(SqlIdentifier::new("public.events").is_err());
        assert!(SqlIdentifier::new("events; DROP TABLE users").is_err());
        assert!(SqlIdentifier::new("\"events\"").is_err());
        assert!(SqlIdentifier::new("ev ents").is_err());
    }
}
