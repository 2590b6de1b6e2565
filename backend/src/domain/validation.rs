//! Field validators for account payloads.
//!
//! Each [`FieldKind`] pairs a type predicate (the value must be a JSON string)
//! with a format pattern. [`validate`] always runs the type check first and
//! only consults the pattern when the value is a string, so a type failure
//! always wins over a format failure.
//!
//! Patterns are anchored to the whole value and use ASCII word characters
//! (`[0-9A-Za-z_]`). Matching is not multi-line: a value with one valid line
//! among several is rejected.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

/// Account field a validator applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// `local@domain.tld` with an optional two-letter suffix (`.com.br`).
    Email,
    /// Letter groups separated by single spaces.
    Name,
    /// Six or more word characters.
    Password,
}

impl FieldKind {
    /// JSON field name the validator reads.
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Name => "name",
            Self::Password => "password",
        }
    }

    fn pattern(self) -> &'static Regex {
        static EMAIL: OnceLock<Regex> = OnceLock::new();
        static NAME: OnceLock<Regex> = OnceLock::new();
        static PASSWORD: OnceLock<Regex> = OnceLock::new();

        let (cell, source) = match self {
            Self::Email => (&EMAIL, r"(?i-u)^\w+@\w+\.\w{3}(?:\.\w{2})?$"),
            Self::Name => (&NAME, r"(?i-u)^[a-z]+(?: [a-z]+)*$"),
            Self::Password => (&PASSWORD, r"(?-u)^\w{6,}$"),
        };
        cell.get_or_init(|| {
            Regex::new(source)
                .unwrap_or_else(|error| panic!("{self} pattern failed to compile: {error}"))
        })
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

/// Why a value was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The value is not a string (missing fields land here too).
    WrongType,
    /// The value is a string that does not match the field pattern.
    WrongFormat,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongType => f.write_str("wrong type"),
            Self::WrongFormat => f.write_str("wrong format"),
        }
    }
}

/// Result of validating one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// Passed both the type and the format check.
    Valid,
    /// Failed; carries the first check that failed.
    Invalid(Rejection),
}

impl ValidationOutcome {
    /// `true` when the value passed every check.
    pub const fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Rejection reason, if any.
    pub const fn rejection(self) -> Option<Rejection> {
        match self {
            Self::Valid => None,
            Self::Invalid(reason) => Some(reason),
        }
    }
}

/// Validate `value` as a `kind` field.
///
/// # Examples
/// ```
/// use accounts::domain::validation::{validate, FieldKind, Rejection, ValidationOutcome};
/// use serde_json::json;
///
/// assert!(validate(FieldKind::Email, &json!("a@b.com")).is_valid());
/// assert_eq!(
///     validate(FieldKind::Password, &json!(123456)),
///     ValidationOutcome::Invalid(Rejection::WrongType),
/// );
/// ```
pub fn validate(kind: FieldKind, value: &Value) -> ValidationOutcome {
    let Some(text) = value.as_str() else {
        return ValidationOutcome::Invalid(Rejection::WrongType);
    };
    if kind.pattern().is_match(text) {
        ValidationOutcome::Valid
    } else {
        ValidationOutcome::Invalid(Rejection::WrongFormat)
    }
}
