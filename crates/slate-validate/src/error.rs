//! Validation error types.

use serde::Serialize;
use thiserror::Error;

/// One failed check on one input location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Where the error occurred: a field name, or `__root__` for the input
    /// as a whole.
    pub loc: String,
    /// Human-readable description.
    pub message: String,
    /// Stable machine-readable kind, e.g. `missing` or `string_too_long`.
    pub kind: &'static str,
}

impl FieldError {
    pub(crate) fn new(loc: impl Into<String>, message: impl Into<String>, kind: &'static str) -> Self {
        Self {
            loc: loc.into(),
            message: message.into(),
            kind,
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} ({})", self.loc, self.message, self.kind)
    }
}

/// Input failed validation. Carries every per-field failure, not just the
/// first; callers present the whole list (the server maps it to a 422 body).
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("validation failed with {} error(s)", .errors.len())]
pub struct ValidationError {
    /// All collected failures, in field declaration order.
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub(crate) fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }
}
