//! Database error types.

use thiserror::Error;

/// Errors from schema materialization and row operations.
#[derive(Debug, Error)]
pub enum DbError {
    /// An underlying SQLite error that is not a constraint breach.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Failed to build the connection pool or obtain a connection from it.
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// The backend rejected a write that breaches a constraint, typically a
    /// NULL in a NOT NULL column. Never pre-checked by the schema layer —
    /// surfacing this at write time is the contract.
    #[error("integrity violation on table '{table}': {message}")]
    IntegrityViolation {
        /// The table being written.
        table: String,
        /// The backend's description of the breach.
        message: String,
    },

    /// A keyed lookup was attempted on a model without a single-column
    /// primary key.
    #[error("table '{0}' has no single-column primary key")]
    NoPrimaryKey(String),
}

impl DbError {
    /// Classifies a write failure: SQLite constraint violations become
    /// [`DbError::IntegrityViolation`], everything else stays a plain
    /// database error.
    pub(crate) fn from_write(table: &str, e: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(code, ref message) = e {
            if code.code == rusqlite::ffi::ErrorCode::ConstraintViolation {
                return Self::IntegrityViolation {
                    table: table.to_string(),
                    message: message
                        .clone()
                        .unwrap_or_else(|| "constraint violation".to_string()),
                };
            }
        }
        Self::Database(e)
    }
}
