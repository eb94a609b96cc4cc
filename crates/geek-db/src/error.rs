//! Database error types.

use thiserror::Error;

/// Errors that can occur when using the database.
#[derive(Error, Debug)]
pub enum DbError {
    /// Failed to open the database.
    #[error("Failed to open database: {0}")]
    OpenError(String),

    /// Failed to execute a statement.
    #[error("Query execution failed: {0}")]
    QueryError(String),

    /// A UNIQUE, FOREIGN KEY or CHECK constraint rejected the statement.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Failed to deserialize a row.
    #[error("Deserialization error: {0}")]
    DeserializeError(String),

    /// Type conversion error.
    #[error("Type conversion error: {0}")]
    TypeError(String),

    /// No rows returned when one was expected.
    #[error("No rows returned")]
    NotFound,
}

impl DbError {
    /// Classify a driver error message.
    ///
    /// SQLite reports constraint failures as plain text on every backend we
    /// use, so the message is the only thing to match on.
    pub fn from_driver(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.contains("constraint failed") {
            DbError::ConstraintViolation(message)
        } else {
            DbError::QueryError(message)
        }
    }

    /// Whether this error came from a violated constraint.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, DbError::ConstraintViolation(_))
    }
}

impl From<serde_json::Error> for DbError {
    fn from(e: serde_json::Error) -> Self {
        DbError::DeserializeError(e.to_string())
    }
}
