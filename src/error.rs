//! Error types for the admin data-access layer.
//!
//! The taxonomy is deliberately small: a query either cannot be attempted
//! (`NoCredentials`, `InvalidIdentifier`) or was attempted and failed
//! (`Query`). Public DAL operations fold all three into empty results
//! flagged `partial`; the variants exist so the operation boundary can log
//! the cause before folding.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DalError {
    #[error("no database credentials configured")]
    NoCredentials,

    #[error("identifier failed sanitization: {name:?}")]
    InvalidIdentifier { name: String },

    #[error("query failed: {message}")]
    Query {
        message: String,
        /// e.g., "42P01" for undefined table
        sql_state: Option<String>,
    },
}

impl DalError {
    /// Create an invalid identifier error.
    pub fn invalid_identifier(name: impl Into<String>) -> Self {
        Self::InvalidIdentifier { name: name.into() }
    }

    /// Create a query failure with optional SQLSTATE.
    pub fn query(message: impl Into<String>, sql_state: Option<String>) -> Self {
        Self::Query {
            message: message.into(),
            sql_state,
        }
    }

    /// Get the SQLSTATE code for this error, if available.
    pub fn sql_state(&self) -> Option<&str> {
        match self {
            Self::Query { sql_state, .. } => sql_state.as_deref(),
            _ => None,
        }
    }

    /// True if the error was detected before any connection attempt.
    pub fn is_short_circuit(&self) -> bool {
        matches!(self, Self::NoCredentials | Self::InvalidIdentifier { .. })
    }
}

/// Convert sqlx errors to DalError.
impl From<sqlx::Error> for DalError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.to_string());
                DalError::query(db_err.message(), code)
            }
            sqlx::Error::PoolTimedOut => {
                DalError::query("timed out acquiring a pooled connection", None)
            }
            sqlx::Error::PoolClosed => DalError::query("connection pool is closed", None),
            sqlx::Error::Io(io_err) => DalError::query(format!("I/O error: {}", io_err), None),
            sqlx::Error::Tls(tls_err) => DalError::query(format!("TLS error: {}", tls_err), None),
            sqlx::Error::ColumnNotFound(col) => {
                DalError::query(format!("column not found: {}", col), None)
            }
            sqlx::Error::ColumnDecode { index, source } => {
                DalError::query(format!("failed to decode column {}: {}", index, source), None)
            }
            other => DalError::query(other.to_string(), None),
        }
    }
}

/// Result type alias for data-access operations.
pub type DalResult<T> = Result<T, DalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DalError::query("relation does not exist", Some("42P01".to_string()));
        assert!(err.to_string().contains("query failed"));
    }

    #[test]
    fn test_sql_state_accessor() {
        let err = DalError::query("syntax error", Some("42601".to_string()));
        assert_eq!(err.sql_state(), Some("42601"));
        assert_eq!(DalError::NoCredentials.sql_state(), None);
    }

    #[test]
    fn test_short_circuit_classification() {
        assert!(DalError::NoCredentials.is_short_circuit());
        assert!(DalError::invalid_identifier("users; DROP TABLE x").is_short_circuit());
        assert!(!DalError::query("boom", None).is_short_circuit());
    }
}
