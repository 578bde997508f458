//! Error types for sqlvec-db.

use sqlvec_core::VectorError;
use thiserror::Error;

/// Result type alias for sqlvec-db operations.
pub type DbResult<T> = Result<T, DbError>;

/// Errors that can occur in sqlvec-db operations.
#[derive(Debug, Error)]
pub enum DbError {
    // ========================================================================
    // Vector errors
    // ========================================================================
    /// Parsing or comparing a vector failed.
    #[error(transparent)]
    Vector(#[from] VectorError),

    /// Vector dimension does not match the index.
    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    // ========================================================================
    // Vector index errors
    // ========================================================================
    /// The index definition is not a valid vector index.
    #[error("{message}")]
    Schema { message: String },

    /// Vector index not found.
    #[error("Vector index not found: {name}")]
    IndexNotFound { name: String },

    /// Vector index exists with different parameters.
    #[error("Vector index '{name}' incompatible: {reason}")]
    IndexIncompatible { name: String, reason: String },

    /// Failure reported by the ANN engine.
    #[error("ANN engine error: {message}")]
    Engine { message: String },

    // ========================================================================
    // General errors
    // ========================================================================
    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// SQLite error wrapper.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// JSON error wrapper.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error wrapper.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Broken caller contract.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DbError {
    /// Create a schema error.
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    /// Create an index incompatible error.
    pub fn index_incompatible(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::IndexIncompatible {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an engine error.
    pub fn engine(message: impl Into<String>) -> Self {
        Self::Engine {
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_error_is_transparent() {
        let err: DbError = VectorError::invalid_input("NULL").into();
        assert_eq!(err.to_string(), "invalid vector: NULL");
    }

    #[test]
    fn test_schema_message_verbatim() {
        let err = DbError::schema("Only single column vector indexes are supported");
        assert_eq!(
            err.to_string(),
            "Only single column vector indexes are supported"
        );
    }
}
