//! Error types for sqlvec-core.

use thiserror::Error;

/// Result type alias for sqlvec-core operations.
pub type VectorResult<T> = Result<T, VectorError>;

/// Errors raised while building, parsing or comparing vectors.
///
/// The `Display` output of every variant is the message reported back to the
/// host engine, so it is kept stable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VectorError {
    // ========================================================================
    // Input errors
    // ========================================================================
    /// A value of the wrong runtime type was passed where a vector was expected.
    #[error("invalid vector: {reason}")]
    InvalidInputType { reason: String },

    /// The text literal is malformed.
    #[error("{message}")]
    ParseSyntax { message: String },

    /// A single element of a text literal is longer than the token buffer.
    #[error("float too big while parsing vector: {fragment}...")]
    TokenTooLong { fragment: String },

    /// The literal or blob holds more elements than a vector may have.
    #[error("vector is larger than the maximum: ({max})")]
    DimensionOverflow { max: usize },

    /// Two operands must have the same number of dimensions.
    #[error("vectors must have the same length")]
    DimensionMismatch { left: usize, right: usize },

    // ========================================================================
    // Engine errors
    // ========================================================================
    /// The element type tag is not one this build understands.
    #[error("unsupported vector element type: {tag}")]
    UnsupportedElementType { tag: String },

    /// The vector buffer could not be allocated.
    #[error("out of memory allocating vector of {bytes} bytes")]
    OutOfMemory { bytes: usize },

    /// A vector function was called with too few arguments.
    #[error("{function}() expects {expected} argument(s), got {actual}")]
    Arity {
        function: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl VectorError {
    /// Create an invalid input type error.
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInputType {
            reason: reason.into(),
        }
    }

    /// Create a parse syntax error.
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::ParseSyntax {
            message: message.into(),
        }
    }

    /// Whether the error was caused by user input rather than resources.
    pub fn is_input_error(&self) -> bool {
        !matches!(
            self,
            VectorError::OutOfMemory { .. } | VectorError::UnsupportedElementType { .. }
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
