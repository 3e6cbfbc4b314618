//! Error types for the virtual array.

use thiserror::Error;

/// Result type alias for virtual array operations
pub type Result<T> = std::result::Result<T, ArrayError>;

/// Errors that can occur while creating or accessing a virtual array
#[derive(Error, Debug)]
pub enum ArrayError {
    /// Unsupported element type or malformed size specifier
    #[error("Invalid element type: {0}")]
    InvalidType(String),

    /// Index outside `[0, len)`
    #[error("Index {index} out of range (element count: {len})")]
    IndexOutOfRange { index: i64, len: u64 },

    /// Operation invoked against the wrong element type
    #[error("Type mismatch: operation expects {expected}, array holds {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: String,
    },

    /// I/O error from the underlying file system
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Data log offset no longer fits in a 4-byte slot
    #[error("Storage overflow: data log offset {offset} exceeds slot range")]
    StorageOverflow { offset: u64 },

    /// Operation attempted after `close()`
    #[error("Virtual array is closed")]
    Closed,
}

impl ArrayError {
    /// Create an invalid type error with a message
    pub fn invalid_type(msg: impl Into<String>) -> Self {
        Self::InvalidType(msg.into())
    }

    /// Create a type mismatch error
    pub fn type_mismatch(expected: &'static str, actual: impl ToString) -> Self {
        Self::TypeMismatch {
            expected,
            actual: actual.to_string(),
        }
    }
}
