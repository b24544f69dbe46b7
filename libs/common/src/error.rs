//! Custom error types for the common library
//!
//! This module defines the error types raised by the persistent storage
//! substrate shared by the reviewer services.

use thiserror::Error;

/// Custom error type for key-value storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// Error occurred while reading or writing the backing medium
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The key cannot be used to address a stored value
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// Type alias for Result with StorageError
pub type StorageResult<T> = Result<T, StorageError>;
