//! Error types for catalog diffing

use thiserror::Error;

use crate::catalog::StreamDescriptor;

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Catalog diff errors
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Duplicate field name: {name}")]
    DuplicateFieldName { name: String },

    #[error("Invalid schema format: {0}")]
    InvalidFormat(String),

    #[error("Cannot diff stream {expected} against stream {actual}")]
    DescriptorMismatch {
        expected: StreamDescriptor,
        actual: StreamDescriptor,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
