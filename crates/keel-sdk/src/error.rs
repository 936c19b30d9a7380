//! SDK error types.

use std::path::PathBuf;

/// Errors that can occur while locating SDK tools.
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    /// No installed version of the requested package.
    #[error("no tools package found under {} (expected {pattern}/<version>/tools)", searched.display())]
    ToolNotFound {
        /// Directory that was searched.
        searched: PathBuf,
        /// Package naming pattern that was expected.
        pattern: String,
    },

    /// A package identifier does not follow the cross-package convention.
    #[error("invalid cross package id '{id}': {detail}")]
    InvalidPackageId { id: String, detail: String },

    /// The SDK root could not be determined.
    #[error("SDK root not configured: {detail}")]
    RootNotConfigured { detail: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for SDK operations.
pub type Result<T> = std::result::Result<T, SdkError>;
