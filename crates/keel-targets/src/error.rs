//! Error types for target descriptor operations.

use std::path::PathBuf;

/// Errors that can occur while building or validating target descriptors.
#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    /// A descriptor field is missing or malformed.
    #[error("invalid target configuration: `{field}` {detail}")]
    Configuration {
        /// Name of the offending field.
        field: &'static str,
        /// What is wrong with it.
        detail: String,
    },

    /// A target string did not name a supported OS/architecture pair.
    #[error("unknown target '{input}': {detail}")]
    UnknownTarget { input: String, detail: String },

    /// TOML deserialization error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// I/O error reading a target file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Target file not found.
    #[error("target file not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },
}

/// Result type for target operations.
pub type Result<T> = std::result::Result<T, TargetError>;
