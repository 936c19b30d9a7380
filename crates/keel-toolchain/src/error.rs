//! Toolchain errors.

use std::path::PathBuf;

use thiserror::Error;

use crate::aot::{AotState, ManagedAction};
use crate::process::ProcessError;

/// Errors that abort a target's environment setup or managed compilation.
#[derive(Debug, Error)]
pub enum ToolchainError {
    #[error("configuration error: `{field}` {detail}")]
    Configuration { field: &'static str, detail: String },

    #[error(transparent)]
    Target(#[from] keel_targets::TargetError),

    #[error(transparent)]
    Sdk(#[from] keel_sdk::SdkError),

    #[error("managed AOT compilation is not supported for target {target}")]
    UnsupportedManagedTarget { target: String },

    #[error("tools path not resolved: run the ResolveToolsPath action before CompileAssembly")]
    ToolsPathNotResolved,

    #[error("{action:?} is not allowed on a request in state {state:?}")]
    InvalidState {
        state: AotState,
        action: ManagedAction,
    },

    #[error("no input assembly given to the AOT compiler")]
    MissingInput,

    #[error("AOT compiler accepts exactly one input assembly, got {count}")]
    UnsupportedInputCount { count: usize },

    #[error(transparent)]
    Process(#[from] ProcessError),

    /// `command` is the full command line, environment assignments included.
    #[error(
        "{command} failed with {} (working directory {})",
        exit_description(*exit_code),
        working_directory.display()
    )]
    SubprocessFailure {
        executable: PathBuf,
        command: String,
        working_directory: PathBuf,
        exit_code: Option<i32>,
    },
}

fn exit_description(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "termination by signal".to_string(),
    }
}

/// Result type for toolchain operations.
pub type Result<T> = std::result::Result<T, ToolchainError>;
