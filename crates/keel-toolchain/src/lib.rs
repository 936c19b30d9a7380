//! Toolchain configuration and managed AOT cross-compilation for Keel.
//!
//! A [`Toolchain`] is an ordered stack of [`ToolchainLayer`]s: a Unix base,
//! the Apple family layer, then the concrete OS layer. Each operation runs
//! the layers base first, so a concrete layer always sees, and appends
//! after, what its parents contributed.
//!
//! Managed assemblies are compiled through a two-phase protocol driven by
//! [`ManagedAotCompiler`]: resolve the cross-compiler tools path, then run
//! the AOT compiler on exactly one input assembly.

pub mod aot;
pub mod config;
pub mod environment;
pub mod error;
pub mod layer;
pub mod layers;
pub mod process;

pub use aot::{
    AotArguments, AotOutcome, AotState, ManagedAction, ManagedAotCompiler, ManagedCompileRequest,
};
pub use config::ToolchainConfig;
pub use environment::{CompileEnvironment, DefinitionSet, LinkEnvironment, ToolchainEnvironment};
pub use error::{Result, ToolchainError};
pub use layer::{Toolchain, ToolchainLayer};
pub use process::{
    ProcessError, ProcessExit, ProcessInvocation, ProcessRunner, SystemProcessRunner,
};
