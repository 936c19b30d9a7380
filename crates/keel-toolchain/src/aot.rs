//! Managed ahead-of-time cross-compilation.
//!
//! Compiling a managed assembly for a device is a two-phase protocol over a
//! single [`ManagedCompileRequest`]:
//!
//! 1. [`ManagedAction::ResolveToolsPath`] finds the cross-compiler pack in the
//!    SDK and stores its `tools` directory on the request.
//! 2. [`ManagedAction::CompileAssembly`] runs `mono-aot-cross` from that
//!    directory on exactly one input assembly.
//!
//! The request records where it is in the protocol:
//!
//! ```text
//! Idle -> ToolsResolved -> Compiling -> Succeeded | Failed
//! ```
//!
//! A failed compile is terminal for the build; nothing is retried.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use keel_sdk::{CrossPackageId, SdkInstallation};
use keel_targets::HostOs;
use tracing::{debug, error, info};

use crate::error::{Result, ToolchainError};
use crate::process::{ProcessInvocation, ProcessRunner};

const AOT_COMPILER: &str = "mono-aot-cross";

/// Environment variable holding the assembly search path.
pub const SEARCH_PATH_VAR: &str = "MONO_PATH";
/// Environment variable enabling verbose runtime logging.
pub const LOG_LEVEL_VAR: &str = "MONO_LOG_LEVEL";

/// Which step of the protocol a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagedAction {
    ResolveToolsPath,
    CompileAssembly,
}

/// Progress of a request through the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AotState {
    Idle,
    ToolsResolved,
    Compiling,
    Succeeded,
    Failed,
}

/// One compile unit's managed AOT request.
#[derive(Debug, Clone)]
pub struct ManagedCompileRequest {
    pub action: ManagedAction,
    pub input_files: Vec<PathBuf>,
    /// Joined into `MONO_PATH`, in order.
    pub assemblies_search_paths: Vec<PathBuf>,
    pub enable_debug_symbols: bool,
    pub enable_tool_debug: bool,
    resolved_tools_path: Option<PathBuf>,
    state: AotState,
}

impl ManagedCompileRequest {
    pub fn new(action: ManagedAction) -> Self {
        Self {
            action,
            input_files: Vec::new(),
            assemblies_search_paths: Vec::new(),
            enable_debug_symbols: false,
            enable_tool_debug: false,
            resolved_tools_path: None,
            state: AotState::Idle,
        }
    }

    /// A request starting at the tools-resolution phase.
    pub fn resolve_tools() -> Self {
        Self::new(ManagedAction::ResolveToolsPath)
    }

    pub fn with_input(mut self, input: impl Into<PathBuf>) -> Self {
        self.input_files.push(input.into());
        self
    }

    pub fn with_search_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.assemblies_search_paths.push(path.into());
        self
    }

    pub fn with_debug_symbols(mut self, enabled: bool) -> Self {
        self.enable_debug_symbols = enabled;
        self
    }

    pub fn with_tool_debug(mut self, enabled: bool) -> Self {
        self.enable_tool_debug = enabled;
        self
    }

    /// Tools directory found by the resolve phase.
    pub fn resolved_tools_path(&self) -> Option<&Path> {
        self.resolved_tools_path.as_deref()
    }

    pub fn state(&self) -> AotState {
        self.state
    }
}

/// Result of one protocol step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AotOutcome {
    /// Tools located; nothing compiled yet, the caller must run the compile step.
    ToolsResolved { tools_path: PathBuf },
    /// The AOT compiler exited successfully.
    Compiled,
}

/// Argument assembly for the AOT compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AotArguments {
    pub debug_symbols: bool,
    pub tool_debug: bool,
}

impl AotArguments {
    pub fn from_request(request: &ManagedCompileRequest) -> Self {
        Self {
            debug_symbols: request.enable_debug_symbols,
            tool_debug: request.enable_tool_debug,
        }
    }

    /// `--aot=` flag: full AOT with verbose stats and skip reporting.
    pub fn aot_flag(&self) -> String {
        let debug_mode = if self.debug_symbols {
            "soft-debug"
        } else {
            "nodebug"
        };
        format!("--aot=full,verbose,stats,print-skipped,{debug_mode}")
    }

    /// Full argument list with `input` last.
    pub fn to_args(&self, input: &Path) -> Vec<String> {
        let mut args = Vec::with_capacity(4);
        if self.debug_symbols || self.tool_debug {
            args.push("--debug".to_string());
        }
        args.push(self.aot_flag());
        args.push("-O=all".to_string());
        args.push(input.display().to_string());
        args
    }
}

/// Drives the external AOT cross-compiler for one cross package.
#[derive(Debug, Clone)]
pub struct ManagedAotCompiler {
    package: CrossPackageId,
}

impl ManagedAotCompiler {
    pub fn new(package: CrossPackageId) -> Self {
        Self { package }
    }

    pub fn package(&self) -> &CrossPackageId {
        &self.package
    }

    /// Path of the compiler binary inside a tools directory.
    pub fn executable_path(&self, tools_path: &Path) -> PathBuf {
        let suffix = match self.package.host.os {
            HostOs::Windows => ".exe",
            HostOs::MacOs | HostOs::Linux => "",
        };
        tools_path.join(format!("{AOT_COMPILER}{suffix}"))
    }

    /// Run the step named by `request.action`.
    pub fn run(
        &self,
        sdk: &SdkInstallation,
        request: &mut ManagedCompileRequest,
        runner: &dyn ProcessRunner,
    ) -> Result<AotOutcome> {
        match request.action {
            ManagedAction::ResolveToolsPath => self.resolve_tools_path(sdk, request),
            ManagedAction::CompileAssembly => self.compile_assembly(request, runner),
        }
    }

    /// Phase 1: locate the tools and store them on the request.
    pub fn resolve_tools_path(
        &self,
        sdk: &SdkInstallation,
        request: &mut ManagedCompileRequest,
    ) -> Result<AotOutcome> {
        if !matches!(request.state, AotState::Idle | AotState::ToolsResolved) {
            return Err(ToolchainError::InvalidState {
                state: request.state,
                action: ManagedAction::ResolveToolsPath,
            });
        }
        let tools_path = sdk.resolve_tools_path(&self.package)?;
        request.resolved_tools_path = Some(tools_path.clone());
        request.state = AotState::ToolsResolved;
        Ok(AotOutcome::ToolsResolved { tools_path })
    }

    /// Phase 2: run the compiler on the request's single input.
    pub fn compile_assembly(
        &self,
        request: &mut ManagedCompileRequest,
        runner: &dyn ProcessRunner,
    ) -> Result<AotOutcome> {
        let invocation = {
            let tools_path = request
                .resolved_tools_path
                .as_deref()
                .ok_or(ToolchainError::ToolsPathNotResolved)?;
            if request.state != AotState::ToolsResolved {
                return Err(ToolchainError::InvalidState {
                    state: request.state,
                    action: ManagedAction::CompileAssembly,
                });
            }
            request.state = AotState::Compiling;
            self.build_invocation(request, tools_path)
        };

        let result = invocation.and_then(|invocation| self.execute(&invocation, runner));
        request.state = match &result {
            Ok(_) => AotState::Succeeded,
            Err(_) => AotState::Failed,
        };
        result
    }

    fn execute(
        &self,
        invocation: &ProcessInvocation,
        runner: &dyn ProcessRunner,
    ) -> Result<AotOutcome> {
        let exit = runner.run(invocation)?;
        if exit.success() {
            info!(package = %self.package, "AOT compilation succeeded");
            return Ok(AotOutcome::Compiled);
        }

        let command = invocation.command_line();
        error!(code = ?exit.code, %command, "AOT compilation failed");
        Err(ToolchainError::SubprocessFailure {
            executable: invocation.executable.clone(),
            command,
            working_directory: invocation.working_directory.clone(),
            exit_code: exit.code,
        })
    }

    /// Describe the compiler call for `request` without running it.
    pub fn build_invocation(
        &self,
        request: &ManagedCompileRequest,
        tools_path: &Path,
    ) -> Result<ProcessInvocation> {
        let input = match request.input_files.as_slice() {
            [] => return Err(ToolchainError::MissingInput),
            [input] => input,
            inputs => {
                return Err(ToolchainError::UnsupportedInputCount {
                    count: inputs.len(),
                })
            }
        };

        let mut invocation =
            ProcessInvocation::new(self.executable_path(tools_path), tools_path);
        invocation.arguments = AotArguments::from_request(request).to_args(input);
        invocation.trailing_operands = 1;
        invocation.environment = build_environment(request)?;
        invocation.must_exist = true;
        invocation.stream_output = true;

        debug!(
            args = %invocation.argument_string(),
            env = ?invocation.environment,
            "AOT invocation"
        );
        Ok(invocation)
    }
}

/// Environment variables for the compiler process, built fresh per call.
pub fn build_environment(request: &ManagedCompileRequest) -> Result<BTreeMap<String, String>> {
    let joined = std::env::join_paths(&request.assemblies_search_paths).map_err(|e| {
        ToolchainError::Configuration {
            field: "assemblies_search_paths",
            detail: e.to_string(),
        }
    })?;
    let joined = joined
        .into_string()
        .map_err(|_| ToolchainError::Configuration {
            field: "assemblies_search_paths",
            detail: "paths must be valid UTF-8".into(),
        })?;

    let mut env = BTreeMap::new();
    env.insert(SEARCH_PATH_VAR.to_string(), joined);
    if request.enable_tool_debug {
        env.insert(LOG_LEVEL_VAR.to_string(), "debug".to_string());
    }
    Ok(env)
}
