//! `keel aot`: resolve tools, then AOT-compile one managed assembly.

use std::path::{Path, PathBuf};

use anyhow::Result;
use keel_toolchain::{ManagedAction, ManagedCompileRequest, ProcessRunner};
use tracing::info;

use crate::manifest::KeelManifest;

/// Options for one `keel aot` run.
#[derive(Debug, Clone, Default)]
pub struct AotOptions {
    pub inputs: Vec<PathBuf>,
    pub search_paths: Vec<PathBuf>,
    pub debug_symbols: bool,
    pub tool_debug: bool,
}

/// Run both phases of the managed compile protocol. Returns the tools path used.
pub fn run(
    manifest: &KeelManifest,
    target: Option<&str>,
    options: &AotOptions,
    runner: &dyn ProcessRunner,
) -> Result<PathBuf> {
    let toolchain = super::toolchain(manifest, target)?;
    let sdk = super::sdk(manifest)?;

    let mut request = ManagedCompileRequest::resolve_tools()
        .with_debug_symbols(options.debug_symbols)
        .with_tool_debug(options.tool_debug);
    request.input_files = options.inputs.clone();
    request.assemblies_search_paths = options.search_paths.clone();

    toolchain.compile_managed(&sdk, &mut request, runner)?;
    let tools_path = request
        .resolved_tools_path()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    request.action = ManagedAction::CompileAssembly;
    toolchain.compile_managed(&sdk, &mut request, runner)?;
    info!(build_target = %toolchain.target(), state = ?request.state(), "managed compile finished");
    Ok(tools_path)
}
