//! Keel CLI: inspect Apple-family toolchains and drive managed AOT compilation.

mod commands;
mod manifest;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use keel_toolchain::SystemProcessRunner;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use manifest::{KeelManifest, Overrides};

#[derive(Parser)]
#[command(name = "keel", version, about = "Apple-family toolchains and managed AOT cross-compilation")]
struct Cli {
    /// Log layer decisions and process output at debug level
    #[arg(long, short, global = true)]
    verbose: bool,
    /// Minimum iOS version (overrides keel.toml)
    #[arg(long, global = true, alias = "iOSMinVer")]
    ios_min_ver: Option<String>,
    /// Minimum macOS version (overrides keel.toml)
    #[arg(long, global = true, alias = "macOSMinVer")]
    macos_min_ver: Option<String>,
    /// SDK sysroot passed as -isysroot
    #[arg(long, global = true)]
    sysroot: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show definitions, linker inputs and common args for a target
    Env {
        /// Target (e.g., ios-arm64, macos-x64)
        #[arg(long)]
        target: Option<String>,
        /// Output format (text, json)
        #[arg(long)]
        format: Option<String>,
    },
    /// Print the resolved cross-compiler tools directory
    Tools {
        /// Target (e.g., ios-arm64)
        #[arg(long)]
        target: Option<String>,
        /// Managed SDK root (default: keel.toml, then DOTNET_ROOT)
        #[arg(long)]
        sdk_root: Option<PathBuf>,
    },
    /// AOT-compile a managed assembly for a target
    Aot {
        /// Target (e.g., ios-arm64)
        #[arg(long)]
        target: Option<String>,
        /// Managed SDK root (default: keel.toml, then DOTNET_ROOT)
        #[arg(long)]
        sdk_root: Option<PathBuf>,
        /// Input assembly
        #[arg(long, required = true)]
        input: Vec<PathBuf>,
        /// Directory searched for referenced assemblies (repeatable)
        #[arg(long)]
        search_path: Vec<PathBuf>,
        /// Emit debug information for the compiled code
        #[arg(long)]
        debug_symbols: bool,
        /// Run the compiler itself with debug output
        #[arg(long)]
        tool_debug: bool,
    },
    /// Inspect built-in targets
    Target {
        #[command(subcommand)]
        action: TargetAction,
    },
    /// Check configuration and installed cross-compiler packs
    Doctor {
        /// Managed SDK root (default: keel.toml, then DOTNET_ROOT)
        #[arg(long)]
        sdk_root: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum TargetAction {
    /// List available targets
    List,
    /// Show details of a target
    Describe {
        /// Target name, or path to a .target.toml file
        name: String,
        /// Output format (default: human-readable, "toml" for TOML)
        #[arg(long)]
        format: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(fmt::layer().without_time().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let mut overrides = Overrides {
        ios_min_ver: cli.ios_min_ver,
        macos_min_ver: cli.macos_min_ver,
        sysroot: cli.sysroot,
        sdk_root: None,
    };

    match cli.command {
        Commands::Env { target, format } => {
            let (manifest, _) = load_manifest(&cwd, overrides)?;
            commands::env::run(&manifest, target.as_deref(), format.as_deref())
        }

        Commands::Tools { target, sdk_root } => {
            overrides.sdk_root = sdk_root;
            let (manifest, _) = load_manifest(&cwd, overrides)?;
            commands::tools::run(&manifest, target.as_deref())
        }

        Commands::Aot {
            target,
            sdk_root,
            input,
            search_path,
            debug_symbols,
            tool_debug,
        } => {
            overrides.sdk_root = sdk_root;
            let (manifest, _) = load_manifest(&cwd, overrides)?;
            let options = commands::aot::AotOptions {
                inputs: input,
                search_paths: search_path,
                debug_symbols,
                tool_debug,
            };
            commands::aot::run(&manifest, target.as_deref(), &options, &SystemProcessRunner)?;
            Ok(())
        }

        Commands::Target { action } => {
            let (manifest, _) = load_manifest(&cwd, overrides)?;
            match action {
                TargetAction::List => commands::target::list(),
                TargetAction::Describe { name, format } => {
                    print!("{}", commands::target::describe(&manifest, &name, format.as_deref())?);
                    Ok(())
                }
            }
        }

        Commands::Doctor { sdk_root } => {
            overrides.sdk_root = sdk_root;
            let (manifest, project_dir) = load_manifest(&cwd, overrides)?;
            commands::doctor::run(project_dir.as_deref(), &manifest)
        }
    }
}

/// Load `keel.toml` from the current directory upward (defaults when absent)
/// and apply command-line overrides.
fn load_manifest(
    cwd: &Path,
    overrides: Overrides,
) -> anyhow::Result<(KeelManifest, Option<PathBuf>)> {
    match KeelManifest::find_and_load(cwd)? {
        Some((manifest, dir)) => Ok((manifest.merged(Some(&dir), overrides), Some(dir))),
        None => Ok((KeelManifest::default().merged(None, overrides), None)),
    }
}
