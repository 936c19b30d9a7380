//! `keel doctor`: toolchain and SDK diagnostics.

use std::path::Path;
use std::process::Command;

use anyhow::Result;
use keel_sdk::SdkInstallation;
use keel_targets::{HostDescriptor, TargetOs};

use crate::manifest::{KeelManifest, MANIFEST_FILE};

/// Build the diagnostic report.
pub fn report(project_dir: Option<&Path>, manifest: &KeelManifest) -> String {
    let mut out = String::from("=== Keel Doctor ===\n\n");
    out.push_str(&format!("Keel version: {}\n", env!("CARGO_PKG_VERSION")));
    match HostDescriptor::current() {
        Ok(host) => out.push_str(&format!("Host:         {host}\n")),
        Err(e) => out.push_str(&format!("Host:         unsupported ({e})\n")),
    }

    out.push_str("\n--- Configuration ---\n");
    match project_dir {
        Some(dir) => out.push_str(&format!("  {MANIFEST_FILE}: found at {}\n", dir.display())),
        None => out.push_str(&format!("  {MANIFEST_FILE}: not found\n")),
    }
    let config = &manifest.toolchain;
    out.push_str(&format!("  ios-min-ver:    {}\n", config.ios_min_version));
    out.push_str(&format!("  macos-min-ver:  {}\n", config.macos_min_version));
    out.push_str(&format!("  package-prefix: {}\n", config.package_prefix));
    match &config.sysroot {
        Some(sysroot) => out.push_str(&format!("  sysroot:        {}\n", sysroot.display())),
        None => out.push_str("  sysroot:        (compiler default)\n"),
    }
    if let Some(default) = manifest.default_target() {
        out.push_str(&format!("  default target: {default}\n"));
    }
    for os in TargetOs::all() {
        if let Err(e) = config.validate_for(*os) {
            out.push_str(&format!("  invalid for {os}: {e}\n"));
        }
    }

    out.push_str("\n--- Managed SDK ---\n");
    match super::sdk(manifest) {
        Ok(sdk) => sdk_section(&sdk, &mut out),
        Err(e) => out.push_str(&format!("  {e:#}\n")),
    }
    out
}

fn sdk_section(sdk: &SdkInstallation, out: &mut String) {
    out.push_str(&format!("  root: {}\n", sdk.root().display()));
    let packages = match sdk.installed_packages() {
        Ok(packages) => packages,
        Err(e) => {
            out.push_str(&format!("  error reading packs: {e}\n"));
            return;
        }
    };
    if packages.is_empty() {
        out.push_str("  no cross packages installed\n");
    }
    for package in packages {
        let versions = sdk
            .list_versions(&package)
            .map(|v| {
                v.into_iter()
                    .map(|(_, folder)| folder)
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_else(|e| format!("error: {e}"));
        out.push_str(&format!("  {package}: {versions}\n"));
    }
}

/// Print diagnostics, including the state of the native tools.
pub fn run(project_dir: Option<&Path>, manifest: &KeelManifest) -> Result<()> {
    print!("{}", report(project_dir, manifest));
    println!();
    println!("--- System Tools ---");
    print_tool_status("clang", &["--version"]);
    print_tool_status("xcrun", &["--version"]);
    Ok(())
}

fn print_tool_status(name: &str, args: &[&str]) {
    match Command::new(name).args(args).output() {
        Ok(output) => {
            let version = String::from_utf8_lossy(&output.stdout);
            let first_line = version.lines().next().unwrap_or("(unknown version)");
            println!("  {name}: {first_line}");
        }
        Err(_) => {
            println!("  {name}: not found");
        }
    }
}
