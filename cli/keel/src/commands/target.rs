//! `keel target`: target listing and description.

use std::path::Path;

use anyhow::{bail, Result};
use keel_targets::{builtin_targets, load_target_toml, target_to_toml};
use keel_toolchain::Toolchain;

use crate::manifest::KeelManifest;

/// List all built-in targets.
pub fn list() -> Result<()> {
    println!("Built-in targets:");
    println!();
    for (name, description) in builtin_targets() {
        println!("  {name:<16} {description}");
    }
    println!();
    println!("Use 'keel target describe <name>' for details.");
    Ok(())
}

/// Describe a target as the configured toolchain sees it.
///
/// `name` is a built-in target or a path to a `.target.toml` file; a file
/// carries its own minimum OS version.
pub fn describe(manifest: &KeelManifest, name: &str, format: Option<&str>) -> Result<String> {
    let toolchain = if name.ends_with(".toml") {
        let descriptor = load_target_toml(Path::new(name))?;
        Toolchain::for_target(descriptor, &manifest.toolchain)?
    } else {
        super::toolchain(manifest, Some(name))?
    };
    let target = toolchain.target();

    match format {
        Some("toml") => return Ok(target_to_toml(target)?),
        Some(other) => bail!("unknown format '{other}' (expected toml)"),
        None => {}
    }

    let mut out = format!("=== Target: {target} ===\n");
    out.push_str(&format!("  OS:             {}\n", target.os.name()));
    out.push_str(&format!("  Architecture:   {}\n", target.arch.clang_name()));
    out.push_str(&format!("  Minimum OS:     {}\n", target.minimum_os_version));
    out.push_str(&format!("  SDK platform:   {}\n", target.os.sdk_platform()));
    out.push_str(&format!("  Definition:     {}\n", target.os.define()));
    let layers: Vec<&str> = toolchain.layers().iter().map(|l| l.name()).collect();
    out.push_str(&format!("  Layers:         {}\n", layers.join(" -> ")));
    match toolchain.managed_aot() {
        Some(aot) => out.push_str(&format!("  Cross package:  {}\n", aot.package())),
        None => out.push_str("  Cross package:  (managed AOT not supported)\n"),
    }
    Ok(out)
}
