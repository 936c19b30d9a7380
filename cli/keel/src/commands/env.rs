//! `keel env`: show what the toolchain layers contribute for a target.

use anyhow::{bail, Result};
use keel_toolchain::ToolchainEnvironment;
use serde::Serialize;

use crate::manifest::KeelManifest;

#[derive(Debug, Serialize)]
struct EnvReport<'a> {
    target: String,
    host: String,
    minimum_os_version: &'a str,
    layers: Vec<&'a str>,
    environment: &'a ToolchainEnvironment,
    link_flags: Vec<String>,
}

/// Render the prepared environment as text or JSON.
pub fn render(manifest: &KeelManifest, target: Option<&str>, format: Option<&str>) -> Result<String> {
    let toolchain = super::toolchain(manifest, target)?;
    let env = toolchain.prepare()?;

    match format.unwrap_or("text") {
        "json" => {
            let report = EnvReport {
                target: toolchain.target().to_string(),
                host: toolchain.host().to_string(),
                minimum_os_version: &toolchain.target().minimum_os_version,
                layers: toolchain.layers().iter().map(|l| l.name()).collect(),
                environment: &env,
                link_flags: env.link.to_flags(),
            };
            Ok(serde_json::to_string_pretty(&report)?)
        }
        "text" => {
            let mut out = String::new();
            out.push_str(&format!(
                "Toolchain: {} ({} on {}, minimum OS {})\n",
                toolchain.name(),
                toolchain.target(),
                toolchain.host(),
                toolchain.target().minimum_os_version
            ));
            out.push_str("\nDefinitions:\n");
            for define in env.compile.preprocessor_definitions.iter() {
                out.push_str(&format!("  {define}\n"));
            }
            out.push_str("\nLinker inputs:\n");
            for lib in &env.link.input_libraries {
                out.push_str(&format!("  {lib}\n"));
            }
            out.push_str("\nCommon args:\n");
            for arg in &env.extra_args {
                out.push_str(&format!("  {arg}\n"));
            }
            Ok(out)
        }
        other => bail!("unknown format '{other}' (expected text or json)"),
    }
}

pub fn run(manifest: &KeelManifest, target: Option<&str>, format: Option<&str>) -> Result<()> {
    print!("{}", render(manifest, target, format)?);
    Ok(())
}
