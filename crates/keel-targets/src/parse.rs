//! Target-string parsing and TOML (de)serialization of descriptors.
//!
//! Target strings have the form `<os>-<arch>` (`ios-arm64`, `macos-x64`).
//! A handful of aliases used by Apple and .NET tooling are accepted as well.

use std::path::Path;

use crate::error::{Result, TargetError};
use crate::target::{TargetArch, TargetDescriptor, TargetOs};

/// Built-in target names with a short description.
pub fn builtin_targets() -> Vec<(String, &'static str)> {
    let mut out = Vec::new();
    for os in TargetOs::all() {
        for arch in TargetArch::all() {
            let description = match (os, arch) {
                (TargetOs::Ios, TargetArch::Arm64) => "iOS device (arm64)",
                (TargetOs::Ios, TargetArch::X64) => "iOS simulator (x86_64)",
                (TargetOs::MacOs, TargetArch::Arm64) => "macOS on Apple silicon",
                (TargetOs::MacOs, TargetArch::X64) => "macOS on Intel",
            };
            out.push((format!("{os}-{arch}"), description));
        }
    }
    out
}

fn parse_os(s: &str) -> Option<TargetOs> {
    match s.to_ascii_lowercase().as_str() {
        "ios" | "iphoneos" => Some(TargetOs::Ios),
        "macos" | "osx" | "macosx" | "mac" => Some(TargetOs::MacOs),
        _ => None,
    }
}

fn parse_arch(s: &str) -> Option<TargetArch> {
    match s.to_ascii_lowercase().as_str() {
        "arm64" | "aarch64" => Some(TargetArch::Arm64),
        "x64" | "x86_64" | "amd64" => Some(TargetArch::X64),
        _ => None,
    }
}

/// Parse an `<os>-<arch>` string into its OS and architecture.
pub fn parse_target(input: &str) -> Result<(TargetOs, TargetArch)> {
    let unknown = |detail: String| TargetError::UnknownTarget {
        input: input.to_string(),
        detail,
    };

    // `x86_64` contains an underscore, never a dash, so the last dash splits.
    let (os_part, arch_part) = input
        .trim()
        .rsplit_once('-')
        .ok_or_else(|| unknown("expected <os>-<arch>".into()))?;

    let os = parse_os(os_part).ok_or_else(|| unknown(format!("unsupported OS '{os_part}'")))?;
    let arch = parse_arch(arch_part)
        .ok_or_else(|| unknown(format!("unsupported architecture '{arch_part}'")))?;
    Ok((os, arch))
}

/// Parse a descriptor from a TOML string.
pub fn parse_target_toml(toml_str: &str) -> Result<TargetDescriptor> {
    let descriptor: TargetDescriptor = toml::from_str(toml_str)?;
    descriptor.validate()?;
    Ok(descriptor)
}

/// Load a descriptor from a `.target.toml` file.
pub fn load_target_toml(path: &Path) -> Result<TargetDescriptor> {
    if !path.exists() {
        return Err(TargetError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    parse_target_toml(&content)
}

/// Serialize a descriptor to pretty TOML.
pub fn target_to_toml(descriptor: &TargetDescriptor) -> Result<String> {
    Ok(toml::to_string_pretty(descriptor)?)
}
