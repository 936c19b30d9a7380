//! Explicit toolchain configuration.
//!
//! Passed into toolchain constructors instead of living in process-wide
//! state, so independent toolchain instances never share settings.

use std::path::PathBuf;

use keel_sdk::package::DEFAULT_PACKAGE_PREFIX;
use keel_targets::{TargetArch, TargetDescriptor, TargetOs};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ToolchainError};

/// Settings consumed by the toolchain layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ToolchainConfig {
    /// Minimum iOS version (`--ios-min-ver`).
    #[serde(rename = "ios-min-ver")]
    pub ios_min_version: String,
    /// Minimum macOS version (`--macos-min-ver`).
    #[serde(rename = "macos-min-ver")]
    pub macos_min_version: String,
    /// SDK sysroot passed as `-isysroot` when set.
    pub sysroot: Option<PathBuf>,
    /// Prefix of the AOT cross packs in the managed SDK.
    pub package_prefix: String,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            ios_min_version: TargetOs::Ios.default_min_version().to_string(),
            macos_min_version: TargetOs::MacOs.default_min_version().to_string(),
            sysroot: None,
            package_prefix: DEFAULT_PACKAGE_PREFIX.to_string(),
        }
    }
}

impl ToolchainConfig {
    /// Configured minimum version for an OS.
    pub fn min_version_for(&self, os: TargetOs) -> &str {
        match os {
            TargetOs::Ios => &self.ios_min_version,
            TargetOs::MacOs => &self.macos_min_version,
        }
    }

    /// Build a validated descriptor for `os`/`arch` using the configured floor.
    pub fn descriptor(&self, os: TargetOs, arch: TargetArch) -> Result<TargetDescriptor> {
        let descriptor = TargetDescriptor::new(os, arch, self.min_version_for(os));
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Check the settings a build for `os` reads. The other OS's floor is ignored.
    pub fn validate_for(&self, os: TargetOs) -> Result<()> {
        if self.min_version_for(os).trim().is_empty() {
            return Err(ToolchainError::Configuration {
                field: match os {
                    TargetOs::Ios => "ios-min-ver",
                    TargetOs::MacOs => "macos-min-ver",
                },
                detail: "must not be empty".into(),
            });
        }
        if self.package_prefix.trim().is_empty() {
            return Err(ToolchainError::Configuration {
                field: "package-prefix",
                detail: "must not be empty".into(),
            });
        }
        Ok(())
    }
}
