//! `keel.toml` project configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use keel_toolchain::ToolchainConfig;
use serde::{Deserialize, Serialize};

pub const MANIFEST_FILE: &str = "keel.toml";

/// The top-level `keel.toml` structure. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeelManifest {
    /// Toolchain settings (`ios-min-ver`, `sysroot`, ...).
    #[serde(default)]
    pub toolchain: ToolchainConfig,
    /// Managed SDK location.
    #[serde(default)]
    pub sdk: SdkConfig,
    /// Target selection.
    #[serde(default)]
    pub target: TargetConfig,
}

/// `[sdk]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SdkConfig {
    /// SDK root; `DOTNET_ROOT` is used when unset.
    #[serde(default)]
    pub root: Option<PathBuf>,
    /// Overrides `toolchain.package-prefix`.
    #[serde(default, rename = "package-prefix")]
    pub package_prefix: Option<String>,
}

/// `[target]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Target used when `--target` is not given.
    #[serde(default)]
    pub default: Option<String>,
}

/// Command-line values that take precedence over the manifest.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub ios_min_ver: Option<String>,
    pub macos_min_ver: Option<String>,
    pub sysroot: Option<PathBuf>,
    pub sdk_root: Option<PathBuf>,
}

impl KeelManifest {
    /// Search upward from `start_dir` for a `keel.toml` file, parse and return it
    /// along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(MANIFEST_FILE);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let manifest: KeelManifest = toml::from_str(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                return Ok(Some((manifest, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Parse a manifest from a TOML string.
    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing keel.toml")
    }

    pub fn default_target(&self) -> Option<&str> {
        self.target.default.as_deref()
    }

    /// Apply command-line overrides on top of the manifest values.
    ///
    /// Relative SDK roots and sysroots from the manifest resolve against the
    /// manifest's directory.
    pub fn merged(mut self, base_dir: Option<&Path>, overrides: Overrides) -> Self {
        if let Some(dir) = base_dir {
            if let Some(root) = self.sdk.root.take() {
                self.sdk.root = Some(dir.join(root));
            }
            if let Some(sysroot) = self.toolchain.sysroot.take() {
                self.toolchain.sysroot = Some(dir.join(sysroot));
            }
        }
        if let Some(prefix) = self.sdk.package_prefix.take() {
            self.toolchain.package_prefix = prefix;
        }
        if let Some(v) = overrides.ios_min_ver {
            self.toolchain.ios_min_version = v;
        }
        if let Some(v) = overrides.macos_min_ver {
            self.toolchain.macos_min_version = v;
        }
        if overrides.sysroot.is_some() {
            self.toolchain.sysroot = overrides.sysroot;
        }
        if overrides.sdk_root.is_some() {
            self.sdk.root = overrides.sdk_root;
        }
        self
    }
}
