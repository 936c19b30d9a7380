//! Target and host descriptors.
//!
//! The descriptor is read by every toolchain layer; nothing downstream
//! mutates it once a build has started.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TargetError};

/// Operating system a build produces binaries for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetOs {
    Ios,
    #[serde(rename = "macos")]
    MacOs,
}

impl TargetOs {
    /// Canonical short name used in target strings and cross-package ids.
    pub fn name(&self) -> &'static str {
        match self {
            TargetOs::Ios => "ios",
            TargetOs::MacOs => "macos",
        }
    }

    /// Runtime identifier used by the managed SDK (`ios`, `osx`).
    pub fn rid_name(&self) -> &'static str {
        match self {
            TargetOs::Ios => "ios",
            TargetOs::MacOs => "osx",
        }
    }

    /// Xcode platform folder name (`iPhoneOS.platform`, `MacOSX.platform`).
    pub fn sdk_platform(&self) -> &'static str {
        match self {
            TargetOs::Ios => "iPhoneOS",
            TargetOs::MacOs => "MacOSX",
        }
    }

    /// Platform token used in the clang `-m<platform>-version-min` flag.
    pub fn version_min_platform(&self) -> &'static str {
        match self {
            TargetOs::Ios => "iphoneos",
            TargetOs::MacOs => "macosx",
        }
    }

    /// Preprocessor definition identifying the OS.
    pub fn define(&self) -> &'static str {
        match self {
            TargetOs::Ios => "PLATFORM_IOS",
            TargetOs::MacOs => "PLATFORM_MAC",
        }
    }

    /// Default minimum OS version when none is configured.
    pub fn default_min_version(&self) -> &'static str {
        match self {
            TargetOs::Ios => "14",
            TargetOs::MacOs => "10.15",
        }
    }

    /// All supported target operating systems.
    pub fn all() -> &'static [TargetOs] {
        &[TargetOs::Ios, TargetOs::MacOs]
    }
}

impl fmt::Display for TargetOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// CPU architecture of a target or host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetArch {
    X64,
    Arm64,
}

impl TargetArch {
    /// Runtime identifier name (`x64`, `arm64`).
    pub fn rid_name(&self) -> &'static str {
        match self {
            TargetArch::X64 => "x64",
            TargetArch::Arm64 => "arm64",
        }
    }

    /// Name passed to clang's `-arch` flag.
    pub fn clang_name(&self) -> &'static str {
        match self {
            TargetArch::X64 => "x86_64",
            TargetArch::Arm64 => "arm64",
        }
    }

    /// All supported architectures.
    pub fn all() -> &'static [TargetArch] {
        &[TargetArch::X64, TargetArch::Arm64]
    }
}

impl fmt::Display for TargetArch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rid_name())
    }
}

/// The (OS, architecture, minimum OS version) tuple for one build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TargetDescriptor {
    pub os: TargetOs,
    pub arch: TargetArch,
    /// Minimum OS version, e.g. "14". Only checked for non-emptiness.
    pub minimum_os_version: String,
}

impl TargetDescriptor {
    pub fn new(os: TargetOs, arch: TargetArch, minimum_os_version: impl Into<String>) -> Self {
        Self {
            os,
            arch,
            minimum_os_version: minimum_os_version.into(),
        }
    }

    /// Check the fields toolchain layers format into flags.
    pub fn validate(&self) -> Result<()> {
        if self.minimum_os_version.trim().is_empty() {
            return Err(TargetError::Configuration {
                field: "minimum_os_version",
                detail: format!("must not be empty (target {self})"),
            });
        }
        if self.minimum_os_version.chars().any(char::is_whitespace) {
            return Err(TargetError::Configuration {
                field: "minimum_os_version",
                detail: format!(
                    "must not contain whitespace, got '{}'",
                    self.minimum_os_version
                ),
            });
        }
        Ok(())
    }
}

impl fmt::Display for TargetDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

/// Operating system of the machine running the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HostOs {
    #[serde(rename = "macos")]
    MacOs,
    Linux,
    Windows,
}

impl HostOs {
    /// Runtime identifier name (`osx`, `linux`, `win`).
    pub fn rid_name(&self) -> &'static str {
        match self {
            HostOs::MacOs => "osx",
            HostOs::Linux => "linux",
            HostOs::Windows => "win",
        }
    }
}

/// The build host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HostDescriptor {
    pub os: HostOs,
    pub arch: TargetArch,
}

impl HostDescriptor {
    pub fn new(os: HostOs, arch: TargetArch) -> Self {
        Self { os, arch }
    }

    /// Describe the machine this process runs on.
    pub fn current() -> Result<Self> {
        Self::from_consts(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Map `std::env::consts`-style names onto a host descriptor.
    pub fn from_consts(os: &str, arch: &str) -> Result<Self> {
        let host_os = match os {
            "macos" => HostOs::MacOs,
            "linux" => HostOs::Linux,
            "windows" => HostOs::Windows,
            other => {
                return Err(TargetError::UnknownTarget {
                    input: format!("{other}-{arch}"),
                    detail: format!("unsupported host OS '{other}'"),
                })
            }
        };
        let host_arch = match arch {
            "x86_64" => TargetArch::X64,
            "aarch64" => TargetArch::Arm64,
            other => {
                return Err(TargetError::UnknownTarget {
                    input: format!("{os}-{other}"),
                    detail: format!("unsupported host architecture '{other}'"),
                })
            }
        };
        Ok(Self::new(host_os, host_arch))
    }
}

impl fmt::Display for HostDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os.rid_name(), self.arch.rid_name())
    }
}
