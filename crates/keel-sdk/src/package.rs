//! Cross-compiler package identifiers.
//!
//! Packs follow `<prefix>.<hostOS>-<hostArch>.Cross.<targetOS>-<targetArch>`,
//! using runtime identifier names (`osx-x64`, `ios-arm64`).

use std::fmt;

use keel_targets::{HostDescriptor, HostOs, TargetArch, TargetDescriptor, TargetOs};

use crate::error::{Result, SdkError};

/// Package prefix of the runtime AOT packs.
pub const DEFAULT_PACKAGE_PREFIX: &str = "Microsoft.NETCore.App.Runtime.AOT";

const CROSS_MARKER: &str = ".Cross.";

/// Identifies one host/target cross-compiler pack.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CrossPackageId {
    pub prefix: String,
    pub host: HostDescriptor,
    pub target_os: TargetOs,
    pub target_arch: TargetArch,
}

impl CrossPackageId {
    /// Package for building `target` on `host` with the default prefix.
    pub fn for_target(host: HostDescriptor, target: &TargetDescriptor) -> Self {
        Self::with_prefix(DEFAULT_PACKAGE_PREFIX, host, target)
    }

    pub fn with_prefix(
        prefix: impl Into<String>,
        host: HostDescriptor,
        target: &TargetDescriptor,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            host,
            target_os: target.os,
            target_arch: target.arch,
        }
    }

    /// Naming pattern shown in errors when nothing matches.
    pub fn pattern(&self) -> String {
        self.to_string()
    }

    /// Parse a package id, rejecting anything off-convention.
    pub fn parse(id: &str) -> Result<Self> {
        let invalid = |detail: &str| SdkError::InvalidPackageId {
            id: id.to_string(),
            detail: detail.to_string(),
        };

        let (head, target) = id
            .split_once(CROSS_MARKER)
            .ok_or_else(|| invalid("missing '.Cross.' marker"))?;
        let (prefix, host) = head
            .rsplit_once('.')
            .ok_or_else(|| invalid("missing '<prefix>.<host>' before '.Cross.'"))?;
        if prefix.is_empty() {
            return Err(invalid("empty package prefix"));
        }

        let (host_os, host_arch) = host
            .split_once('-')
            .ok_or_else(|| invalid("host must be <os>-<arch>"))?;
        let host_os = match host_os {
            "osx" => HostOs::MacOs,
            "linux" => HostOs::Linux,
            "win" => HostOs::Windows,
            _ => return Err(invalid("unknown host OS")),
        };
        let host_arch = parse_rid_arch(host_arch).ok_or_else(|| invalid("unknown host arch"))?;

        let (target_os, target_arch) = target
            .split_once('-')
            .ok_or_else(|| invalid("target must be <os>-<arch>"))?;
        let target_os = match target_os {
            "ios" => TargetOs::Ios,
            "osx" => TargetOs::MacOs,
            _ => return Err(invalid("unknown target OS")),
        };
        let target_arch =
            parse_rid_arch(target_arch).ok_or_else(|| invalid("unknown target arch"))?;

        Ok(Self {
            prefix: prefix.to_string(),
            host: HostDescriptor::new(host_os, host_arch),
            target_os,
            target_arch,
        })
    }
}

fn parse_rid_arch(s: &str) -> Option<TargetArch> {
    match s {
        "x64" => Some(TargetArch::X64),
        "arm64" => Some(TargetArch::Arm64),
        _ => None,
    }
}

impl fmt::Display for CrossPackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}{CROSS_MARKER}{}-{}",
            self.prefix,
            self.host,
            self.target_os.rid_name(),
            self.target_arch.rid_name()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn osx_x64() -> HostDescriptor {
        HostDescriptor::new(HostOs::MacOs, TargetArch::X64)
    }

    #[test]
    fn ios_package_name() {
        let target = TargetDescriptor::new(TargetOs::Ios, TargetArch::Arm64, "14");
        let id = CrossPackageId::for_target(osx_x64(), &target);
        assert_eq!(
            id.to_string(),
            "Microsoft.NETCore.App.Runtime.AOT.osx-x64.Cross.ios-arm64"
        );
    }

    #[test]
    fn parse_matches_display() {
        let id = CrossPackageId::parse("Runtime.AOT.linux-arm64.Cross.ios-x64").unwrap();
        assert_eq!(id.prefix, "Runtime.AOT");
        assert_eq!(id.host, HostDescriptor::new(HostOs::Linux, TargetArch::Arm64));
        assert_eq!(id.target_os, TargetOs::Ios);
        assert_eq!(id.target_arch, TargetArch::X64);
        assert_eq!(id.to_string(), "Runtime.AOT.linux-arm64.Cross.ios-x64");
    }

    #[test]
    fn parse_rejects_off_convention() {
        for bad in [
            "Microsoft.NETCore.App.Runtime.AOT.osx-x64.ios-arm64",
            "osx-x64.Cross.ios-arm64",
            "Runtime.AOT.osx-x64.Cross.android-arm64",
            "Runtime.AOT.osx.Cross.ios-arm64",
            "Runtime.AOT.beos-x64.Cross.ios-arm64",
        ] {
            assert!(
                matches!(CrossPackageId::parse(bad), Err(SdkError::InvalidPackageId { .. })),
                "{bad} should be rejected"
            );
        }
    }
}
