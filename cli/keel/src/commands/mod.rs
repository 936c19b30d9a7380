//! CLI command implementations.

pub mod aot;
pub mod doctor;
pub mod env;
pub mod target;
pub mod tools;

use anyhow::{anyhow, Result};
use keel_sdk::SdkInstallation;
use keel_targets::{parse_target, TargetDescriptor};
use keel_toolchain::Toolchain;

use crate::manifest::KeelManifest;

/// Resolve `--target` (or the manifest default) into a descriptor carrying the
/// configured minimum OS version.
pub fn resolve_target(manifest: &KeelManifest, target: Option<&str>) -> Result<TargetDescriptor> {
    let name = target.or(manifest.default_target()).ok_or_else(|| {
        anyhow!("no target given (pass --target or set [target] default in keel.toml)")
    })?;
    let (os, arch) = parse_target(name)?;
    Ok(manifest.toolchain.descriptor(os, arch)?)
}

/// Standard toolchain for the selected target on this host.
pub fn toolchain(manifest: &KeelManifest, target: Option<&str>) -> Result<Toolchain> {
    let descriptor = resolve_target(manifest, target)?;
    Ok(Toolchain::for_target(descriptor, &manifest.toolchain)?)
}

/// The configured SDK, falling back to `DOTNET_ROOT`.
pub fn sdk(manifest: &KeelManifest) -> Result<SdkInstallation> {
    match &manifest.sdk.root {
        Some(root) => Ok(SdkInstallation::new(root)),
        None => Ok(SdkInstallation::discover()?),
    }
}


#[cfg(test)]
mod tests {
    use keel_targets::{TargetArch, TargetOs};

    use super::*;
    use crate::manifest::Overrides;

    #[test]
    fn explicit_target_wins_over_default() {
        let mut manifest = KeelManifest::default();
        manifest.target.default = Some("macos-arm64".into());
        let target = resolve_target(&manifest, Some("ios-x64")).unwrap();
        assert_eq!(target.os, TargetOs::Ios);
        assert_eq!(target.arch, TargetArch::X64);
        assert_eq!(target.minimum_os_version, "14");

        let target = resolve_target(&manifest, None).unwrap();
        assert_eq!(target.os, TargetOs::MacOs);
        assert_eq!(target.minimum_os_version, "10.15");
    }

    #[test]
    fn missing_target_is_an_error() {
        let err = resolve_target(&KeelManifest::default(), None).unwrap_err();
        assert!(err.to_string().contains("--target"));
    }

    #[test]
    fn floor_override_reaches_descriptor() {
        let manifest = KeelManifest::default().merged(
            None,
            Overrides {
                ios_min_ver: Some("16.4".into()),
                ..Default::default()
            },
        );
        let target = resolve_target(&manifest, Some("ios-arm64")).unwrap();
        assert_eq!(target.minimum_os_version, "16.4");
    }

    #[test]
    fn empty_floor_is_rejected() {
        let manifest = KeelManifest::default().merged(
            None,
            Overrides {
                ios_min_ver: Some(" ".into()),
                ..Default::default()
            },
        );
        assert!(resolve_target(&manifest, Some("ios-arm64")).is_err());
    }
}
