//! `keel tools`: resolve the cross-compiler tools directory.

use std::path::PathBuf;

use anyhow::{bail, Result};
use keel_toolchain::{AotOutcome, ManagedCompileRequest, SystemProcessRunner};

use crate::manifest::KeelManifest;

/// Run the tools-resolution phase and return the tools path.
pub fn resolve(manifest: &KeelManifest, target: Option<&str>) -> Result<PathBuf> {
    let toolchain = super::toolchain(manifest, target)?;
    let sdk = super::sdk(manifest)?;
    let mut request = ManagedCompileRequest::resolve_tools();
    match toolchain.compile_managed(&sdk, &mut request, &SystemProcessRunner)? {
        AotOutcome::ToolsResolved { tools_path } => Ok(tools_path),
        AotOutcome::Compiled => bail!("tools resolution unexpectedly ran the compiler"),
    }
}

pub fn run(manifest: &KeelManifest, target: Option<&str>) -> Result<()> {
    println!("{}", resolve(manifest, target)?.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::resolve_target;
    use crate::commands::test_support::{install_pack, manifest_with_sdk};

    #[test]
    fn resolves_highest_version() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = manifest_with_sdk(dir.path());
        let target = resolve_target(&manifest, None).unwrap();
        install_pack(&manifest, &target, "6.0.9");
        let newest = install_pack(&manifest, &target, "7.0.1");

        assert_eq!(resolve(&manifest, None).unwrap(), newest);
    }

    #[test]
    fn missing_pack_names_the_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = manifest_with_sdk(dir.path());
        let err = resolve(&manifest, Some("ios-arm64")).unwrap_err();
        assert!(format!("{err:#}").contains(".Cross.ios-arm64"));
    }

    #[test]
    fn macos_has_no_cross_compiler() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = manifest_with_sdk(dir.path());
        assert!(resolve(&manifest, Some("macos-arm64")).is_err());
    }
}
