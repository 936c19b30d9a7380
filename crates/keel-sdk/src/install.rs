//! Installed SDK lookup.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Result, SdkError};
use crate::package::CrossPackageId;
use crate::version::{parse_folder_version, select_version_folder, Version};

/// Environment variable naming the SDK root.
pub const SDK_ROOT_ENV: &str = "DOTNET_ROOT";

const PACKS_DIR: &str = "packs";
const TOOLS_DIR: &str = "tools";

/// An already-installed managed SDK.
#[derive(Debug, Clone)]
pub struct SdkInstallation {
    root: PathBuf,
}

impl SdkInstallation {
    /// Use the SDK rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        SdkInstallation { root: root.into() }
    }

    /// Locate the SDK from the `DOTNET_ROOT` environment variable.
    pub fn discover() -> Result<Self> {
        match std::env::var_os(SDK_ROOT_ENV) {
            Some(root) if !root.is_empty() => Ok(Self::new(root)),
            _ => Err(SdkError::RootNotConfigured {
                detail: format!("set {SDK_ROOT_ENV} or pass an explicit SDK root"),
            }),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding all versioned packs.
    pub fn packs_dir(&self) -> PathBuf {
        self.root.join(PACKS_DIR)
    }

    fn package_dir(&self, package: &CrossPackageId) -> PathBuf {
        self.packs_dir().join(package.to_string())
    }

    /// Installed versions of a package, lowest first, with their folder names.
    pub fn list_versions(&self, package: &CrossPackageId) -> Result<Vec<(Version, String)>> {
        let dir = self.package_dir(package);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut versions = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                match parse_folder_version(name) {
                    Some(v) => versions.push((v, name.to_string())),
                    None => debug!(folder = name, "ignoring non-version folder"),
                }
            }
        }
        versions.sort();
        Ok(versions)
    }

    /// Resolve the `tools` directory of the highest installed version.
    pub fn resolve_tools_path(&self, package: &CrossPackageId) -> Result<PathBuf> {
        let dir = self.package_dir(package);
        let versions = self.list_versions(package)?;
        let selected = select_version_folder(versions.iter().map(|(_, name)| name.as_str()));

        match selected {
            Some((version, folder)) => {
                let tools = dir.join(folder).join(TOOLS_DIR);
                info!(package = %package, %version, path = %tools.display(), "resolved cross tools");
                Ok(tools)
            }
            None => Err(SdkError::ToolNotFound {
                searched: dir,
                pattern: package.pattern(),
            }),
        }
    }

    /// Every cross package installed under `packs/`.
    pub fn installed_packages(&self) -> Result<Vec<CrossPackageId>> {
        let packs = self.packs_dir();
        if !packs.is_dir() {
            return Ok(Vec::new());
        }

        let mut out = Vec::new();
        for entry in std::fs::read_dir(&packs)? {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if let Ok(id) = CrossPackageId::parse(name) {
                    out.push(id);
                }
            }
        }
        out.sort_by_key(|id| id.to_string());
        Ok(out)
    }
}
