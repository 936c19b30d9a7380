//! Apple OS family layer: settings shared by iOS and macOS.

use std::path::PathBuf;

use keel_targets::TargetDescriptor;
use tracing::debug;

use crate::environment::ToolchainEnvironment;
use crate::error::Result;
use crate::layer::ToolchainLayer;

#[derive(Debug, Clone)]
pub struct AppleLayer {
    /// Xcode platform name (`iPhoneOS`, `MacOSX`).
    sdk_platform: &'static str,
    sysroot: Option<PathBuf>,
}

impl AppleLayer {
    pub fn new(sdk_platform: &'static str, sysroot: Option<PathBuf>) -> Self {
        Self {
            sdk_platform,
            sysroot,
        }
    }

    pub fn sdk_platform(&self) -> &'static str {
        self.sdk_platform
    }
}

impl ToolchainLayer for AppleLayer {
    fn name(&self) -> &str {
        "apple"
    }

    fn setup_environment(
        &self,
        _target: &TargetDescriptor,
        env: &mut ToolchainEnvironment,
    ) -> Result<()> {
        env.define("PLATFORM_APPLE_FAMILY");
        Ok(())
    }

    fn add_common_args(&self, target: &TargetDescriptor, args: &mut Vec<String>) -> Result<()> {
        args.push("-arch".into());
        args.push(target.arch.clang_name().into());
        match &self.sysroot {
            Some(sysroot) => {
                args.push("-isysroot".into());
                args.push(sysroot.display().to_string());
            }
            None => debug!(
                sdk_platform = self.sdk_platform,
                "no sysroot configured, using the compiler's default SDK"
            ),
        }
        Ok(())
    }
}
