//! Concrete macOS layer. Managed code runs under the JIT here, so no AOT compiler.

use keel_targets::TargetDescriptor;

use super::version_min_flag;
use crate::environment::ToolchainEnvironment;
use crate::error::Result;
use crate::layer::ToolchainLayer;

pub const MACOS_LINK_LIBRARIES: &[&str] = &[
    "z",
    "bz2",
    "Foundation.framework",
    "CoreFoundation.framework",
    "CoreGraphics.framework",
    "SystemConfiguration.framework",
    "IOKit.framework",
    "Cocoa.framework",
    "QuartzCore.framework",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct MacOsLayer;

impl ToolchainLayer for MacOsLayer {
    fn name(&self) -> &str {
        "macos"
    }

    fn setup_environment(
        &self,
        target: &TargetDescriptor,
        env: &mut ToolchainEnvironment,
    ) -> Result<()> {
        env.define(target.os.define());
        for lib in MACOS_LINK_LIBRARIES {
            env.link_library(*lib);
        }
        Ok(())
    }

    fn add_common_args(&self, target: &TargetDescriptor, args: &mut Vec<String>) -> Result<()> {
        args.push(version_min_flag(target));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use keel_targets::{TargetArch, TargetOs};

    use super::*;

    #[test]
    fn macos_contributions() {
        let target = TargetDescriptor::new(TargetOs::MacOs, TargetArch::Arm64, "11.0");
        let mut env = ToolchainEnvironment::new();
        MacOsLayer.setup_environment(&target, &mut env).unwrap();
        assert!(env.compile.preprocessor_definitions.contains("PLATFORM_MAC"));
        assert!(env.link.input_libraries.contains(&"Cocoa.framework".to_string()));

        let mut args = Vec::new();
        MacOsLayer.add_common_args(&target, &mut args).unwrap();
        assert_eq!(args, vec!["-mmacosx-version-min=11.0"]);
    }
}
