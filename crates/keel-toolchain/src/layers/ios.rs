//! Concrete iOS layer.

use keel_sdk::CrossPackageId;
use keel_targets::{HostDescriptor, TargetDescriptor};

use super::version_min_flag;
use crate::aot::ManagedAotCompiler;
use crate::environment::ToolchainEnvironment;
use crate::error::Result;
use crate::layer::ToolchainLayer;

/// System libraries and frameworks every iOS application links, in order.
pub const IOS_LINK_LIBRARIES: &[&str] = &[
    "z",
    "bz2",
    "Foundation.framework",
    "CoreFoundation.framework",
    "CoreGraphics.framework",
    "SystemConfiguration.framework",
    "IOKit.framework",
    "UIKit.framework",
    "QuartzCore.framework",
];

#[derive(Debug, Clone)]
pub struct IosLayer {
    package_prefix: String,
}

impl IosLayer {
    pub fn new(package_prefix: impl Into<String>) -> Self {
        Self {
            package_prefix: package_prefix.into(),
        }
    }
}

impl ToolchainLayer for IosLayer {
    fn name(&self) -> &str {
        "ios"
    }

    fn setup_environment(
        &self,
        target: &TargetDescriptor,
        env: &mut ToolchainEnvironment,
    ) -> Result<()> {
        env.define(target.os.define());
        // TODO: let modules declare their own system frameworks instead of linking all of them here.
        for lib in IOS_LINK_LIBRARIES {
            env.link_library(*lib);
        }
        Ok(())
    }

    fn add_common_args(&self, target: &TargetDescriptor, args: &mut Vec<String>) -> Result<()> {
        args.push(version_min_flag(target));
        Ok(())
    }

    fn managed_aot(
        &self,
        host: HostDescriptor,
        target: &TargetDescriptor,
    ) -> Option<ManagedAotCompiler> {
        let package = CrossPackageId::with_prefix(self.package_prefix.clone(), host, target);
        Some(ManagedAotCompiler::new(package))
    }
}
