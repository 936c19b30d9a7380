//! Base layer shared by every Unix-like target.

use keel_targets::TargetDescriptor;

use crate::environment::ToolchainEnvironment;
use crate::error::Result;
use crate::layer::ToolchainLayer;

#[derive(Debug, Clone, Copy, Default)]
pub struct UnixLayer;

impl ToolchainLayer for UnixLayer {
    fn name(&self) -> &str {
        "unix"
    }

    fn setup_environment(
        &self,
        _target: &TargetDescriptor,
        env: &mut ToolchainEnvironment,
    ) -> Result<()> {
        env.define("PLATFORM_UNIX");
        Ok(())
    }

    fn add_common_args(&self, _target: &TargetDescriptor, args: &mut Vec<String>) -> Result<()> {
        args.push("-pipe".into());
        args.push("-fmessage-length=0".into());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use keel_targets::{TargetArch, TargetOs};

    use super::*;

    #[test]
    fn contributes_no_link_inputs() {
        let target = TargetDescriptor::new(TargetOs::Ios, TargetArch::Arm64, "14");
        let mut env = ToolchainEnvironment::new();
        UnixLayer.setup_environment(&target, &mut env).unwrap();
        assert!(env.compile.preprocessor_definitions.contains("PLATFORM_UNIX"));
        assert!(env.link.input_libraries.is_empty());
    }
}
