//! Toolchain layer trait and the ordered layer stack.

use std::fmt;

use keel_sdk::SdkInstallation;
use keel_targets::{HostDescriptor, TargetDescriptor, TargetOs};
use tracing::debug;

use crate::aot::{AotOutcome, ManagedAotCompiler, ManagedCompileRequest};
use crate::config::ToolchainConfig;
use crate::environment::ToolchainEnvironment;
use crate::error::{Result, ToolchainError};
use crate::layers::{AppleLayer, IosLayer, MacOsLayer, UnixLayer};
use crate::process::ProcessRunner;

/// One level of toolchain refinement (base, OS family, or concrete OS).
///
/// Object-safe so layers can be stored in `Box<dyn ToolchainLayer>`.
pub trait ToolchainLayer: fmt::Debug + Send + Sync {
    /// Human-readable layer name.
    fn name(&self) -> &str;

    /// Contribute definitions and linker inputs.
    fn setup_environment(
        &self,
        _target: &TargetDescriptor,
        _env: &mut ToolchainEnvironment,
    ) -> Result<()> {
        Ok(())
    }

    /// Contribute compiler arguments shared by every compile step.
    fn add_common_args(&self, _target: &TargetDescriptor, _args: &mut Vec<String>) -> Result<()> {
        Ok(())
    }

    /// The managed AOT compiler this layer provides, if any.
    fn managed_aot(
        &self,
        _host: HostDescriptor,
        _target: &TargetDescriptor,
    ) -> Option<ManagedAotCompiler> {
        None
    }
}

/// A target's toolchain: layers ordered base first.
#[derive(Debug)]
pub struct Toolchain {
    target: TargetDescriptor,
    host: HostDescriptor,
    layers: Vec<Box<dyn ToolchainLayer>>,
}

impl Toolchain {
    /// An empty toolchain; layers are added with [`Toolchain::push_layer`].
    pub fn new(target: TargetDescriptor, host: HostDescriptor) -> Self {
        Self {
            target,
            host,
            layers: Vec::new(),
        }
    }

    /// Build the standard layer stack for `target` on the current host.
    pub fn for_target(target: TargetDescriptor, config: &ToolchainConfig) -> Result<Self> {
        Self::with_host(target, HostDescriptor::current()?, config)
    }

    /// Build the standard layer stack for `target` on an explicit host.
    pub fn with_host(
        target: TargetDescriptor,
        host: HostDescriptor,
        config: &ToolchainConfig,
    ) -> Result<Self> {
        config.validate_for(target.os)?;
        target.validate()?;

        let os = target.os;
        let mut toolchain = Self::new(target, host);
        toolchain.push_layer(Box::new(UnixLayer));
        toolchain.push_layer(Box::new(AppleLayer::new(
            os.sdk_platform(),
            config.sysroot.clone(),
        )));
        match os {
            TargetOs::Ios => {
                toolchain.push_layer(Box::new(IosLayer::new(config.package_prefix.clone())))
            }
            TargetOs::MacOs => toolchain.push_layer(Box::new(MacOsLayer)),
        }
        Ok(toolchain)
    }

    /// Append a layer after all existing ones.
    pub fn push_layer(&mut self, layer: Box<dyn ToolchainLayer>) {
        self.layers.push(layer);
    }

    pub fn layers(&self) -> &[Box<dyn ToolchainLayer>] {
        &self.layers
    }

    pub fn target(&self) -> &TargetDescriptor {
        &self.target
    }

    pub fn host(&self) -> HostDescriptor {
        self.host
    }

    /// Name of the most specific layer.
    pub fn name(&self) -> &str {
        self.layers.last().map(|l| l.name()).unwrap_or("empty")
    }

    /// Run every layer's environment setup, base first.
    pub fn setup_environment(&self, env: &mut ToolchainEnvironment) -> Result<()> {
        self.target.validate()?;
        for layer in &self.layers {
            debug!(layer = layer.name(), build_target = %self.target, "setup environment");
            layer.setup_environment(&self.target, env)?;
        }
        Ok(())
    }

    /// Run every layer's common-argument hook, base first.
    pub fn add_common_args(&self, args: &mut Vec<String>) -> Result<()> {
        self.target.validate()?;
        for layer in &self.layers {
            layer.add_common_args(&self.target, args)?;
        }
        debug!(build_target = %self.target, ?args, "common args");
        Ok(())
    }

    /// Fresh environment with setup done and common args in `extra_args`.
    pub fn prepare(&self) -> Result<ToolchainEnvironment> {
        let mut env = ToolchainEnvironment::new();
        self.setup_environment(&mut env)?;
        let mut args = Vec::new();
        self.add_common_args(&mut args)?;
        env.extra_args.extend(args);
        Ok(env)
    }

    /// The AOT compiler of the most specific layer that provides one.
    pub fn managed_aot(&self) -> Option<ManagedAotCompiler> {
        self.layers
            .iter()
            .rev()
            .find_map(|layer| layer.managed_aot(self.host, &self.target))
    }

    /// Drive one step of the managed compile protocol for this target.
    pub fn compile_managed(
        &self,
        sdk: &SdkInstallation,
        request: &mut ManagedCompileRequest,
        runner: &dyn ProcessRunner,
    ) -> Result<AotOutcome> {
        let compiler = self
            .managed_aot()
            .ok_or_else(|| ToolchainError::UnsupportedManagedTarget {
                target: self.target.to_string(),
            })?;
        compiler.run(sdk, request, runner)
    }
}
