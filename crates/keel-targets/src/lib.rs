//! Target descriptors and host detection for Keel toolchains.
//!
//! A build is parameterised by a [`TargetDescriptor`]: the operating system,
//! the CPU architecture, and the minimum OS version the produced binaries
//! must run on. The [`HostDescriptor`] describes the machine running the
//! build and selects which cross-compiler packages apply.

pub mod error;
pub mod parse;
pub mod target;

pub use error::{Result, TargetError};
pub use parse::{
    builtin_targets, load_target_toml, parse_target, parse_target_toml, target_to_toml,
};
pub use target::{HostDescriptor, HostOs, TargetArch, TargetDescriptor, TargetOs};
