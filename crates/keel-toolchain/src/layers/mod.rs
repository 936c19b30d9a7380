//! Built-in toolchain layers.
//!
//! Stacked as `unix` → `apple` → `ios` | `macos`.

mod apple;
mod ios;
mod macos;
mod unix;

pub use apple::AppleLayer;
pub use ios::{IosLayer, IOS_LINK_LIBRARIES};
pub use macos::{MacOsLayer, MACOS_LINK_LIBRARIES};
pub use unix::UnixLayer;

use keel_targets::TargetDescriptor;

/// The clang version-floor flag for a target, e.g. `-miphoneos-version-min=14`.
pub fn version_min_flag(target: &TargetDescriptor) -> String {
    format!(
        "-m{}-version-min={}",
        target.os.version_min_platform(),
        target.minimum_os_version
    )
}
