//! Managed SDK installation layout for Keel.
//!
//! Cross-compiler tools ship inside the SDK as versioned packs:
//!
//! ```text
//! <root>/packs/
//!   Microsoft.NETCore.App.Runtime.AOT.osx-x64.Cross.ios-arm64/
//!     6.0.1/
//!       tools/
//!         mono-aot-cross
//!     7.0.0-preview.3/
//!       tools/
//! ```
//!
//! Several versions may be installed side by side; resolution always picks
//! the highest one.

pub mod error;
pub mod install;
pub mod package;
pub mod version;

pub use error::{Result, SdkError};
pub use install::SdkInstallation;
pub use package::CrossPackageId;
pub use version::{parse_folder_version, select_version_folder, Version};
