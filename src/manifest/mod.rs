//! Flatpak source manifest
//!
//! Turns restored packages into `file` sources that flatpak-builder can
//! download ahead of an offline build, and writes them as a JSON array.

pub mod entry;
pub mod writer;

pub use entry::{package_filename, package_url, ManifestBuilder, ManifestEntry, SourceType};
pub use writer::{render, write_manifest};

/// Base of the NuGet v3 flat container API
pub const REGISTRY_BASE_URL: &str = "https://api.nuget.org/v3-flatcontainer";

/// Default `dest` directory for downloaded packages
pub const DEFAULT_DESTDIR: &str = "nuget-sources";
