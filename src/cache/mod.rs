//! Isolated package cache
//!
//! Every run restores into a private, temporary NuGet package folder so
//! the user's own `~/.nuget/packages` is never read or written. After all
//! restores finish the folder is scanned for integrity side-files.
//!
//! # Layout
//!
//! | Path | Written by |
//! |------|------------|
//! | `<name>/<version>/<name>.<version>.nupkg` | restore |
//! | `<name>/<version>/<name>.<version>.nupkg.sha512` | restore (base64 SHA-512) |

pub mod isolated;
pub mod scan;

pub use isolated::IsolatedCache;
pub use scan::{scan, CacheScanner, ResolvedPackage, SIDEFILE_SUFFIX};
