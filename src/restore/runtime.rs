//! Restore backend abstraction
//!
//! Provides a trait for restoring a project into a package folder that
//! can be implemented by different backends (Flatpak SDK sandbox, host
//! dotnet, or a fake that fills the cache directly in tests).

use crate::error::NugetResult;
use async_trait::async_trait;
use std::path::Path;

/// Everything a single restore invocation needs
///
/// Passed explicitly so no backend depends on the ambient environment.
#[derive(Debug, Clone, Copy)]
pub struct RestoreRequest<'a> {
    /// Project or solution file to restore
    pub project: &'a Path,
    /// Package folder to restore into
    pub cache_root: &'a Path,
    /// Runtime identifier to restore for (`None` = host runtime)
    pub runtime: Option<&'a str>,
    /// Extra arguments appended to the restore command line
    pub extra_args: &'a [String],
}

impl RestoreRequest<'_> {
    /// Arguments following `dotnet restore`
    pub fn restore_args(&self) -> Vec<String> {
        let mut args = vec![
            "--packages".to_string(),
            self.cache_root.display().to_string(),
            self.project.display().to_string(),
        ];
        if let Some(rid) = self.runtime {
            args.push("-r".to_string());
            args.push(rid.to_string());
        }
        args.extend(self.extra_args.iter().cloned());
        args
    }
}

/// Abstract restore interface
///
/// A successful call leaves every package version the project needs for
/// `request.runtime` in `request.cache_root`, next to its `.nupkg.sha512`
/// side-file. Calls accumulate into the same folder.
#[async_trait]
pub trait Restorer: Send + Sync {
    /// Restore the project for one runtime identifier
    async fn restore(&self, request: &RestoreRequest<'_>) -> NugetResult<()>;

    /// Get the human-readable backend name for display
    fn name(&self) -> &'static str;
}
