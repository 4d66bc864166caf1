//! Process-scoped temporary package cache
//!
//! The cache directory is created next to the output (the current working
//! directory by default) so restores do not pay for cross-filesystem
//! copies. It is removed when released, or when dropped on an error path.

use crate::error::{NugetError, NugetResult};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, warn};

/// Name prefix of the temporary cache directory
const CACHE_PREFIX: &str = ".nuget-offline-";

/// An empty package folder owned by a single run
#[derive(Debug)]
pub struct IsolatedCache {
    root: PathBuf,
    dir: Option<TempDir>,
}

impl IsolatedCache {
    /// Create a fresh, uniquely named cache directory under `base`
    pub fn acquire(base: &Path) -> NugetResult<Self> {
        let dir = tempfile::Builder::new()
            .prefix(CACHE_PREFIX)
            .tempdir_in(base)
            .map_err(|e| NugetError::CacheSetup {
                path: base.to_path_buf(),
                source: e,
            })?;

        let root = dir.path().to_path_buf();
        debug!("Acquired isolated package cache: {}", root.display());

        Ok(Self {
            root,
            dir: Some(dir),
        })
    }

    /// Root of the package folder (`NUGET_PACKAGES` for the restore)
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Remove the cache and everything the restores wrote into it
    ///
    /// A failed removal is logged and otherwise ignored so it cannot mask
    /// the result of the run.
    pub fn release(mut self) {
        self.cleanup();
    }

    fn cleanup(&mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };

        match dir.close() {
            Ok(()) => debug!("Removed isolated package cache: {}", self.root.display()),
            Err(e) => warn!(
                "Failed to remove isolated package cache {}: {}",
                self.root.display(),
                e
            ),
        }
    }
}

impl Drop for IsolatedCache {
    fn drop(&mut self) {
        self.cleanup();
    }
}
