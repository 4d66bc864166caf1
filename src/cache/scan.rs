//! Discovery of restored packages in the isolated cache
//!
//! Walks the package folder and yields one [`ResolvedPackage`] per
//! integrity side-file. Traversal order is whatever the filesystem gives;
//! the manifest writer sorts afterwards.

use crate::error::{NugetError, NugetResult};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File name suffix of the integrity side-files written by restore
pub const SIDEFILE_SUFFIX: &str = ".nupkg.sha512";

/// Depth of a side-file below the cache root: `<name>/<version>/<file>`
const SIDEFILE_DEPTH: usize = 3;

/// A package version found in the cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPackage {
    /// Package id, as named by its directory
    pub name: String,
    /// Package version, as named by its directory
    pub version: String,
    /// Base64-encoded SHA-512 of the package archive
    pub raw_digest: String,
    /// Side-file the digest was read from
    pub sidefile: PathBuf,
}

impl ResolvedPackage {
    /// Path of the `.nupkg` archive the side-file describes
    pub fn archive_path(&self) -> PathBuf {
        self.sidefile.with_extension("")
    }
}

/// Lazy, single-pass scan over a populated package cache
pub struct CacheScanner {
    walker: walkdir::IntoIter,
}

/// Scan `root` for integrity side-files
pub fn scan(root: &Path) -> CacheScanner {
    CacheScanner::new(root)
}

impl CacheScanner {
    /// Create a scanner over `root`
    pub fn new(root: &Path) -> Self {
        Self {
            walker: WalkDir::new(root).follow_links(false).into_iter(),
        }
    }

    fn read_record(path: &Path, depth: usize) -> NugetResult<ResolvedPackage> {
        if depth != SIDEFILE_DEPTH {
            return Err(NugetError::corruption(
                path,
                format!("side-file at depth {depth}, expected <name>/<version>/<file>"),
            ));
        }

        let version_dir = path.parent();
        let name_dir = version_dir.and_then(Path::parent);
        let (Some(version), Some(name)) = (
            version_dir.and_then(dir_name),
            name_dir.and_then(dir_name),
        ) else {
            return Err(NugetError::corruption(
                path,
                "package directory names are not valid UTF-8",
            ));
        };

        let content = fs::read_to_string(path)
            .map_err(|e| NugetError::corruption(path, format!("unreadable side-file: {e}")))?;
        let raw_digest = content.trim();
        if raw_digest.is_empty() {
            return Err(NugetError::corruption(path, "empty side-file"));
        }

        Ok(ResolvedPackage {
            name: name.to_string(),
            version: version.to_string(),
            raw_digest: raw_digest.to_string(),
            sidefile: path.to_path_buf(),
        })
    }
}

fn dir_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

impl Iterator for CacheScanner {
    type Item = NugetResult<ResolvedPackage>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                    return Some(Err(NugetError::corruption(
                        path,
                        format!("failed to walk cache: {e}"),
                    )));
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }
            let is_sidefile = entry
                .file_name()
                .to_str()
                .is_some_and(|n| n.ends_with(SIDEFILE_SUFFIX));
            if !is_sidefile {
                continue;
            }

            return Some(Self::read_record(entry.path(), entry.depth()));
        }
    }
}
