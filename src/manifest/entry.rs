//! Manifest entries built from resolved packages

use crate::cache::ResolvedPackage;
use crate::error::{NugetError, NugetResult};
use crate::manifest::{DEFAULT_DESTDIR, REGISTRY_BASE_URL};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use std::fs::File;
use std::io;
use tracing::debug;

/// Kind of flatpak-builder source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    File,
}

/// One downloadable package in the manifest
///
/// Field order is the serialized key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    #[serde(rename = "type")]
    pub source_type: SourceType,
    pub url: String,
    pub sha512: String,
    pub dest: String,
    #[serde(rename = "dest-filename")]
    pub dest_filename: String,
}

/// File name of a package archive: `<name>.<version>.nupkg`
pub fn package_filename(name: &str, version: &str) -> String {
    format!("{name}.{version}.nupkg")
}

/// Download URL of a package archive on the public registry
pub fn package_url(name: &str, version: &str) -> String {
    format!(
        "{REGISTRY_BASE_URL}/{name}/{version}/{}",
        package_filename(name, version)
    )
}

/// Builds manifest entries for a fixed destination directory
#[derive(Debug, Clone)]
pub struct ManifestBuilder {
    destdir: String,
    verify: bool,
}

impl ManifestBuilder {
    /// Create a builder writing entries into `destdir`
    pub fn new(destdir: impl Into<String>) -> Self {
        Self {
            destdir: destdir.into(),
            verify: false,
        }
    }

    /// Also hash each cached archive and compare it with its side-file
    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Build the entry for one resolved package
    ///
    /// The same name and version always produce the same entry, whichever
    /// runtime restore pulled the package in.
    pub fn build(&self, package: &ResolvedPackage) -> NugetResult<ManifestEntry> {
        let digest = BASE64.decode(&package.raw_digest).map_err(|e| {
            NugetError::corruption(&package.sidefile, format!("invalid base64 digest: {e}"))
        })?;

        if self.verify {
            verify_archive(package, &digest)?;
        }

        Ok(ManifestEntry {
            source_type: SourceType::File,
            url: package_url(&package.name, &package.version),
            sha512: hex::encode(&digest),
            dest: self.destdir.clone(),
            dest_filename: package_filename(&package.name, &package.version),
        })
    }
}

impl Default for ManifestBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_DESTDIR)
    }
}

/// Hash the archive next to the side-file and compare with `expected`
fn verify_archive(package: &ResolvedPackage, expected: &[u8]) -> NugetResult<()> {
    let archive = package.archive_path();
    let mut file = File::open(&archive)
        .map_err(|e| NugetError::corruption(&archive, format!("cannot open archive: {e}")))?;

    let mut hasher = Sha512::new();
    io::copy(&mut file, &mut hasher)
        .map_err(|e| NugetError::corruption(&archive, format!("cannot read archive: {e}")))?;
    let actual = hasher.finalize();

    if actual.as_slice() != expected {
        return Err(NugetError::corruption(
            &archive,
            format!(
                "SHA-512 mismatch: side-file says {}, archive is {}",
                hex::encode(expected),
                hex::encode(actual)
            ),
        ));
    }

    debug!("Verified {}", archive.display());
    Ok(())
}
