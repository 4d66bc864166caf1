//! Error types for nuget-offline
//!
//! All modules use `NugetResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for nuget-offline operations
pub type NugetResult<T> = Result<T, NugetError>;

/// All errors that can occur while generating a manifest
#[derive(Error, Debug)]
pub enum NugetError {
    // Isolated cache errors
    #[error("Failed to prepare isolated package cache in {path}: {source}")]
    CacheSetup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Package cache is corrupt at {path}: {reason}")]
    CacheCorruption { path: PathBuf, reason: String },

    // Restore errors
    #[error("Restore failed for runtime {runtime} (exit code: {code})\n{output}")]
    RestoreFailed {
        runtime: String,
        code: String,
        output: String,
    },

    #[error("Failed to start restore command: {command}: {source}")]
    RestoreSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // Output errors
    #[error("Failed to write manifest {path}: {source}")]
    ManifestWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Interrupted")]
    Interrupted,

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NugetError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a cache corruption error
    pub fn corruption(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::CacheCorruption {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a restore failure error
    ///
    /// `runtime` is `None` for a restore scoped to the host runtime and
    /// `code` is `None` when the process was terminated by a signal.
    pub fn restore_failed(
        runtime: Option<&str>,
        code: Option<i32>,
        output: impl Into<String>,
    ) -> Self {
        Self::RestoreFailed {
            runtime: runtime.unwrap_or("host").to_string(),
            code: code.map_or_else(|| "signal".to_string(), |c| c.to_string()),
            output: output.into(),
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::RestoreSpawn { .. } => Some(
                "Install flatpak and the org.freedesktop.Sdk.Extension.dotnet extension, \
                 or pass --no-sandbox to use the host dotnet",
            ),
            Self::RestoreFailed { .. } => {
                Some("Check that the project restores with: dotnet restore <project>")
            }
            Self::CacheCorruption { .. } => Some("Re-run the generator to restore a fresh cache"),
            Self::ConfigInvalid { .. } => Some("Run with --config pointing at a valid TOML file"),
            Self::Interrupted => {
                Some("The package cache was removed; re-run to generate the manifest")
            }
            _ => None,
        }
    }
}
