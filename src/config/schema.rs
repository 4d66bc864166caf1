//! Configuration schema for nuget-offline
//!
//! Configuration is stored at `~/.config/nuget-offline/config.toml`

use crate::manifest::DEFAULT_DESTDIR;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Flatpak sandbox settings
    pub sandbox: SandboxConfig,

    /// Restore invocation settings
    pub restore: RestoreConfig,

    /// Manifest output settings
    pub manifest: ManifestConfig,

    /// Isolated cache settings
    pub cache: CacheConfig,
}

/// Flatpak sandbox used to run `dotnet restore`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// Run the restore inside the Flatpak SDK sandbox
    pub enabled: bool,

    /// Flatpak executable
    pub program: String,

    /// Freedesktop SDK branch (e.g. "22.08")
    pub freedesktop: String,

    /// .NET SDK extension major version (e.g. "6")
    pub dotnet: String,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            program: "flatpak".to_string(),
            freedesktop: "22.08".to_string(),
            dotnet: "6".to_string(),
        }
    }
}

/// Restore invocation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RestoreConfig {
    /// dotnet executable used when the sandbox is disabled
    pub program: String,

    /// Runtime identifiers that are always restored
    pub default_runtimes: Vec<String>,

    /// Extra arguments appended to every restore invocation
    pub extra_args: Vec<String>,
}

impl Default for RestoreConfig {
    fn default() -> Self {
        Self {
            program: "dotnet".to_string(),
            default_runtimes: vec!["linux-x64".to_string(), "linux-arm64".to_string()],
            extra_args: vec![],
        }
    }
}

/// Manifest output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    /// Destination directory written into each entry's `dest`
    pub destdir: String,

    /// Hash cached archives and compare them with their side-files
    pub verify: bool,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            destdir: DEFAULT_DESTDIR.to_string(),
            verify: false,
        }
    }
}

/// Isolated cache settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory the temporary package cache is created in (default: cwd)
    pub base_dir: Option<PathBuf>,
}

impl Config {
    /// Runtime identifiers to restore for, in order
    ///
    /// The configured defaults always come first; `extra` is appended
    /// when given and not already listed.
    pub fn runtimes(&self, extra: Option<&str>) -> Vec<String> {
        let mut runtimes = self.restore.default_runtimes.clone();
        if let Some(rid) = extra {
            if !runtimes.iter().any(|r| r == rid) {
                runtimes.push(rid.to_string());
            }
        }
        runtimes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[sandbox]"));
        assert!(toml.contains("[manifest]"));
    }

    #[test]
    fn config_deserializes_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.sandbox.enabled);
        assert_eq!(config.manifest.destdir, "nuget-sources");
        assert_eq!(
            config.restore.default_runtimes,
            vec!["linux-x64", "linux-arm64"]
        );
    }

    #[test]
    fn config_deserializes_partial() {
        let toml = r#"
            [sandbox]
            freedesktop = "23.08"
            dotnet = "8"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.sandbox.freedesktop, "23.08");
        assert_eq!(config.sandbox.dotnet, "8");
        assert_eq!(config.sandbox.program, "flatpak"); // default preserved
    }

    #[test]
    fn runtimes_appends_requested() {
        let config = Config::default();
        assert_eq!(
            config.runtimes(Some("win-x64")),
            vec!["linux-x64", "linux-arm64", "win-x64"]
        );
    }

    #[test]
    fn runtimes_skips_duplicate_request() {
        let config = Config::default();
        assert_eq!(
            config.runtimes(Some("linux-x64")),
            vec!["linux-x64", "linux-arm64"]
        );
        assert_eq!(config.runtimes(None).len(), 2);
    }
}
