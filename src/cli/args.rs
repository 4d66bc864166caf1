//! CLI argument definitions using clap derive

use crate::config::Config;
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// nuget-offline - Offline NuGet sources for Flatpak builds
///
/// Restores a .NET project into a private package folder and writes a
/// flatpak-builder source list with the URL and SHA-512 of every package.
#[derive(Parser, Debug)]
#[command(name = "nuget-offline")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Manifest file to write
    pub output: PathBuf,

    /// Project or solution file to restore
    pub project: PathBuf,

    /// Additional runtime identifier to restore for
    #[arg(short, long)]
    pub runtime: Option<String>,

    /// Destination directory for packages in the manifest
    #[arg(long)]
    pub destdir: Option<String>,

    /// Freedesktop SDK branch
    #[arg(short, long)]
    pub freedesktop: Option<String>,

    /// .NET SDK extension major version
    #[arg(short, long)]
    pub dotnet: Option<String>,

    /// Run the host dotnet instead of the Flatpak SDK
    #[arg(long)]
    pub no_sandbox: bool,

    /// Check every cached archive against its SHA-512 side-file
    #[arg(long)]
    pub verify: bool,

    /// Directory to create the temporary package cache in
    #[arg(long)]
    pub cache_base: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, env = "NUGET_OFFLINE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Hide the progress spinner
    #[arg(short, long)]
    pub quiet: bool,

    /// Log output format
    #[arg(long, value_enum, env = "NUGET_OFFLINE_LOG_FORMAT", default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Extra arguments passed to `dotnet restore` (after `--`)
    #[arg(last = true)]
    pub dotnet_args: Vec<String>,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(ref destdir) = self.destdir {
            config.manifest.destdir = destdir.clone();
        }
        if let Some(ref freedesktop) = self.freedesktop {
            config.sandbox.freedesktop = freedesktop.clone();
        }
        if let Some(ref dotnet) = self.dotnet {
            config.sandbox.dotnet = dotnet.clone();
        }
        if self.no_sandbox {
            config.sandbox.enabled = false;
        }
        if self.verify {
            config.manifest.verify = true;
        }
        if let Some(ref base) = self.cache_base {
            config.cache.base_dir = Some(base.clone());
        }
        config.restore.extra_args.extend(self.dotnet_args.iter().cloned());
    }
}
