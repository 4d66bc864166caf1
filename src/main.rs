//! nuget-offline - Offline NuGet sources for Flatpak builds
//!
//! CLI entry point: sets up logging, loads configuration and runs the
//! generator.

use clap::Parser;
use console::style;
use nuget_offline::cli::{Cli, LogFormat};
use nuget_offline::config::ConfigManager;
use nuget_offline::error::{NugetError, NugetResult};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            if matches!(e, NugetError::Interrupted) {
                ExitCode::from(130)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

async fn run() -> NugetResult<()> {
    let cli = Cli::parse();

    // Initialize logging: 0 = warn (spinner only), 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("nuget_offline=warn"),
        1 => EnvFilter::new("nuget_offline=info"),
        _ => EnvFilter::new("nuget_offline=debug"),
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();
    match cli.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }

    // Load configuration
    let config_manager = if let Some(ref path) = cli.config {
        ConfigManager::with_path(path.clone())
    } else {
        ConfigManager::new()
    };
    let mut config = config_manager.load().await?;
    debug!("Loaded config from {}", config_manager.path().display());

    cli.apply_to(&mut config);
    nuget_offline::cli::commands::generate(&cli, &config).await
}
