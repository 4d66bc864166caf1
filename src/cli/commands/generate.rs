//! Generate command - restore, hash and write the source manifest

use crate::cli::args::Cli;
use crate::config::Config;
use crate::error::{NugetError, NugetResult};
use crate::pipeline::{GenerateOptions, Pipeline};
use crate::restore::create_restorer;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

/// Execute the generate command
pub async fn execute(cli: &Cli, config: &Config) -> NugetResult<()> {
    let options = build_options(cli, config)?;
    let pipeline = Pipeline::new(create_restorer(config));
    debug!("Using restore backend: {}", pipeline.restorer_name());

    let pb = if cli.quiet {
        ProgressBar::hidden()
    } else {
        create_progress_bar("Preparing package cache...")
    };
    let spinner = pb.clone();
    let on_progress = move |msg: String| spinner.set_message(msg);

    let result = pipeline.run(&options, &on_progress).await;
    pb.finish_and_clear();
    let report = result?;

    if !cli.quiet {
        println!(
            "{} Wrote {} sources to {} ({})",
            style("✓").green(),
            report.entries,
            style(report.output.display()).cyan(),
            if report.runtimes.is_empty() {
                "host runtime".to_string()
            } else {
                report.runtimes.join(", ")
            }
        );
    }

    Ok(())
}

/// Combine parsed arguments and configuration into pipeline inputs
fn build_options(cli: &Cli, config: &Config) -> NugetResult<GenerateOptions> {
    let cache_base = match config.cache.base_dir {
        Some(ref dir) => dir.clone(),
        None => std::env::current_dir()
            .map_err(|e| NugetError::io("getting current directory", e))?,
    };

    Ok(GenerateOptions {
        output: cli.output.clone(),
        project: cli.project.clone(),
        runtimes: config.runtimes(cli.runtime.as_deref()),
        extra_args: config.restore.extra_args.clone(),
        destdir: config.manifest.destdir.clone(),
        verify: config.manifest.verify,
        cache_base,
    })
}

fn create_progress_bar(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["nuget-offline"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn options_restore_defaults_plus_requested_runtime() {
        let cli = parse(&["out.json", "App.csproj", "-r", "osx-arm64"]);
        let options = build_options(&cli, &Config::default()).unwrap();

        assert_eq!(
            options.runtimes,
            vec!["linux-x64", "linux-arm64", "osx-arm64"]
        );
        assert_eq!(options.destdir, "nuget-sources");
        assert_eq!(options.output, PathBuf::from("out.json"));
    }

    #[test]
    fn options_default_cache_base_is_cwd() {
        let cli = parse(&["out.json", "App.csproj"]);
        let options = build_options(&cli, &Config::default()).unwrap();
        assert_eq!(options.cache_base, std::env::current_dir().unwrap());
    }

    #[test]
    fn options_use_configured_cache_base() {
        let cli = parse(&["out.json", "App.csproj"]);
        let mut config = Config::default();
        config.cache.base_dir = Some(PathBuf::from("/var/tmp"));

        let options = build_options(&cli, &config).unwrap();
        assert_eq!(options.cache_base, PathBuf::from("/var/tmp"));
    }
}
