//! Restore → scan → build → write pipeline
//!
//! A run acquires an isolated cache, restores the project once per runtime
//! identifier into it, turns every cached package into a manifest entry and
//! writes the sorted manifest. The cache is removed on every exit path,
//! Ctrl-C included, and the output file is only touched after every earlier
//! step succeeded.

use crate::cache::{scan, IsolatedCache};
use crate::error::{NugetError, NugetResult};
use crate::manifest::{write_manifest, ManifestBuilder, ManifestEntry};
use crate::restore::{RestoreRequest, Restorer};
use std::future::Future;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Inputs of a single manifest generation
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Manifest file to write
    pub output: PathBuf,
    /// Project or solution file to restore
    pub project: PathBuf,
    /// Runtime identifiers to restore for; empty restores for the host only
    pub runtimes: Vec<String>,
    /// Extra arguments for every restore
    pub extra_args: Vec<String>,
    /// `dest` of every manifest entry
    pub destdir: String,
    /// Hash cached archives against their side-files
    pub verify: bool,
    /// Directory the isolated cache is created in
    pub cache_base: PathBuf,
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateReport {
    /// Entries in the written manifest
    pub entries: usize,
    /// Runtime identifiers restored
    pub runtimes: Vec<String>,
    /// Manifest path
    pub output: PathBuf,
}

/// Manifest generation driven by a [`Restorer`]
pub struct Pipeline {
    restorer: Box<dyn Restorer>,
}

impl Pipeline {
    /// Create a pipeline using `restorer` for every restore
    pub fn new(restorer: Box<dyn Restorer>) -> Self {
        Self { restorer }
    }

    /// Name of the restore backend
    pub fn restorer_name(&self) -> &'static str {
        self.restorer.name()
    }

    /// Generate the manifest described by `options`
    ///
    /// `on_progress` receives a short status line before each step.
    /// Stops with [`NugetError::Interrupted`] on Ctrl-C.
    pub async fn run(
        &self,
        options: &GenerateOptions,
        on_progress: &(dyn Fn(String) + Send + Sync),
    ) -> NugetResult<GenerateReport> {
        self.run_until(options, on_progress, ctrl_c()).await
    }

    /// Like [`Pipeline::run`], stopping when `interrupt` completes
    ///
    /// The in-flight restore is dropped, which kills its child process,
    /// before the cache is released.
    pub async fn run_until(
        &self,
        options: &GenerateOptions,
        on_progress: &(dyn Fn(String) + Send + Sync),
        interrupt: impl Future<Output = ()>,
    ) -> NugetResult<GenerateReport> {
        if !options.project.exists() {
            return Err(NugetError::PathNotFound(options.project.clone()));
        }

        let cache = IsolatedCache::acquire(&options.cache_base)?;
        let result = tokio::select! {
            biased;
            () = interrupt => {
                warn!("Interrupted, removing package cache");
                Err(NugetError::Interrupted)
            }
            result = self.run_in(cache.root(), options, on_progress) => result,
        };
        cache.release();
        result
    }

    async fn run_in(
        &self,
        cache_root: &Path,
        options: &GenerateOptions,
        on_progress: &(dyn Fn(String) + Send + Sync),
    ) -> NugetResult<GenerateReport> {
        let runtimes: Vec<Option<&str>> = if options.runtimes.is_empty() {
            vec![None]
        } else {
            options.runtimes.iter().map(|r| Some(r.as_str())).collect()
        };

        for runtime in &runtimes {
            on_progress(format!(
                "Restoring for {}...",
                runtime.unwrap_or("host runtime")
            ));
            let request = RestoreRequest {
                project: &options.project,
                cache_root,
                runtime: *runtime,
                extra_args: &options.extra_args,
            };
            self.restorer.restore(&request).await?;
        }

        on_progress("Hashing restored packages...".to_string());
        let builder = ManifestBuilder::new(options.destdir.clone()).with_verify(options.verify);
        let entries = collect_entries(cache_root, &builder)?;
        debug!("Built {} manifest entries", entries.len());

        on_progress(format!("Writing {}...", options.output.display()));
        let count = write_manifest(entries, &options.output)?;
        info!(
            "Generated {} sources for {} runtime(s)",
            count,
            runtimes.len()
        );

        Ok(GenerateReport {
            entries: count,
            runtimes: options.runtimes.clone(),
            output: options.output.clone(),
        })
    }
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed
async fn ctrl_c() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Scan the cache and build one entry per package version
pub fn collect_entries(
    cache_root: &Path,
    builder: &ManifestBuilder,
) -> NugetResult<Vec<ManifestEntry>> {
    scan(cache_root)
        .map(|record| record.and_then(|r| builder.build(&r)))
        .collect()
}
