//! Restore with a dotnet installed on the host
//!
//! Used with `--no-sandbox`. The package folder and telemetry settings are
//! set on the child command only; the generator's own environment is left
//! untouched.

use crate::error::NugetResult;
use crate::restore::runtime::{RestoreRequest, Restorer};
use crate::restore::{run_restore_command, DOTNET_ENV, NUGET_PACKAGES_ENV};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

/// Restore backend running `dotnet restore` directly
pub struct HostRestorer {
    program: String,
}

impl HostRestorer {
    /// Create a host restorer using `program` as the dotnet executable
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Full argument list for one restore
    pub fn args(&self, request: &RestoreRequest<'_>) -> Vec<String> {
        let mut args = vec!["restore".to_string()];
        args.extend(request.restore_args());
        args
    }
}

#[async_trait]
impl Restorer for HostRestorer {
    async fn restore(&self, request: &RestoreRequest<'_>) -> NugetResult<()> {
        info!(
            "Restoring {} for {} with {}",
            request.project.display(),
            request.runtime.unwrap_or("host runtime"),
            self.program
        );

        let args = self.args(request);
        debug!("Running: {} {:?}", self.program, args);

        let mut command = Command::new(&self.program);
        command
            .args(&args)
            .envs(DOTNET_ENV.iter().copied())
            .env(NUGET_PACKAGES_ENV, request.cache_root);
        run_restore_command(command, &self.program, request.runtime).await
    }

    fn name(&self) -> &'static str {
        "Host dotnet"
    }
}
