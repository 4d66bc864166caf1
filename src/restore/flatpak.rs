//! Restore inside the Flatpak .NET SDK sandbox
//!
//! Runs `dotnet restore` from the `org.freedesktop.Sdk.Extension.dotnet<N>`
//! extension so the resolved packages match what flatpak-builder will
//! build against. Network access is granted for this command only.

use crate::config::schema::SandboxConfig;
use crate::error::NugetResult;
use crate::restore::runtime::{RestoreRequest, Restorer};
use crate::restore::{run_restore_command, DOTNET_ENV, NUGET_PACKAGES_ENV};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

/// Restore backend using `flatpak run`
pub struct FlatpakRestorer {
    config: SandboxConfig,
}

impl FlatpakRestorer {
    /// Create a new Flatpak restorer
    pub fn new(config: SandboxConfig) -> Self {
        Self { config }
    }

    /// Full `flatpak` argument list for one restore
    pub fn args(&self, request: &RestoreRequest<'_>) -> Vec<String> {
        let sdk_dir = format!("/usr/lib/sdk/dotnet{}", self.config.dotnet);
        let script = format!(
            "PATH=\"${{PATH}}:{sdk_dir}/bin\" \
             LD_LIBRARY_PATH=\"$LD_LIBRARY_PATH:{sdk_dir}/lib\" \
             exec dotnet restore \"$@\""
        );

        let mut args = vec!["run".to_string()];

        for (k, v) in DOTNET_ENV {
            args.push(format!("--env={}={}", k, v));
        }
        args.push(format!(
            "--env={}={}",
            NUGET_PACKAGES_ENV,
            request.cache_root.display()
        ));

        args.push("--command=sh".to_string());
        args.push(format!(
            "--runtime=org.freedesktop.Sdk//{}",
            self.config.freedesktop
        ));
        args.push("--share=network".to_string());
        args.push("--filesystem=host".to_string());
        args.push(format!(
            "org.freedesktop.Sdk.Extension.dotnet{}//{}",
            self.config.dotnet, self.config.freedesktop
        ));

        // sh -c <script> -- <restore args>; "--" becomes $0
        args.push("-c".to_string());
        args.push(script);
        args.push("--".to_string());
        args.extend(request.restore_args());
        args
    }
}

#[async_trait]
impl Restorer for FlatpakRestorer {
    async fn restore(&self, request: &RestoreRequest<'_>) -> NugetResult<()> {
        info!(
            "Restoring {} for {} in Flatpak SDK {}",
            request.project.display(),
            request.runtime.unwrap_or("host runtime"),
            self.config.freedesktop
        );

        let args = self.args(request);
        debug!("Running: {} {:?}", self.config.program, args);

        let mut command = Command::new(&self.config.program);
        command.args(&args);
        run_restore_command(command, &self.config.program, request.runtime).await
    }

    fn name(&self) -> &'static str {
        "Flatpak SDK"
    }
}
