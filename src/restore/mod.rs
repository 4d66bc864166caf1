//! Restore backends
//!
//! Runs `dotnet restore` into the isolated cache, either inside the
//! Flatpak .NET SDK sandbox or with a dotnet installed on the host.

mod factory;
pub mod flatpak;
pub mod host;
mod runtime;

pub use factory::create_restorer;
pub use flatpak::FlatpakRestorer;
pub use host::HostRestorer;
pub use runtime::{RestoreRequest, Restorer};

use crate::error::{NugetError, NugetResult};
use std::io;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::debug;

/// Max number of output lines to include in restore error messages.
const RESTORE_ERROR_TAIL_LINES: usize = 50;

/// Environment passed to every dotnet invocation
pub(crate) const DOTNET_ENV: &[(&str, &str)] = &[
    ("DOTNET_CLI_TELEMETRY_OPTOUT", "true"),
    ("DOTNET_SKIP_FIRST_TIME_EXPERIENCE", "true"),
];

/// Environment variable naming the NuGet package folder
pub(crate) const NUGET_PACKAGES_ENV: &str = "NUGET_PACKAGES";

/// Last `RESTORE_ERROR_TAIL_LINES` lines of restore output
pub(crate) fn restore_error_output(lines: &[String]) -> String {
    let start = lines.len().saturating_sub(RESTORE_ERROR_TAIL_LINES);
    lines[start..].join("\n")
}

/// Stream stdout+stderr from a child process to the debug log
///
/// Returns the interleaved output lines for error reporting.
pub(crate) async fn stream_child_output(child: &mut tokio::process::Child) -> Vec<String> {
    let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
        return Vec::new();
    };

    let mut stderr_reader = BufReader::new(stderr).lines();
    let mut stdout_reader = BufReader::new(stdout).lines();

    let mut output = Vec::new();
    let mut stderr_open = true;
    let mut stdout_open = true;

    while stderr_open || stdout_open {
        tokio::select! {
            line = stderr_reader.next_line(), if stderr_open => {
                stderr_open = record_line(line, &mut output);
            }
            line = stdout_reader.next_line(), if stdout_open => {
                stdout_open = record_line(line, &mut output);
            }
        }
    }

    output
}

/// Log and keep one line read from a child pipe; `false` once the pipe is done
fn record_line(line: io::Result<Option<String>>, output: &mut Vec<String>) -> bool {
    match line {
        Ok(Some(line)) => {
            debug!("restore: {}", line);
            output.push(line);
            true
        }
        _ => false,
    }
}

/// Run a prepared restore command to completion
///
/// `label` names the command in errors; `runtime` is the restore scope
/// reported when the command exits unsuccessfully. Dropping the returned
/// future kills the child.
pub(crate) async fn run_restore_command(
    mut command: Command,
    label: &str,
    runtime: Option<&str>,
) -> NugetResult<()> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = command.spawn().map_err(|e| NugetError::RestoreSpawn {
        command: label.to_string(),
        source: e,
    })?;

    let output = stream_child_output(&mut child).await;
    let status = child
        .wait()
        .await
        .map_err(|e| NugetError::io(format!("waiting for {label}"), e))?;

    if status.success() {
        Ok(())
    } else {
        Err(NugetError::restore_failed(
            runtime,
            status.code(),
            restore_error_output(&output),
        ))
    }
}
