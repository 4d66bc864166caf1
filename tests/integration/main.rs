//! Integration tests for nuget-offline

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;

    fn nuget_offline() -> Command {
        cargo_bin_cmd!("nuget-offline")
    }

    #[test]
    fn help_displays() {
        nuget_offline()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Offline NuGet sources"))
            .stdout(predicate::str::contains("--runtime"))
            .stdout(predicate::str::contains("--destdir"));
    }

    #[test]
    fn version_displays() {
        nuget_offline()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("nuget-offline"));
    }

    #[test]
    fn missing_positionals_fail() {
        nuget_offline()
            .arg("out.json")
            .assert()
            .failure()
            .stderr(predicate::str::contains("PROJECT"));
    }
}

#[cfg(unix)]
mod restore_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};
    use std::process::{self, Stdio};
    use std::thread;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    /// Fake `dotnet restore`: every runtime gets newtonsoft.json, linux-arm64
    /// additionally gets a native runtime package.
    const FAKE_DOTNET: &str = r#"#!/bin/sh
pkg() {
    mkdir -p "$NUGET_PACKAGES/$1/$2"
    printf '%s' "$3" > "$NUGET_PACKAGES/$1/$2/$1.$2.nupkg.sha512"
}
pkg newtonsoft.json 13.0.1 AAA=
case "$6" in
    linux-arm64) pkg runtime.linux-arm64.native 1.0.0 AAE= ;;
esac
"#;

    const FAILING_DOTNET: &str = r#"#!/bin/sh
echo "error NU1101: Unable to find package Missing.Package" >&2
exit 1
"#;

    /// Fake `dotnet restore` that fills the cache and then hangs
    const HANGING_DOTNET: &str = r#"#!/bin/sh
mkdir -p "$NUGET_PACKAGES/foo/1.0.0"
printf 'AAA=' > "$NUGET_PACKAGES/foo/1.0.0/foo.1.0.0.nupkg.sha512"
touch "$(dirname "$0")/started"
exec sleep 30
"#;

    struct Workspace {
        dir: TempDir,
    }

    impl Workspace {
        fn new(script: &str) -> Self {
            let dir = TempDir::new().unwrap();
            let fake = dir.path().join("fake-dotnet");
            fs::write(&fake, script).unwrap();
            fs::set_permissions(&fake, fs::Permissions::from_mode(0o755)).unwrap();

            fs::write(dir.path().join("App.csproj"), "<Project />").unwrap();
            fs::create_dir(dir.path().join("work")).unwrap();
            fs::write(
                dir.path().join("config.toml"),
                format!("[restore]\nprogram = \"{}\"\n", fake.display()),
            )
            .unwrap();
            Self { dir }
        }

        fn path(&self, name: &str) -> PathBuf {
            self.dir.path().join(name)
        }

        fn command(&self) -> Command {
            let mut cmd = cargo_bin_cmd!("nuget-offline");
            cmd.arg("--config")
                .arg(self.path("config.toml"))
                .arg("--no-sandbox")
                .arg("--quiet")
                .arg("--cache-base")
                .arg(self.path("work"))
                .arg(self.path("nuget-sources.json"))
                .arg(self.path("App.csproj"));
            cmd
        }
    }

    fn is_empty_dir(path: &Path) -> bool {
        fs::read_dir(path).unwrap().next().is_none()
    }

    #[test]
    fn writes_sorted_deduplicated_manifest() {
        let ws = Workspace::new(FAKE_DOTNET);

        ws.command().assert().success();

        let manifest = fs::read_to_string(ws.path("nuget-sources.json")).unwrap();
        let expected = r#"[
    {
        "type": "file",
        "url": "https://api.nuget.org/v3-flatcontainer/newtonsoft.json/13.0.1/newtonsoft.json.13.0.1.nupkg",
        "sha512": "0000",
        "dest": "nuget-sources",
        "dest-filename": "newtonsoft.json.13.0.1.nupkg"
    },
    {
        "type": "file",
        "url": "https://api.nuget.org/v3-flatcontainer/runtime.linux-arm64.native/1.0.0/runtime.linux-arm64.native.1.0.0.nupkg",
        "sha512": "0001",
        "dest": "nuget-sources",
        "dest-filename": "runtime.linux-arm64.native.1.0.0.nupkg"
    }
]"#;
        assert_eq!(manifest, expected);
        assert!(is_empty_dir(&ws.path("work")));
    }

    #[test]
    fn destdir_flag_sets_dest() {
        let ws = Workspace::new(FAKE_DOTNET);

        ws.command().args(["--destdir", "deps"]).assert().success();

        let manifest = fs::read_to_string(ws.path("nuget-sources.json")).unwrap();
        assert!(manifest.contains(r#""dest": "deps""#));
        assert!(!manifest.contains("nuget-sources\""));
    }

    #[test]
    fn failed_restore_writes_nothing_and_cleans_cache() {
        let ws = Workspace::new(FAILING_DOTNET);

        ws.command()
            .assert()
            .failure()
            .stderr(predicate::str::contains("Restore failed for runtime linux-x64"))
            .stderr(predicate::str::contains("NU1101"));

        assert!(!ws.path("nuget-sources.json").exists());
        assert!(is_empty_dir(&ws.path("work")));
    }

    #[test]
    fn missing_project_fails() {
        let ws = Workspace::new(FAKE_DOTNET);
        fs::remove_file(ws.path("App.csproj")).unwrap();

        ws.command()
            .assert()
            .failure()
            .stderr(predicate::str::contains("Path not found"));

        assert!(!ws.path("nuget-sources.json").exists());
    }

    fn wait_for(timeout: Duration, mut done: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if done() {
                return true;
            }
            thread::sleep(Duration::from_millis(50));
        }
        done()
    }

    #[test]
    fn interrupt_removes_cache_and_keeps_output() {
        let ws = Workspace::new(HANGING_DOTNET);
        fs::write(ws.path("nuget-sources.json"), "previous").unwrap();

        let mut child = process::Command::new(env!("CARGO_BIN_EXE_nuget-offline"))
            .arg("--config")
            .arg(ws.path("config.toml"))
            .arg("--no-sandbox")
            .arg("--quiet")
            .arg("--cache-base")
            .arg(ws.path("work"))
            .arg(ws.path("nuget-sources.json"))
            .arg(ws.path("App.csproj"))
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap();

        let started = ws.path("started");
        assert!(wait_for(Duration::from_secs(10), || started.exists()));
        assert!(!is_empty_dir(&ws.path("work")));

        let status = process::Command::new("kill")
            .args(["-INT", &child.id().to_string()])
            .status()
            .unwrap();
        assert!(status.success());

        let mut exit = None;
        assert!(wait_for(Duration::from_secs(10), || {
            exit = child.try_wait().unwrap();
            exit.is_some()
        }));
        let output = child.wait_with_output().unwrap();
        let stderr = String::from_utf8_lossy(&output.stderr);

        assert_eq!(exit.and_then(|s| s.code()), Some(130));
        assert!(stderr.contains("Interrupted"));
        assert!(is_empty_dir(&ws.path("work")));
        assert_eq!(
            fs::read_to_string(ws.path("nuget-sources.json")).unwrap(),
            "previous"
        );
    }
}
