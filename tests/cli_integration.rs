//! Integration tests for the enforce-hooks binary
//!
//! Each test builds a throwaway plugin directory and repository layout and
//! drives the binary with explicit `--repo` / `--plugin-dir` paths.

use std::fs;
use std::path::{Path, PathBuf};
use std::io::Write;
use std::process::{Command, Stdio};
use tempfile::TempDir;

const MANAGED: &str = "#!/bin/sh\n# custom-hook\necho hi";

struct Workspace {
    temp: TempDir,
}

impl Workspace {
    fn new(hooks: &[(&str, &str)]) -> Self {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let source = temp.path().join("plugin").join("hooks");
        fs::create_dir_all(&source).unwrap();
        fs::create_dir_all(temp.path().join("repo").join(".git")).unwrap();
        for (name, content) in hooks {
            fs::write(source.join(name), content).unwrap();
        }
        Self { temp }
    }

    fn repo(&self) -> PathBuf {
        self.temp.path().join("repo")
    }

    fn hook(&self, name: &str) -> PathBuf {
        self.repo().join(".git").join("hooks").join(name)
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_enforce-hooks"));
        cmd.arg("--repo")
            .arg(self.repo())
            .arg("--plugin-dir")
            .arg(self.temp.path().join("plugin"))
            .arg("--config")
            .arg(config_path(self.temp.path()))
            .args(args);
        cmd
    }

    /// Run and return (success, stdout, stderr)
    fn run(&self, args: &[&str]) -> (bool, String, String) {
        let output = self.command(args).output().expect("Failed to execute enforce-hooks");
        (
            output.status.success(),
            String::from_utf8_lossy(&output.stdout).to_string(),
            String::from_utf8_lossy(&output.stderr).to_string(),
        )
    }
}

fn config_path(root: &Path) -> PathBuf {
    root.join("enforce-hooks.toml")
}

#[test]
fn test_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_enforce-hooks"))
        .arg("--version")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("enforce-hooks"));
}

#[test]
fn test_install_copies_hooks() {
    let ws = Workspace::new(&[("pre-commit", MANAGED)]);

    let (success, stdout, stderr) = ws.run(&["install"]);
    assert!(success, "install failed: {}", stderr);
    assert!(stdout.contains("Installed pre-commit"));

    let hook = ws.hook("pre-commit");
    assert_eq!(fs::read_to_string(&hook).unwrap(), MANAGED);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(&hook).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}

#[test]
fn test_install_twice_skips() {
    let ws = Workspace::new(&[("pre-commit", MANAGED)]);

    assert!(ws.run(&["install"]).0);
    let (success, stdout, _) = ws.run(&["update"]);
    assert!(success);
    assert!(stdout.contains("pre-commit already exists, skipping ..."));
    assert_eq!(fs::read_to_string(ws.hook("pre-commit")).unwrap(), MANAGED);
}

#[test]
fn test_install_keeps_user_hook() {
    let ws = Workspace::new(&[("pre-commit", MANAGED)]);
    fs::create_dir_all(ws.hook("pre-commit").parent().unwrap()).unwrap();
    fs::write(ws.hook("pre-commit"), "#!/bin/sh\necho mine\n").unwrap();

    let (success, stdout, _) = ws.run(&["install"]);
    assert!(success);
    assert!(stdout.contains("pre-commit already exists, skipping ..."));
    assert_eq!(
        fs::read_to_string(ws.hook("pre-commit")).unwrap(),
        "#!/bin/sh\necho mine\n"
    );
}

#[test]
fn test_uninstall_removes_only_managed() {
    let ws = Workspace::new(&[("pre-commit", MANAGED), ("pre-push", MANAGED)]);
    assert!(ws.run(&["install"]).0);
    fs::write(ws.hook("pre-push"), "#!/bin/sh\necho mine\n").unwrap();

    let (success, stdout, stderr) = ws.run(&["uninstall"]);
    assert!(success, "uninstall failed: {}", stderr);
    assert!(stdout.contains("Removed pre-commit"));
    assert!(stdout.contains("Kept pre-push"));

    assert!(!ws.hook("pre-commit").exists());
    assert!(ws.hook("pre-push").exists());
}

#[test]
fn test_run_replays_event_stream() {
    let ws = Workspace::new(&[("pre-commit", MANAGED)]);
    let events = r#"[
        {"event": "package-installed", "operation": {"type": "install", "package": {"name": "acme/unrelated"}}},
        {"event": "package-updated", "operation": {"type": "update",
            "initial": {"name": "tschuermans/enforce-hooks", "version": "1.0.0"},
            "target": {"name": "tschuermans/enforce-hooks", "version": "1.1.0"}}},
        {"event": "lifecycle-completed", "command": "post-update-cmd"}
    ]"#;

    let mut child = ws
        .command(&["run", "--events", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(events.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    assert!(ws.hook("pre-commit").exists());
}

#[test]
fn test_run_ignores_other_packages() {
    let ws = Workspace::new(&[("pre-commit", MANAGED)]);
    let events_file = ws.temp.path().join("events.json");
    fs::write(
        &events_file,
        r#"[
            {"event": "package-installed", "operation": {"type": "install", "package": {"name": "acme/unrelated"}}},
            {"event": "lifecycle-completed", "command": "post-install-cmd"}
        ]"#,
    )
    .unwrap();

    let (success, _, _) = ws.run(&["run", "--events", events_file.to_str().unwrap()]);
    assert!(success);
    assert!(!ws.hook("pre-commit").exists());
}

#[test]
fn test_invalid_event_stream_fails() {
    let ws = Workspace::new(&[("pre-commit", MANAGED)]);
    let events_file = ws.temp.path().join("events.json");
    fs::write(&events_file, r#"[{"event": "package-exploded"}]"#).unwrap();

    let (success, _, stderr) = ws.run(&["run", "--events", events_file.to_str().unwrap()]);
    assert!(!success);
    assert!(stderr.contains("Invalid lifecycle event stream"));
}

#[test]
fn test_config_changes_tracked_package() {
    let ws = Workspace::new(&[("pre-commit", MANAGED)]);
    fs::write(
        config_path(ws.temp.path()),
        "package_name = \"acme/hooks\"\n",
    )
    .unwrap();

    // Shortcut subcommands emit events for the configured package
    let (success, _, _) = ws.run(&["install"]);
    assert!(success);
    assert!(ws.hook("pre-commit").exists());
}

#[test]
fn test_status_reports_each_hook() {
    let ws = Workspace::new(&[("pre-commit", MANAGED), ("pre-push", MANAGED)]);
    fs::create_dir_all(ws.hook("pre-commit").parent().unwrap()).unwrap();
    fs::write(ws.hook("pre-commit"), MANAGED).unwrap();

    let (success, stdout, _) = ws.run(&["status"]);
    assert!(success);
    assert!(stdout.contains("Managed"));
    assert!(stdout.contains("Missing"));
}

#[test]
fn test_missing_source_dir_fails() {
    let ws = Workspace::new(&[]);
    fs::remove_dir_all(ws.temp.path().join("plugin").join("hooks")).unwrap();

    let (success, _, stderr) = ws.run(&["install"]);
    assert!(!success);
    assert!(stderr.contains("Could not list hook directory"));
}

#[test]
fn test_init_writes_config_once() {
    let ws = Workspace::new(&[]);

    let output = Command::new(env!("CARGO_BIN_EXE_enforce-hooks"))
        .arg("--repo")
        .arg(ws.repo())
        .arg("init")
        .output()
        .unwrap();
    assert!(output.status.success());
    let written = ws.repo().join(".enforce-hooks.toml");
    let content = fs::read_to_string(&written).unwrap();
    assert!(content.contains("tschuermans/enforce-hooks"));

    fs::write(&written, "marker = \"# mine\"\n").unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_enforce-hooks"))
        .arg("--repo")
        .arg(ws.repo())
        .arg("init")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("already exists"));
    assert_eq!(fs::read_to_string(&written).unwrap(), "marker = \"# mine\"\n");
}

#[test]
fn test_init_honours_config_flag() {
    let ws = Workspace::new(&[]);

    let (success, _, _) = ws.run(&["init"]);
    assert!(success);

    let content = fs::read_to_string(config_path(ws.temp.path())).unwrap();
    assert!(content.contains("tschuermans/enforce-hooks"));
    assert!(!ws.repo().join(".enforce-hooks.toml").exists());
}

#[test]
fn test_uninstall_removes_marker_anywhere_in_hook() {
    let ws = Workspace::new(&[("pre-commit", "#!/bin/sh\necho hi # custom-hook\n")]);
    assert!(ws.run(&["install"]).0);
    assert!(ws.hook("pre-commit").exists());

    let (success, stdout, _) = ws.run(&["uninstall"]);
    assert!(success);
    assert!(stdout.contains("Removed pre-commit"));
    assert!(!ws.hook("pre-commit").exists());
}
