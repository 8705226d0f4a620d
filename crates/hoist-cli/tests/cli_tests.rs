//! Integration tests for the `hoist` binary.
//!
//! Every test runs in its own temporary directory with its own platform
//! state file, so pushes never touch the real data directory. Stdout is
//! a pipe, so output resolves to the plain format.

use std::{fs, path::PathBuf};

use assert_cmd::{Command, cargo};
use predicates::prelude::*;
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("app")).unwrap();
        fs::write(dir.path().join("app").join("index.html"), "<h1>hi</h1>").unwrap();
        Self { dir }
    }

    fn app_dir(&self) -> PathBuf {
        self.dir.path().join("app")
    }

    fn state_file(&self) -> PathBuf {
        self.dir.path().join("state").join("platform.json")
    }

    fn hoist(&self) -> Command {
        let mut cmd = cargo::cargo_bin_cmd!("hoist");
        cmd.current_dir(self.app_dir())
            .env("HOME", self.dir.path())
            .env("XDG_CONFIG_HOME", self.dir.path().join("config"))
            .env("HOIST_PLATFORM__STATE_FILE", self.state_file())
            .env_remove("RUST_LOG")
            .env_remove("NO_COLOR");
        cmd
    }
}

#[test]
fn help_lists_push() {
    cargo::cargo_bin_cmd!("hoist")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("push"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn version_flag() {
    cargo::cargo_bin_cmd!("hoist")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn first_push_creates_routes_uploads_and_starts() {
    let ws = Workspace::new();

    ws.hoist()
        .args(["push", "foo"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Creating app foo in org local / space development as developer...",
        ))
        .stdout(predicate::str::contains("Creating route foo.local.hoist.dev..."))
        .stdout(predicate::str::contains("Binding foo.local.hoist.dev to foo..."))
        .stdout(predicate::str::contains("1 files"))
        .stdout(predicate::str::contains("Starting app foo..."))
        .stdout(predicate::str::contains("foo: started"))
        .stdout(predicate::str::contains("Stopping").not());

    assert!(ws.state_file().is_file());
}

#[test]
fn second_push_updates_and_skips_unchanged_bits() {
    let ws = Workspace::new();
    ws.hoist().args(["push", "foo"]).assert().success();

    ws.hoist()
        .args(["push", "foo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updating app foo"))
        .stdout(predicate::str::contains("Nothing will be uploaded"))
        .stdout(predicate::str::contains("Stopping app foo..."))
        .stdout(predicate::str::contains("Creating route").not());
}

#[test]
fn same_app_name_in_another_space_is_created_there() {
    let ws = Workspace::new();
    ws.hoist()
        .args(["push", "foo", "--no-route"])
        .assert()
        .success();

    ws.hoist()
        .env("HOIST_TARGET__SPACE_GUID", "staging-space")
        .args(["push", "foo", "--no-route"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Creating app foo"))
        .stdout(predicate::str::contains("Updating app").not());
}

#[test]
fn no_start_leaves_the_app_stopped() {
    let ws = Workspace::new();

    ws.hoist()
        .args(["push", "foo", "--no-start", "--no-route"])
        .assert()
        .success()
        .stdout(predicate::str::contains("App foo is a worker"))
        .stdout(predicate::str::contains("foo: stopped"));
}

#[test]
fn manifest_in_working_directory_is_used() {
    let ws = Workspace::new();
    fs::write(
        ws.app_dir().join("manifest.yml"),
        "applications:\n- name: web\n  memory: 256M\n  host: www\n",
    )
    .unwrap();

    ws.hoist()
        .arg("push")
        .assert()
        .success()
        .stdout(predicate::str::contains("Using manifest file"))
        .stdout(predicate::str::contains("www.local.hoist.dev"))
        .stdout(predicate::str::contains("usage: 256M x 1 instances"));
}

#[test]
fn json_output_has_one_object_per_event() {
    let ws = Workspace::new();

    let output = ws
        .hoist()
        .args(["--output-format", "json", "push", "foo"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let last = stdout.lines().last().unwrap();
    let summary: serde_json::Value = serde_json::from_str(last).unwrap();
    assert_eq!(summary["apps"][0]["name"], "foo");
    assert_eq!(summary["apps"][0]["urls"][0], "foo.local.hoist.dev");
    assert!(stdout.lines().all(|l| serde_json::from_str::<serde_json::Value>(l).is_ok()));
}

#[test]
fn missing_app_name_is_a_usage_error() {
    let ws = Workspace::new();

    ws.hoist()
        .arg("push")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("FAILED"));
}

#[test]
fn zero_instances_is_rejected() {
    let ws = Workspace::new();

    ws.hoist()
        .args(["push", "foo", "-i", "0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid instance count"));
    assert!(!ws.state_file().exists());
}

#[test]
fn byte_quantities_need_a_unit() {
    let ws = Workspace::new();

    ws.hoist()
        .args(["push", "foo", "-m", "512"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid byte quantity"));
}

#[test]
fn explicit_manifest_must_exist() {
    let ws = Workspace::new();

    ws.hoist()
        .args(["push", "foo", "-f", "missing.yml"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Manifest file not found"));
}

#[test]
fn route_in_another_space_exits_with_conflict() {
    let ws = Workspace::new();
    fs::create_dir_all(ws.state_file().parent().unwrap()).unwrap();
    fs::write(
        ws.state_file(),
        r#"{
  "domains": [{ "guid": "d-1", "name": "example.com", "shared": true }],
  "routes": [{
    "guid": "r-1",
    "host": "web",
    "domain": { "guid": "d-1", "name": "example.com", "shared": true },
    "space_guid": "someone-elses-space"
  }]
}"#,
    )
    .unwrap();

    ws.hoist()
        .args(["push", "web"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains(
            "The route web.example.com is already in use",
        ));
}

#[test]
fn corrupt_state_is_a_configuration_error() {
    let ws = Workspace::new();
    fs::create_dir_all(ws.state_file().parent().unwrap()).unwrap();
    fs::write(ws.state_file(), "not json").unwrap();

    ws.hoist().args(["push", "foo"]).assert().code(4);
}

#[test]
fn config_get_reads_the_environment() {
    let ws = Workspace::new();

    ws.hoist()
        .env("HOIST_TARGET__SPACE_NAME", "staging")
        .args(["config", "get", "target.space_name"])
        .assert()
        .success()
        .stdout(predicate::str::diff("staging\n"));
}

#[test]
fn config_get_unknown_key_fails() {
    let ws = Workspace::new();

    ws.hoist()
        .args(["config", "get", "nope"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn shell_completions() {
    cargo::cargo_bin_cmd!("hoist")
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hoist"));
}
