// SPDX-FileCopyrightText: 2026 Opconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the `opconf` binary.
//!
//! Each test runs the compiled binary in an isolated temp directory with a
//! scripted stand-in for `op`, so no 1Password account is needed.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serial_test::serial;
use tempfile::TempDir;

/// Resolves each reference to `secret-<last path segment>`.
const FAKE_OP: &str = r#"sed 's|"op://[^"]*/\([^/"]*\)"|"secret-\1"|'"#;

const APP_JSON: &str = r#"{
  "Database": { "Password": "op://vault/db/password", "Host": "localhost" },
  "Port": 8080
}"#;

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn script(&self, name: &str, body: &str) -> PathBuf {
        let path = self.write(name, &format!("#!/bin/sh\n{body}\n"));
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn run(&self, op: &Path, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_opconf"))
            .args(args)
            .current_dir(self.dir.path())
            .env_clear()
            .env("PATH", "/usr/bin:/bin")
            .env("HOME", self.dir.path())
            .env("XDG_CONFIG_HOME", self.path("xdg"))
            .env("OPCONF_CLI_OP_PATH", op)
            .output()
            .unwrap()
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
#[serial]
fn resolve_prints_resolved_document() {
    let sandbox = Sandbox::new();
    let op = sandbox.script("op", FAKE_OP);
    sandbox.write("app.json", APP_JSON);

    let output = sandbox.run(&op, &["resolve", "app.json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["Database"]["Password"], "secret-password");
    assert_eq!(value["Database"]["Host"], "localhost");
    assert_eq!(value["Port"], 8080);
}

#[test]
#[serial]
fn resolve_writes_output_file_with_masking() {
    let sandbox = Sandbox::new();
    let op = sandbox.script("op", FAKE_OP);
    sandbox.write("app.json", APP_JSON);

    let output = sandbox.run(&op, &["resolve", "app.json", "--mask", "-o", "out.json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let written = std::fs::read_to_string(sandbox.path("out.json")).unwrap();
    assert!(written.contains("secr***********"), "got: {written}");
    assert!(!written.contains("secret-password"));
    assert!(stderr(&output).contains("resolved 1/1 references"));
}

#[test]
#[serial]
fn resolve_toml_keeps_format() {
    let sandbox = Sandbox::new();
    let op = sandbox.script("op", FAKE_OP);
    sandbox.write(
        "app.toml",
        "[api]\nkey = \"op://vault/api/token\"\nretries = 3\n",
    );

    let output = sandbox.run(&op, &["resolve", "app.toml"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let table: toml::Table = toml::from_str(&stdout(&output)).unwrap();
    assert_eq!(table["api"]["key"].as_str(), Some("secret-token"));
    assert_eq!(table["api"]["retries"].as_integer(), Some(3));
}

#[test]
#[serial]
fn op_failure_exits_with_stderr() {
    let sandbox = Sandbox::new();
    let op = sandbox.script("op", "echo 'auth required' >&2\nexit 1");
    sandbox.write("app.json", APP_JSON);

    let output = sandbox.run(&op, &["resolve", "app.json"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("auth required"));
}

#[test]
#[serial]
fn fail_silently_keeps_references() {
    let sandbox = Sandbox::new();
    let op = sandbox.script("op", "echo 'auth required' >&2\nexit 1");
    sandbox.write("app.json", APP_JSON);

    let output = sandbox.run(&op, &["resolve", "app.json", "--fail-silently"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["Database"]["Password"], "op://vault/db/password");
}

#[test]
#[serial]
fn scan_lists_references_without_invoking_op() {
    let sandbox = Sandbox::new();
    // A missing binary proves scan never spawns op.
    let op = sandbox.path("missing-op");
    sandbox.write("app.json", APP_JSON);

    let output = sandbox.run(&op, &["scan", "app.json", "--json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let entries: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(entries[0]["path"], "Database:Password");
    assert_eq!(entries[0]["reference"], "op://vault/db/password");
    assert_eq!(entries.as_array().map(Vec::len), Some(1));
}

#[test]
#[serial]
fn read_resolves_single_reference() {
    let sandbox = Sandbox::new();
    let op = sandbox.script("op", FAKE_OP);

    let output = sandbox.run(&op, &["read", "DbPassword", "op://vault/db/password"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "secret-password");
}

#[test]
#[serial]
fn invalid_local_config_is_reported() {
    let sandbox = Sandbox::new();
    let op = sandbox.script("op", FAKE_OP);
    sandbox.write("opconf.toml", "[resolver]\nschem = \"op://\"\n");

    let output = sandbox.run(&op, &["config"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("schem"), "stderr: {}", stderr(&output));
}

#[test]
#[serial]
fn config_prints_effective_settings() {
    let sandbox = Sandbox::new();
    let op = sandbox.script("op", FAKE_OP);
    sandbox.write("opconf.toml", "[resolver]\naccount = \"team.1password.com\"\n");

    let output = sandbox.run(&op, &["config"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let table: toml::Table = toml::from_str(&stdout(&output)).unwrap();
    assert_eq!(
        table["resolver"]["account"].as_str(),
        Some("team.1password.com")
    );
    assert_eq!(table["cli"]["op_path"].as_str(), op.to_str());
}
