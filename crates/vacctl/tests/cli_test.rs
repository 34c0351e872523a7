//! Integration tests for the `vacctl` binary.
//!
//! Argument parsing, help output, completions, config handling, and error
//! exit codes, all without a live robot.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `vacctl` binary with env isolation.
///
/// Clears all `VACCTL_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn vacctl_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("vacctl");
    cmd.env("HOME", "/tmp/vacctl-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/vacctl-cli-test-nonexistent")
        .env_remove("VACCTL_PROFILE")
        .env_remove("VACCTL_IP")
        .env_remove("VACCTL_LEGACY")
        .env_remove("VACCTL_USERNAME")
        .env_remove("VACCTL_PASSWORD")
        .env_remove("VACCTL_OUTPUT")
        .env_remove("VACCTL_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Same isolation, with `XDG_CONFIG_HOME` pointing at `dir`.
fn vacctl_cmd_with_config(dir: &Path) -> assert_cmd::Command {
    let mut cmd = vacctl_cmd();
    cmd.env("XDG_CONFIG_HOME", dir);
    cmd
}

fn write_config(dir: &Path, contents: &str) {
    let app_dir = dir.join("vacctl");
    std::fs::create_dir_all(&app_dir).unwrap();
    std::fs::write(app_dir.join("config.toml"), contents).unwrap();
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = vacctl_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_commands() {
    vacctl_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Valetudo")
            .and(predicate::str::contains("status"))
            .and(predicate::str::contains("watch"))
            .and(predicate::str::contains("high-speed"))
            .and(predicate::str::contains("mop")),
    );
}

#[test]
fn test_version_flag() {
    vacctl_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("vacctl"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    vacctl_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    vacctl_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Argument errors ─────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = vacctl_cmd().arg("vacuum-harder").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("vacuum-harder"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_invalid_output_format() {
    let output = vacctl_cmd()
        .args(["--output", "xml", "--ip", "192.0.2.1", "status"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("possible values") || text.contains("invalid value"),
        "Expected error about valid output formats:\n{text}"
    );
}

#[test]
fn test_toggle_requires_on_or_off() {
    vacctl_cmd()
        .args(["--ip", "192.0.2.1", "high-speed", "sideways"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("on").and(predicate::str::contains("off")));
}

#[test]
fn test_subcommands_exist() {
    vacctl_cmd().args(["config", "--help"]).assert().success().stdout(
        predicate::str::contains("path").and(predicate::str::contains("show")),
    );
    vacctl_cmd()
        .args(["clean", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--off"));
}

// ── Device resolution ───────────────────────────────────────────────

#[test]
fn test_status_without_device_explains_ip() {
    vacctl_cmd()
        .arg("status")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No device configured").and(predicate::str::contains("--ip")));
}

#[test]
fn test_unknown_profile_is_reported() {
    vacctl_cmd()
        .args(["--profile", "garage", "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("garage"));
}

#[test]
fn test_unreachable_device_exits_with_connection_code() {
    // Nothing listens on port 1; the connection is refused immediately.
    vacctl_cmd()
        .args(["--ip", "127.0.0.1:1", "--timeout", "2", "status"])
        .assert()
        .code(7)
        .stderr(predicate::str::contains("Could not reach the vacuum"));
}

// ── Config file ─────────────────────────────────────────────────────

#[test]
fn test_config_show_no_config() {
    // `config show` falls back to the default config when no file exists.
    vacctl_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default_profile"));
}

#[cfg(target_os = "linux")]
#[test]
fn test_config_path_honours_xdg() {
    let dir = tempfile::tempdir().unwrap();
    vacctl_cmd_with_config(dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vacctl").and(predicate::str::contains("config.toml")));
}

#[cfg(target_os = "linux")]
#[test]
fn test_config_show_masks_password() {
    let dir = tempfile::tempdir().unwrap();
    write_config(
        dir.path(),
        r#"
default_profile = "living-room"

[profiles.living-room]
ip = "192.0.2.20"
username = "robot"
password = "hunter2"
"#,
    );

    vacctl_cmd_with_config(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("192.0.2.20")
                .and(predicate::str::contains("********"))
                .and(predicate::str::contains("hunter2").not()),
        );
}

#[cfg(target_os = "linux")]
#[test]
fn test_bad_preset_fails_before_any_request() {
    let dir = tempfile::tempdir().unwrap();
    write_config(
        dir.path(),
        r#"
default_profile = "living-room"

[profiles.living-room]
ip = "127.0.0.1:1"

[profiles.living-room.power-control]
default-speed = "bogus"
"#,
    );

    vacctl_cmd_with_config(dir.path())
        .arg("stop")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown speed preset 'bogus'"));
}
