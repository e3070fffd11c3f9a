// End-to-end tests of the `xinstall` binary. Each test points the binary at
// its own settings and config files inside a temporary directory.

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn xinstall(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_xinstall"))
        .arg("--settings")
        .arg(dir.join("settings.json"))
        .arg("--config")
        .arg(dir.join("config.yaml"))
        .args(args)
        .env_remove("XINSTALL_SETTINGS")
        .env_remove("XINSTALL_CONFIG")
        .output()
        .expect("failed to launch xinstall")
}

fn settings(dir: &Path) -> serde_json::Value {
    let raw = std::fs::read_to_string(dir.join("settings.json")).unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn version_prints_crate_version() {
    let dir = TempDir::new().unwrap();
    let out = xinstall(dir.path(), &["version"]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains(env!("CARGO_PKG_VERSION")));
}

#[cfg(unix)]
#[test]
fn throttle_runs_then_skips() {
    let dir = TempDir::new().unwrap();
    let marker = dir.path().join("ran");
    let marker = marker.to_str().unwrap();

    let out = xinstall(dir.path(), &["throttle", "--key", "touch_marker", "--", "touch", marker]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(Path::new(marker).exists());
    assert!(settings(dir.path())["touch_marker"].is_string());

    // Within the default twelve hours the command is skipped, even one that would fail.
    std::fs::remove_file(marker).unwrap();
    let out = xinstall(dir.path(), &["throttle", "--key", "touch_marker", "--", "false"]);
    assert!(out.status.success());
    assert!(!Path::new(marker).exists());
}

#[cfg(unix)]
#[test]
fn failing_command_exits_nonzero_and_records_nothing() {
    let dir = TempDir::new().unwrap();
    let out = xinstall(dir.path(), &["throttle", "--key", "k", "--", "false"]);
    assert!(!out.status.success());
    assert!(!dir.path().join("settings.json").exists());
}

#[cfg(unix)]
#[test]
fn negative_interval_forces_a_run() {
    let dir = TempDir::new().unwrap();
    let out = xinstall(dir.path(), &["throttle", "--key", "k", "--", "true"]);
    assert!(out.status.success());
    let first = settings(dir.path())["k"].clone();

    let out = xinstall(dir.path(), &["throttle", "--key", "k", "--interval", "-1", "--", "false"]);
    assert!(!out.status.success(), "a forced run must execute the command");
    assert_eq!(settings(dir.path())["k"], first);
}

#[test]
fn config_file_sets_default_settings_path() {
    let dir = TempDir::new().unwrap();
    let alt = dir.path().join("alt.json");
    std::fs::write(&alt, r#"{"apt_source_update_time": "2024-03-01 12:00:00.000000"}"#).unwrap();
    std::fs::write(
        dir.path().join("config.yaml"),
        format!("settings_file: {}\n", alt.display()),
    )
    .unwrap();

    let out = Command::new(env!("CARGO_BIN_EXE_xinstall"))
        .arg("--config")
        .arg(dir.path().join("config.yaml"))
        .arg("status")
        .env_remove("XINSTALL_SETTINGS")
        .output()
        .unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(String::from_utf8_lossy(&out.stdout).contains("apt_source_update_time"));
}

#[test]
fn status_on_corrupt_store_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("settings.json"), "not json").unwrap();
    let out = xinstall(dir.path(), &["status"]);
    assert!(!out.status.success());
}

#[test]
fn invalid_config_is_fatal() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.yaml"), "use_sudo: maybe\n").unwrap();
    let out = xinstall(dir.path(), &["status"]);
    assert!(!out.status.success());
}
