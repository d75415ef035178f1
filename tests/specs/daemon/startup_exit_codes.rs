//! Exercises `relayd`'s documented exit-code behavior (spec §6) end to end
//! through the compiled binary, the way `original_source/settings.go`'s
//! callers expect a missing or unreadable config to fail fast.

use assert_cmd::Command;

#[test]
fn missing_config_path_exits_non_zero() {
    Command::cargo_bin("relayd")
        .expect("relayd binary should build")
        .env("RELAYD_CONFIG", "/nonexistent/path/relayd.toml")
        .assert()
        .failure();
}

#[test]
fn unreadable_config_exits_non_zero() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("relayd.toml");
    std::fs::write(&path, "not valid toml {{{").expect("write broken config");

    Command::cargo_bin("relayd")
        .expect("relayd binary should build")
        .env("RELAYD_CONFIG", path.as_os_str())
        .assert()
        .failure();
}
