//! Cross-platform CLI integration tests using assert_cmd.
//!
//! Each test runs the real `tvm` binary against a scratch `HOME`, so no
//! test touches the invoking user's actual configuration or installed
//! versions.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn tvm(home: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("tvm").unwrap();
    cmd.env("HOME", home.path());
    cmd.env("XDG_CONFIG_HOME", home.path().join(".config"));
    cmd.env("XDG_DATA_HOME", home.path().join(".local/share"));
    cmd
}

#[test]
fn help_lists_every_subcommand() {
    let home = TempDir::new().unwrap();
    tvm(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("uninstall"))
        .stdout(predicate::str::contains("use"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("available"))
        .stdout(predicate::str::contains("current"))
        .stdout(predicate::str::contains("system"))
        .stdout(predicate::str::contains("alias"))
        .stdout(predicate::str::contains("env"));
}

#[test]
fn missing_subcommand_fails() {
    let home = TempDir::new().unwrap();
    tvm(&home).assert().failure();
}

#[test]
fn list_on_fresh_home_reports_no_versions() {
    let home = TempDir::new().unwrap();
    tvm(&home)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("no toolchain versions installed"));
}

#[test]
fn list_json_on_fresh_home_is_empty_array() {
    let home = TempDir::new().unwrap();
    tvm(&home)
        .args(["--json", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}

#[test]
fn current_with_no_active_version_errors() {
    let home = TempDir::new().unwrap();
    tvm(&home).arg("current").assert().failure();
}

#[test]
fn current_json_with_no_active_version_reports_kind() {
    let home = TempDir::new().unwrap();
    tvm(&home)
        .args(["--json", "current"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"kind\":\"NoActiveVersion\""));
}

#[test]
fn use_unknown_version_fails_with_not_installed() {
    let home = TempDir::new().unwrap();
    tvm(&home)
        .args(["use", "9.9.9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn alias_list_on_fresh_home_succeeds() {
    let home = TempDir::new().unwrap();
    tvm(&home).args(["alias", "list"]).assert().success();
}

#[test]
fn alias_remove_unknown_alias_fails() {
    let home = TempDir::new().unwrap();
    tvm(&home)
        .args(["alias", "remove", "does-not-exist"])
        .assert()
        .failure();
}

#[test]
fn env_bash_script_prepends_link_dir_to_path() {
    let home = TempDir::new().unwrap();
    tvm(&home)
        .args(["env", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PATH"));
}

#[test]
fn env_powershell_script_sets_env_variable_syntax() {
    let home = TempDir::new().unwrap();
    tvm(&home)
        .args(["env", "powershell"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$env:PATH"));
}
