#![cfg(unix)]
/// Acceptance tests for installing the cache and wrapping compilers
///
/// The "source tree" is a set of tiny shell scripts standing in for
/// ccache's configure/make/make install.
mod common;

use common::TestWorkspace;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;

const SCRIPTED_BUILD: &str = r#"build_cmd = "sh build.sh"
install_cmd = "sh install.sh""#;

const GNU_NAMES: [&str; 5] = ["cc", "c++", "cpp", "gcc", "g++"];

#[test]
fn test_install_builds_and_wraps_compilers() {
    let ws = TestWorkspace::new();
    ws.write_config("GCC", SCRIPTED_BUILD);
    ws.write_fake_sources();

    ws.cachewrap().arg("install").assert().success();

    let bin = ws.installdir().join("bin");
    let cache_binary = bin.join("ccache");
    assert!(ws.srcdir().join("built").exists());
    assert!(cache_binary.is_file());

    // group write dropped by the permission fix-up
    let mode = fs::metadata(&cache_binary).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o755);

    for name in GNU_NAMES {
        let link = bin.join(name);
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_link(&link).unwrap(), cache_binary);
    }
}

#[test]
fn test_install_writes_build_record() {
    let ws = TestWorkspace::new();
    ws.write_config("GCC", SCRIPTED_BUILD);
    ws.write_fake_sources();

    ws.cachewrap().arg("install").assert().success();

    let output = ws.cachewrap().args(["status", "--json"]).output().unwrap();
    assert!(output.status.success());

    let record: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(record["state"], "symlinked");
    assert_eq!(record["cache_dir"], "/opt/cache/GCC-11.3");
    assert_eq!(record["config_hash"].as_str().unwrap().len(), 16);
}

#[test]
fn test_failed_build_aborts_before_symlinks() {
    let ws = TestWorkspace::new();
    ws.write_config("GCC", "build_cmd = \"exit 7\"");
    ws.write_fake_sources();

    ws.cachewrap()
        .arg("install")
        .assert()
        .failure()
        .stderr(predicate::str::contains("exit code 7"));

    assert!(!ws.installdir().join("bin").exists());
}

#[test]
fn test_dry_run_touches_nothing() {
    let ws = TestWorkspace::new();
    ws.write_config("GCC", SCRIPTED_BUILD);
    ws.write_fake_sources();

    ws.cachewrap()
        .args(["install", "--dry-run"])
        .assert()
        .success()
        .stderr(predicate::str::contains("would be wrapped"));

    assert!(!ws.installdir().exists());
    assert!(!ws.srcdir().join("built").exists());
}

#[test]
fn test_link_wraps_prebuilt_install() {
    let ws = TestWorkspace::new();
    ws.write_config("GNU", r#"extra_compiler_symlinks = ["gfortran"]"#);
    ws.fake_install();

    ws.cachewrap().arg("link").assert().success();

    let bin = ws.installdir().join("bin");
    for name in GNU_NAMES.iter().chain(["gfortran"].iter()) {
        assert_eq!(fs::read_link(bin.join(name)).unwrap(), bin.join("ccache"));
    }

    ws.cachewrap()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("symlinked"));
}

#[test]
fn test_link_refuses_to_overwrite_existing_file() {
    let ws = TestWorkspace::new();
    ws.write_config("GCC", "");
    ws.fake_install();
    fs::write(ws.installdir().join("bin/gcc"), "real gcc").unwrap();

    ws.cachewrap()
        .arg("link")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(
        fs::read_to_string(ws.installdir().join("bin/gcc")).unwrap(),
        "real gcc"
    );
}

#[test]
fn test_status_without_record() {
    let ws = TestWorkspace::new();
    ws.write_config("GCC", "");
    ws.fake_install();

    ws.cachewrap()
        .arg("status")
        .assert()
        .failure()
        .stdout(predicate::str::contains("No build record"));
}
