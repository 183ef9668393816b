//! End-to-end CLI tests for the katunog binary.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Test that --help lists the subcommands and exits with code 0.
#[test]
fn test_binary_help_displays_usage() {
    let mut cmd = Command::cargo_bin("katunog").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("musical instrument archive"))
        .stdout(predicate::str::contains("download"))
        .stdout(predicate::str::contains("unzip"));
}

/// Test that --version displays version and exits with code 0.
#[test]
fn test_binary_version_displays_version() {
    let mut cmd = Command::cargo_bin("katunog").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("katunog"));
}

/// Test that a subcommand is required.
#[test]
fn test_binary_without_subcommand_fails() {
    let mut cmd = Command::cargo_bin("katunog").unwrap();
    cmd.assert().failure();
}

/// Test that a zero concurrency cap is rejected before any request is made.
#[test]
fn test_download_rejects_zero_concurrency() {
    let mut cmd = Command::cargo_bin("katunog").unwrap();
    cmd.args(["download", "-c", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("concurrency"));
}

/// Test that an unparseable base URL is reported.
#[test]
fn test_invalid_base_url_fails() {
    let mut cmd = Command::cargo_bin("katunog").unwrap();
    cmd.args(["--base-url", "not a url", "provinces"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a url"));
}

/// Test that unzip extracts archives without touching the network.
#[test]
fn test_unzip_extracts_archives() {
    let zips = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    let file = std::fs::File::create(zips.path().join("Gabbang.zip")).unwrap();
    let mut writer = ZipWriter::new(file);
    writer
        .start_file("Gabbang/gabbang.mp3", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(b"audio").unwrap();
    writer.finish().unwrap();
    std::fs::write(zips.path().join("Broken.zip"), b"not a zip").unwrap();

    let mut cmd = Command::cargo_bin("katunog").unwrap();
    cmd.arg("unzip")
        .arg(zips.path())
        .arg(out.path())
        .assert()
        .success();

    assert_eq!(
        std::fs::read(out.path().join("Gabbang").join("gabbang.mp3")).unwrap(),
        b"audio"
    );
}
