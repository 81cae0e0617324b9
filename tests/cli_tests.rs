//! Binary-level tests: exit codes and terminal output

mod common;

use assert_cmd::Command;
use asc_submit::auth::{ENV_ISSUER_ID, ENV_KEY_ID, ENV_KEY_PATH};
use asc_submit::config::ENV_BASE_URL;
use common::{test_key_path, TEST_BUNDLE_ID, TEST_ISSUER_ID, TEST_KEY_ID};
use mockito::{Matcher, Server, ServerGuard};
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn asc_submit() -> Command {
    let mut cmd = Command::cargo_bin("asc-submit").unwrap();
    cmd.env_remove(ENV_KEY_ID)
        .env_remove(ENV_ISSUER_ID)
        .env_remove(ENV_KEY_PATH)
        .env_remove(ENV_BASE_URL)
        .env("NO_COLOR", "1");
    cmd
}

fn with_credentials(cmd: &mut Command, base_url: &str) {
    cmd.env(ENV_KEY_ID, TEST_KEY_ID)
        .env(ENV_ISSUER_ID, TEST_ISSUER_ID)
        .env(ENV_KEY_PATH, test_key_path())
        .env(ENV_BASE_URL, base_url);
}

/// Mock server that knows the app and has no version 1.13.0 yet
fn dry_run_server() -> ServerGuard {
    let mut server = Server::new();
    server
        .mock("GET", "/apps")
        .match_query(Matcher::UrlEncoded(
            "filter[bundleId]".into(),
            TEST_BUNDLE_ID.into(),
        ))
        .with_status(200)
        .with_body(
            json!({
                "data": [{ "id": "1234567890123", "attributes": { "name": "Example", "bundleId": TEST_BUNDLE_ID } }]
            })
            .to_string(),
        )
        .create();
    server
        .mock("GET", "/apps/1234567890123/appStoreVersions")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"data": []}"#)
        .create();
    server
}

#[test]
fn test_missing_credentials_lists_variables() {
    asc_submit()
        .arg("1.13.0")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(ENV_KEY_ID))
        .stderr(predicate::str::contains(ENV_ISSUER_ID))
        .stderr(predicate::str::contains("App Store Connect API Setup"));
}

#[test]
fn test_missing_key_file() {
    let temp = TempDir::new().unwrap();
    let mut cmd = asc_submit();
    with_credentials(&mut cmd, "http://127.0.0.1:9");
    cmd.env(ENV_KEY_PATH, temp.path().join("AuthKey_NOPE.p8"))
        .arg("1.13.0")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("P8 key file not found"));
}

#[test]
fn test_invalid_version() {
    asc_submit()
        .arg("1.x")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid version '1.x'"))
        .stderr(predicate::str::contains("Nothing was sent to App Store Connect"));
}

#[test]
fn test_missing_project_suggests_bundle_id_flag() {
    let temp = TempDir::new().unwrap();
    let project = temp.path().join("app");
    fs::create_dir(&project).unwrap();

    let mut cmd = asc_submit();
    with_credentials(&mut cmd, "http://127.0.0.1:9");
    cmd.arg("1.13.0")
        .arg("--project-path")
        .arg(&project)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("could not find project.pbxproj"))
        .stderr(predicate::str::contains("--bundle-id"))
        .stderr(predicate::str::contains("Nothing was sent").not());
}

#[test]
fn test_dry_run_with_bundle_id_override() {
    let server = dry_run_server();

    let mut cmd = asc_submit();
    with_credentials(&mut cmd, &server.url());
    cmd.args(["1.13.0+30", "--dry-run", "--bundle-id", TEST_BUNDLE_ID])
        .assert()
        .success()
        .stdout(predicate::str::contains("DRY RUN MODE"))
        .stdout(predicate::str::contains("Found app: Example"))
        .stdout(predicate::str::contains("Would create new version 1.13.0"))
        .stdout(predicate::str::contains("DRY RUN COMPLETE"))
        .stdout(predicate::str::contains("1.13.0 (Build 30)"));
}

#[test]
fn test_dry_run_detects_bundle_id_from_project() {
    let server = dry_run_server();
    let temp = TempDir::new().unwrap();
    let xcodeproj = temp.path().join("ios/Runner.xcodeproj");
    fs::create_dir_all(&xcodeproj).unwrap();
    fs::write(
        xcodeproj.join("project.pbxproj"),
        format!(
            "\t\t\t\tPRODUCT_BUNDLE_IDENTIFIER = {TEST_BUNDLE_ID}.RunnerTests;\n\
             \t\t\t\tPRODUCT_BUNDLE_IDENTIFIER = {TEST_BUNDLE_ID};\n"
        ),
    )
    .unwrap();

    let mut cmd = asc_submit();
    with_credentials(&mut cmd, &server.url());
    cmd.args(["1.13.0", "--dry-run", "--project-path"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Bundle ID: {TEST_BUNDLE_ID} (detected)")))
        .stdout(predicate::str::contains("DRY RUN COMPLETE"));
}

#[test]
fn test_release_notes_flags_conflict() {
    asc_submit()
        .args([
            "1.13.0",
            "--release-notes",
            "a",
            "--release-notes-file",
            "notes.txt",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_already_submitted_version_exits_zero() {
    let mut server = Server::new();
    server
        .mock("GET", "/apps")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({
                "data": [{ "id": "app-1", "attributes": { "name": "Example", "bundleId": TEST_BUNDLE_ID } }]
            })
            .to_string(),
        )
        .create();
    server
        .mock("GET", "/builds")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({
                "data": [{ "id": "build-30", "attributes": { "version": "30", "processingState": "VALID" } }]
            })
            .to_string(),
        )
        .create();
    server
        .mock("GET", "/apps/app-1/appStoreVersions")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({
                "data": [{ "id": "v1", "attributes": { "versionString": "1.13.0", "appStoreState": "IN_REVIEW" } }]
            })
            .to_string(),
        )
        .create();
    let attach = server
        .mock("PATCH", Matcher::Any)
        .expect(0)
        .create();

    let mut cmd = asc_submit();
    with_credentials(&mut cmd, &server.url());
    cmd.args(["1.13.0+30", "--bundle-id", TEST_BUNDLE_ID])
        .assert()
        .success()
        .stdout(predicate::str::contains("already submitted (State: IN_REVIEW)"));
    attach.assert();
}

#[test]
fn test_default_project_path_finds_sibling_ios_dir() {
    let server = dry_run_server();
    let temp = TempDir::new().unwrap();
    let xcodeproj = temp.path().join("ios/Runner.xcodeproj");
    fs::create_dir_all(&xcodeproj).unwrap();
    fs::write(
        xcodeproj.join("project.pbxproj"),
        format!("\t\t\t\tPRODUCT_BUNDLE_IDENTIFIER = {TEST_BUNDLE_ID};\n"),
    )
    .unwrap();
    let mobile = temp.path().join("mobile");
    fs::create_dir(&mobile).unwrap();

    let mut cmd = asc_submit();
    with_credentials(&mut cmd, &server.url());
    cmd.current_dir(&mobile)
        .args(["1.13.0", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Bundle ID: {TEST_BUNDLE_ID} (detected)")))
        .stdout(predicate::str::contains("DRY RUN COMPLETE"));
}
