//! End-to-end CLI tests for the faqgrab binary.

use assert_cmd::Command;
use predicates::prelude::*;

/// Test that invoking without an index URL fails with usage output.
#[test]
fn test_binary_missing_url_returns_error() {
    let mut cmd = Command::cargo_bin("faqgrab").unwrap();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("INDEX_URL"));
}

/// Test that a URL without the /faqs marker is rejected before any fetch.
#[test]
fn test_binary_rejects_url_without_faqs_marker() {
    let mut cmd = Command::cargo_bin("faqgrab").unwrap();
    cmd.args(["http://site.example/game/cheats/", "out", "-q"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a FAQ listing URL"));
}

/// Test that --help displays usage information and exits with code 0.
#[test]
fn test_binary_help_displays_usage() {
    let mut cmd = Command::cargo_bin("faqgrab").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Grab a game title's FAQ archive"));
}

/// Test that --version displays version and exits with code 0.
#[test]
fn test_binary_version_displays_version() {
    let mut cmd = Command::cargo_bin("faqgrab").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("faqgrab"));
}

/// Test that invalid flags cause non-zero exit.
#[test]
fn test_binary_invalid_flag_returns_error() {
    let mut cmd = Command::cargo_bin("faqgrab").unwrap();
    cmd.args(["http://site.example/game/faqs/", "--invalid-flag"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

/// Full run against a mock site: index with one inline-HTML FAQ.
#[tokio::test(flavor = "multi_thread")]
async fn test_binary_grabs_mock_site_into_target_dir() {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    let target = tempfile::TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/game/faqs/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<div class="table-list"><a href="{}/game/faqs/100-guide">Guide</a></div>"#,
            server.uri()
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/game/faqs/100-guide"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><table class="faqtable"><tr><td>guide</td></tr></table></body></html>"#,
        ))
        .mount(&server)
        .await;

    let index_url = format!("{}/game/faqs/", server.uri());
    let target_arg = target.path().to_path_buf();

    // assert_cmd blocks; run it off the runtime workers so the mock server
    // keeps serving
    let status = tokio::task::spawn_blocking(move || {
        let mut cmd = Command::cargo_bin("faqgrab").unwrap();
        cmd.args([index_url.as_str(), target_arg.to_str().unwrap(), "-q"])
            .assert()
            .success();
    })
    .await;
    status.unwrap();

    let guide = std::fs::read_to_string(target.path().join("100-guide")).unwrap();
    assert!(guide.contains("faqtable"));
}
