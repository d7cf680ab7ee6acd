use assert_cmd::Command;
use mockito::Server;
use predicates::prelude::*;

fn releases_body() -> &'static str {
    r#"[
        {
            "tag_name": "v1.1.0",
            "name": "Release 1.1.0",
            "body": "fixes",
            "html_url": "https://github.com/owner/repo/releases/tag/v1.1.0",
            "published_at": "2024-02-01T00:00:00Z",
            "draft": false,
            "prerelease": false,
            "assets": [
                {
                    "id": 21,
                    "name": "tool_linux_amd64.tar.gz",
                    "size": 2048,
                    "browser_download_url": "https://example.com/v1.1.0/tool_linux_amd64.tar.gz"
                },
                {
                    "id": 22,
                    "name": "tool_linux_amd64.tar.gz.sha256",
                    "size": 64,
                    "browser_download_url": "https://example.com/v1.1.0/tool_linux_amd64.tar.gz.sha256"
                }
            ]
        },
        {
            "tag_name": "v2.0.0-rc1",
            "name": "Release 2.0.0-rc1",
            "body": null,
            "html_url": "https://github.com/owner/repo/releases/tag/v2.0.0-rc1",
            "published_at": "2024-03-01T00:00:00Z",
            "draft": false,
            "prerelease": true,
            "assets": [
                {
                    "id": 31,
                    "name": "tool_linux_amd64.tar.gz",
                    "size": 4096,
                    "browser_download_url": "https://example.com/v2.0.0-rc1/tool_linux_amd64.tar.gz"
                }
            ]
        },
        {
            "tag_name": "v1.0.0",
            "name": "Release 1.0.0",
            "body": "initial",
            "html_url": "https://github.com/owner/repo/releases/tag/v1.0.0",
            "published_at": "2024-01-01T00:00:00Z",
            "draft": false,
            "prerelease": false,
            "assets": [
                {
                    "id": 11,
                    "name": "tool_linux_amd64.tar.gz",
                    "size": 1024,
                    "browser_download_url": "https://example.com/v1.0.0/tool_linux_amd64.tar.gz"
                }
            ]
        }
    ]"#
}

fn ghup() -> Command {
    Command::cargo_bin("ghup").unwrap()
}

#[test]
fn test_latest_picks_newest_stable_release() {
    let mut server = Server::new();
    let url = server.url();

    let _mock = server
        .mock("GET", "/repos/owner/repo/releases?per_page=100&page=1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(releases_body())
        .create();

    ghup()
        .args([
            "latest",
            "owner/repo",
            "--api-url",
            &url,
            "--os",
            "linux",
            "--arch",
            "amd64",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("1.1.0"))
        .stdout(predicate::str::contains(
            "https://example.com/v1.1.0/tool_linux_amd64.tar.gz",
        ))
        // The prerelease must not win a latest query
        .stdout(predicate::str::contains("2.0.0-rc1").not());
}

#[test]
fn test_version_reaches_pinned_prerelease() {
    let mut server = Server::new();
    let url = server.url();

    let _mock = server
        .mock("GET", "/repos/owner/repo/releases?per_page=100&page=1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(releases_body())
        .create();

    ghup()
        .args([
            "version",
            "owner/repo",
            "v2.0.0-rc1",
            "--api-url",
            &url,
            "--os",
            "linux",
            "--arch",
            "amd64",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("2.0.0-rc1"));
}

#[test]
fn test_latest_with_validation_suffix() {
    let mut server = Server::new();
    let url = server.url();

    let _mock = server
        .mock("GET", "/repos/owner/repo/releases?per_page=100&page=1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(releases_body())
        .create();

    // Only v1.1.0 ships a .sha256 companion
    ghup()
        .args([
            "latest",
            "owner/repo",
            "--api-url",
            &url,
            "--os",
            "linux",
            "--arch",
            "amd64",
            "--validation-suffix",
            ".sha256",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("1.1.0"))
        .stdout(predicate::str::contains("validation asset: 22"));
}

#[test]
fn test_list_prints_every_candidate_in_order() {
    let mut server = Server::new();
    let url = server.url();

    let _mock = server
        .mock("GET", "/repos/owner/repo/releases?per_page=100&page=1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(releases_body())
        .create();

    let assert = ghup()
        .args([
            "list",
            "owner/repo",
            "--api-url",
            &url,
            "--os",
            "linux",
            "--arch",
            "amd64",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("1.1.0"))
        .stdout(predicate::str::contains("1.0.0"))
        .stdout(predicate::str::contains("2.0.0-rc1").not());

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let pos_110 = stdout.find("1.1.0").unwrap();
    let pos_100 = stdout.find("1.0.0").unwrap();
    assert!(pos_110 < pos_100, "listing order must follow the provider");
}

#[test]
fn test_missing_repository_is_not_an_error() {
    let mut server = Server::new();
    let url = server.url();

    let _mock = server
        .mock("GET", "/repos/owner/gone/releases?per_page=100&page=1")
        .with_status(404)
        .create();

    ghup()
        .args([
            "latest",
            "owner/gone",
            "--api-url",
            &url,
            "--os",
            "linux",
            "--arch",
            "amd64",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("No suitable release found"));
}

#[test]
fn test_server_error_fails() {
    let mut server = Server::new();
    let url = server.url();

    let _mock = server
        .mock("GET", "/repos/owner/repo/releases?per_page=100&page=1")
        .with_status(500)
        .create();

    ghup()
        .args(["latest", "owner/repo", "--api-url", &url])
        .assert()
        .failure()
        .stderr(predicate::str::contains("500"));
}

#[test]
fn test_malformed_slug_fails_without_network() {
    // No mock server at all: the slug check happens first
    ghup()
        .args(["latest", "onlyonepart"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("owner/repo"));
}
