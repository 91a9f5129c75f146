use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_help_lists_subcommands() {
    Command::cargo_bin("huec")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("authorize"))
        .stdout(predicate::str::contains("lights"))
        .stdout(predicate::str::contains("groups"))
        .stdout(predicate::str::contains("scenes"));
}

#[test]
fn test_status_without_credentials() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("huec")
        .unwrap()
        .env("HUEC_CONFIG_DIR", dir.path())
        .env_remove("HUEC_BRIDGE")
        .env_remove("HUEC_USER")
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("not_authorized"));
}

#[test]
fn test_lights_require_authorization() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("huec")
        .unwrap()
        .env("HUEC_CONFIG_DIR", dir.path())
        .env_remove("HUEC_BRIDGE")
        .env_remove("HUEC_USER")
        .args(["lights", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not_authorized"));
}

#[test]
fn test_forget_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("huec")
        .unwrap()
        .env("HUEC_CONFIG_DIR", dir.path())
        .arg("forget")
        .assert()
        .success()
        .stdout(predicate::str::contains("forgotten"));
}

#[test]
fn test_brightness_range_is_validated() {
    Command::cargo_bin("huec")
        .unwrap()
        .args(["lights", "brightness", "1", "300"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[tokio::test]
async fn test_lights_list_against_mock_bridge() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cliuser"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "config": {"name": "Test Bridge"},
            "lights": {
                "1": {"name": "Kitchen", "state": {"on": true, "bri": 100, "reachable": true}}
            }
        })))
        .mount(&server)
        .await;
    let address = server.address().to_string();

    tokio::task::spawn_blocking(move || {
        Command::cargo_bin("huec")
            .unwrap()
            .env_remove("HUEC_BRIDGE")
            .env_remove("HUEC_USER")
            .args(["lights", "list", "-b", &address, "-u", "cliuser"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Kitchen"));
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_lights_list_table_output() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cliuser"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "config": {"name": "Test Bridge"},
            "lights": {
                "1": {"name": "Kitchen", "state": {"on": true, "bri": 100, "reachable": true}}
            }
        })))
        .mount(&server)
        .await;
    let address = server.address().to_string();

    tokio::task::spawn_blocking(move || {
        Command::cargo_bin("huec")
            .unwrap()
            .env_remove("HUEC_BRIDGE")
            .env_remove("HUEC_USER")
            .args(["lights", "list", "--table", "-b", &address, "-u", "cliuser"])
            .assert()
            .success()
            .stdout(predicate::str::contains("NAME"))
            .stdout(predicate::str::contains("Kitchen"));
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_unreachable_bridge_exit_code() {
    // Bind a port, then free it so the connection is refused. A dropped
    // `MockServer::start()` server would not do: its pooled listener stays
    // bound after drop.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap().to_string();
    drop(listener);

    tokio::task::spawn_blocking(move || {
        Command::cargo_bin("huec")
            .unwrap()
            .env_remove("HUEC_BRIDGE")
            .env_remove("HUEC_USER")
            .args(["lights", "list", "-b", &address, "-u", "cliuser"])
            .assert()
            .code(4)
            .stderr(predicate::str::contains("bridge_unreachable"));
    })
    .await
    .unwrap();
}
