//! Lifecycle handlers against a mocked AlertsManagement API.

mod common;

use ar_core::Error;
use assert_matches::assert_matches;
use common::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_VERSION: &str = "2019-05-05-preview";

async fn mount_get(server: &MockServer, name: &str, status: u16, times: Option<u64>) {
    let template = if status == 200 {
        ResponseTemplate::new(200).set_body_json(rule_body(name))
    } else {
        ResponseTemplate::new(status).set_body_json(json!({
            "error": { "code": "ResourceNotFound", "message": "not found" }
        }))
    };

    let mock = Mock::given(method("GET"))
        .and(path(rule_path(name)))
        .and(query_param("api-version", API_VERSION))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(template);

    match times {
        Some(n) => mock.up_to_n_times(n).mount(server).await,
        None => mock.mount(server).await,
    }
}

#[tokio::test]
async fn create_checks_existence_puts_and_reads_back() {
    let server = MockServer::start().await;
    mount_get(&server, "nightly", 404, Some(1)).await;

    Mock::given(method("PUT"))
        .and(path(rule_path("nightly")))
        .and(query_param("api-version", API_VERSION))
        .and(body_partial_json(json!({
            "location": "Global",
            "properties": {
                "type": "Suppression",
                "status": "Enabled",
                "suppressionConfig": {
                    "recurrenceType": "Weekly",
                    "schedule": {
                        "startDate": "01/01/2019",
                        "startTime": "01:02:03",
                        "endDate": "01/03/2019",
                        "endTime": "15:02:07",
                        "recurrenceValues": [0, 1]
                    }
                }
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(rule_body("nightly")))
        .expect(1)
        .mount(&server)
        .await;

    mount_get(&server, "nightly", 200, None).await;

    let resource = resource_for(&server);
    let tracked = resource.create(&suppression_rule("nightly")).await.unwrap();

    assert_eq!(tracked.id, rule_path("nightly"));
    assert_eq!(tracked.rule, suppression_rule("nightly"));
}

#[tokio::test]
async fn create_of_existing_rule_is_import_conflict() {
    let server = MockServer::start().await;
    mount_get(&server, "nightly", 200, None).await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let resource = resource_for(&server);
    let err = resource.create(&suppression_rule("nightly")).await.unwrap_err();

    assert_matches!(err, Error::ImportConflict { ref id } if *id == rule_path("nightly"));
    assert!(err.to_string().contains("needs to be imported"));
}

#[tokio::test]
async fn read_of_deleted_rule_is_none() {
    let server = MockServer::start().await;
    mount_get(&server, "nightly", 404, None).await;

    let resource = resource_for(&server);
    let state = resource.read(&rule_path("nightly"), Some("Suppression")).await.unwrap();
    assert!(state.is_none());
}

#[tokio::test]
async fn read_flattens_response() {
    let server = MockServer::start().await;
    mount_get(&server, "nightly", 200, None).await;

    let resource = resource_for(&server);
    let tracked = resource
        .read(&rule_path("nightly"), Some("Suppression"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(tracked.rule, suppression_rule("nightly"));
    assert_eq!(tracked.key(), "monitoring/nightly");
}

#[tokio::test]
async fn read_with_wrong_type_is_mismatch() {
    let server = MockServer::start().await;
    mount_get(&server, "nightly", 200, None).await;

    let resource = resource_for(&server);
    let err = resource
        .read(&rule_path("nightly"), Some("ActionGroup"))
        .await
        .unwrap_err();
    assert_matches!(err, Error::TypeMismatch { .. });
}

#[tokio::test]
async fn server_error_carries_rule_context() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(rule_path("nightly")))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let resource = resource_for(&server);
    let err = resource.read(&rule_path("nightly"), None).await.unwrap_err();

    assert_matches!(err, Error::Transport { status: Some(500), .. });
    let message = err.to_string();
    assert!(message.contains("\"nightly\""), "{message}");
    assert!(message.contains("Resource Group \"monitoring\""), "{message}");
    assert!(message.contains("boom"), "{message}");
}

#[tokio::test]
async fn create_surfaces_existence_check_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(rule_path("nightly")))
        .respond_with(ResponseTemplate::new(403).set_body_string("denied"))
        .mount(&server)
        .await;

    let resource = resource_for(&server);
    let err = resource.create(&suppression_rule("nightly")).await.unwrap_err();

    assert_matches!(
        err,
        Error::Transport { ref operation, status: Some(403), .. }
            if operation == "checking for presence of existing"
    );
}

#[tokio::test]
async fn delete_accepts_no_content_and_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(rule_path("nightly")))
        .and(query_param("api-version", API_VERSION))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(rule_path("gone")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let resource = resource_for(&server);
    resource.delete(&rule_path("nightly")).await.unwrap();
    resource.delete(&rule_path("gone")).await.unwrap();
}

#[tokio::test]
async fn delete_failure_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(409).set_body_string("locked"))
        .mount(&server)
        .await;

    let resource = resource_for(&server);
    let err = resource.delete(&rule_path("nightly")).await.unwrap_err();
    assert_matches!(err, Error::Transport { status: Some(409), .. });
}

#[tokio::test]
async fn import_of_missing_rule_is_not_found() {
    let server = MockServer::start().await;
    mount_get(&server, "nightly", 404, None).await;

    let resource = resource_for(&server);
    let err = resource.import(&rule_path("nightly")).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn malformed_id_fails_without_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let resource = resource_for(&server);
    let err = resource
        .read("/subscriptions/sub/resourceGroups/monitoring/providers/Microsoft.AlertsManagement", None)
        .await
        .unwrap_err();
    assert_matches!(err, Error::Parse(_));
}
