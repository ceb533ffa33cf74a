#![allow(clippy::unwrap_used)]
// Integration tests for `MagicInfoClient` using wiremock.

use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value, json};
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use magicly_api::{Credentials, DeviceFilterRequest, Error, MagicInfoClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, MagicInfoClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = MagicInfoClient::with_client(
        reqwest::Client::new(),
        base_url,
        Credentials::new("admin", SecretString::from("secret".to_string())),
    );
    (server, client)
}

fn api_path(suffix: &str) -> String {
    format!("/MagicInfo/restapi/v2.0/{suffix}")
}

fn success(items: &Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "apiVersion": "2.0",
        "status": "Success",
        "items": items,
    }))
}

async fn mount_auth(server: &MockServer, token: &str, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path(api_path("auth")))
        .and(body_json(json!({ "username": "admin", "password": "secret" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": token })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_success() {
    let (server, client) = setup().await;
    mount_auth(&server, "tok-1", 1).await;

    let token = client.login().await.unwrap();
    assert_eq!(token.expose_secret(), "tok-1");
}

#[tokio::test]
async fn test_login_failure() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(api_path("auth")))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
        .mount(&server)
        .await;

    let result = client.login().await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_login_without_token_field() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(api_path("auth")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "refreshToken": "x" })))
        .mount(&server)
        .await;

    let result = client.ensure_token().await;
    assert!(matches!(result, Err(Error::Authentication { .. })));
}

#[tokio::test]
async fn test_token_reused_within_ttl() {
    let (server, client) = setup().await;
    mount_auth(&server, "tok-1", 1).await;

    Mock::given(method("GET"))
        .and(path(api_path("ems/dashboard/devices")))
        .and(header("api_key", "tok-1"))
        .respond_with(success(&json!({ "status": { "connected": 1 } })))
        .expect(2)
        .mount(&server)
        .await;

    client.get_dashboard().await.unwrap();
    client.get_dashboard().await.unwrap();
}

#[tokio::test]
async fn test_token_refreshed_after_ttl() {
    let (server, client) = setup().await;
    let client = client.with_token_ttl(Duration::ZERO);
    mount_auth(&server, "tok-1", 2).await;

    Mock::given(method("GET"))
        .and(path(api_path("ems/dashboard/devices")))
        .respond_with(success(&json!({ "status": {} })))
        .mount(&server)
        .await;

    client.get_dashboard().await.unwrap();
    client.get_dashboard().await.unwrap();
}

#[tokio::test]
async fn test_unauthorized_drops_token() {
    let (server, client) = setup().await;
    mount_auth(&server, "tok-1", 2).await;

    Mock::given(method("GET"))
        .and(path(api_path("ems/dashboard/devices")))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let first = client.get_dashboard().await;
    assert!(matches!(first, Err(Error::Authentication { .. })));
    let second = client.get_dashboard().await;
    assert!(matches!(second, Err(Error::Authentication { .. })));
}

// ── Envelope tests ──────────────────────────────────────────────────

#[tokio::test]
async fn test_non_success_envelope_is_api_error() {
    let (server, client) = setup().await;
    mount_auth(&server, "tok", 1).await;

    Mock::given(method("GET"))
        .and(path(api_path("rms/devices/device-types")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "Fail",
            "errorMessage": "permission denied",
        })))
        .mount(&server)
        .await;

    let result = client.list_device_types().await;
    match result {
        Err(Error::Api { message, .. }) => assert_eq!(message, "permission denied"),
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_http_error_status() {
    let (server, client) = setup().await;
    mount_auth(&server, "tok", 1).await;

    Mock::given(method("GET"))
        .and(path(api_path("rms/devices/device-types")))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let result = client.list_device_types().await;
    assert!(matches!(result, Err(Error::Api { status: Some(500), .. })));
}

#[tokio::test]
async fn test_malformed_body() {
    let (server, client) = setup().await;
    mount_auth(&server, "tok", 1).await;

    Mock::given(method("GET"))
        .and(path(api_path("rms/devices/device-types")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let result = client.list_device_types().await;
    assert!(matches!(result, Err(Error::Deserialization { .. })));
}

// ── Catalog tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_dashboard_and_device_types() {
    let (server, client) = setup().await;
    mount_auth(&server, "tok", 1).await;

    Mock::given(method("GET"))
        .and(path(api_path("ems/dashboard/devices")))
        .respond_with(success(&json!({
            "status": { "connected": 4, "disConnected": 1, "warning": 0, "error": 2 }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(api_path("rms/devices/device-types")))
        .respond_with(success(&json!({
            "deviceList": [
                { "deviceType": "S6PLAYER", "deviceTypeVersion": 6.0, "deviceFullType": "S6PLAYER" }
            ]
        })))
        .mount(&server)
        .await;

    let status = client.get_dashboard().await.unwrap();
    assert_eq!(status.connected.as_deref(), Some("4"));
    assert_eq!(status.disconnected.as_deref(), Some("1"));
    assert_eq!(status.error.as_deref(), Some("2"));

    let types = client.list_device_types().await.unwrap();
    assert_eq!(types.len(), 1);
    assert_eq!(types[0].device_type.as_deref(), Some("S6PLAYER"));
    assert_eq!(types[0].device_type_version.as_deref(), Some("6.0"));
}

// ── Device tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_devices_single_page() {
    let (server, client) = setup().await;
    mount_auth(&server, "tok", 1).await;

    Mock::given(method("GET"))
        .and(path(api_path("rms/devices")))
        .and(query_param("pageSize", "1000"))
        .and(query_param("startIndex", "1"))
        .respond_with(success(&json!([
            { "deviceId": "aa-bb-cc-00-00-01", "deviceName": "Lobby" },
            { "deviceId": "aa-bb-cc-00-00-02" }
        ])))
        .mount(&server)
        .await;

    let devices = client.list_devices().await.unwrap();
    let ids: Vec<_> = devices.iter().map(|d| d.device_id.as_str()).collect();
    assert_eq!(ids, vec!["aa-bb-cc-00-00-01", "aa-bb-cc-00-00-02"]);
    assert_eq!(devices[0].device_name.as_deref(), Some("Lobby"));
}

#[tokio::test]
async fn test_filter_devices_posts_body() {
    let (server, client) = setup().await;
    mount_auth(&server, "tok", 1).await;

    Mock::given(method("POST"))
        .and(path(api_path("rms/devices/filter")))
        .and(body_json(json!({
            "deviceType": ["S6PLAYER"],
            "inputSource": [33],
            "pageSize": 1000,
            "startIndex": 1
        })))
        .respond_with(success(&json!([{ "deviceId": "d1" }])))
        .expect(1)
        .mount(&server)
        .await;

    let filter = DeviceFilterRequest {
        device_type: vec!["S6PLAYER".into()],
        input_source: vec![33],
        function_type: Vec::new(),
        page_size: 1000,
        start_index: 1,
    };
    let devices = client.filter_devices(&filter).await.unwrap();
    assert_eq!(devices.len(), 1);
}

#[tokio::test]
async fn test_bulk_detail_endpoints() {
    let (server, client) = setup().await;
    mount_auth(&server, "tok", 1).await;

    Mock::given(method("POST"))
        .and(path(api_path("rms/devices/general-info")))
        .and(body_json(json!({ "ids": ["d1"] })))
        .respond_with(success(&json!({
            "successList": [{ "generalConf": { "deviceId": "d1", "deviceName": "Lobby" } }],
            "failList": []
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(api_path("rms/devices/display-info")))
        .respond_with(success(&json!({
            "successList": [{ "displayConf": { "deviceId": "d1", "basicVolume": 10 } }]
        })))
        .mount(&server)
        .await;

    let ids = vec!["d1".to_string()];
    let general = client.get_general_info(&ids).await.unwrap();
    let display = client.get_display_info(&ids).await.unwrap();
    assert_eq!(general.success_list.len(), 1);
    assert!(general.fail_list.is_empty());
    assert_eq!(display.success_list[0]["displayConf"]["basicVolume"], 10);
}

// ── Display control tests ───────────────────────────────────────────

#[tokio::test]
async fn test_update_display_returns_request_id() {
    let (server, client) = setup().await;
    mount_auth(&server, "tok", 1).await;

    Mock::given(method("PUT"))
        .and(path(api_path("rms/devices/current-display-info")))
        .and(body_json(json!({
            "deviceIds": ["d1"],
            "displayInfo": { "basicVolume": "20" }
        })))
        .respond_with(success(&json!({ "requestId": "req-7" })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(api_path("rms/devices/current-display-info")))
        .and(body_json(json!({ "deviceIds": ["d1"], "requestId": "req-7" })))
        .respond_with(success(&json!({
            "successList": [{ "deviceId": "d1", "basicVolume": "20" }]
        })))
        .mount(&server)
        .await;

    let ids = vec!["d1".to_string()];
    let mut info = Map::new();
    info.insert("basicVolume".into(), Value::String("20".into()));

    let request_id = client.update_display(&ids, &info).await.unwrap();
    assert_eq!(request_id, "req-7");

    let result = client.get_display_result(&ids, &request_id).await.unwrap();
    assert_eq!(result.success_list[0]["basicVolume"], "20");
}

#[tokio::test]
async fn test_quick_control() {
    let (server, client) = setup().await;
    mount_auth(&server, "tok", 1).await;

    Mock::given(method("PUT"))
        .and(path(api_path("rms/devices/quick-control")))
        .and(body_json(json!({ "deviceIds": ["d1"], "menu": "power", "value": "0" })))
        .respond_with(success(&json!({ "requestId": "q1" })))
        .expect(1)
        .mount(&server)
        .await;

    client
        .quick_control(&["d1".to_string()], "power", "0")
        .await
        .unwrap();
}
