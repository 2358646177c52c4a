//! Integration tests for request validation, status codes and CORS.

use std::sync::Arc;

use http::StatusCode;

use crate::helpers::{KEY, TestApp, UnreachableStore};

const JSON: (&str, &str) = ("Content-Type", "application/json");

#[tokio::test]
async fn test_unparsable_body_is_invalid_request() {
    let app = TestApp::new();

    for path in ["/verify", "/activate", "/deactivate"] {
        let response = app.request("POST", path, Some("{\"key\":"), &[JSON]).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{path}");
        assert_eq!(response.body["reason"], "invalid_request", "{path}");
    }

    let verify = app.request("POST", "/verify", Some("[]"), &[JSON]).await;
    assert_eq!(verify.body["valid"], false);

    let activate = app.request("POST", "/activate", None, &[JSON]).await;
    assert_eq!(activate.status, StatusCode::BAD_REQUEST);
    assert_eq!(activate.body["success"], false);
}

#[tokio::test]
async fn test_body_accepted_without_content_type() {
    let app = TestApp::new();
    let body = format!(r#"{{"key":"{KEY}","machine_id":"dev1"}}"#);

    let response = app.request("POST", "/verify", Some(&body), &[]).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["reason"], "not_found");
}

#[tokio::test]
async fn test_missing_fields_are_400() {
    let app = TestApp::new();

    let no_key = app
        .post("/verify", serde_json::json!({ "machine_id": "dev1" }))
        .await;
    assert_eq!(no_key.status, StatusCode::BAD_REQUEST);
    assert_eq!(no_key.body["reason"], "missing_key");

    let blank_key = app
        .post("/activate", serde_json::json!({ "key": "", "machine_id": "dev1" }))
        .await;
    assert_eq!(blank_key.status, StatusCode::BAD_REQUEST);
    assert_eq!(blank_key.body["reason"], "missing_key");

    let no_machine = app.post("/activate", serde_json::json!({ "key": KEY })).await;
    assert_eq!(no_machine.status, StatusCode::BAD_REQUEST);
    assert_eq!(no_machine.body["reason"], "missing_machine_id");

    let deactivate = app.post("/deactivate", serde_json::json!({ "key": KEY })).await;
    assert_eq!(deactivate.status, StatusCode::BAD_REQUEST);
    assert_eq!(deactivate.body["success"], false);
    assert_eq!(deactivate.body["reason"], "missing_fields");
}

#[tokio::test]
async fn test_malformed_key_never_reaches_store() {
    // Any store access would fail with 500.
    let app = TestApp::with_store(Arc::new(UnreachableStore));

    let near_misses = [
        "CS-PRO-A3F2-9D8E-C4B1",
        "CS-PRO-A3F2-9D8E-C4B1-7F0A-1234",
        "CL-PRO-A3F2-9D8E-C4B1-7F0A",
        "cs-pro-A3F2-9D8E-C4B1-7F0A",
        "CS-PRO-A3F2-9D8E-C4B1-7F0G",
        "CS-PRO-A3F-9D8E-C4B1-7F0AA",
        "CS-PRO-A3F2_9D8E_C4B1_7F0A",
    ];

    for key in near_misses {
        let verify = app.call("/verify", key, "dev1").await;
        assert_eq!(verify.status, StatusCode::OK, "{key}");
        assert_eq!(verify.body["valid"], false, "{key}");
        assert_eq!(verify.body["reason"], "invalid_format", "{key}");

        let activate = app.call("/activate", key, "dev1").await;
        assert_eq!(activate.body["reason"], "invalid_format", "{key}");

        let deactivate = app.call("/deactivate", key, "dev1").await;
        assert_eq!(deactivate.status, StatusCode::OK, "{key}");
        assert_eq!(deactivate.body["reason"], "not_found", "{key}");
    }
}

#[tokio::test]
async fn test_cors_headers_on_every_response() {
    let app = TestApp::new();
    let origin = ("Origin", "https://app.example.com");

    let ok = app
        .request(
            "POST",
            "/verify",
            Some(&format!(r#"{{"key":"{KEY}","machine_id":"dev1"}}"#)),
            &[JSON, origin],
        )
        .await;
    assert_eq!(ok.header("access-control-allow-origin"), Some("*"));

    let bad = app.request("POST", "/activate", Some("nope"), &[JSON, origin]).await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad.header("access-control-allow-origin"), Some("*"));

    let missing = app.request("GET", "/missing", None, &[origin]).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.header("access-control-allow-origin"), Some("*"));
}

#[tokio::test]
async fn test_preflight_is_answered() {
    let app = TestApp::new();

    let response = app
        .request(
            "OPTIONS",
            "/activate",
            None,
            &[
                ("Origin", "https://app.example.com"),
                ("Access-Control-Request-Method", "POST"),
                ("Access-Control-Request-Headers", "content-type"),
            ],
        )
        .await;

    assert!(response.status.is_success());
    assert_eq!(response.header("access-control-allow-origin"), Some("*"));
    let methods = response.header("access-control-allow-methods").unwrap();
    assert!(methods.contains("POST"));
    assert!(methods.contains("OPTIONS"));
}

#[tokio::test]
async fn test_bare_options_on_operation_route() {
    let app = TestApp::new();

    for path in ["/verify", "/activate", "/deactivate"] {
        let response = app.request("OPTIONS", path, None, &[]).await;
        assert_eq!(response.status, StatusCode::OK, "{path}");
        assert_eq!(response.header("access-control-allow-origin"), Some("*"), "{path}");
        let methods = response.header("access-control-allow-methods").unwrap();
        assert!(methods.contains("POST"), "{path}");
    }
}

#[tokio::test]
async fn test_options_on_unknown_route_is_404() {
    let app = TestApp::new();
    let response = app
        .request("OPTIONS", "/nope", None, &[("Origin", "https://app.example.com")])
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "NOT_FOUND");
    assert_eq!(response.header("access-control-allow-origin"), Some("*"));
}

#[tokio::test]
async fn test_operation_routes_reject_other_methods() {
    let app = TestApp::new();

    for path in ["/verify", "/activate", "/deactivate"] {
        let get = app.request("GET", path, None, &[]).await;
        assert_eq!(get.status, StatusCode::METHOD_NOT_ALLOWED, "{path}");

        let put = app.request("PUT", path, Some("{}"), &[JSON]).await;
        assert_eq!(put.status, StatusCode::METHOD_NOT_ALLOWED, "{path}");
    }
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = TestApp::new();
    let response = app.request("POST", "/register", Some("{}"), &[JSON]).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.request("GET", "/health", None, &[]).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    let timestamp = response.body["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
}

#[tokio::test]
async fn test_health_reports_unreachable_store() {
    let app = TestApp::with_store(Arc::new(UnreachableStore));
    let response = app.request("GET", "/health", None, &[]).await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body["status"], "degraded");
}
