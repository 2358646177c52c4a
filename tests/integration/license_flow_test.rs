//! Integration tests for the verify/activate/deactivate lifecycle.

use std::sync::Arc;

use chrono::{Duration, Utc};
use http::StatusCode;

use crate::helpers::{
    ContendedStore, KEY, TestApp, UnreachableStore, lifetime_license, pro_license,
    pro_license_expiring,
};

#[tokio::test]
async fn test_activation_lifecycle_respects_machine_limit() {
    let app = TestApp::new();
    app.seed(KEY, &pro_license(&[])).await;
    let max = app.config.license.max_machines;
    assert_eq!(max, 3);

    for (n, machine) in ["dev1", "dev2", "dev3"].iter().enumerate() {
        let response = app.call("/activate", KEY, machine).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["success"], true);
        assert_eq!(response.body["machines_used"], n as u64 + 1);
        assert_eq!(response.body["machines_max"], 3);
    }

    let full = app.call("/activate", KEY, "dev4").await;
    assert_eq!(full.status, StatusCode::OK);
    assert_eq!(full.body["success"], false);
    assert_eq!(full.body["reason"], "device_limit");
    assert_eq!(full.body["max_devices"], 3);

    let released = app.call("/deactivate", KEY, "dev2").await;
    assert_eq!(released.status, StatusCode::OK);
    assert_eq!(released.body["success"], true);
    assert_eq!(released.body["machines_used"], 2);

    let retry = app.call("/activate", KEY, "dev4").await;
    assert_eq!(retry.body["success"], true);
    assert_eq!(retry.body["machines_used"], 3);

    let record = app.stored(KEY).await.unwrap();
    assert_eq!(record.machines, vec!["dev1", "dev3", "dev4"]);
}

#[tokio::test]
async fn test_verify_reports_entitlement() {
    let app = TestApp::new();
    app.seed(KEY, &pro_license(&[])).await;

    let response = app.call("/verify", KEY, "dev1").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["valid"], true);
    assert_eq!(response.body["tier"], "pro");
    assert!(response.body["expires"].is_null());
    let features = response.body["features"].as_array().unwrap();
    assert!(features.iter().any(|f| f == "cost_tracking"));
    assert!(response.body.get("machines_used").is_none());
}

#[tokio::test]
async fn test_verify_registers_then_is_idempotent() {
    let app = TestApp::new();
    app.seed(KEY, &pro_license(&[])).await;

    for _ in 0..3 {
        let response = app.call("/verify", KEY, "dev1").await;
        assert_eq!(response.body["valid"], true);
    }

    let record = app.stored(KEY).await.unwrap();
    assert_eq!(record.machines, vec!["dev1"]);
}

#[tokio::test]
async fn test_registered_machine_still_valid_at_limit() {
    let app = TestApp::new();
    app.seed(KEY, &pro_license(&["m1", "m2", "m3"])).await;

    let known = app.call("/verify", KEY, "m2").await;
    assert_eq!(known.body["valid"], true);

    let unknown = app.call("/verify", KEY, "m4").await;
    assert_eq!(unknown.body["valid"], false);
    assert_eq!(unknown.body["reason"], "device_limit");
    assert_eq!(unknown.body["max_devices"], 3);
}

#[tokio::test]
async fn test_revocation_takes_precedence_over_expiry() {
    let app = TestApp::new();
    let mut record = pro_license_expiring(Utc::now() - Duration::days(3));
    record.revoked = true;
    record.machines = vec!["dev1".into()];
    app.seed(KEY, &record).await;

    let verify = app.call("/verify", KEY, "dev1").await;
    assert_eq!(verify.status, StatusCode::OK);
    assert_eq!(verify.body["valid"], false);
    assert_eq!(verify.body["reason"], "revoked");

    let activate = app.call("/activate", KEY, "dev2").await;
    assert_eq!(activate.body["success"], false);
    assert_eq!(activate.body["reason"], "revoked");

    assert_eq!(app.stored(KEY).await.unwrap().machines, vec!["dev1"]);
}

#[tokio::test]
async fn test_expired_license_is_inert() {
    let app = TestApp::new();
    app.seed(KEY, &pro_license_expiring(Utc::now() - Duration::minutes(1)))
        .await;

    let response = app.call("/activate", KEY, "dev1").await;
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["reason"], "expired");
    assert!(app.stored(KEY).await.unwrap().machines.is_empty());
}

#[tokio::test]
async fn test_future_expiry_is_reported() {
    let app = TestApp::new();
    let expires = Utc::now() + Duration::days(30);
    app.seed(KEY, &pro_license_expiring(expires)).await;

    let response = app.call("/verify", KEY, "dev1").await;
    assert_eq!(response.body["valid"], true);
    let reported: chrono::DateTime<Utc> =
        serde_json::from_value(response.body["expires"].clone()).unwrap();
    assert_eq!(reported, expires);
}

#[tokio::test]
async fn test_lifetime_license_has_no_expiry() {
    let app = TestApp::new();
    app.seed(KEY, &lifetime_license()).await;

    let response = app.call("/activate", KEY, "dev1").await;
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["tier"], "lifetime");
    assert!(response.body["expires"].is_null());
}

#[tokio::test]
async fn test_unknown_key_is_not_found() {
    let app = TestApp::new();

    let verify = app.call("/verify", KEY, "dev1").await;
    assert_eq!(verify.status, StatusCode::OK);
    assert_eq!(verify.body["reason"], "not_found");

    let deactivate = app.call("/deactivate", KEY, "dev1").await;
    assert_eq!(deactivate.status, StatusCode::OK);
    assert_eq!(deactivate.body["success"], false);
    assert_eq!(deactivate.body["reason"], "not_found");

    assert!(app.stored(KEY).await.is_none());
}

#[tokio::test]
async fn test_deactivate_is_idempotent() {
    let app = TestApp::new();
    app.seed(KEY, &pro_license(&["dev1", "dev2"])).await;

    let first = app.call("/deactivate", KEY, "dev1").await;
    assert_eq!(first.body["machines_used"], 1);

    let second = app.call("/deactivate", KEY, "dev1").await;
    assert_eq!(second.body["success"], true);
    assert_eq!(second.body["machines_used"], 1);

    assert_eq!(app.stored(KEY).await.unwrap().machines, vec!["dev2"]);
}

#[tokio::test]
async fn test_deactivate_frees_slot_on_revoked_license() {
    let app = TestApp::new();
    let mut record = pro_license(&["dev1"]);
    record.revoked = true;
    app.seed(KEY, &record).await;

    let response = app.call("/deactivate", KEY, "dev1").await;
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["machines_used"], 0);

    let stored = app.stored(KEY).await.unwrap();
    assert!(stored.revoked);
    assert!(stored.machines.is_empty());
}

#[tokio::test]
async fn test_key_case_is_normalized() {
    let app = TestApp::new();
    app.seed(KEY, &pro_license(&[])).await;

    let lower = KEY.replace("A3F2-9D8E-C4B1-7F0A", "a3f2-9d8e-c4b1-7f0a");
    let activate = app.call("/activate", &lower, "dev1").await;
    assert_eq!(activate.body["success"], true);

    let mixed = KEY.replace("A3F2", "a3F2");
    let verify = app.call("/verify", &mixed, "dev1").await;
    assert_eq!(verify.body["valid"], true);

    assert_eq!(app.stored(KEY).await.unwrap().machines, vec!["dev1"]);
}

#[tokio::test]
async fn test_contended_write_is_conflict() {
    let app = TestApp::with_store(Arc::new(ContendedStore::default()));
    app.seed(KEY, &pro_license(&[])).await;

    let response = app.call("/activate", KEY, "dev1").await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["error"], "CONFLICT");

    // No write needed, so no contention.
    app.seed(KEY, &pro_license(&["dev1"])).await;
    let response = app.call("/verify", KEY, "dev1").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["valid"], true);
}

#[tokio::test]
async fn test_store_failure_is_500_without_detail() {
    let app = TestApp::with_store(Arc::new(UnreachableStore));

    let response = app.call("/verify", KEY, "dev1").await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["error"], "STORE_ERROR");
    let message = response.body["message"].as_str().unwrap();
    assert!(!message.contains("redis://"));
}
