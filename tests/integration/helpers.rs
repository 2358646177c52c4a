//! Shared test helpers for integration tests.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use chrono::{DateTime, Utc};
use http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use licensehub_api::{AppState, build_app};
use licensehub_core::config::AppConfig;
use licensehub_core::error::AppError;
use licensehub_core::result::AppResult;
use licensehub_core::traits::license_store::LicenseStore;
use licensehub_entity::license::{LicenseRecord, LicenseTier, codec};
use licensehub_service::LicenseService;
use licensehub_store::StoreManager;
use licensehub_store::memory::MemoryLicenseStore;

/// A well-formed key used across tests.
pub const KEY: &str = "CS-PRO-A3F2-9D8E-C4B1-7F0A";

/// Test application context
pub struct TestApp {
    /// The Axum app (router plus middleware) for making test requests
    pub router: Router,
    /// Backing store for direct inspection
    pub store: Arc<dyn LicenseStore>,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// Create a test application over an empty in-memory store
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryLicenseStore::new()))
    }

    /// Create a test application over the given store
    pub fn with_store(backend: Arc<dyn LicenseStore>) -> Self {
        let store: Arc<dyn LicenseStore> = Arc::new(StoreManager::from_store(backend));
        let config = AppConfig::default();
        let service = LicenseService::new(Arc::clone(&store), &config.license);
        let state = AppState::new(Arc::new(config.clone()), Arc::new(service));

        Self {
            router: build_app(state),
            store,
            config,
        }
    }

    /// Write a record directly to the store
    pub async fn seed(&self, key: &str, record: &LicenseRecord) {
        let encoded = codec::encode(record).expect("Failed to encode record");
        self.store
            .put(key, &encoded)
            .await
            .expect("Failed to seed record");
    }

    /// Read a record directly from the store
    pub async fn stored(&self, key: &str) -> Option<LicenseRecord> {
        let raw = self.store.get(key).await.expect("Failed to read store");
        codec::decode(raw.as_deref()).expect("Failed to decode record")
    }

    /// POST a JSON body
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        let body = serde_json::to_string(&body).expect("Failed to serialize body");
        self.request("POST", path, Some(&body), &[("Content-Type", "application/json")])
            .await
    }

    /// POST `{key, machine_id}`
    pub async fn call(&self, path: &str, key: &str, machine_id: &str) -> TestResponse {
        self.post(
            path,
            serde_json::json!({ "key": key, "machine_id": machine_id }),
        )
        .await
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<&str>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut req = Request::builder().method(method).uri(path);
        for (name, value) in headers {
            req = req.header(*name, *value);
        }

        let req = req
            .body(Body::from(body.unwrap_or_default().to_string()))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// A header value as a string
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// A fresh pro license with the given machines
pub fn pro_license(machines: &[&str]) -> LicenseRecord {
    let mut record = LicenseRecord::provision(LicenseTier::Pro, None, "owner@example.com", Utc::now())
        .expect("Failed to build record");
    record.machines = machines.iter().map(|m| m.to_string()).collect();
    record
}

/// A pro license that expires at `expires`
pub fn pro_license_expiring(expires: DateTime<Utc>) -> LicenseRecord {
    LicenseRecord::provision(
        LicenseTier::Pro,
        Some(expires),
        "owner@example.com",
        Utc::now(),
    )
    .expect("Failed to build record")
}

/// A lifetime license
pub fn lifetime_license() -> LicenseRecord {
    LicenseRecord::provision(LicenseTier::Lifetime, None, "owner@example.com", Utc::now())
        .expect("Failed to build record")
}

/// Store that is unreachable
#[derive(Debug)]
pub struct UnreachableStore;

#[async_trait]
impl LicenseStore for UnreachableStore {
    async fn get(&self, _: &str) -> AppResult<Option<String>> {
        Err(AppError::store("connection refused (redis://10.0.0.7:6379)"))
    }

    async fn put(&self, _: &str, _: &str) -> AppResult<()> {
        Err(AppError::store("connection refused"))
    }

    async fn put_if_absent(&self, _: &str, _: &str) -> AppResult<bool> {
        Err(AppError::store("connection refused"))
    }

    async fn compare_and_swap(&self, _: &str, _: &str, _: &str) -> AppResult<bool> {
        Err(AppError::store("connection refused"))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(false)
    }
}

/// Store whose conditional writes always lose to another writer
#[derive(Debug, Default)]
pub struct ContendedStore {
    inner: MemoryLicenseStore,
}

#[async_trait]
impl LicenseStore for ContendedStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: &str) -> AppResult<()> {
        self.inner.put(key, value).await
    }

    async fn put_if_absent(&self, key: &str, value: &str) -> AppResult<bool> {
        self.inner.put_if_absent(key, value).await
    }

    async fn compare_and_swap(&self, _: &str, _: &str, _: &str) -> AppResult<bool> {
        Ok(false)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
