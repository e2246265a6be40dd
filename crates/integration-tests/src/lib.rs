//! Integration tests for POS Bridge.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pos-bridge-integration-tests
//! ```
//!
//! No vendor credentials are needed: vendor adapters talk to a [`FakeVendor`]
//! bound to a loopback port, and the mock adapter runs in-process.
//!
//! # Test Categories
//!
//! - `mock_contract` - Full contract walk-through against the mock adapter
//! - `factory` - Configuration validation and adapter construction
//! - `square_http` - Square adapter over HTTP
//! - `toast_http` - Toast adapter over HTTP

use std::sync::{Arc, Mutex, PoisonError};

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::{self, Next};
use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use pos_bridge_adapters::{Adapter, AdapterFactory, ConnectionOptions, MockAdapter, MockOptions};
use pos_bridge_core::{Environment, PosProvider};

/// Access token handed to vendor adapters under test.
pub const TEST_TOKEN: &str = "test-access-token";

/// Toast restaurant external id handed to Toast adapters under test.
pub const TEST_RESTAURANT: &str = "rest-0001";

/// A request as seen by the fake vendor.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    /// Request body, when it parsed as JSON.
    pub body: Option<serde_json::Value>,
}

impl RecordedRequest {
    /// Header value as a string, if present and printable.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// JSON body, or `Null` for requests without one.
    #[must_use]
    pub fn json(&self) -> &serde_json::Value {
        self.body.as_ref().unwrap_or(&serde_json::Value::Null)
    }
}

#[derive(Debug, Clone, Default)]
struct RequestLog(Arc<Mutex<Vec<RecordedRequest>>>);

impl RequestLog {
    fn push(&self, request: RecordedRequest) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
    }

    fn snapshot(&self) -> Vec<RecordedRequest> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

async fn record(State(log): State<RequestLog>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.unwrap_or_default();
    log.push(RecordedRequest {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(ToString::to_string),
        headers: parts.headers.clone(),
        body: serde_json::from_slice(&bytes).ok(),
    });
    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

/// An HTTP server standing in for a vendor API.
pub struct FakeVendor {
    pub base_url: String,
    log: RequestLog,
}

impl FakeVendor {
    /// Serve `router` on an ephemeral loopback port.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn(router: Router) -> Self {
        let log = RequestLog::default();
        let app = router.layer(middleware::from_fn_with_state(log.clone(), record));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake vendor");
        let addr = listener.local_addr().expect("fake vendor address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });
        Self {
            base_url: format!("http://{addr}"),
            log,
        }
    }

    /// Every request received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.log.snapshot()
    }

    /// Requests received for `method path`.
    #[must_use]
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    /// Number of requests received for `method path`.
    #[must_use]
    pub fn hits(&self, method: &str, path: &str) -> usize {
        self.requests_to(method, path).len()
    }
}

fn vendor_options(base_url: &str) -> ConnectionOptions {
    ConnectionOptions {
        base_url: Some(base_url.to_string()),
        timeout_ms: Some(5_000),
        retry_attempts: Some(0),
    }
}

/// Square adapter pointed at `base_url`, without retries.
///
/// # Panics
///
/// Panics if the factory rejects the configuration.
#[must_use]
pub fn square_adapter(base_url: &str) -> Adapter {
    AdapterFactory::new()
        .builder()
        .provider(PosProvider::Square)
        .environment(Environment::Sandbox)
        .credentials(TEST_TOKEN, None)
        .connection_options(vendor_options(base_url))
        .create_adapter()
        .expect("square adapter")
}

/// Toast adapter pointed at `base_url`, without retries.
///
/// # Panics
///
/// Panics if the factory rejects the configuration.
#[must_use]
pub fn toast_adapter(base_url: &str) -> Adapter {
    AdapterFactory::new()
        .builder()
        .provider(PosProvider::Toast)
        .environment(Environment::Sandbox)
        .credentials(TEST_TOKEN, Some(TEST_RESTAURANT))
        .connection_options(vendor_options(base_url))
        .create_adapter()
        .expect("toast adapter")
}

/// Fixed end of the mock's generated history.
///
/// # Panics
///
/// Never; the timestamp is a valid constant.
#[must_use]
pub fn mock_anchor() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 1, 18, 0, 0)
        .single()
        .expect("valid anchor")
}

/// Mock adapter with no latency, no injected failures and a fixed anchor.
#[must_use]
pub fn mock_adapter() -> MockAdapter {
    MockAdapter::new(MockOptions::instant(), mock_anchor())
}
