#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use screener_market_data::{MarketDataError, MarketDataProvider, Snapshot};
use screener_server::{api::app_router, build_state_with_provider, config::Config};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

/// Answers from a fixed table; unknown symbols fail like Yahoo's 404.
pub struct StubProvider {
    snapshots: HashMap<String, Snapshot>,
}

impl StubProvider {
    pub fn new() -> Self {
        Self {
            snapshots: HashMap::new(),
        }
    }

    pub fn with(
        mut self,
        symbol: &str,
        previous_close: f64,
        fifty_day_average: f64,
        two_hundred_day_average: f64,
        forward_pe: f64,
        dividend_yield: Option<f64>,
    ) -> Self {
        let mut snapshot = Snapshot::empty(symbol, "STUB");
        snapshot.previous_close = Some(previous_close);
        snapshot.fifty_day_average = Some(fifty_day_average);
        snapshot.two_hundred_day_average = Some(two_hundred_day_average);
        snapshot.forward_pe = Some(forward_pe);
        snapshot.forward_eps = Some(previous_close / forward_pe);
        snapshot.dividend_yield = dividend_yield;
        self.snapshots.insert(symbol.to_string(), snapshot);
        self
    }
}

#[async_trait]
impl MarketDataProvider for StubProvider {
    fn id(&self) -> &'static str {
        "STUB"
    }

    async fn fetch_snapshot(&self, symbol: &str) -> Result<Snapshot, MarketDataError> {
        self.snapshots
            .get(symbol)
            .cloned()
            .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))
    }
}

/// Never answers, like an upstream that accepts the connection and stalls.
pub struct StalledProvider;

#[async_trait]
impl MarketDataProvider for StalledProvider {
    fn id(&self) -> &'static str {
        "STALLED"
    }

    async fn fetch_snapshot(&self, _symbol: &str) -> Result<Snapshot, MarketDataError> {
        std::future::pending().await
    }
}

pub struct TestApp {
    pub router: Router,
    // Keeps the database file alive for the lifetime of the test.
    _tmp: TempDir,
}

impl TestApp {
    pub async fn new(provider: impl MarketDataProvider + 'static) -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config {
            db_path: tmp.path().join("test.db").to_string_lossy().to_string(),
            ..Config::default()
        };
        let state = build_state_with_provider(&config, Arc::new(provider))
            .await
            .unwrap();

        Self {
            router: app_router(state, &config),
            _tmp: tmp,
        }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post_json(&self, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()))
        };
        (status, body)
    }

    pub async fn add_stock(&self, symbol: &str) {
        let (status, body) = self
            .post_json("/stock", &serde_json::json!({ "symbol": symbol }).to_string())
            .await;
        assert_eq!(status, StatusCode::OK, "unexpected body: {}", body);
    }

    /// Polls until enrichment has written `field` on stock `id`.
    pub async fn wait_for_field(&self, id: i32, field: &str) -> Value {
        for _ in 0..250 {
            let (status, body) = self.get(&format!("/api/v1/stocks/{}", id)).await;
            if status == StatusCode::OK && !body[field].is_null() {
                return body;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("stock {} was never enriched with {}", id, field);
    }
}

pub fn symbols(body: &Value) -> Vec<String> {
    body["stocks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["symbol"].as_str().unwrap().to_string())
        .collect()
}
