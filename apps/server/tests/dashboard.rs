mod common;

use axum::http::StatusCode;
use common::{symbols, StubProvider, TestApp};
use serde_json::json;

/// AAPL: above both averages, P/E 28, yield 0.5%.
/// KO: below its 50-day average, P/E 19, yield 3%.
/// ZZZZ: unknown to the provider, stays bare.
async fn seeded_app() -> TestApp {
    let provider = StubProvider::new()
        .with("AAPL", 190.0, 180.0, 170.0, 28.0, Some(0.005))
        .with("KO", 60.0, 62.0, 58.0, 19.0, Some(0.03));
    let app = TestApp::new(provider).await;

    app.add_stock("AAPL").await;
    app.add_stock("KO").await;
    app.add_stock("ZZZZ").await;
    app.wait_for_field(1, "forwardPe").await;
    app.wait_for_field(2, "forwardPe").await;
    app
}

#[tokio::test]
async fn no_filters_lists_everything_in_insertion_order() {
    let app = seeded_app().await;

    let (status, body) = app.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(symbols(&body), vec!["AAPL", "KO", "ZZZZ"]);
}

#[tokio::test]
async fn forward_pe_keeps_strictly_lower() {
    let app = seeded_app().await;

    let (_, body) = app.get("/?forward_pe=20").await;
    assert_eq!(symbols(&body), vec!["KO"]);

    // Strict: equal to the threshold does not pass.
    let (_, body) = app.get("/?forward_pe=28").await;
    assert_eq!(symbols(&body), vec!["KO"]);
}

#[tokio::test]
async fn dividend_yield_is_compared_in_percent() {
    let app = seeded_app().await;

    let (_, body) = app.get("/?dividend_yield=1").await;
    assert_eq!(symbols(&body), vec!["KO"]);

    let (_, body) = app.get("/?dividend_yield=0.1").await;
    assert_eq!(symbols(&body), vec!["AAPL", "KO"]);
}

#[tokio::test]
async fn moving_average_flags() {
    let app = seeded_app().await;

    let (_, body) = app.get("/?ma50=on").await;
    assert_eq!(symbols(&body), vec!["AAPL"]);

    let (_, body) = app.get("/?ma200=on").await;
    assert_eq!(symbols(&body), vec!["AAPL", "KO"]);

    let (_, body) = app.get("/?ma50=on&ma200=on&forward_pe=30").await;
    assert_eq!(symbols(&body), vec!["AAPL"]);
}

#[tokio::test]
async fn empty_parameters_are_inactive_and_echoed() {
    let app = seeded_app().await;

    let (status, body) = app.get("/?price=100&forward_pe=&ma50=").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(symbols(&body), vec!["AAPL", "KO", "ZZZZ"]);
    assert_eq!(body["filters"]["price"], "100");
    assert_eq!(body["filters"]["forward_pe"], "");
    assert_eq!(body["filters"]["ma200"], json!(null));
}

#[tokio::test]
async fn non_numeric_threshold_is_bad_request() {
    let app = seeded_app().await;

    let (status, body) = app.get("/?forward_pe=cheap").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
}

#[tokio::test]
async fn threshold_finer_than_stored_precision_is_bad_request() {
    let app = seeded_app().await;

    let (status, body) = app.get("/?dividend_yield=0.49999999999999999999").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
}
