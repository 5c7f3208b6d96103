use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::str::FromStr;
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;
use tradebook_server::{api::app_router, build_state, config::Config};

async fn build_test_router() -> (Router, TempDir) {
    let tmp = tempdir().unwrap();
    let config = Config {
        db_path: tmp.path().join("test.db").to_string_lossy().to_string(),
        ..Config::default()
    };
    let state = build_state(&config).await.unwrap();
    (app_router(state, &config), tmp)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn decimal(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().unwrap()).unwrap()
}

fn trade(ticker: &str, side: &str, price: &str, shares: i64) -> Value {
    json!({
        "ticker": ticker,
        "side": side,
        "price": price,
        "shares": shares,
        "timestamp": "2024-01-02T15:30:00Z"
    })
}

#[tokio::test]
async fn healthz_responds() {
    let (app, _tmp) = build_test_router().await;
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn empty_ledger_reports_not_found() {
    let (app, _tmp) = build_test_router().await;
    for uri in [
        "/api/v1/trades",
        "/api/v1/holdings",
        "/api/v1/portfolio",
        "/api/v1/returns",
        "/api/v1/trades/unknown",
        "/api/v1/holdings/AAPL",
    ] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(body["code"], 404);
    }
}

#[tokio::test]
async fn trade_lifecycle_keeps_holdings_in_step() {
    let (app, _tmp) = build_test_router().await;

    let (status, first) = send(
        &app,
        Method::POST,
        "/api/v1/trades",
        Some(trade("AAPL", "BUY", "10", 10)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(first["id"].is_string());
    assert_eq!(first["side"], "BUY");

    let (status, second) = send(
        &app,
        Method::POST,
        "/api/v1/trades",
        Some(trade("AAPL", "BUY", "20", 5)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, holding) = send(&app, Method::GET, "/api/v1/holdings/AAPL", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(holding["shares"], 15);
    assert_eq!(decimal(&holding["totalCost"]), Decimal::from(200));

    // Sell at a price well above cost; the cost basis moves at average cost.
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/trades",
        Some(trade("AAPL", "SELL", "50", 3)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, holding) = send(&app, Method::GET, "/api/v1/holdings/AAPL", None).await;
    assert_eq!(holding["shares"], 12);
    assert_eq!(decimal(&holding["totalCost"]), Decimal::from(160));

    // Move the second buy to another ticker.
    let second_id = second["id"].as_str().unwrap().to_string();
    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/trades/{}", second_id),
        Some(trade("MSFT", "BUY", "20", 3)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], second_id.as_str());
    assert_eq!(updated["ticker"], "MSFT");

    let (_, msft) = send(&app, Method::GET, "/api/v1/holdings/MSFT", None).await;
    assert_eq!(msft["shares"], 3);
    assert_eq!(decimal(&msft["totalCost"]), Decimal::from(60));

    let (status, trades) = send(&app, Method::GET, "/api/v1/trades", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(trades.as_array().unwrap().len(), 3);

    let (status, deleted) = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/trades/{}", second_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["ticker"], "MSFT");
    let (status, _) = send(&app, Method::GET, "/api/v1/holdings/MSFT", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, portfolio) = send(&app, Method::GET, "/api/v1/portfolio", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(portfolio[0]["ticker"], "AAPL");
    assert_eq!(portfolio[0]["trades"].as_array().unwrap().len(), 2);

    let (status, refreshed) = send(&app, Method::POST, "/api/v1/holdings/refresh", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(refreshed.as_array().unwrap().len(), 1);
    assert_eq!(refreshed[0]["shares"], 7);
}

#[tokio::test]
async fn rejected_trades_map_to_client_errors() {
    let (app, _tmp) = build_test_router().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/trades",
        Some(trade("AAPL", "BUY", "10", 0)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Shares cannot be zero"));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/trades",
        Some(trade("AAPL", "SELL", "10", 1)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("No shares available to sell"));

    send(
        &app,
        Method::POST,
        "/api/v1/trades",
        Some(trade("AAPL", "BUY", "10", 3)),
    )
    .await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/trades",
        Some(trade("AAPL", "SELL", "10", 5)),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 422);

    let (status, _) = send(&app, Method::DELETE, "/api/v1/trades/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn returns_use_configured_mark_price() {
    let tmp = tempdir().unwrap();
    let config = Config {
        db_path: tmp.path().join("returns.db").to_string_lossy().to_string(),
        mark_price: Decimal::from(12),
        ..Config::default()
    };
    let app = app_router(build_state(&config).await.unwrap(), &config);

    send(
        &app,
        Method::POST,
        "/api/v1/trades",
        Some(trade("AAPL", "BUY", "10", 4)),
    )
    .await;
    let (status, body) = send(&app, Method::GET, "/api/v1/returns", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal(&body["totalReturn"]), Decimal::from(8));
}
