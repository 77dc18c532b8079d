//! API 라우트 통합 테스트
//!
//! 가짜 시세 소스와 가짜 AI 백엔드로 전체 라우터를 oneshot 호출합니다.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chrono::{Duration, TimeZone, Utc};
use rust_decimal_macros::dec;
use secrecy::SecretString;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use tracker_ai::{AiResult, AssistantBridge, ChatCompletion, ChatRequest};
use tracker_api::{create_router, AppState};
use tracker_core::{AppConfig, Bar, CompanyProfile, Period, Ticker};
use tracker_dashboard::DashboardHandler;
use tracker_data::{DataError, LatestCloses, MarketDataGateway, MarketDataSource, Result};

struct FakeSource;

#[async_trait]
impl MarketDataSource for FakeSource {
    fn name(&self) -> &str {
        "fake"
    }

    async fn latest_closes(&self, ticker: &Ticker) -> Result<Option<LatestCloses>> {
        match ticker.as_str() {
            "EMPTY" => Ok(None),
            "FAIL" => Err(DataError::FetchError("upstream timeout".to_string())),
            _ => Ok(Some(LatestCloses {
                current: dec!(153),
                previous: Some(dec!(150)),
                timestamp: Utc::now(),
            })),
        }
    }

    async fn history(&self, ticker: &Ticker, _period: Period) -> Result<Vec<Bar>> {
        match ticker.as_str() {
            "EMPTY" => Ok(Vec::new()),
            "FAIL" => Err(DataError::FetchError("upstream timeout".to_string())),
            _ => {
                let start = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
                Ok([dec!(100), dec!(110)]
                    .iter()
                    .enumerate()
                    .map(|(i, c)| Bar {
                        date: start + Duration::days(i as i64),
                        open: *c,
                        high: *c,
                        low: *c,
                        close: *c,
                        volume: 1_000_000,
                    })
                    .collect())
            }
        }
    }

    async fn profile(&self, ticker: &Ticker) -> Result<Option<CompanyProfile>> {
        match ticker.as_str() {
            "EMPTY" => Ok(None),
            "FAIL" => Err(DataError::FetchError("upstream timeout".to_string())),
            _ => Ok(Some(
                CompanyProfile::new(ticker.clone()).with_company(Some("Apple Inc.".to_string())),
            )),
        }
    }
}

struct FakeBackend;

#[async_trait]
impl ChatCompletion for FakeBackend {
    fn name(&self) -> &str {
        "fake"
    }

    async fn complete(&self, _api_key: &SecretString, _request: &ChatRequest) -> AiResult<String> {
        Ok("Looks steady. Not financial advice.".to_string())
    }
}

fn app() -> Router {
    let config = AppConfig::default();
    let gateway = Arc::new(MarketDataGateway::new(
        Arc::new(FakeSource),
        &config.market_data,
    ));
    let bridge = Arc::new(AssistantBridge::with_backend(
        Arc::new(FakeBackend),
        &config.ai,
    ));
    let state = Arc::new(AppState::new(
        DashboardHandler::new(gateway, bridge),
        &config,
        None,
    ));
    create_router(state, None, std::time::Duration::from_secs(5))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, value)
}

async fn create_session(app: &Router, body: Value) -> (String, Value) {
    let (status, value) = send(app, Method::POST, "/api/v1/sessions", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{value}");
    let id = value["session_id"].as_str().unwrap().to_string();
    (id, value["view"].clone())
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("OK".to_string()));

    let (status, body) = send(&app, Method::GET, "/health/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["components"]["market_data"]["status"], "up");
    assert_eq!(body["components"]["ai"]["status"], "not_configured");
}

#[tokio::test]
async fn test_create_session_with_defaults() {
    let app = app();
    let (_, view) = create_session(&app, json!({})).await;

    assert_eq!(view["header"]["ticker"], "AAPL");
    assert_eq!(view["header"]["period"], "1mo");
    assert_eq!(view["header"]["company"], "Apple Inc.");
    assert_eq!(view["chart"]["status"], "ready");
    assert_eq!(view["details"]["status"], "ready");
    assert_eq!(view["ai"]["status"], "needs_key");
    assert_eq!(view["chat"]["status"], "needs_key");
}

#[tokio::test]
async fn test_create_session_with_overrides() {
    let app = app();
    let (_, view) = create_session(
        &app,
        json!({"ticker": " msft ", "period": "6mo", "api_key": "gsk_test"}),
    )
    .await;

    assert_eq!(view["header"]["ticker"], "MSFT");
    assert_eq!(view["header"]["period"], "6mo");
    assert_eq!(view["ai"]["status"], "ready");
    assert_eq!(view["ai"]["options"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_create_session_rejects_bad_ticker() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/sessions",
        Some(json!({"ticker": "AA PL$"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_TICKER");

    let (_, health) = send(&app, Method::GET, "/health/ready", None).await;
    assert_eq!(health["sessions"], 0);
}

#[tokio::test]
async fn test_unknown_session_is_404() {
    let app = app();
    let uri = "/api/v1/sessions/123e4567-e89b-12d3-a456-426614174000";

    let (status, body) = send(&app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "SESSION_NOT_FOUND");
    assert_eq!(body["method"], "GET");
    assert_eq!(body["path"], uri);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("{uri}/actions"),
        Some(json!({"type": "refresh"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_actions_update_session() {
    let app = app();
    let (id, _) = create_session(&app, json!({})).await;
    let actions = format!("/api/v1/sessions/{id}/actions");

    let (status, view) = send(
        &app,
        Method::POST,
        &actions,
        Some(json!({"type": "set_ticker", "value": "tsla"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["header"]["ticker"], "TSLA");

    let (_, view) = send(
        &app,
        Method::POST,
        &actions,
        Some(json!({"type": "set_period", "value": "1y"})),
    )
    .await;
    assert_eq!(view["header"]["period"], "1y");

    let (_, view) = send(&app, Method::GET, &format!("/api/v1/sessions/{id}"), None).await;
    assert_eq!(view["header"]["ticker"], "TSLA");
    assert_eq!(view["header"]["period"], "1y");

    let (_, view) = send(&app, Method::POST, &actions, Some(json!({"type": "refresh"}))).await;
    assert_eq!(view["banners"][0]["level"], "info");
    assert_eq!(view["banners"][0]["message"], "Data refreshed.");
}

#[tokio::test]
async fn test_no_data_ticker_degrades_panels() {
    let app = app();
    let (_, view) = create_session(&app, json!({"ticker": "EMPTY"})).await;

    assert!(view["metrics"].is_null());
    assert_eq!(view["chart"]["status"], "unavailable");
    assert_eq!(view["chart"]["message"], "Unable to load chart data for EMPTY");
    assert_eq!(view["details"]["status"], "unavailable");
    assert!(view["banners"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_fetch_failure_becomes_banner() {
    let app = app();
    let (_, view) = create_session(&app, json!({"ticker": "FAIL"})).await;

    let banners = view["banners"].as_array().unwrap();
    assert!(!banners.is_empty());
    assert!(banners.iter().all(|b| b["level"] == "error"));
    assert!(banners
        .iter()
        .any(|b| b["message"].as_str().unwrap().starts_with("Error fetching price for FAIL")));
}

#[tokio::test]
async fn test_chat_flow() {
    let app = app();
    let (id, _) = create_session(&app, json!({})).await;
    let actions = format!("/api/v1/sessions/{id}/actions");

    // 키 없이 채팅하면 경고만 표시
    let (_, view) = send(
        &app,
        Method::POST,
        &actions,
        Some(json!({"type": "chat", "value": "Is it a buy?"})),
    )
    .await;
    assert_eq!(view["banners"][0]["level"], "warning");
    assert!(view["chat"]["messages"].as_array().unwrap().is_empty());

    let (_, view) = send(
        &app,
        Method::POST,
        &actions,
        Some(json!({"type": "set_api_key", "value": "gsk_test"})),
    )
    .await;
    assert_eq!(view["banners"][0]["message"], "API Key updated!");

    let (_, view) = send(
        &app,
        Method::POST,
        &actions,
        Some(json!({"type": "chat", "value": "Is it a buy?"})),
    )
    .await;
    let messages = view["chat"]["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(messages[1]["role"], "assistant");
    assert_eq!(messages[1]["content"], "Looks steady. Not financial advice.");

    let (_, view) = send(&app, Method::POST, &actions, Some(json!({"type": "clear_chat"}))).await;
    assert!(view["chat"]["messages"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_analyze_action() {
    let app = app();
    let (id, _) = create_session(&app, json!({"api_key": "gsk_test"})).await;

    let (status, view) = send(
        &app,
        Method::POST,
        &format!("/api/v1/sessions/{id}/actions"),
        Some(json!({"type": "analyze", "value": "investment_insights"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["ai"]["result"]["kind"], "investment_insights");
    assert_eq!(view["ai"]["result"]["text"], "Looks steady. Not financial advice.");
}

#[tokio::test]
async fn test_delete_session() {
    let app = app();
    let (id, _) = create_session(&app, json!({})).await;
    let uri = format!("/api/v1/sessions/{id}");

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_market_quote() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/v1/market/aapl/quote", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ticker"], "AAPL");

    let (status, body) = send(&app, Method::GET, "/api/v1/market/EMPTY/quote", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "DATA_NOT_AVAILABLE");

    let (status, body) = send(&app, Method::GET, "/api/v1/market/FAIL/quote", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "UPSTREAM_ERROR");
}

#[tokio::test]
async fn test_market_history_and_chart() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/market/AAPL/history?period=3mo",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["series"]["period"], "3mo");
    assert_eq!(body["summary"], "3mo change: 10.00%");

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/market/AAPL/history?period=2w",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_PERIOD");

    let (status, body) = send(&app, Method::GET, "/api/v1/market/AAPL/chart", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["spec"]["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["spec"]["data"][0]["type"], "candlestick");

    let (status, _) = send(&app, Method::GET, "/api/v1/market/EMPTY/chart", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_market_profile() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/v1/market/AAPL/profile", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["company"], "Apple Inc.");

    let (status, _) = send(&app, Method::GET, "/api/v1/market/EMPTY/profile", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
