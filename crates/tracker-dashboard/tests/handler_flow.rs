//! 요청 처리기 통합 테스트
//!
//! 가짜 시세 제공자와 가짜 AI 백엔드로 동작별 렌더 모델을 검증합니다.

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use rust_decimal_macros::dec;
use secrecy::SecretString;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracker_ai::{AiResult, AnalysisKind, AssistantBridge, ChatCompletion, ChatRequest};
use tracker_core::{
    AiConfig, Bar, ChatRole, CompanyProfile, MarketDataConfig, Period, SessionConfig,
    SessionContext, Ticker,
};
use tracker_dashboard::{
    AiStatus, BannerLevel, ChartPanel, DashboardHandler, DetailsPanel, UserAction,
};
use tracker_data::{DataError, LatestCloses, MarketDataGateway, MarketDataSource, Result};

#[derive(Default)]
struct FakeSource {
    history_calls: AtomicUsize,
    fail_quotes: AtomicBool,
}

#[async_trait]
impl MarketDataSource for FakeSource {
    fn name(&self) -> &str {
        "fake"
    }

    async fn latest_closes(&self, ticker: &Ticker) -> Result<Option<LatestCloses>> {
        if self.fail_quotes.load(Ordering::SeqCst) {
            return Err(DataError::FetchError("timeout".to_string()));
        }
        if ticker.as_str() == "EMPTY" {
            return Ok(None);
        }
        Ok(Some(LatestCloses {
            current: dec!(153),
            previous: Some(dec!(150)),
            timestamp: Utc::now(),
        }))
    }

    async fn history(&self, ticker: &Ticker, _period: Period) -> Result<Vec<Bar>> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        if ticker.as_str() == "EMPTY" {
            return Ok(Vec::new());
        }
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        Ok([dec!(100), dec!(104)]
            .iter()
            .enumerate()
            .map(|(i, c)| Bar {
                date: start + Duration::days(i as i64),
                open: *c,
                high: *c,
                low: *c,
                close: *c,
                volume: 2_000_000,
            })
            .collect())
    }

    async fn profile(&self, ticker: &Ticker) -> Result<Option<CompanyProfile>> {
        if ticker.as_str() == "EMPTY" {
            return Ok(None);
        }
        let mut profile =
            CompanyProfile::new(ticker.clone()).with_company(Some("Apple Inc.".to_string()));
        profile.sector = Some("Technology".to_string());
        profile.volume = Some(48_000_000);
        Ok(Some(profile))
    }
}

#[derive(Default)]
struct FakeBackend {
    calls: AtomicUsize,
    last_user_message: Mutex<String>,
}

#[async_trait]
impl ChatCompletion for FakeBackend {
    fn name(&self) -> &str {
        "fake"
    }

    async fn complete(&self, _api_key: &SecretString, request: &ChatRequest) -> AiResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_user_message.lock().unwrap() = request.messages[1].content.clone();
        Ok("Balanced view. Not financial advice.".to_string())
    }
}

struct Fixture {
    source: Arc<FakeSource>,
    backend: Arc<FakeBackend>,
    handler: DashboardHandler,
}

fn fixture() -> Fixture {
    let source = Arc::new(FakeSource::default());
    let backend = Arc::new(FakeBackend::default());
    let gateway = Arc::new(MarketDataGateway::new(
        source.clone(),
        &MarketDataConfig::default(),
    ));
    let bridge = Arc::new(AssistantBridge::with_backend(
        backend.clone(),
        &AiConfig::default(),
    ));

    Fixture {
        source,
        backend,
        handler: DashboardHandler::new(gateway, bridge),
    }
}

fn session(key: Option<&str>) -> SessionContext {
    SessionContext::new(
        &SessionConfig::default(),
        key.map(|k| SecretString::from(k.to_string())),
    )
}

#[tokio::test]
async fn test_view_renders_all_panels() {
    let f = fixture();
    let mut s = session(None);

    let model = f.handler.handle(&mut s, UserAction::View).await;

    assert_eq!(model.header.ticker.as_str(), "AAPL");
    assert_eq!(model.header.company, "Apple Inc.");
    let metrics = model.metrics.expect("metrics panel");
    assert_eq!(metrics.delta_display(), "3.00 (2.00%)");
    assert_eq!(metrics.volume, "48.00M");

    match model.chart {
        ChartPanel::Ready { spec, stats } => {
            assert_eq!(spec.layout.title.text, "AAPL Stock Price History (1mo)");
            assert_eq!(stats.unwrap().change_pct_display(), "+4.00%");
        }
        other => panic!("unexpected chart panel {:?}", other),
    }
    assert!(matches!(model.details, DetailsPanel::Ready { .. }));
    assert_eq!(model.ai.status, AiStatus::NeedsKey);
    assert!(model.banners.is_empty());
}

#[tokio::test]
async fn test_set_ticker_normalizes_and_falls_back() {
    let f = fixture();
    let mut s = session(None);

    let model = f
        .handler
        .handle(&mut s, UserAction::SetTicker(" msft ".to_string()))
        .await;
    assert_eq!(model.header.ticker.as_str(), "MSFT");

    let model = f
        .handler
        .handle(&mut s, UserAction::SetTicker(String::new()))
        .await;
    assert_eq!(model.header.ticker.as_str(), "AAPL");

    let model = f
        .handler
        .handle(&mut s, UserAction::SetTicker("BAD TICKER".to_string()))
        .await;
    assert_eq!(model.header.ticker.as_str(), "AAPL");
    assert!(model.has_banner(BannerLevel::Error));
}

#[tokio::test]
async fn test_no_data_ticker() {
    let f = fixture();
    let mut s = session(None);

    let model = f
        .handler
        .handle(&mut s, UserAction::SetTicker("EMPTY".to_string()))
        .await;

    assert!(model.metrics.is_none());
    match model.chart {
        ChartPanel::Unavailable { message } => {
            assert_eq!(message, "Unable to load chart data for EMPTY")
        }
        other => panic!("unexpected chart panel {:?}", other),
    }
    assert!(matches!(model.details, DetailsPanel::Unavailable { .. }));
    assert_eq!(model.header.company, "EMPTY");
}

#[tokio::test]
async fn test_fetch_error_becomes_banner() {
    let f = fixture();
    f.source.fail_quotes.store(true, Ordering::SeqCst);
    let mut s = session(None);

    let model = f.handler.handle(&mut s, UserAction::View).await;

    assert!(model.metrics.is_none());
    assert!(model
        .banners
        .iter()
        .any(|b| b.level == BannerLevel::Error
            && b.message.starts_with("Error fetching price for AAPL:")));
    assert!(matches!(model.chart, ChartPanel::Ready { .. }));
}

#[tokio::test]
async fn test_api_key_update_banner() {
    let f = fixture();
    let mut s = session(None);

    let model = f
        .handler
        .handle(&mut s, UserAction::SetApiKey("gsk_new".to_string()))
        .await;
    assert!(model
        .banners
        .iter()
        .any(|b| b.level == BannerLevel::Success && b.message == "API Key updated!"));
    assert_eq!(model.ai.status, AiStatus::Ready);

    let model = f
        .handler
        .handle(&mut s, UserAction::SetApiKey("gsk_new".to_string()))
        .await;
    assert!(model.banners.is_empty());
}

#[tokio::test]
async fn test_analyze_without_key_skips_backend() {
    let f = fixture();
    let mut s = session(None);

    let model = f
        .handler
        .handle(&mut s, UserAction::Analyze(AnalysisKind::CurrentPerformance))
        .await;

    let result = model.ai.result.expect("analysis result");
    assert_eq!(result.text, tracker_ai::MISSING_API_KEY_MESSAGE);
    assert_eq!(f.backend.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_analyze_without_key_fetches_no_analysis_history() {
    let f = fixture();
    let mut s = session(None);

    // 6mo 분석 기간은 세션 기간(1mo)과 달라 별도 조회가 필요함
    let model = f
        .handler
        .handle(&mut s, UserAction::Analyze(AnalysisKind::TechnicalAnalysis))
        .await;

    let result = model.ai.result.expect("analysis result");
    assert_eq!(result.text, tracker_ai::MISSING_API_KEY_MESSAGE);
    assert_eq!(f.source.history_calls.load(Ordering::SeqCst), 1);
    assert_eq!(f.backend.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_analyze_uses_kind_period() {
    let f = fixture();
    let mut s = session(Some("gsk_test"));

    let model = f
        .handler
        .handle(&mut s, UserAction::Analyze(AnalysisKind::TechnicalAnalysis))
        .await;

    let result = model.ai.result.expect("analysis result");
    assert_eq!(result.kind, AnalysisKind::TechnicalAnalysis);
    assert_eq!(result.text, "Balanced view. Not financial advice.");

    let message = f.backend.last_user_message.lock().unwrap().clone();
    assert!(message.contains("Historical Performance:\n6mo change: 4.00%"));
    assert!(message.contains("User Query: Provide technical analysis"));
    // 1mo 차트 + 6mo 분석
    assert_eq!(f.source.history_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_chat_appends_and_clears() {
    let f = fixture();
    let mut s = session(Some("gsk_test"));

    let model = f
        .handler
        .handle(&mut s, UserAction::Chat("Is it a buy? 🚀".to_string()))
        .await;

    assert_eq!(model.chat.messages.len(), 2);
    assert_eq!(model.chat.messages[0].role, ChatRole::User);
    assert_eq!(model.chat.messages[0].content, "Is it a buy? 🚀");
    assert_eq!(model.chat.messages[1].role, ChatRole::Assistant);
    assert!(f
        .backend
        .last_user_message
        .lock()
        .unwrap()
        .contains("User Query: Is it a buy? \n"));

    let model = f.handler.handle(&mut s, UserAction::ClearChat).await;
    assert!(model.chat.messages.is_empty());
    assert!(s.transcript().is_empty());
}

#[tokio::test]
async fn test_chat_without_key_warns() {
    let f = fixture();
    let mut s = session(None);

    let model = f
        .handler
        .handle(&mut s, UserAction::Chat("hello".to_string()))
        .await;

    assert!(model.chat.messages.is_empty());
    assert!(model.has_banner(BannerLevel::Warning));
    assert_eq!(f.backend.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_refresh_clears_cache() {
    let f = fixture();
    let mut s = session(None);

    f.handler.handle(&mut s, UserAction::View).await;
    f.handler.handle(&mut s, UserAction::View).await;
    assert_eq!(f.source.history_calls.load(Ordering::SeqCst), 1);

    let model = f.handler.handle(&mut s, UserAction::Refresh).await;
    assert_eq!(f.source.history_calls.load(Ordering::SeqCst), 2);
    assert!(model.has_banner(BannerLevel::Info));
}

#[tokio::test]
async fn test_missing_client_status() {
    let source = Arc::new(FakeSource::default());
    let gateway = Arc::new(MarketDataGateway::new(source, &MarketDataConfig::default()));
    let bridge = Arc::new(AssistantBridge::unavailable(&AiConfig::default()));
    let handler = DashboardHandler::new(gateway, bridge);
    let mut s = session(Some("gsk_test"));

    let model = handler
        .handle(&mut s, UserAction::Analyze(AnalysisKind::InvestmentInsights))
        .await;

    assert_eq!(model.ai.status, AiStatus::ClientMissing);
    assert_eq!(
        model.ai.result.unwrap().text,
        tracker_ai::MISSING_CLIENT_MESSAGE
    );
}
