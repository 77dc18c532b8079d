//! 대시보드 요청 처리기.
//!
//! 한 번의 사용자 동작을 순차적으로 처리합니다:
//! 세션 갱신 → 게이트웨이 조회(캐시) → 차트 렌더링 → (선택) AI 호출 → 렌더 모델.
//!
//! 조회 실패는 에러 배너로 바뀌고 해당 데이터는 없는 것으로 처리됩니다.
//! 어떤 실패도 세션을 끝내지 않습니다.

use chrono::Utc;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use tracker_ai::{AnalysisKind, AssistantBridge};
use tracker_core::{
    CompanyProfile, HistoricalSeries, Period, Quote, SessionContext, StockMetrics, Ticker,
    HISTORY_NOT_AVAILABLE,
};
use tracker_data::MarketDataGateway;

use crate::chart::{render_price_chart, ChartStats};
use crate::render::{
    AiPanel, AiStatus, AnalysisResult, Banner, ChartPanel, ChatPanel, DetailsPanel, Footer,
    Header, MetricsPanel, RenderModel,
};

/// 채팅 질문에 붙이는 과거 요약 기간.
const CHAT_HISTORY_PERIOD: Period = Period::OneMonth;

/// 사용자 동작.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum UserAction {
    /// 현재 상태 그대로 다시 그리기
    View,
    /// 티커 입력 (빈 값은 기본 티커)
    SetTicker(String),
    /// API 키 입력 (빈 값은 키 제거)
    SetApiKey(String),
    /// 조회 기간 선택
    SetPeriod(Period),
    /// 캐시 비우고 다시 조회
    Refresh,
    /// 미리 정의된 분석 요청
    Analyze(AnalysisKind),
    /// 자유 질문
    Chat(String),
    /// 채팅 기록 삭제
    ClearChat,
}

impl UserAction {
    /// 로그용 동작 이름.
    pub fn name(&self) -> &'static str {
        match self {
            UserAction::View => "view",
            UserAction::SetTicker(_) => "set_ticker",
            UserAction::SetApiKey(_) => "set_api_key",
            UserAction::SetPeriod(_) => "set_period",
            UserAction::Refresh => "refresh",
            UserAction::Analyze(_) => "analyze",
            UserAction::Chat(_) => "chat",
            UserAction::ClearChat => "clear_chat",
        }
    }
}

impl fmt::Debug for UserAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserAction::SetApiKey(_) => f.write_str("SetApiKey([REDACTED])"),
            UserAction::SetTicker(t) => f.debug_tuple("SetTicker").field(t).finish(),
            UserAction::SetPeriod(p) => f.debug_tuple("SetPeriod").field(p).finish(),
            UserAction::Analyze(k) => f.debug_tuple("Analyze").field(k).finish(),
            UserAction::Chat(t) => f.debug_tuple("Chat").field(t).finish(),
            other => f.write_str(other.name()),
        }
    }
}

/// 동작을 처리하고 렌더 모델을 만드는 처리기.
pub struct DashboardHandler {
    gateway: Arc<MarketDataGateway>,
    bridge: Arc<AssistantBridge>,
}

impl DashboardHandler {
    pub fn new(gateway: Arc<MarketDataGateway>, bridge: Arc<AssistantBridge>) -> Self {
        Self { gateway, bridge }
    }

    pub fn gateway(&self) -> &Arc<MarketDataGateway> {
        &self.gateway
    }

    pub fn bridge(&self) -> &Arc<AssistantBridge> {
        &self.bridge
    }

    /// 세션의 AI 사용 가능 상태. 클라이언트 포함 여부를 먼저 확인합니다.
    pub fn ai_status(&self, session: &SessionContext) -> AiStatus {
        if !self.bridge.is_available() {
            AiStatus::ClientMissing
        } else if !session.has_api_key() {
            AiStatus::NeedsKey
        } else {
            AiStatus::Ready
        }
    }

    /// 사용자 동작 하나를 처리합니다.
    #[instrument(skip_all, fields(action = action.name()))]
    pub async fn handle(&self, session: &mut SessionContext, action: UserAction) -> RenderModel {
        let mut banners = Vec::new();
        let mut analysis_request = None;
        let mut chat_request = None;

        match action {
            UserAction::View => {}
            UserAction::SetTicker(input) => match session.set_ticker_input(&input) {
                Ok(true) => info!(ticker = %session.ticker(), "ticker changed"),
                Ok(false) => {}
                Err(e) => banners.push(Banner::error(e.to_string())),
            },
            UserAction::SetApiKey(input) => {
                if session.set_api_key_input(&input) {
                    banners.push(Banner::success("API Key updated!"));
                }
            }
            UserAction::SetPeriod(period) => {
                session.set_period(period);
            }
            UserAction::Refresh => {
                self.gateway.clear().await;
                banners.push(Banner::info("Data refreshed."));
            }
            UserAction::Analyze(kind) => analysis_request = Some(kind),
            UserAction::Chat(text) => chat_request = Some(text),
            UserAction::ClearChat => session.clear_chat(),
        }

        let ticker = session.ticker().clone();
        let period = session.period();

        let profile = self.load_profile(&ticker, &mut banners).await;
        let quote = self.load_quote(&ticker, &mut banners).await;
        let series = self.load_history(&ticker, period, &mut banners).await;

        let chart = build_chart_panel(&ticker, series.as_ref());
        let status = self.ai_status(session);
        let mut ai = AiPanel::new(status, &ticker);

        if let Some(kind) = analysis_request {
            let text = self
                .ask(
                    status,
                    &ticker,
                    kind.query(),
                    kind.history_period(),
                    quote.as_ref(),
                    profile.as_ref(),
                    session.api_key(),
                    &mut banners,
                )
                .await;
            ai.result = Some(AnalysisResult { kind, text });
        }

        if let Some(text) = chat_request {
            let text = text.trim();
            if text.is_empty() {
                debug!("empty chat message ignored");
            } else if status != AiStatus::Ready {
                banners.push(Banner::warning(ai.message.clone()));
            } else {
                session.transcript_mut().push_user(text);
                let reply = self
                    .ask(
                        status,
                        &ticker,
                        text,
                        CHAT_HISTORY_PERIOD,
                        quote.as_ref(),
                        profile.as_ref(),
                        session.api_key(),
                        &mut banners,
                    )
                    .await;
                session.transcript_mut().push_assistant(reply);
            }
        }

        RenderModel {
            header: Header {
                company: profile
                    .as_ref()
                    .map(|p| p.company.clone())
                    .unwrap_or_else(|| ticker.to_string()),
                ticker: ticker.clone(),
                period,
                last_updated: Utc::now(),
            },
            metrics: quote
                .as_ref()
                .map(|q| MetricsPanel::new(q, profile.as_ref())),
            chart,
            details: DetailsPanel::from_profile(&ticker, profile.as_ref()),
            ai,
            chat: ChatPanel {
                status,
                messages: session.transcript().messages().to_vec(),
                placeholder: format!("Ask anything about {} stock...", ticker),
            },
            banners,
            footer: Footer::default(),
        }
    }

    /// 지표 맵을 만들고 브리지에 질문을 전달합니다.
    #[allow(clippy::too_many_arguments)]
    async fn ask(
        &self,
        status: AiStatus,
        ticker: &Ticker,
        query: &str,
        history_period: Period,
        quote: Option<&Quote>,
        profile: Option<&CompanyProfile>,
        api_key: Option<&SecretString>,
        banners: &mut Vec<Banner>,
    ) -> String {
        // 전제 조건 안내만 돌아오므로 분석 기간 데이터는 조회하지 않음
        if status != AiStatus::Ready {
            return self
                .bridge
                .analyze(ticker, query, &StockMetrics::new(), api_key)
                .await;
        }

        let summary = self
            .load_history(ticker, history_period, banners)
            .await
            .map(|s| s.summary_line())
            .unwrap_or_else(|| HISTORY_NOT_AVAILABLE.to_string());

        let metrics = StockMetrics::from_snapshot(quote, profile, summary);
        self.bridge.analyze(ticker, query, &metrics, api_key).await
    }

    async fn load_quote(&self, ticker: &Ticker, banners: &mut Vec<Banner>) -> Option<Quote> {
        match self.gateway.current_quote(ticker).await {
            Ok(quote) => quote,
            Err(e) => {
                warn!(ticker = %ticker, error = %e, "quote fetch failed");
                banners.push(Banner::error(format!(
                    "Error fetching price for {}: {}",
                    ticker, e
                )));
                None
            }
        }
    }

    async fn load_history(
        &self,
        ticker: &Ticker,
        period: Period,
        banners: &mut Vec<Banner>,
    ) -> Option<HistoricalSeries> {
        match self.gateway.historical_series(ticker, period).await {
            Ok(series) => Some(series),
            Err(e) => {
                warn!(ticker = %ticker, period = %period, error = %e, "history fetch failed");
                banners.push(Banner::error(format!(
                    "Error fetching historical data for {}: {}",
                    ticker, e
                )));
                None
            }
        }
    }

    async fn load_profile(
        &self,
        ticker: &Ticker,
        banners: &mut Vec<Banner>,
    ) -> Option<CompanyProfile> {
        match self.gateway.profile(ticker).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!(ticker = %ticker, error = %e, "profile fetch failed");
                banners.push(Banner::error(format!(
                    "Error fetching stock info for {}: {}",
                    ticker, e
                )));
                None
            }
        }
    }
}

/// 시계열이 비어 있으면 렌더러를 호출하지 않습니다.
fn build_chart_panel(ticker: &Ticker, series: Option<&HistoricalSeries>) -> ChartPanel {
    match series.filter(|s| !s.is_empty()) {
        Some(series) => match render_price_chart(series) {
            Ok(spec) => ChartPanel::Ready {
                spec: Box::new(spec),
                stats: ChartStats::from_series(series),
            },
            Err(_) => ChartPanel::unavailable(ticker),
        },
        None => ChartPanel::unavailable(ticker),
    }
}
