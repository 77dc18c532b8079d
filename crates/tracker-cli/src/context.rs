//! CLI 실행 컨텍스트.

use anyhow::{Context, Result};
use secrecy::SecretString;
use std::sync::Arc;
use tracing::debug;
use tracker_ai::AssistantBridge;
use tracker_core::{AppConfig, Period, SessionContext};
use tracker_dashboard::DashboardHandler;
use tracker_data::{MarketDataGateway, YahooFinanceSource};

/// 명령줄에서 받은 세션 옵션.
#[derive(Default)]
pub struct SessionOptions {
    pub ticker: Option<String>,
    pub period: Option<Period>,
    pub api_key: Option<String>,
}

/// 처리기 + 세션 + 설정.
pub struct CliContext {
    pub handler: DashboardHandler,
    pub session: SessionContext,
    pub config: AppConfig,
}

impl CliContext {
    /// Yahoo Finance 소스와 설정의 AI 클라이언트로 컨텍스트를 만듭니다.
    pub fn from_config(config: AppConfig, options: SessionOptions) -> Result<Self> {
        let source = YahooFinanceSource::new().context("Yahoo Finance 커넥터 생성 실패")?;
        let gateway = Arc::new(MarketDataGateway::new(Arc::new(source), &config.market_data));
        let bridge = Arc::new(AssistantBridge::from_config(&config.ai));
        Self::new(DashboardHandler::new(gateway, bridge), config, options)
    }

    /// 주어진 처리기로 컨텍스트를 만듭니다.
    ///
    /// `--api-key`가 없으면 설정의 환경 변수에서 키를 읽습니다.
    pub fn new(handler: DashboardHandler, config: AppConfig, options: SessionOptions) -> Result<Self> {
        let api_key = options
            .api_key
            .filter(|key| !key.trim().is_empty())
            .map(|key| SecretString::from(key.trim().to_string()))
            .or_else(|| config.ai.default_api_key());

        let mut session = SessionContext::new(&config.session, api_key);
        if let Some(ticker) = options.ticker.as_deref() {
            session.set_ticker_input(ticker)?;
        }
        if let Some(period) = options.period {
            session.set_period(period);
        }

        debug!(
            ticker = %session.ticker(),
            period = %session.period(),
            has_api_key = session.has_api_key(),
            "CLI session ready"
        );

        Ok(Self {
            handler,
            session,
            config,
        })
    }
}
