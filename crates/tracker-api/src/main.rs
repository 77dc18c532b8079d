//! 주식 대시보드 API 서버.
//!
//! 세션 기반 대시보드 API와 세션 없는 시세 조회 API를 제공합니다.
//!
//! 설정 순서: `config/default.toml`(선택) → `TRACKER__*` 환경 변수.
//! `TRACKER_CONFIG`로 설정 파일 경로를 바꿀 수 있습니다.

use anyhow::{anyhow, Context};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracker_ai::AssistantBridge;
use tracker_api::{create_router, setup_metrics_recorder, AppState};
use tracker_core::{init_logging, AppConfig, LogConfig};
use tracker_dashboard::DashboardHandler;
use tracker_data::{MarketDataGateway, YahooFinanceSource};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    let config_path = std::env::var("TRACKER_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config/default.toml"));
    let config = AppConfig::load_or_default(Some(&config_path))
        .with_context(|| format!("설정 로드 실패: {}", config_path.display()))?;

    init_logging(LogConfig::from(&config.logging)).map_err(|e| anyhow!(e.to_string()))?;

    info!("Starting Stock Tracker API server...");

    // Prometheus 메트릭 레코더 설정 (실패해도 서버는 계속 동작)
    let metrics_handle = match setup_metrics_recorder() {
        Ok(handle) => {
            info!("Prometheus metrics recorder initialized");
            Some(handle)
        }
        Err(e) => {
            warn!(error = %e, "Prometheus 레코더 설치 실패, /metrics 비활성화");
            None
        }
    };

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| {
            error!(
                host = %config.server.host,
                port = config.server.port,
                error = %e,
                "소켓 주소 설정이 유효하지 않습니다. TRACKER__SERVER__HOST, TRACKER__SERVER__PORT를 확인하세요."
            );
            e
        })?;

    let source = YahooFinanceSource::new().context("Yahoo Finance 커넥터 생성 실패")?;
    let gateway = Arc::new(MarketDataGateway::new(Arc::new(source), &config.market_data));
    let bridge = Arc::new(AssistantBridge::from_config(&config.ai));
    let default_api_key = config.ai.default_api_key();

    info!(
        source = gateway.source_name(),
        ai_available = bridge.is_available(),
        model = bridge.model(),
        has_default_api_key = default_api_key.is_some(),
        "Service components initialized"
    );

    let state = Arc::new(AppState::new(
        DashboardHandler::new(gateway, bridge),
        &config,
        default_api_key,
    ));
    info!(version = %state.version, "Application state initialized");

    let app = create_router(
        state,
        metrics_handle,
        Duration::from_secs(config.server.request_timeout_secs),
    );

    info!(%addr, "API server listening");
    info!("Metrics available at http://{}/metrics", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let shutdown_token = CancellationToken::new();

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_token.clone()))
        .await?;

    info!("Server stopped gracefully");
    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 종료 토큰을 취소합니다.
async fn shutdown_signal(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    shutdown_token.cancel();
}
