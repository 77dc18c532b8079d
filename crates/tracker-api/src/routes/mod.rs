//! API 라우트.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/api/v1/sessions` - 대시보드 세션 (생성, 조회, 동작, 삭제)
//! - `/api/v1/market` - 세션 없는 시세/시계열/프로필/차트 조회

pub mod health;
pub mod market;
pub mod sessions;

pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use market::{market_router, ChartResponse, HistoryResponse, PeriodQuery};
pub use sessions::{sessions_router, CreateSessionRequest, CreateSessionResponse};

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// 전체 API 라우터 생성.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/health", health_router())
        .nest("/api/v1/sessions", sessions_router())
        .nest("/api/v1/market", market_router())
}
