//! 요청 메트릭 미들웨어.
//!
//! 요청 경로를 세션/시세 조회/헬스 엔드포인트로 분류해 라벨로 씁니다.
//! 세션 ID와 티커는 라벨에 들어가지 않습니다.

use axum::{
    extract::Request,
    http::{Method, StatusCode},
    middleware::Next,
    response::Response,
};
use std::time::{Duration, Instant};
use tracing::warn;

use crate::metrics::{
    record_http_duration, record_http_request, record_http_response, record_market_lookup,
};

/// 이 시간을 넘긴 요청은 경고 로그를 남깁니다. 시세 조회는 외부 API를 기다립니다.
const SLOW_REQUEST: Duration = Duration::from_secs(5);

/// 시세 조회 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketLookup {
    Quote,
    History,
    Profile,
    Chart,
}

impl MarketLookup {
    fn parse(segment: &str) -> Option<Self> {
        match segment {
            "quote" => Some(Self::Quote),
            "history" => Some(Self::History),
            "profile" => Some(Self::Profile),
            "chart" => Some(Self::Chart),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quote => "quote",
            Self::History => "history",
            Self::Profile => "profile",
            Self::Chart => "chart",
        }
    }
}

/// 메트릭 라벨용 엔드포인트 분류.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    SessionCreate,
    SessionView,
    SessionAction,
    SessionDelete,
    Market(MarketLookup),
    Health,
    Metrics,
    Other,
}

impl Endpoint {
    /// 메서드와 경로로 엔드포인트를 구분합니다.
    pub fn classify(method: &Method, path: &str) -> Self {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            ["health", ..] => Self::Health,
            ["metrics"] => Self::Metrics,
            ["api", "v1", "sessions"] if *method == Method::POST => Self::SessionCreate,
            ["api", "v1", "sessions", _] if *method == Method::GET => Self::SessionView,
            ["api", "v1", "sessions", _] if *method == Method::DELETE => Self::SessionDelete,
            ["api", "v1", "sessions", _, "actions"] if *method == Method::POST => {
                Self::SessionAction
            }
            ["api", "v1", "market", _, kind] if *method == Method::GET => {
                MarketLookup::parse(kind).map_or(Self::Other, Self::Market)
            }
            _ => Self::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::SessionCreate => "session_create",
            Self::SessionView => "session_view",
            Self::SessionAction => "session_action",
            Self::SessionDelete => "session_delete",
            Self::Market(MarketLookup::Quote) => "market_quote",
            Self::Market(MarketLookup::History) => "market_history",
            Self::Market(MarketLookup::Profile) => "market_profile",
            Self::Market(MarketLookup::Chart) => "market_chart",
            Self::Health => "health",
            Self::Metrics => "metrics",
            Self::Other => "other",
        }
    }
}

/// 응답 상태를 조회 결과 라벨로 바꿉니다.
fn lookup_outcome(status: StatusCode) -> &'static str {
    match status {
        s if s.is_success() => "ok",
        StatusCode::NOT_FOUND => "no_data",
        StatusCode::BAD_REQUEST => "invalid",
        StatusCode::REQUEST_TIMEOUT => "timeout",
        StatusCode::BAD_GATEWAY => "upstream_error",
        _ => "error",
    }
}

/// HTTP 메트릭을 수집하는 미들웨어 레이어.
///
/// - `http_requests_total`, `http_responses_total`, `http_request_duration_seconds`:
///   `method`, `endpoint` 라벨
/// - `market_lookups_total`: 시세 조회 종류별 결과 (`kind`, `outcome`)
pub async fn metrics_layer(request: Request, next: Next) -> Response {
    let start = Instant::now();

    let method = request.method().clone();
    let endpoint = Endpoint::classify(&method, request.uri().path());
    record_http_request(method.as_str(), endpoint.label());

    let response = next.run(request).await;

    let status = response.status();
    let elapsed = start.elapsed();
    record_http_response(method.as_str(), endpoint.label(), status.as_u16());
    record_http_duration(method.as_str(), endpoint.label(), elapsed.as_secs_f64());

    if let Endpoint::Market(kind) = endpoint {
        record_market_lookup(kind.as_str(), lookup_outcome(status));
    }

    if elapsed >= SLOW_REQUEST {
        warn!(
            endpoint = endpoint.label(),
            status = status.as_u16(),
            elapsed_ms = elapsed.as_millis() as u64,
            "slow request"
        );
    }

    response
}
