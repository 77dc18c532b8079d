//! Prometheus 메트릭 설정 및 유틸리티.
//!
//! HTTP 요청 메트릭과 대시보드 메트릭을 수집하고 `/metrics` 엔드포인트로 노출합니다.

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use tracker_data::GatewayCacheStats;

/// Prometheus 메트릭 레코더를 설정하고 핸들을 반환합니다.
///
/// 레코더가 이미 설치되어 있으면 에러를 반환합니다.
pub fn setup_metrics_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new()
        // HTTP 요청 지속 시간 히스토그램 버킷 설정
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0],
        )?
        .install_recorder()
}

// ============================================================================
// HTTP 메트릭 헬퍼 함수
// ============================================================================

/// HTTP 요청 카운터 증가.
pub fn record_http_request(method: &str, endpoint: &'static str) {
    counter!("http_requests_total", "method" => method.to_string(), "endpoint" => endpoint)
        .increment(1);
}

/// HTTP 응답 카운터 증가.
pub fn record_http_response(method: &str, endpoint: &'static str, status: u16) {
    counter!(
        "http_responses_total",
        "method" => method.to_string(),
        "endpoint" => endpoint,
        "status" => status.to_string()
    )
    .increment(1);
}

/// HTTP 요청 지속 시간 기록.
pub fn record_http_duration(method: &str, endpoint: &'static str, duration_secs: f64) {
    histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => endpoint
    )
    .record(duration_secs);
}

// ============================================================================
// 대시보드 메트릭 헬퍼 함수
// ============================================================================

/// 시세 조회 결과 카운터 증가.
pub fn record_market_lookup(kind: &'static str, outcome: &'static str) {
    counter!("market_lookups_total", "kind" => kind, "outcome" => outcome).increment(1);
}

/// 처리한 사용자 동작 카운터 증가.
pub fn record_user_action(action: &str) {
    counter!("dashboard_actions_total", "action" => action.to_string()).increment(1);
}

/// 활성 세션 수 설정.
pub fn set_active_sessions(count: usize) {
    gauge!("dashboard_sessions_active").set(count as f64);
}

/// 캐시 적중/미스 수를 게이지로 노출합니다.
pub fn set_cache_stats(stats: &GatewayCacheStats) {
    for cache in [&stats.quote, &stats.history, &stats.profile] {
        gauge!("market_cache_entries", "cache" => cache.name).set(cache.entries as f64);
        gauge!("market_cache_hits", "cache" => cache.name).set(cache.hits as f64);
        gauge!("market_cache_misses", "cache" => cache.name).set(cache.misses as f64);
    }
}
