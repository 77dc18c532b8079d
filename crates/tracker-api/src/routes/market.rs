//! 세션 없는 시세 조회 endpoint.
//!
//! 게이트웨이 캐시를 세션 API와 공유합니다.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracker_core::{CompanyProfile, HistoricalSeries, Period, PeriodChange, Quote, Ticker};
use tracker_dashboard::{render_price_chart, ChartSpec, ChartStats};

use crate::error::{no_data, upstream_error, validation_error, ApiResult};
use crate::state::AppState;

/// 기간 쿼리 파라미터. 생략하면 기본 기간.
#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    pub period: Option<String>,
}

impl PeriodQuery {
    fn resolve(&self) -> ApiResult<Period> {
        match self.period.as_deref() {
            None => Ok(Period::default()),
            Some(raw) => raw.parse().map_err(validation_error),
        }
    }
}

/// 과거 시계열 응답.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub series: HistoricalSeries,
    pub change: Option<PeriodChange>,
    pub summary: String,
}

/// 차트 응답.
#[derive(Debug, Serialize)]
pub struct ChartResponse {
    pub spec: ChartSpec,
    pub stats: Option<ChartStats>,
}

fn parse_ticker(raw: &str) -> ApiResult<Ticker> {
    Ticker::parse(raw).map_err(validation_error)
}

/// GET /api/v1/market/{ticker}/quote
pub async fn get_quote(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
) -> ApiResult<Json<Quote>> {
    let ticker = parse_ticker(&ticker)?;
    state
        .handler
        .gateway()
        .current_quote(&ticker)
        .await
        .map_err(upstream_error)?
        .map(Json)
        .ok_or_else(|| no_data("price data", &ticker))
}

/// GET /api/v1/market/{ticker}/history?period=1mo
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
    Query(query): Query<PeriodQuery>,
) -> ApiResult<Json<HistoryResponse>> {
    let ticker = parse_ticker(&ticker)?;
    let period = query.resolve()?;

    let series = state
        .handler
        .gateway()
        .historical_series(&ticker, period)
        .await
        .map_err(upstream_error)?;

    Ok(Json(HistoryResponse {
        change: series.period_change(),
        summary: series.summary_line(),
        series,
    }))
}

/// GET /api/v1/market/{ticker}/profile
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
) -> ApiResult<Json<CompanyProfile>> {
    let ticker = parse_ticker(&ticker)?;
    state
        .handler
        .gateway()
        .profile(&ticker)
        .await
        .map_err(upstream_error)?
        .map(Json)
        .ok_or_else(|| no_data("stock info", &ticker))
}

/// GET /api/v1/market/{ticker}/chart?period=1mo
pub async fn get_chart(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
    Query(query): Query<PeriodQuery>,
) -> ApiResult<Json<ChartResponse>> {
    let ticker = parse_ticker(&ticker)?;
    let period = query.resolve()?;

    let series = state
        .handler
        .gateway()
        .historical_series(&ticker, period)
        .await
        .map_err(upstream_error)?;

    let spec = render_price_chart(&series).map_err(|_| no_data("chart data", &ticker))?;
    Ok(Json(ChartResponse {
        stats: ChartStats::from_series(&series),
        spec,
    }))
}

/// 시세 라우터 생성.
pub fn market_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/{ticker}/quote", get(get_quote))
        .route("/{ticker}/history", get(get_history))
        .route("/{ticker}/profile", get(get_profile))
        .route("/{ticker}/chart", get(get_chart))
}
