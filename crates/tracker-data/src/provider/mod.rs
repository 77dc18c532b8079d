//! 데이터 Provider 모듈.
//!
//! 게이트웨이는 [`MarketDataSource`] 트레잇을 통해서만 외부 시세 소스에
//! 접근합니다.
//!
//! ## Yahoo Finance
//! - `YahooFinanceSource`: 일봉 종가, 기간별 OHLCV, quote summary 기반 기업 정보

pub mod yahoo;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracker_core::{Bar, CompanyProfile, Period, Price, Ticker};

use crate::error::Result;

pub use yahoo::YahooFinanceSource;

/// 최근 두 거래일 종가.
#[derive(Debug, Clone, PartialEq)]
pub struct LatestCloses {
    /// 최신 종가
    pub current: Price,
    /// 직전 거래일 종가 (없을 수 있음)
    pub previous: Option<Price>,
    /// 최신 봉 시각
    pub timestamp: DateTime<Utc>,
}

/// 시세 데이터 제공자.
///
/// 데이터가 없으면 `Ok(None)` 또는 빈 `Vec`을 반환하고, 전송/파싱 실패만
/// `Err`로 반환합니다.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// 제공자 이름 (로그용).
    fn name(&self) -> &str;

    /// 최근 두 거래일 종가.
    async fn latest_closes(&self, ticker: &Ticker) -> Result<Option<LatestCloses>>;

    /// 기간 내 일봉.
    async fn history(&self, ticker: &Ticker, period: Period) -> Result<Vec<Bar>>;

    /// 기업 프로필.
    async fn profile(&self, ticker: &Ticker) -> Result<Option<CompanyProfile>>;
}
