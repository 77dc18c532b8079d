//! Yahoo Finance 기반 시세 제공자.
//!
//! - 현재가: 최근 5일 일봉의 마지막 두 종가
//! - 과거 시계열: 기간 range 토큰으로 일봉 조회
//! - 기업 프로필: quote summary (`get_ticker_info`)
//!
//! ```rust,ignore
//! use tracker_data::YahooFinanceSource;
//!
//! let source = YahooFinanceSource::new()?;
//! let closes = source.latest_closes(&"AAPL".parse()?).await?;
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use tracker_core::{decimal_from_f64, Bar, CompanyProfile, Period, Ticker};
use yahoo_finance_api as yahoo;

use super::{LatestCloses, MarketDataSource};
use crate::error::{DataError, Result};

/// 현재가 계산에 사용하는 range.
const QUOTE_RANGE: Period = Period::FiveDays;

/// Yahoo Finance 제공자.
pub struct YahooFinanceSource {
    /// 차트 조회용 커넥터
    connector: yahoo::YahooConnector,
    /// quote summary 조회용 커넥터 (`get_ticker_info`가 `&mut self`를 요구)
    info_connector: Mutex<yahoo::YahooConnector>,
}

impl YahooFinanceSource {
    /// 새 제공자를 생성합니다.
    pub fn new() -> Result<Self> {
        let connector = yahoo::YahooConnector::new()
            .map_err(|e| DataError::ConnectionError(format!("Yahoo Finance 연결 실패: {}", e)))?;
        let info_connector = yahoo::YahooConnector::new()
            .map_err(|e| DataError::ConnectionError(format!("Yahoo Finance 연결 실패: {}", e)))?;

        Ok(Self {
            connector,
            info_connector: Mutex::new(info_connector),
        })
    }

    /// 기간 조회 후 봉 목록을 반환합니다. 데이터가 없으면 빈 목록.
    async fn fetch_quotes(&self, ticker: &Ticker, period: Period) -> Result<Vec<yahoo::Quote>> {
        let range = period.as_str();
        let response = self
            .connector
            .get_quote_range(ticker.as_str(), period.interval(), range)
            .await
            .map_err(|e| DataError::FetchError(format!("{} ({}): {}", ticker, range, e)))?;

        match response.quotes() {
            Ok(quotes) => {
                debug!(ticker = %ticker, range, count = quotes.len(), "일봉 수신");
                Ok(quotes)
            }
            Err(e) => {
                debug!(ticker = %ticker, range, error = %e, "일봉 없음");
                Ok(Vec::new())
            }
        }
    }
}

fn timestamp_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

fn to_bar(quote: &yahoo::Quote) -> Option<Bar> {
    Some(Bar {
        date: timestamp_to_utc(quote.timestamp as i64)?,
        open: decimal_from_f64(quote.open)?,
        high: decimal_from_f64(quote.high)?,
        low: decimal_from_f64(quote.low)?,
        close: decimal_from_f64(quote.close)?,
        volume: quote.volume as u64,
    })
}

#[async_trait]
impl MarketDataSource for YahooFinanceSource {
    fn name(&self) -> &str {
        "yahoo"
    }

    async fn latest_closes(&self, ticker: &Ticker) -> Result<Option<LatestCloses>> {
        let quotes = self.fetch_quotes(ticker, QUOTE_RANGE).await?;

        let closes: Vec<(Decimal, i64)> = quotes
            .iter()
            .filter_map(|q| Some((decimal_from_f64(q.close)?, q.timestamp as i64)))
            .collect();

        let Some(&(current, ts)) = closes.last() else {
            return Ok(None);
        };
        let previous = closes.len().checked_sub(2).map(|i| closes[i].0);

        let timestamp = timestamp_to_utc(ts).unwrap_or_else(Utc::now);

        Ok(Some(LatestCloses {
            current,
            previous,
            timestamp,
        }))
    }

    async fn history(&self, ticker: &Ticker, period: Period) -> Result<Vec<Bar>> {
        let quotes = self.fetch_quotes(ticker, period).await?;
        let bars: Vec<Bar> = quotes.iter().filter_map(to_bar).collect();

        if bars.len() < quotes.len() {
            warn!(
                ticker = %ticker,
                dropped = quotes.len() - bars.len(),
                "변환할 수 없는 일봉 제외"
            );
        }

        Ok(bars)
    }

    async fn profile(&self, ticker: &Ticker) -> Result<Option<CompanyProfile>> {
        let summary = {
            let mut connector = self.info_connector.lock().await;
            connector.get_ticker_info(ticker.as_str()).await.map_err(|e| {
                DataError::FetchError(format!("Yahoo ticker info 조회 실패 ({}): {}", ticker, e))
            })?
        };

        let Some(data) = summary
            .quote_summary
            .and_then(|qs| qs.result)
            .and_then(|r| r.into_iter().next())
        else {
            return Ok(None);
        };

        let name = data
            .quote_type
            .as_ref()
            .and_then(|qt| qt.long_name.clone().or(qt.short_name.clone()));

        let mut profile = CompanyProfile::new(ticker.clone()).with_company(name);

        if let Some(sd) = data.summary_detail.as_ref() {
            profile.market_cap = sd.market_cap.map(|v| v as u64);
            profile.pe_ratio = sd.trailing_pe.and_then(|v| decimal_from_f64(v as f64));
            profile.day_high = sd.day_high.and_then(|v| decimal_from_f64(v as f64));
            profile.day_low = sd.day_low.and_then(|v| decimal_from_f64(v as f64));
            profile.week52_high = sd.fifty_two_week_high.and_then(|v| decimal_from_f64(v as f64));
            profile.week52_low = sd.fifty_two_week_low.and_then(|v| decimal_from_f64(v as f64));
            profile.volume = sd.volume.map(|v| v as u64);
            profile.avg_volume = sd.average_volume.map(|v| v as u64);
            profile.dividend_yield = sd.dividend_yield.and_then(|v| decimal_from_f64(v as f64));
        }

        if let Some(ap) = data.asset_profile.as_ref() {
            profile.sector = ap.sector.clone();
            profile.industry = ap.industry.clone();
        }

        info!(
            ticker = %ticker,
            company = %profile.company,
            market_cap = ?profile.market_cap,
            "기업 프로필 수집 완료"
        );

        Ok(Some(profile))
    }
}
