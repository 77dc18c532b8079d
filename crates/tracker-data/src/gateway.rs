//! 시세 데이터 게이트웨이.
//!
//! 조회 종류마다 별도 TTL 캐시를 두고 제공자 호출 결과를 보관합니다.
//!
//! | 조회 | 키 | 기본 TTL |
//! |------|----|---------|
//! | 현재가 | 티커 | 60초 |
//! | 과거 시계열 | (티커, 기간) | 300초 |
//! | 기업 프로필 | 티커 | 3600초 |
//!
//! "데이터 없음" 결과도 캐시하지만, 오류는 캐시하지 않습니다.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};
use tracker_core::{CompanyProfile, HistoricalSeries, MarketDataConfig, Period, Quote, Ticker};

use crate::cache::{CacheStats, TtlCache};
use crate::error::Result;
use crate::provider::MarketDataSource;

/// 캐시별 통계.
#[derive(Debug, Clone, Serialize)]
pub struct GatewayCacheStats {
    pub quote: CacheStats,
    pub history: CacheStats,
    pub profile: CacheStats,
}

/// 캐시를 거쳐 시세 제공자를 호출하는 게이트웨이.
pub struct MarketDataGateway {
    source: Arc<dyn MarketDataSource>,
    quotes: TtlCache<Ticker, Option<Quote>>,
    history: TtlCache<(Ticker, Period), HistoricalSeries>,
    profiles: TtlCache<Ticker, Option<CompanyProfile>>,
}

impl MarketDataGateway {
    /// 설정의 TTL로 게이트웨이를 생성합니다.
    pub fn new(source: Arc<dyn MarketDataSource>, config: &MarketDataConfig) -> Self {
        Self::with_ttls(
            source,
            config.quote_ttl(),
            config.history_ttl(),
            config.profile_ttl(),
        )
    }

    pub fn with_ttls(
        source: Arc<dyn MarketDataSource>,
        quote_ttl: Duration,
        history_ttl: Duration,
        profile_ttl: Duration,
    ) -> Self {
        info!(
            source = source.name(),
            quote_ttl_secs = quote_ttl.as_secs(),
            history_ttl_secs = history_ttl.as_secs(),
            profile_ttl_secs = profile_ttl.as_secs(),
            "MarketDataGateway initialized"
        );

        Self {
            source,
            quotes: TtlCache::new("quote", quote_ttl),
            history: TtlCache::new("history", history_ttl),
            profiles: TtlCache::new("profile", profile_ttl),
        }
    }

    /// 현재가. 제공자에 데이터가 없으면 `Ok(None)`.
    #[instrument(skip(self), fields(ticker = %ticker))]
    pub async fn current_quote(&self, ticker: &Ticker) -> Result<Option<Quote>> {
        self.quotes
            .get_or_try_insert_with(ticker.clone(), || async {
                let closes = self.source.latest_closes(ticker).await?;
                let quote = closes.map(|c| {
                    Quote::from_closes(ticker.clone(), c.current, c.previous, c.timestamp)
                });
                debug!(found = quote.is_some(), "quote fetched");
                Ok(quote)
            })
            .await
    }

    /// 과거 시계열. 비어 있을 수 있습니다.
    #[instrument(skip(self), fields(ticker = %ticker, period = %period))]
    pub async fn historical_series(
        &self,
        ticker: &Ticker,
        period: Period,
    ) -> Result<HistoricalSeries> {
        self.history
            .get_or_try_insert_with((ticker.clone(), period), || async {
                let bars = self.source.history(ticker, period).await?;
                debug!(bars = bars.len(), "history fetched");
                Ok(HistoricalSeries::new(ticker.clone(), period, bars))
            })
            .await
    }

    /// 기업 프로필. 제공자에 데이터가 없으면 `Ok(None)`.
    #[instrument(skip(self), fields(ticker = %ticker))]
    pub async fn profile(&self, ticker: &Ticker) -> Result<Option<CompanyProfile>> {
        self.profiles
            .get_or_try_insert_with(ticker.clone(), || async {
                let profile = self.source.profile(ticker).await?;
                debug!(found = profile.is_some(), "profile fetched");
                Ok(profile)
            })
            .await
    }

    /// 모든 캐시를 비웁니다 (수동 새로고침).
    pub async fn clear(&self) {
        self.quotes.clear().await;
        self.history.clear().await;
        self.profiles.clear().await;
        info!("market data caches cleared");
    }

    pub async fn cache_stats(&self) -> GatewayCacheStats {
        GatewayCacheStats {
            quote: self.quotes.stats().await,
            history: self.history.stats().await,
            profile: self.profiles.stats().await,
        }
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }
}
