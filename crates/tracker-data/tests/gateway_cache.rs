//! 게이트웨이 캐시 동작 통합 테스트
//!
//! 호출 횟수를 세는 가짜 제공자로 TTL, 오류 비캐시, 새로고침을 검증합니다.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rust_decimal_macros::dec;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracker_core::{Bar, CompanyProfile, MarketDataConfig, Period, Ticker};
use tracker_data::{DataError, LatestCloses, MarketDataGateway, MarketDataSource, Result};

#[derive(Default)]
struct CountingSource {
    quote_calls: AtomicUsize,
    history_calls: AtomicUsize,
    profile_calls: AtomicUsize,
    fail: AtomicBool,
}

impl CountingSource {
    fn check(&self) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            Err(DataError::FetchError("network down".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl MarketDataSource for CountingSource {
    fn name(&self) -> &str {
        "counting"
    }

    async fn latest_closes(&self, ticker: &Ticker) -> Result<Option<LatestCloses>> {
        self.quote_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        if ticker.as_str() == "NODATA" {
            return Ok(None);
        }
        Ok(Some(LatestCloses {
            current: dec!(153),
            previous: Some(dec!(150)),
            timestamp: Utc::now(),
        }))
    }

    async fn history(&self, ticker: &Ticker, _period: Period) -> Result<Vec<Bar>> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        if ticker.as_str() == "NODATA" {
            return Ok(Vec::new());
        }
        let date = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        Ok(vec![Bar {
            date,
            open: dec!(1),
            high: dec!(2),
            low: dec!(1),
            close: dec!(2),
            volume: 10,
        }])
    }

    async fn profile(&self, ticker: &Ticker) -> Result<Option<CompanyProfile>> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(Some(CompanyProfile::new(ticker.clone())))
    }
}

fn gateway() -> (Arc<CountingSource>, MarketDataGateway) {
    let source = Arc::new(CountingSource::default());
    let gateway = MarketDataGateway::new(source.clone(), &MarketDataConfig::default());
    (source, gateway)
}

fn ticker(s: &str) -> Ticker {
    Ticker::parse(s).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_quote_cached_within_ttl() {
    let (source, gateway) = gateway();
    let aapl = ticker("AAPL");

    let first = gateway.current_quote(&aapl).await.unwrap().unwrap();
    assert_eq!(first.change, dec!(3.00));
    assert_eq!(first.change_pct, dec!(2.00));

    tokio::time::advance(Duration::from_secs(30)).await;
    let second = gateway.current_quote(&aapl).await.unwrap().unwrap();

    assert_eq!(first, second);
    assert_eq!(source.quote_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_quote_refetched_after_ttl() {
    let (source, gateway) = gateway();
    let aapl = ticker("AAPL");

    gateway.current_quote(&aapl).await.unwrap();
    tokio::time::advance(Duration::from_secs(61)).await;
    gateway.current_quote(&aapl).await.unwrap();

    assert_eq!(source.quote_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_history_keyed_by_period() {
    let (source, gateway) = gateway();
    let aapl = ticker("AAPL");

    gateway.historical_series(&aapl, Period::OneMonth).await.unwrap();
    gateway.historical_series(&aapl, Period::OneMonth).await.unwrap();
    gateway.historical_series(&aapl, Period::OneYear).await.unwrap();
    assert_eq!(source.history_calls.load(Ordering::SeqCst), 2);

    tokio::time::advance(Duration::from_secs(299)).await;
    gateway.historical_series(&aapl, Period::OneMonth).await.unwrap();
    assert_eq!(source.history_calls.load(Ordering::SeqCst), 2);

    tokio::time::advance(Duration::from_secs(2)).await;
    gateway.historical_series(&aapl, Period::OneMonth).await.unwrap();
    assert_eq!(source.history_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn test_profile_ttl_is_one_hour() {
    let (source, gateway) = gateway();
    let aapl = ticker("AAPL");

    gateway.profile(&aapl).await.unwrap();
    tokio::time::advance(Duration::from_secs(3599)).await;
    gateway.profile(&aapl).await.unwrap();
    assert_eq!(source.profile_calls.load(Ordering::SeqCst), 1);

    tokio::time::advance(Duration::from_secs(2)).await;
    gateway.profile(&aapl).await.unwrap();
    assert_eq!(source.profile_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_errors_are_not_cached() {
    let (source, gateway) = gateway();
    let aapl = ticker("AAPL");

    source.fail.store(true, Ordering::SeqCst);
    assert!(gateway.current_quote(&aapl).await.is_err());
    assert!(gateway.current_quote(&aapl).await.is_err());
    assert_eq!(source.quote_calls.load(Ordering::SeqCst), 2);

    source.fail.store(false, Ordering::SeqCst);
    assert!(gateway.current_quote(&aapl).await.unwrap().is_some());
    gateway.current_quote(&aapl).await.unwrap();
    assert_eq!(source.quote_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_no_data_outcomes_are_cached() {
    let (source, gateway) = gateway();
    let nodata = ticker("NODATA");

    assert!(gateway.current_quote(&nodata).await.unwrap().is_none());
    assert!(gateway.current_quote(&nodata).await.unwrap().is_none());
    assert_eq!(source.quote_calls.load(Ordering::SeqCst), 1);

    let series = gateway.historical_series(&nodata, Period::FiveDays).await.unwrap();
    assert!(series.is_empty());
    gateway.historical_series(&nodata, Period::FiveDays).await.unwrap();
    assert_eq!(source.history_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_clear_forces_refetch() {
    let (source, gateway) = gateway();
    let aapl = ticker("AAPL");

    gateway.current_quote(&aapl).await.unwrap();
    gateway.historical_series(&aapl, Period::OneMonth).await.unwrap();
    gateway.profile(&aapl).await.unwrap();

    gateway.clear().await;

    gateway.current_quote(&aapl).await.unwrap();
    gateway.historical_series(&aapl, Period::OneMonth).await.unwrap();
    gateway.profile(&aapl).await.unwrap();

    assert_eq!(source.quote_calls.load(Ordering::SeqCst), 2);
    assert_eq!(source.history_calls.load(Ordering::SeqCst), 2);
    assert_eq!(source.profile_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_cache_stats() {
    let (_source, gateway) = gateway();
    let aapl = ticker("AAPL");

    gateway.current_quote(&aapl).await.unwrap();
    gateway.current_quote(&aapl).await.unwrap();

    let stats = gateway.cache_stats().await;
    assert_eq!(stats.quote.hits, 1);
    assert_eq!(stats.quote.misses, 1);
    assert_eq!(stats.quote.ttl_secs, 60);
    assert_eq!(stats.history.entries, 0);
    assert_eq!(stats.profile.ttl_secs, 3600);
}

#[tokio::test(start_paused = true)]
async fn test_expired_tickers_not_counted() {
    let (_source, gateway) = gateway();
    for symbol in ["AAPL", "MSFT", "NVDA"] {
        gateway.current_quote(&ticker(symbol)).await.unwrap();
    }
    assert_eq!(gateway.cache_stats().await.quote.entries, 3);

    tokio::time::advance(Duration::from_secs(61)).await;
    assert_eq!(gateway.cache_stats().await.quote.entries, 0);

    gateway.current_quote(&ticker("TSLA")).await.unwrap();
    assert_eq!(gateway.cache_stats().await.quote.entries, 1);
}
