//! 시세 데이터 게이트웨이.
//!
//! 이 crate는 다음을 제공합니다:
//! - 티커별 현재가, 과거 시계열, 기업 프로필 조회
//! - 조회 종류별 TTL 메모리 캐시
//! - 데이터 제공자 추상화(`MarketDataSource`)와 Yahoo Finance 구현

pub mod cache;
pub mod error;
pub mod gateway;
pub mod provider;

pub use cache::{CacheStats, TtlCache};
pub use error::{DataError, Result};
pub use gateway::{GatewayCacheStats, MarketDataGateway};
pub use provider::{LatestCloses, MarketDataSource, YahooFinanceSource};
