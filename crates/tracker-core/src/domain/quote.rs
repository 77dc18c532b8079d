//! 현재가 스냅샷.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{DecimalExt, Percentage, Price, Ticker};

/// 최신 종가 기준 시세 스냅샷.
///
/// 모든 값은 소수 둘째 자리로 반올림됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// 티커
    pub ticker: Ticker,
    /// 현재가 (최신 종가)
    pub price: Price,
    /// 전일 대비 변동액
    pub change: Decimal,
    /// 전일 대비 변동률 (%)
    pub change_pct: Percentage,
    /// 조회 시각
    pub timestamp: DateTime<Utc>,
}

impl Quote {
    /// 현재 종가와 전일 종가로 시세를 만듭니다.
    ///
    /// 전일 종가가 없거나 0이면 현재가를 전일 종가로 간주합니다 (변동 0).
    pub fn from_closes(
        ticker: Ticker,
        current: Price,
        previous: Option<Price>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let previous = match previous {
            Some(p) if !p.is_zero() => p,
            _ => current,
        };

        Self {
            ticker,
            price: current.round_display(),
            change: (current - previous).round_display(),
            change_pct: current.pct_change_from(previous).round_display(),
            timestamp,
        }
    }
}
