//! 과거 OHLCV 시계열.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{DecimalExt, Percentage, Period, Price, Ticker};

/// 과거 데이터가 없을 때 요약 문장.
pub const HISTORY_NOT_AVAILABLE: &str = "Historical data not available.";

/// 일봉 하나.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// 봉 시작 시각
    pub date: DateTime<Utc>,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: u64,
}

/// 기간 시작/종료 비교 결과.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodChange {
    /// 첫 봉 종가
    pub start: Price,
    /// 마지막 봉 종가
    pub end: Price,
    /// 변동액
    pub change: Decimal,
    /// 변동률 (%)
    pub change_pct: Percentage,
}

/// `(티커, 기간)` 쌍에 대한 읽기 전용 시계열.
///
/// 비어 있는 시계열도 유효한 결과입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSeries {
    pub ticker: Ticker,
    pub period: Period,
    bars: Vec<Bar>,
}

impl HistoricalSeries {
    /// 시계열을 생성합니다. 봉은 날짜 오름차순으로 정렬됩니다.
    pub fn new(ticker: Ticker, period: Period, mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|b| b.date);
        Self {
            ticker,
            period,
            bars,
        }
    }

    pub fn empty(ticker: Ticker, period: Period) -> Self {
        Self::new(ticker, period, Vec::new())
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> Option<&Bar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// 기간 시작 대비 종료 변동.
    ///
    /// 시계열이 비었거나 시작 종가가 0이면 `None`.
    pub fn period_change(&self) -> Option<PeriodChange> {
        let start = self.first()?.close;
        let end = self.last()?.close;

        if start.is_zero() {
            return None;
        }

        Some(PeriodChange {
            start,
            end,
            change: end - start,
            change_pct: end.pct_change_from(start),
        })
    }

    /// 프롬프트에 들어가는 한 줄 요약.
    pub fn summary_line(&self) -> String {
        match self.period_change() {
            Some(change) => format!("{} change: {}%", self.period, change.change_pct.fmt2()),
            None => HISTORY_NOT_AVAILABLE.to_string(),
        }
    }
}
