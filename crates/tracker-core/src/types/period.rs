//! 조회 기간 정의.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TrackerError;

/// 과거 시세 조회 기간.
///
/// 문자열 표현은 시세 제공자의 range 토큰과 같습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Period {
    /// 1일
    #[serde(rename = "1d")]
    OneDay,
    /// 5일
    #[serde(rename = "5d")]
    FiveDays,
    /// 1개월
    #[default]
    #[serde(rename = "1mo")]
    OneMonth,
    /// 3개월
    #[serde(rename = "3mo")]
    ThreeMonths,
    /// 6개월
    #[serde(rename = "6mo")]
    SixMonths,
    /// 1년
    #[serde(rename = "1y")]
    OneYear,
    /// 2년
    #[serde(rename = "2y")]
    TwoYears,
    /// 5년
    #[serde(rename = "5y")]
    FiveYears,
}

impl Period {
    /// 선택 가능한 모든 기간 (표시 순서).
    pub const ALL: [Period; 8] = [
        Period::OneDay,
        Period::FiveDays,
        Period::OneMonth,
        Period::ThreeMonths,
        Period::SixMonths,
        Period::OneYear,
        Period::TwoYears,
        Period::FiveYears,
    ];

    /// range 토큰 문자열.
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::OneDay => "1d",
            Period::FiveDays => "5d",
            Period::OneMonth => "1mo",
            Period::ThreeMonths => "3mo",
            Period::SixMonths => "6mo",
            Period::OneYear => "1y",
            Period::TwoYears => "2y",
            Period::FiveYears => "5y",
        }
    }

    /// 봉 간격. 모든 기간에서 일봉을 사용합니다.
    pub fn interval(&self) -> &'static str {
        "1d"
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_lowercase();
        Period::ALL
            .into_iter()
            .find(|p| p.as_str() == token)
            .ok_or_else(|| TrackerError::InvalidPeriod(s.to_string()))
    }
}
