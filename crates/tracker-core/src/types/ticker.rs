//! 티커 심볼 정의.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TrackerError;

/// 기본 티커.
pub const DEFAULT_TICKER: &str = "AAPL";

/// 시세 제공자에 전달되는 티커 심볼 (예: "AAPL", "BRK-B", "^GSPC", "005930.KS").
///
/// 파싱 시 앞뒤 공백을 제거하고 대문자로 변환합니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    /// 사용자 입력을 티커로 파싱합니다.
    pub fn parse(input: &str) -> Result<Self, TrackerError> {
        let normalized = input.trim().to_uppercase();

        if normalized.is_empty() {
            return Err(TrackerError::InvalidTicker("빈 티커".to_string()));
        }

        if let Some(bad) = normalized.chars().find(|c| !is_ticker_char(*c)) {
            return Err(TrackerError::InvalidTicker(format!(
                "{} (허용되지 않는 문자 '{}')",
                normalized, bad
            )));
        }

        Ok(Self(normalized))
    }

    /// 입력이 비어 있으면 `fallback`을 사용합니다.
    pub fn parse_or(input: &str, fallback: &Ticker) -> Result<Self, TrackerError> {
        if input.trim().is_empty() {
            Ok(fallback.clone())
        } else {
            Self::parse(input)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_ticker_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=')
}

impl Default for Ticker {
    fn default() -> Self {
        Self(DEFAULT_TICKER.to_string())
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Ticker {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Ticker {
    type Error = TrackerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Ticker> for String {
    fn from(ticker: Ticker) -> Self {
        ticker.0
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
