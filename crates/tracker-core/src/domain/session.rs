//! 사용자 세션 컨텍스트.
//!
//! 선택한 티커와 기간, 세션별 API 키, 채팅 기록을 한 객체로 묶습니다.

use secrecy::{ExposeSecret, SecretString};

use super::chat::ChatTranscript;
use crate::config::SessionConfig;
use crate::error::TrackerResult;
use crate::types::{Period, Ticker};

/// 세션 상태.
///
/// API 키가 들어 있으므로 직렬화하지 않습니다.
#[derive(Debug)]
pub struct SessionContext {
    ticker: Ticker,
    period: Period,
    default_ticker: Ticker,
    api_key: Option<SecretString>,
    transcript: ChatTranscript,
}

impl SessionContext {
    /// 기본값과 선택적 기본 API 키로 세션을 생성합니다.
    pub fn new(defaults: &SessionConfig, api_key: Option<SecretString>) -> Self {
        Self {
            ticker: defaults.default_ticker.clone(),
            period: defaults.default_period,
            default_ticker: defaults.default_ticker.clone(),
            api_key: api_key.filter(|k| !k.expose_secret().trim().is_empty()),
            transcript: ChatTranscript::new(),
        }
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    pub fn period(&self) -> Period {
        self.period
    }

    /// 입력 문자열로 티커를 변경합니다. 빈 입력은 기본 티커로 되돌립니다.
    ///
    /// 티커가 바뀌었으면 `true`.
    pub fn set_ticker_input(&mut self, input: &str) -> TrackerResult<bool> {
        let ticker = Ticker::parse_or(input, &self.default_ticker)?;
        let changed = ticker != self.ticker;
        self.ticker = ticker;
        Ok(changed)
    }

    pub fn set_period(&mut self, period: Period) -> bool {
        let changed = period != self.period;
        self.period = period;
        changed
    }

    pub fn api_key(&self) -> Option<&SecretString> {
        self.api_key.as_ref()
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// 세션 API 키를 교체합니다. 공백 입력은 키를 제거합니다.
    ///
    /// 값이 바뀌었으면 `true`.
    pub fn set_api_key_input(&mut self, input: &str) -> bool {
        let trimmed = input.trim();
        let current = self.api_key.as_ref().map(|k| k.expose_secret()).unwrap_or("");
        if current == trimmed {
            return false;
        }

        self.api_key = if trimmed.is_empty() {
            None
        } else {
            Some(SecretString::from(trimmed.to_string()))
        };
        true
    }

    pub fn transcript(&self) -> &ChatTranscript {
        &self.transcript
    }

    pub fn transcript_mut(&mut self) -> &mut ChatTranscript {
        &mut self.transcript
    }

    pub fn clear_chat(&mut self) {
        self.transcript.clear();
    }
}
