//! 설정 관리.
//!
//! 설정 파일(`config/default.toml`, 선택)과 `TRACKER__SECTION__KEY`
//! 형태의 환경 변수를 합쳐 [`AppConfig`]를 구성합니다.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::types::{Period, Ticker};

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
    /// 시세 조회 캐시 설정
    pub market_data: MarketDataConfig,
    /// AI 설정
    pub ai: AiConfig,
    /// 세션 기본값
    pub session: SessionConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            request_timeout_secs: 60,
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 시세 캐시 TTL 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MarketDataConfig {
    /// 현재가 캐시 TTL (초)
    pub quote_ttl_secs: u64,
    /// 과거 시계열 캐시 TTL (초)
    pub history_ttl_secs: u64,
    /// 기업 프로필 캐시 TTL (초)
    pub profile_ttl_secs: u64,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            quote_ttl_secs: 60,
            history_ttl_secs: 300,
            profile_ttl_secs: 3600,
        }
    }
}

impl MarketDataConfig {
    pub fn quote_ttl(&self) -> Duration {
        Duration::from_secs(self.quote_ttl_secs)
    }

    pub fn history_ttl(&self) -> Duration {
        Duration::from_secs(self.history_ttl_secs)
    }

    pub fn profile_ttl(&self) -> Duration {
        Duration::from_secs(self.profile_ttl_secs)
    }
}

/// AI(chat-completion) 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AiConfig {
    /// OpenAI 호환 API 기본 URL
    pub base_url: String,
    /// 모델 이름
    pub model: String,
    /// 샘플링 온도
    pub temperature: f32,
    /// 응답 최대 토큰 수
    pub max_tokens: u32,
    /// 기본 API 키를 읽을 환경 변수 이름
    pub api_key_env: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            temperature: 0.7,
            max_tokens: 1000,
            api_key_env: "GROQ_API_KEY".to_string(),
        }
    }
}

impl AiConfig {
    /// 환경 변수에서 기본 API 키를 읽습니다.
    ///
    /// 변수가 없거나 공백뿐이면 `None`.
    pub fn default_api_key(&self) -> Option<SecretString> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(SecretString::from)
    }
}

/// 새 세션의 기본값.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// 기본 티커
    pub default_ticker: Ticker,
    /// 기본 조회 기간
    pub default_period: Period,
    /// 마지막 요청 이후 세션을 유지하는 시간 (초, HTTP 서버)
    pub idle_timeout_secs: u64,
    /// 동시에 보관하는 최대 세션 수 (HTTP 서버)
    pub max_sessions: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_ticker: Ticker::default(),
            default_period: Period::default(),
            idle_timeout_secs: 1800,
            max_sessions: 1000,
        }
    }
}

impl SessionConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        Self::build(Some(path.as_ref()), true)
    }

    /// 파일이 없으면 기본값과 환경 변수만으로 설정을 구성합니다.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::build(path, false)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load_or_default(Some(Path::new("config/default.toml")))
    }

    fn build(path: Option<&Path>, required: bool) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(required));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("TRACKER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
