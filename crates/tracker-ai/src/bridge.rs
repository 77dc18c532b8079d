//! AI 어시스턴트 브리지.
//!
//! [`AssistantBridge::analyze`]는 항상 화면에 표시할 문자열을 반환합니다.
//! 클라이언트 미포함, API 키 없음, 전송 실패 모두 텍스트로 변환됩니다.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use tracker_core::{AiConfig, StockMetrics, Ticker};

use crate::prompt::{build_context, build_user_message, SYSTEM_PROMPT};
use crate::sanitize::sanitize;
use crate::types::{AiResult, ChatRequest, WireMessage};

/// chat-completion 클라이언트가 빌드에 포함되지 않았을 때 메시지.
pub const MISSING_CLIENT_MESSAGE: &str =
    "Groq client not available. Rebuild with: cargo build --features groq";

/// API 키가 없을 때 메시지.
pub const MISSING_API_KEY_MESSAGE: &str =
    "Please configure your FREE Groq API key (GROQ_API_KEY) to use AI features.";

/// API 키 발급 안내 URL.
pub const API_KEY_HELP_URL: &str = "https://console.groq.com";

/// chat-completion 백엔드 trait.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// 백엔드 이름.
    fn name(&self) -> &str;

    /// 요청을 한 번 보내고 첫 번째 응답 텍스트를 반환합니다.
    async fn complete(&self, api_key: &SecretString, request: &ChatRequest) -> AiResult<String>;
}

/// 모델 호출 파라미터.
#[derive(Debug, Clone)]
struct CompletionSettings {
    model: String,
    temperature: f32,
    max_tokens: u32,
}

/// AI 어시스턴트 브리지.
pub struct AssistantBridge {
    backend: Option<Arc<dyn ChatCompletion>>,
    settings: CompletionSettings,
}

impl AssistantBridge {
    /// 설정으로 브리지를 생성합니다. `groq` feature가 꺼져 있으면 백엔드 없음.
    pub fn from_config(config: &AiConfig) -> Self {
        #[cfg(feature = "groq")]
        {
            Self::with_backend(Arc::new(crate::client::GroqClient::from_config(config)), config)
        }
        #[cfg(not(feature = "groq"))]
        {
            Self::unavailable(config)
        }
    }

    /// 지정한 백엔드로 브리지를 생성합니다.
    pub fn with_backend(backend: Arc<dyn ChatCompletion>, config: &AiConfig) -> Self {
        Self {
            backend: Some(backend),
            settings: CompletionSettings::from(config),
        }
    }

    /// 백엔드 없는 브리지. 모든 요청에 설치 안내 메시지를 반환합니다.
    pub fn unavailable(config: &AiConfig) -> Self {
        Self {
            backend: None,
            settings: CompletionSettings::from(config),
        }
    }

    /// 백엔드 포함 여부.
    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    /// 요청 본문을 조립합니다. 모든 텍스트는 정리된 상태입니다.
    pub fn build_request(&self, ticker: &Ticker, query: &str, metrics: &StockMetrics) -> ChatRequest {
        let context = build_context(ticker, metrics);

        ChatRequest {
            model: self.settings.model.clone(),
            messages: vec![
                WireMessage::system(sanitize(SYSTEM_PROMPT)),
                WireMessage::user(build_user_message(&context, query)),
            ],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        }
    }

    /// 질문을 분석합니다.
    ///
    /// 사전 조건 순서: 백엔드 포함 여부, API 키. 둘 다 네트워크 호출 없이
    /// 안내 문자열을 반환합니다.
    #[instrument(skip_all, fields(ticker = %ticker))]
    pub async fn analyze(
        &self,
        ticker: &Ticker,
        query: &str,
        metrics: &StockMetrics,
        api_key: Option<&SecretString>,
    ) -> String {
        let Some(backend) = self.backend.as_ref() else {
            return MISSING_CLIENT_MESSAGE.to_string();
        };

        let Some(api_key) = api_key.filter(|k| !k.expose_secret().trim().is_empty()) else {
            return MISSING_API_KEY_MESSAGE.to_string();
        };

        let request = self.build_request(ticker, query, metrics);

        match backend.complete(api_key, &request).await {
            Ok(content) => {
                info!(backend = backend.name(), "AI analysis completed");
                content
            }
            Err(e) => {
                warn!(backend = backend.name(), error = %e, "AI analysis failed");
                format!(
                    "AI Error: {}\n\nMake sure your API key is valid or try again without emojis in your question.",
                    e
                )
            }
        }
    }
}

impl From<&AiConfig> for CompletionSettings {
    fn from(config: &AiConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}
