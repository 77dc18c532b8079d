//! OpenAI 호환 chat-completion HTTP 클라이언트.
//!
//! `POST {base_url}/chat/completions`에 bearer 인증으로 한 번 요청합니다.
//! 재시도나 스트리밍은 하지 않습니다.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};
use tracker_core::AiConfig;

use crate::bridge::ChatCompletion;
use crate::types::{AiError, AiResult, ApiErrorBody, ChatRequest, ChatResponse};

/// Groq (OpenAI 호환) 클라이언트.
pub struct GroqClient {
    base_url: String,
    client: reqwest::Client,
}

impl GroqClient {
    /// 새 클라이언트를 생성합니다.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// 설정에서 클라이언트를 생성합니다.
    pub fn from_config(config: &AiConfig) -> Self {
        Self::new(config.base_url.clone())
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl ChatCompletion for GroqClient {
    fn name(&self) -> &str {
        "groq"
    }

    async fn complete(&self, api_key: &SecretString, request: &ChatRequest) -> AiResult<String> {
        let url = self.completions_url();
        debug!(model = %request.model, messages = request.messages.len(), "Sending chat completion");

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key.expose_secret())
            .json(request)
            .send()
            .await
            .map_err(|e| AiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);

            warn!(status = status.as_u16(), "Chat completion rejected");
            return Err(AiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| AiError::InvalidResponse(e.to_string()))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AiError::InvalidResponse("empty choices".to_string()))?;

        info!(chars = content.len(), "Chat completion received");
        Ok(content)
    }
}
