//! # Tracker AI
//!
//! 시세 데이터를 컨텍스트로 붙여 chat-completion API에 질문을 전달합니다.
//!
//! - `sanitize`: 전송 전 7비트 출력 가능 문자만 남김
//! - `prompt`: 시스템 프롬프트와 컨텍스트 템플릿
//! - `client`: OpenAI 호환 HTTP 클라이언트 (`groq` feature)
//! - `bridge`: 사전 조건 확인과 에러를 모두 텍스트로 돌려주는 진입점

pub mod bridge;
#[cfg(feature = "groq")]
pub mod client;
pub mod prompt;
pub mod sanitize;
pub mod types;

pub use bridge::{
    AssistantBridge, ChatCompletion, API_KEY_HELP_URL, MISSING_API_KEY_MESSAGE,
    MISSING_CLIENT_MESSAGE,
};
#[cfg(feature = "groq")]
pub use client::GroqClient;
pub use prompt::{build_context, build_user_message, SYSTEM_PROMPT};
pub use sanitize::sanitize;
pub use types::*;
