//! AI 브리지 타입 정의.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracker_core::Period;

/// 미리 정의된 분석 요청.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    /// 현재 성과 분석 (1개월 기준)
    CurrentPerformance,
    /// 투자 관점 분석 (3개월 기준)
    InvestmentInsights,
    /// 기술적 분석 (6개월 기준)
    TechnicalAnalysis,
}

impl AnalysisKind {
    pub const ALL: [AnalysisKind; 3] = [
        AnalysisKind::CurrentPerformance,
        AnalysisKind::InvestmentInsights,
        AnalysisKind::TechnicalAnalysis,
    ];

    /// 과거 요약에 사용할 기간.
    pub fn history_period(&self) -> Period {
        match self {
            AnalysisKind::CurrentPerformance => Period::OneMonth,
            AnalysisKind::InvestmentInsights => Period::ThreeMonths,
            AnalysisKind::TechnicalAnalysis => Period::SixMonths,
        }
    }

    /// 모델에 보낼 질문.
    pub fn query(&self) -> &'static str {
        match self {
            AnalysisKind::CurrentPerformance => {
                "Provide a comprehensive analysis of current performance and trends."
            }
            AnalysisKind::InvestmentInsights => {
                "What are the key factors investors should consider? Analyze valuation, growth potential, and risks."
            }
            AnalysisKind::TechnicalAnalysis => {
                "Provide technical analysis: price levels, support/resistance, and momentum based on the data."
            }
        }
    }

    /// 화면 표시 이름.
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisKind::CurrentPerformance => "Analyze Current Performance",
            AnalysisKind::InvestmentInsights => "Investment Insights",
            AnalysisKind::TechnicalAnalysis => "Technical Analysis",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::CurrentPerformance => "current_performance",
            AnalysisKind::InvestmentInsights => "investment_insights",
            AnalysisKind::TechnicalAnalysis => "technical_analysis",
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "current_performance" | "performance" => Ok(Self::CurrentPerformance),
            "investment_insights" | "insights" => Ok(Self::InvestmentInsights),
            "technical_analysis" | "technical" => Ok(Self::TechnicalAnalysis),
            _ => Err(format!("Unknown analysis kind: {}", s)),
        }
    }
}

/// chat-completion 메시지 (OpenAI 호환).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: String,
    pub content: String,
}

impl WireMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// chat-completion 요청 본문.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// chat-completion 응답 본문.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// API 에러 응답 (`{"error": {"message": ...}}`).
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
}

/// AI 호출 에러. `AssistantBridge::analyze` 밖으로 나가지 않습니다.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("Error code: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

pub type AiResult<T> = Result<T, AiError>;
