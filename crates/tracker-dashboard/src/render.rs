//! 렌더 모델.
//!
//! 표시 계층(HTTP JSON, 터미널)은 이 모델을 그대로 그리기만 합니다.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracker_ai::AnalysisKind;
use tracker_core::{
    format_price, format_volume_millions, ChatMessage, CompanyProfile, DecimalExt, Period, Quote,
    Ticker,
};

use crate::chart::{ChartSpec, ChartStats};

/// 하단 면책 문구.
pub const DISCLAIMER: &str = "This tool is for informational purposes only. Not financial advice. Always do your own research.";

/// 데이터 출처 문구.
pub const ATTRIBUTION: &str = "Data provided by Yahoo Finance | AI powered by Groq";

/// 화면 전체 모델.
#[derive(Debug, Clone, Serialize)]
pub struct RenderModel {
    pub header: Header,
    /// 시세가 있을 때만 표시
    pub metrics: Option<MetricsPanel>,
    pub chart: ChartPanel,
    pub details: DetailsPanel,
    pub ai: AiPanel,
    pub chat: ChatPanel,
    pub banners: Vec<Banner>,
    pub footer: Footer,
}

impl RenderModel {
    /// 특정 수준의 배너가 있는지 확인합니다.
    pub fn has_banner(&self, level: BannerLevel) -> bool {
        self.banners.iter().any(|b| b.level == level)
    }
}

/// 헤더.
#[derive(Debug, Clone, Serialize)]
pub struct Header {
    pub ticker: Ticker,
    pub company: String,
    pub period: Period,
    pub last_updated: DateTime<Utc>,
}

impl Header {
    /// `"Apple Inc. (AAPL) | Last updated: 2024-01-02 15:04:05"`
    pub fn subtitle(&self) -> String {
        format!(
            "{} ({}) | Last updated: {}",
            self.company,
            self.ticker,
            self.last_updated.format("%Y-%m-%d %H:%M:%S")
        )
    }
}

/// 상단 지표 패널.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsPanel {
    pub price: Decimal,
    pub change: Decimal,
    pub change_pct: Decimal,
    pub day_high: String,
    pub day_low: String,
    pub volume: String,
}

impl MetricsPanel {
    pub fn new(quote: &Quote, profile: Option<&CompanyProfile>) -> Self {
        Self {
            price: quote.price,
            change: quote.change,
            change_pct: quote.change_pct,
            day_high: format_price(profile.and_then(|p| p.day_high)),
            day_low: format_price(profile.and_then(|p| p.day_low)),
            volume: format_volume_millions(profile.and_then(|p| p.volume)),
        }
    }

    /// 현재가 `"$153.00"`.
    pub fn price_display(&self) -> String {
        format!("${}", self.price.fmt2())
    }

    /// 변동 `"3.00 (2.00%)"`.
    pub fn delta_display(&self) -> String {
        format!("{} ({}%)", self.change.fmt2(), self.change_pct.fmt2())
    }
}

/// 차트 패널.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChartPanel {
    Ready {
        spec: Box<ChartSpec>,
        stats: Option<ChartStats>,
    },
    Unavailable {
        message: String,
    },
}

impl ChartPanel {
    pub fn unavailable(ticker: &Ticker) -> Self {
        ChartPanel::Unavailable {
            message: format!("Unable to load chart data for {}", ticker),
        }
    }
}

/// 상세 정보 패널.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DetailsPanel {
    Ready {
        company: CompanyInfo,
        trading: TradingInfo,
    },
    Unavailable {
        message: String,
    },
}

/// 회사 정보 (표시 문자열).
#[derive(Debug, Clone, Serialize)]
pub struct CompanyInfo {
    pub company: String,
    pub sector: String,
    pub industry: String,
    pub market_cap: String,
    pub pe_ratio: String,
}

/// 거래 정보 (표시 문자열).
#[derive(Debug, Clone, Serialize)]
pub struct TradingInfo {
    pub week52_high: String,
    pub week52_low: String,
    pub avg_volume: String,
    pub dividend_yield: String,
}

impl DetailsPanel {
    pub fn from_profile(ticker: &Ticker, profile: Option<&CompanyProfile>) -> Self {
        let Some(p) = profile else {
            return DetailsPanel::Unavailable {
                message: format!("No stock info available for {}.", ticker),
            };
        };

        DetailsPanel::Ready {
            company: CompanyInfo {
                company: p.company.clone(),
                sector: p.sector_display(),
                industry: p.industry_display(),
                market_cap: p.market_cap_display(),
                pe_ratio: p.pe_ratio_display(),
            },
            trading: TradingInfo {
                week52_high: format_price(p.week52_high),
                week52_low: format_price(p.week52_low),
                avg_volume: format_volume_millions(p.avg_volume),
                dividend_yield: p.dividend_yield_display(),
            },
        }
    }
}

/// AI 기능 사용 가능 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AiStatus {
    /// 클라이언트가 빌드에 포함되지 않음
    ClientMissing,
    /// API 키 필요
    NeedsKey,
    Ready,
}

/// 분석 버튼.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOption {
    pub kind: AnalysisKind,
    pub label: &'static str,
}

/// 분석 결과.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub kind: AnalysisKind,
    pub text: String,
}

/// AI 분석 패널.
#[derive(Debug, Clone, Serialize)]
pub struct AiPanel {
    pub status: AiStatus,
    pub message: String,
    pub options: Vec<AnalysisOption>,
    pub result: Option<AnalysisResult>,
}

impl AiPanel {
    pub fn new(status: AiStatus, ticker: &Ticker) -> Self {
        let message = match status {
            AiStatus::ClientMissing => tracker_ai::MISSING_CLIENT_MESSAGE.to_string(),
            AiStatus::NeedsKey => format!(
                "{} Get your free API key at: {}",
                tracker_ai::MISSING_API_KEY_MESSAGE,
                tracker_ai::API_KEY_HELP_URL
            ),
            AiStatus::Ready => format!(
                "Click a button below to get AI-powered analysis of {} stock",
                ticker
            ),
        };

        let options = if status == AiStatus::Ready {
            AnalysisKind::ALL
                .iter()
                .map(|kind| AnalysisOption {
                    kind: *kind,
                    label: kind.label(),
                })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            status,
            message,
            options,
            result: None,
        }
    }
}

/// 채팅 패널.
#[derive(Debug, Clone, Serialize)]
pub struct ChatPanel {
    pub status: AiStatus,
    pub messages: Vec<ChatMessage>,
    pub placeholder: String,
}

/// 배너 수준.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// 알림 배너.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Banner {
    pub level: BannerLevel,
    pub message: String,
}

impl Banner {
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(BannerLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(BannerLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(BannerLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(BannerLevel::Error, message)
    }

    fn new(level: BannerLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// 하단 문구.
#[derive(Debug, Clone, Serialize)]
pub struct Footer {
    pub disclaimer: &'static str,
    pub attribution: &'static str,
}

impl Default for Footer {
    fn default() -> Self {
        Self {
            disclaimer: DISCLAIMER,
            attribution: ATTRIBUTION,
        }
    }
}
