//! 기업 프로필과 표시 형식.
//!
//! 이름을 제외한 모든 필드는 선택 사항이며, 값이 없으면 `"N/A"`로 표시합니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::types::{DecimalExt, Percentage, Price, Ticker};

/// 값이 없을 때 표시하는 문자열.
pub const NOT_AVAILABLE: &str = "N/A";

/// 기업 프로필 및 거래 정보.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub ticker: Ticker,
    /// 회사명 (없으면 티커)
    pub company: String,
    pub sector: Option<String>,
    pub industry: Option<String>,
    /// 시가총액 (USD)
    pub market_cap: Option<u64>,
    /// 후행 PER
    pub pe_ratio: Option<Decimal>,
    pub day_high: Option<Price>,
    pub day_low: Option<Price>,
    pub week52_high: Option<Price>,
    pub week52_low: Option<Price>,
    pub volume: Option<u64>,
    pub avg_volume: Option<u64>,
    /// 배당수익률 (비율, 0.005 = 0.5%)
    pub dividend_yield: Option<Decimal>,
}

impl CompanyProfile {
    /// 이름만 있는 빈 프로필을 생성합니다.
    pub fn new(ticker: Ticker) -> Self {
        Self {
            company: ticker.to_string(),
            ticker,
            sector: None,
            industry: None,
            market_cap: None,
            pe_ratio: None,
            day_high: None,
            day_low: None,
            week52_high: None,
            week52_low: None,
            volume: None,
            avg_volume: None,
            dividend_yield: None,
        }
    }

    /// 회사명을 설정합니다. 공백이면 무시합니다.
    pub fn with_company(mut self, name: Option<String>) -> Self {
        if let Some(name) = name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()) {
            self.company = name;
        }
        self
    }

    pub fn sector_display(&self) -> String {
        or_na(self.sector.as_deref())
    }

    pub fn industry_display(&self) -> String {
        or_na(self.industry.as_deref())
    }

    /// 시가총액을 `$X.XXB` 형식으로 표시합니다.
    pub fn market_cap_display(&self) -> String {
        match self.market_cap {
            Some(cap) if cap > 0 => {
                format!("${}B", (Decimal::from(cap) / Decimal::from(1_000_000_000u64)).fmt2())
            }
            _ => NOT_AVAILABLE.to_string(),
        }
    }

    pub fn pe_ratio_display(&self) -> String {
        match self.pe_ratio {
            Some(pe) => pe.fmt2(),
            None => NOT_AVAILABLE.to_string(),
        }
    }

    /// 배당수익률을 퍼센트로 표시합니다. 0 이하면 N/A.
    pub fn dividend_yield_display(&self) -> String {
        match self.dividend_yield_pct() {
            Some(pct) => format!("{}%", pct.fmt2()),
            None => NOT_AVAILABLE.to_string(),
        }
    }

    /// 배당수익률 (%). 양수일 때만 값이 있습니다.
    pub fn dividend_yield_pct(&self) -> Option<Percentage> {
        self.dividend_yield
            .filter(|y| *y > Decimal::ZERO)
            .map(|y| y * Decimal::ONE_HUNDRED)
    }
}

/// 값이 있으면 그대로, 없으면 `N/A`.
pub fn or_na<T: Display>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// 가격을 `$X.XX` 형식으로 표시합니다.
pub fn format_price(value: Option<Price>) -> String {
    match value {
        Some(p) => format!("${}", p.fmt2()),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// 거래량을 백만 단위 `X.XXM`으로 표시합니다. 0이거나 없으면 N/A.
pub fn format_volume_millions(volume: Option<u64>) -> String {
    match volume {
        Some(v) if v > 0 => format!("{}M", (Decimal::from(v) / Decimal::from(1_000_000u64)).fmt2()),
        _ => NOT_AVAILABLE.to_string(),
    }
}
