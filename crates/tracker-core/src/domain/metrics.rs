//! 프롬프트 조립용 지표 맵.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::profile::{CompanyProfile, NOT_AVAILABLE};
use super::quote::Quote;
use crate::types::DecimalExt;

/// 지표 키.
pub mod keys {
    pub const COMPANY: &str = "company";
    pub const CURRENT_PRICE: &str = "current_price";
    pub const CHANGE: &str = "change";
    pub const CHANGE_PCT: &str = "change_pct";
    pub const DAY_HIGH: &str = "day_high";
    pub const DAY_LOW: &str = "day_low";
    pub const WEEK52_HIGH: &str = "52week_high";
    pub const WEEK52_LOW: &str = "52week_low";
    pub const MARKET_CAP: &str = "market_cap";
    pub const PE_RATIO: &str = "pe_ratio";
    pub const VOLUME: &str = "volume";
    pub const AVG_VOLUME: &str = "avg_volume";
    pub const DIVIDEND_YIELD: &str = "dividend_yield";
    pub const SECTOR: &str = "sector";
    pub const INDUSTRY: &str = "industry";
    pub const HISTORICAL_SUMMARY: &str = "historical_summary";
}

/// `키 → 텍스트` 평면 맵. 없는 키는 `N/A`로 읽힙니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockMetrics {
    values: BTreeMap<String, String>,
}

impl StockMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// 시세, 프로필, 과거 요약으로 지표 맵을 구성합니다.
    pub fn from_snapshot(
        quote: Option<&Quote>,
        profile: Option<&CompanyProfile>,
        historical_summary: impl Into<String>,
    ) -> Self {
        let mut metrics = Self::new();

        if let Some(q) = quote {
            metrics.insert(keys::CURRENT_PRICE, q.price.fmt2());
            metrics.insert(keys::CHANGE, q.change.fmt2());
            metrics.insert(keys::CHANGE_PCT, q.change_pct.fmt2());
        }

        if let Some(p) = profile {
            metrics.insert(keys::COMPANY, p.company.clone());
            metrics.insert_opt(keys::DAY_HIGH, p.day_high.map(|v| v.fmt2()));
            metrics.insert_opt(keys::DAY_LOW, p.day_low.map(|v| v.fmt2()));
            metrics.insert_opt(keys::WEEK52_HIGH, p.week52_high.map(|v| v.fmt2()));
            metrics.insert_opt(keys::WEEK52_LOW, p.week52_low.map(|v| v.fmt2()));
            metrics.insert_opt(keys::MARKET_CAP, p.market_cap.map(|_| p.market_cap_display()));
            metrics.insert_opt(keys::PE_RATIO, p.pe_ratio.map(|_| p.pe_ratio_display()));
            metrics.insert_opt(keys::VOLUME, p.volume.map(|v| v.to_string()));
            metrics.insert_opt(keys::AVG_VOLUME, p.avg_volume.map(|v| v.to_string()));
            metrics.insert_opt(
                keys::DIVIDEND_YIELD,
                p.dividend_yield_pct().map(|v| format!("{}%", v.fmt2())),
            );
            metrics.insert_opt(keys::SECTOR, p.sector.clone());
            metrics.insert_opt(keys::INDUSTRY, p.industry.clone());
        }

        metrics.insert(keys::HISTORICAL_SUMMARY, historical_summary);
        metrics
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    fn insert_opt(&mut self, key: &str, value: Option<String>) {
        if let Some(v) = value {
            self.insert(key, v);
        }
    }

    /// 값을 조회합니다. 없으면 `N/A`.
    pub fn get(&self, key: &str) -> &str {
        self.values.get(key).map(String::as_str).unwrap_or(NOT_AVAILABLE)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
