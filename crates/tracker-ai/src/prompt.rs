//! 프롬프트 조립.
//!
//! 지표 맵을 고정 템플릿에 채워 넣는 결정적 변환입니다. 같은 입력은 항상
//! 같은 문자열을 만듭니다.

use tracker_core::{keys, StockMetrics, Ticker};

use crate::sanitize::sanitize;

/// 시스템 프롬프트.
pub const SYSTEM_PROMPT: &str = "You are a helpful financial analyst assistant. \
Provide clear, balanced analysis of stock data. \
Always remind users this is not financial advice and they should do their own research.";

/// 사용자 메시지 끝에 붙는 지시문.
pub const CLOSING_INSTRUCTION: &str = "Provide helpful analysis based on the data above.";

/// 지표 맵을 컨텍스트 블록으로 변환합니다.
pub fn build_context(ticker: &Ticker, metrics: &StockMetrics) -> String {
    let m = |key: &str| metrics.get(key).to_string();

    format!(
        "Current {ticker} Stock Data:\n\
         - Current Price: ${price}\n\
         - Day Change: {change} ({change_pct}%)\n\
         - Day High: ${day_high}\n\
         - Day Low: ${day_low}\n\
         - 52 Week High: ${w52_high}\n\
         - 52 Week Low: ${w52_low}\n\
         - Market Cap: {market_cap}\n\
         - P/E Ratio: {pe}\n\
         - Volume: {volume}\n\
         - Sector: {sector}\n\
         - Industry: {industry}\n\
         \n\
         Historical Performance:\n\
         {summary}\n",
        price = m(keys::CURRENT_PRICE),
        change = m(keys::CHANGE),
        change_pct = m(keys::CHANGE_PCT),
        day_high = m(keys::DAY_HIGH),
        day_low = m(keys::DAY_LOW),
        w52_high = m(keys::WEEK52_HIGH),
        w52_low = m(keys::WEEK52_LOW),
        market_cap = m(keys::MARKET_CAP),
        pe = m(keys::PE_RATIO),
        volume = m(keys::VOLUME),
        sector = m(keys::SECTOR),
        industry = m(keys::INDUSTRY),
        summary = m(keys::HISTORICAL_SUMMARY),
    )
}

/// 정리된 컨텍스트와 질문으로 사용자 메시지를 만듭니다.
pub fn build_user_message(context: &str, query: &str) -> String {
    format!(
        "{}\n\nUser Query: {}\n\n{}",
        sanitize(context),
        sanitize(query),
        CLOSING_INSTRUCTION
    )
}
