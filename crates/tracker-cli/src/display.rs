//! 터미널 출력 포맷.
//!
//! 모든 함수는 문자열을 돌려주고 출력은 호출자가 담당합니다.

use std::fmt::Write as _;
use tracker_core::{
    format_volume_millions, ChatMessage, ChatRole, CompanyProfile, DecimalExt, HistoricalSeries,
    Period, Quote,
};
use tracker_dashboard::{
    AiPanel, Banner, BannerLevel, ChartPanel, ChatPanel, DetailsPanel, MetricsPanel, RenderModel,
};

const RULE: &str = "------------------------------------------------------------";

/// 배너 한 줄.
pub fn banner_line(banner: &Banner) -> String {
    let tag = match banner.level {
        BannerLevel::Info => "INFO",
        BannerLevel::Success => "OK",
        BannerLevel::Warning => "WARN",
        BannerLevel::Error => "ERROR",
    };
    format!("[{}] {}", tag, banner.message)
}

/// 배너 목록.
pub fn banners(banners: &[Banner]) -> String {
    banners
        .iter()
        .map(|b| banner_line(b) + "\n")
        .collect()
}

/// 시세 요약.
pub fn quote(quote: &Quote, profile: Option<&CompanyProfile>) -> String {
    metrics(&MetricsPanel::new(quote, profile), &quote.ticker.to_string())
}

fn metrics(panel: &MetricsPanel, label: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<14}{} {}",
        label,
        panel.price_display(),
        panel.delta_display()
    );
    let _ = writeln!(
        out,
        "Day High: {}  Day Low: {}  Volume: {}",
        panel.day_high, panel.day_low, panel.volume
    );
    out
}

/// 과거 시계열 표. `limit`개의 최근 봉만 보여줍니다.
pub fn history(series: &HistoricalSeries, limit: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({}, {} bars)", series.ticker, series.period, series.len());
    let _ = writeln!(out, "{}", series.summary_line());

    if series.is_empty() {
        return out;
    }

    let _ = writeln!(
        out,
        "{:<12}{:>12}{:>12}{:>12}{:>12}{:>10}",
        "Date", "Open", "High", "Low", "Close", "Volume"
    );
    let skip = series.len().saturating_sub(limit);
    for bar in series.bars().iter().skip(skip) {
        let _ = writeln!(
            out,
            "{:<12}{:>12}{:>12}{:>12}{:>12}{:>10}",
            bar.date.format("%Y-%m-%d"),
            bar.open.fmt2(),
            bar.high.fmt2(),
            bar.low.fmt2(),
            bar.close.fmt2(),
            format_volume_millions(Some(bar.volume))
        );
    }
    out
}

/// 기업 프로필.
pub fn profile(profile: &CompanyProfile) -> String {
    details_panel(&DetailsPanel::from_profile(&profile.ticker, Some(profile)))
}

/// 조회 기간 목록. 기본 기간에 `*` 표시.
pub fn periods(default: Period) -> String {
    Period::ALL
        .iter()
        .map(|p| {
            let marker = if *p == default { "*" } else { " " };
            format!("{} {}\n", marker, p)
        })
        .collect()
}

/// 채팅 메시지 한 개.
pub fn chat_message(message: &ChatMessage) -> String {
    let who = match message.role {
        ChatRole::User => "You",
        ChatRole::Assistant => "AI",
    };
    format!("{}: {}", who, message.content)
}

fn chart_panel(panel: &ChartPanel) -> String {
    match panel {
        ChartPanel::Ready { stats: Some(stats), .. } => format!(
            "Chart ({}): ${} -> ${}  {}\n",
            stats.period,
            stats.start.fmt2(),
            stats.end.fmt2(),
            stats.change_pct_display()
        ),
        ChartPanel::Ready { stats: None, .. } => "Chart ready.\n".to_string(),
        ChartPanel::Unavailable { message } => format!("{}\n", message),
    }
}

fn details_panel(panel: &DetailsPanel) -> String {
    match panel {
        DetailsPanel::Ready { company, trading } => {
            let mut out = String::new();
            let _ = writeln!(out, "Company Information");
            let _ = writeln!(out, "  Company:        {}", company.company);
            let _ = writeln!(out, "  Sector:         {}", company.sector);
            let _ = writeln!(out, "  Industry:       {}", company.industry);
            let _ = writeln!(out, "  Market Cap:     {}", company.market_cap);
            let _ = writeln!(out, "  P/E Ratio:      {}", company.pe_ratio);
            let _ = writeln!(out, "Trading Information");
            let _ = writeln!(out, "  52W High:       {}", trading.week52_high);
            let _ = writeln!(out, "  52W Low:        {}", trading.week52_low);
            let _ = writeln!(out, "  Avg Volume:     {}", trading.avg_volume);
            let _ = writeln!(out, "  Dividend Yield: {}", trading.dividend_yield);
            out
        }
        DetailsPanel::Unavailable { message } => format!("{}\n", message),
    }
}

/// AI 분석 패널.
pub fn ai_panel(panel: &AiPanel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "AI Analysis");
    let _ = writeln!(out, "  {}", panel.message);
    for option in &panel.options {
        let _ = writeln!(out, "  - {} (tracker analyze {})", option.label, option.kind);
    }
    if let Some(result) = &panel.result {
        let _ = writeln!(out, "{}", RULE);
        let _ = writeln!(out, "{}", result.text);
    }
    out
}

fn chat_panel(panel: &ChatPanel) -> String {
    if panel.messages.is_empty() {
        return String::new();
    }
    let mut out = String::from("Chat\n");
    for message in &panel.messages {
        let _ = writeln!(out, "  {}", chat_message(message));
    }
    out
}

/// 대시보드 전체 화면.
pub fn dashboard(model: &RenderModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", model.header.subtitle());
    let _ = writeln!(out, "{}", RULE);
    out.push_str(&banners(&model.banners));

    match &model.metrics {
        Some(panel) => out.push_str(&metrics(panel, "Current Price")),
        None => {
            let _ = writeln!(out, "Price data not available.");
        }
    }
    out.push_str(&chart_panel(&model.chart));
    let _ = writeln!(out, "{}", RULE);
    out.push_str(&details_panel(&model.details));
    let _ = writeln!(out, "{}", RULE);
    out.push_str(&ai_panel(&model.ai));
    out.push_str(&chat_panel(&model.chat));
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "{}", model.footer.disclaimer);
    let _ = writeln!(out, "{}", model.footer.attribution);
    out
}
