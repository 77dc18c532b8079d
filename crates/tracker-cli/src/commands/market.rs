//! 시세, 과거 데이터, 프로필, 차트 조회.
//!
//! 게이트웨이를 직접 호출합니다. 데이터 없음은 안내 문구로, 조회 실패는 에러로 끝납니다.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;
use tracker_core::DecimalExt;
use tracker_dashboard::{render_price_chart, ChartStats};

use crate::context::CliContext;
use crate::display;

/// `quote`: 현재가와 당일 지표.
pub async fn quote(ctx: &CliContext, out: &mut impl Write) -> Result<()> {
    let ticker = ctx.session.ticker();
    let gateway = ctx.handler.gateway();

    let quote = gateway
        .current_quote(ticker)
        .await
        .with_context(|| format!("Error fetching price for {}", ticker))?;
    let profile = gateway.profile(ticker).await.ok().flatten();

    match quote {
        Some(quote) => write!(out, "{}", display::quote(&quote, profile.as_ref()))?,
        None => writeln!(out, "No price data available for {}.", ticker)?,
    }
    Ok(())
}

/// `history`: 과거 시계열 표 (최근 `limit`개).
pub async fn history(ctx: &CliContext, limit: usize, out: &mut impl Write) -> Result<()> {
    let ticker = ctx.session.ticker();
    let series = ctx
        .handler
        .gateway()
        .historical_series(ticker, ctx.session.period())
        .await
        .with_context(|| format!("Error fetching historical data for {}", ticker))?;

    write!(out, "{}", display::history(&series, limit))?;
    Ok(())
}

/// `profile`: 회사/거래 정보.
pub async fn profile(ctx: &CliContext, out: &mut impl Write) -> Result<()> {
    let ticker = ctx.session.ticker();
    let profile = ctx
        .handler
        .gateway()
        .profile(ticker)
        .await
        .with_context(|| format!("Error fetching stock info for {}", ticker))?;

    match profile {
        Some(profile) => write!(out, "{}", display::profile(&profile))?,
        None => writeln!(out, "No stock info available for {}.", ticker)?,
    }
    Ok(())
}

/// `chart`: plotly 호환 차트 명세를 JSON 파일로 저장합니다.
pub async fn chart(ctx: &CliContext, output: &Path, out: &mut impl Write) -> Result<()> {
    let ticker = ctx.session.ticker();
    let series = ctx
        .handler
        .gateway()
        .historical_series(ticker, ctx.session.period())
        .await
        .with_context(|| format!("Error fetching historical data for {}", ticker))?;

    let spec = match render_price_chart(&series) {
        Ok(spec) => spec,
        Err(_) => {
            writeln!(out, "Unable to load chart data for {}", ticker)?;
            return Ok(());
        }
    };

    let file = File::create(output)
        .with_context(|| format!("차트 파일 생성 실패: {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &spec)?;
    writer.flush()?;

    info!(path = %output.display(), bars = series.len(), "chart written");
    writeln!(out, "Chart saved to {}", output.display())?;
    if let Some(stats) = ChartStats::from_series(&series) {
        writeln!(
            out,
            "{} change: {} (${} -> ${})",
            stats.period,
            stats.change_pct_display(),
            stats.start.fmt2(),
            stats.end.fmt2()
        )?;
    }
    Ok(())
}
