//! `analyze`: 미리 정의된 AI 분석.

use anyhow::Result;
use std::io::Write;
use tracker_ai::AnalysisKind;
use tracker_dashboard::UserAction;

use crate::context::CliContext;
use crate::display;

pub async fn analyze(ctx: &mut CliContext, kind: AnalysisKind, out: &mut impl Write) -> Result<()> {
    let model = ctx
        .handler
        .handle(&mut ctx.session, UserAction::Analyze(kind))
        .await;

    write!(out, "{}", display::banners(&model.banners))?;
    writeln!(out, "{} - {}", kind.label(), model.header.ticker)?;
    if let Some(result) = &model.ai.result {
        writeln!(out, "{}", result.text)?;
    }
    Ok(())
}
