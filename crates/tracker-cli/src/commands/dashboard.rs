//! `dashboard`: 전체 화면을 한 번 그립니다.

use anyhow::Result;
use std::io::Write;
use tracker_dashboard::UserAction;

use crate::context::CliContext;
use crate::display;

pub async fn dashboard(ctx: &mut CliContext, out: &mut impl Write) -> Result<()> {
    let model = ctx.handler.handle(&mut ctx.session, UserAction::View).await;
    write!(out, "{}", display::dashboard(&model))?;
    Ok(())
}
