//! `chat`: 한 줄 단위 대화 루프.
//!
//! `/clear`는 기록 삭제, `/quit` 또는 입력 종료(EOF)는 루프 종료.

use anyhow::Result;
use std::io::{BufRead, Write};
use tracing::debug;
use tracker_core::ChatRole;
use tracker_dashboard::{AiStatus, UserAction};

use crate::context::CliContext;
use crate::display;

const PROMPT: &str = "> ";

/// 채팅 루프 명령.
#[derive(Debug, PartialEq, Eq)]
enum ChatCommand<'a> {
    Quit,
    Clear,
    Skip,
    Ask(&'a str),
}

fn parse_line(line: &str) -> ChatCommand<'_> {
    match line.trim() {
        "/quit" | "/exit" => ChatCommand::Quit,
        "/clear" => ChatCommand::Clear,
        "" => ChatCommand::Skip,
        text => ChatCommand::Ask(text),
    }
}

pub async fn chat(
    ctx: &mut CliContext,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    let status = ctx.handler.ai_status(&ctx.session);
    if status != AiStatus::Ready {
        let model = ctx.handler.handle(&mut ctx.session, UserAction::View).await;
        writeln!(out, "{}", model.ai.message)?;
        return Ok(());
    }

    writeln!(
        out,
        "Ask anything about {} stock. /clear to reset, /quit to exit.",
        ctx.session.ticker()
    )?;

    let mut line = String::new();
    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        match parse_line(&line) {
            ChatCommand::Quit => break,
            ChatCommand::Skip => continue,
            ChatCommand::Clear => {
                ctx.handler
                    .handle(&mut ctx.session, UserAction::ClearChat)
                    .await;
                writeln!(out, "Chat cleared.")?;
            }
            ChatCommand::Ask(text) => {
                debug!(len = text.len(), "chat question");
                let model = ctx
                    .handler
                    .handle(&mut ctx.session, UserAction::Chat(text.to_string()))
                    .await;
                write!(out, "{}", display::banners(&model.banners))?;
                if let Some(reply) = model
                    .chat
                    .messages
                    .iter()
                    .rev()
                    .find(|m| m.role == ChatRole::Assistant)
                {
                    writeln!(out, "{}", display::chat_message(reply))?;
                }
            }
        }
    }

    Ok(())
}
