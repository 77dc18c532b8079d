//! 주식 대시보드 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 애플 현재가
//! tracker quote
//!
//! # 마이크로소프트 6개월 시계열
//! tracker --ticker MSFT --period 6mo history
//!
//! # 차트 명세 저장
//! tracker --ticker TSLA chart --output tsla.json
//!
//! # AI 분석 (GROQ_API_KEY 필요)
//! tracker analyze technical
//!
//! # 대화
//! tracker --ticker NVDA chat
//! ```

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use tracing::{error, Instrument};
use tracker_ai::AnalysisKind;
use tracker_cli::commands::{analyze, chat, dashboard, market, periods};
use tracker_cli::{CliContext, SessionOptions};
use tracker_core::{init_logging, ticker_span, AppConfig, LogConfig, Period};

#[derive(Parser)]
#[command(name = "tracker")]
#[command(about = "Stock dashboard CLI - Yahoo Finance 시세와 AI 분석", long_about = None)]
#[command(version)]
struct Cli {
    /// 종목 티커 (기본: 설정의 기본 티커)
    #[arg(short, long, global = true)]
    ticker: Option<String>,

    /// 조회 기간 (1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y)
    #[arg(short, long, global = true)]
    period: Option<Period>,

    /// Groq API 키
    #[arg(long, global = true, env = "GROQ_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// 설정 파일 (없으면 기본값과 환경 변수 사용)
    #[arg(short, long, global = true, default_value = "config/default.toml")]
    config: PathBuf,

    /// 상세 로그 출력
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 현재가와 당일 지표
    Quote,

    /// 과거 OHLCV 시계열
    History {
        /// 표시할 최근 봉 수
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// 회사 및 거래 정보
    Profile,

    /// 캔들스틱 + 거래량 차트 명세를 JSON으로 저장
    Chart {
        /// 출력 파일 경로
        #[arg(short, long)]
        output: PathBuf,
    },

    /// AI 분석 (current_performance, investment_insights, technical_analysis)
    Analyze {
        /// 분석 종류 (performance, insights, technical 별칭 허용)
        kind: AnalysisKind,
    },

    /// AI와 대화 (/clear, /quit)
    Chat,

    /// 전체 대시보드 출력
    Dashboard,

    /// 조회 기간 목록
    Periods,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = AppConfig::load_or_default(Some(cli.config.as_path()))?;

    // 기본은 경고 이상만 출력 (RUST_LOG가 있으면 우선)
    let log_config = if cli.verbose {
        LogConfig::from(&config.logging)
    } else {
        LogConfig {
            level: "warn".to_string(),
            ..LogConfig::from(&config.logging)
        }
    };
    init_logging(log_config).map_err(|e| anyhow!(e.to_string()))?;

    if let Err(e) = run(cli, config).await {
        error!("command failed: {:#}", e);
        return Err(e);
    }
    Ok(())
}

async fn run(cli: Cli, config: AppConfig) -> Result<()> {
    let mut stdout = io::stdout().lock();

    if let Commands::Periods = cli.command {
        return periods::periods(config.session.default_period, &mut stdout);
    }

    let options = SessionOptions {
        ticker: cli.ticker,
        period: cli.period,
        api_key: cli.api_key,
    };
    let mut ctx = CliContext::from_config(config, options)?;

    let span = ticker_span!("command", ctx.session.ticker(), ctx.session.period());
    dispatch(cli.command, &mut ctx, &mut stdout)
        .instrument(span)
        .await
}

async fn dispatch(command: Commands, ctx: &mut CliContext, stdout: &mut impl io::Write) -> Result<()> {
    match command {
        Commands::Quote => market::quote(ctx, stdout).await,
        Commands::History { limit } => market::history(ctx, limit, stdout).await,
        Commands::Profile => market::profile(ctx, stdout).await,
        Commands::Chart { output } => market::chart(ctx, &output, stdout).await,
        Commands::Analyze { kind } => analyze::analyze(ctx, kind, stdout).await,
        Commands::Chat => {
            let mut stdin = io::stdin().lock();
            chat::chat(ctx, &mut stdin, stdout).await
        }
        Commands::Dashboard => dashboard::dashboard(ctx, stdout).await,
        Commands::Periods => periods::periods(ctx.config.session.default_period, stdout),
    }
}
