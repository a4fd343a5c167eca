//! 복권 분석 파이프라인 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 과거 결과 다운로드 및 병합 아카이브 갱신
//! lotto update
//!
//! # Primitiva 번호 추천 (티켓 저장 + 텔레그램 알림)
//! lotto recommend -l primitiva
//!
//! # 저장된 티켓을 최근 추첨과 대조
//! lotto check
//!
//! # 보정 주기 / 트리플렛 / 가설 검증 보고서
//! lotto cycles -l all
//! lotto triplets -l bonoloto --days 365
//! lotto validate -l primitiva
//! ```

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use lotto_core::{init_logging, init_logging_from_env, AppConfig, LogConfig, LogFormat};
use lotto_notification::{NotificationManager, TelegramConfig, TelegramSender};

mod commands;

use commands::Selection;

#[derive(Parser)]
#[command(name = "lotto")]
#[command(about = "복권 추첨 통계 분석 파이프라인", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 경로
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 과거 결과 다운로드 및 병합 아카이브 갱신
    Update,

    /// 번호 점수 계산 및 티켓 추천
    Recommend {
        /// 분석 대상 (primitiva, bonoloto, all)
        #[arg(short, long, default_value = "all")]
        lottery: String,

        /// 티켓을 파일로 저장하지 않음
        #[arg(long, default_value = "false")]
        no_save: bool,
    },

    /// 저장된 티켓을 최근 추첨과 대조
    Check,

    /// 보정일 탐지 및 주기별 분포 보고서
    Cycles {
        /// 분석 대상 (primitiva, bonoloto, all)
        #[arg(short, long, default_value = "all")]
        lottery: String,
    },

    /// 트리플렛 동시 출현 순위
    Triplets {
        /// 분석 대상 (primitiva, bonoloto, all)
        #[arg(short, long, default_value = "all")]
        lottery: String,

        /// 되돌아보기 기간 (일)
        #[arg(short, long)]
        days: Option<i64>,

        /// 시작 날짜 (YYYY-MM-DD, --days보다 우선)
        #[arg(short, long)]
        from: Option<String>,

        /// 출력할 상위 트리플렛 수
        #[arg(short, long, default_value = "25")]
        top: usize,
    },

    /// 보상-모멘텀 가설 검증
    Validate {
        /// 분석 대상 (primitiva, bonoloto, all)
        #[arg(short, long, default_value = "all")]
        lottery: String,
    },

    /// 설정 및 데이터 파일 상태 확인
    Health,
}

fn parse_selection(raw: &str) -> Result<Selection> {
    Selection::from_arg(raw).ok_or_else(|| {
        anyhow!(
            "알 수 없는 복권: {}. 지원: primitiva, bonoloto, all",
            raw
        )
    })
}

fn build_notifier(config: &AppConfig) -> NotificationManager {
    let mut manager = NotificationManager::new();
    if config.notifications.telegram_enabled {
        if let Some(mut telegram) = TelegramConfig::from_env() {
            telegram.parse_mode = config.notifications.parse_mode.clone();
            manager.add_sender(TelegramSender::new(telegram));
        }
    }
    manager
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = AppConfig::load_or_default(&cli.config)
        .map_err(|e| anyhow!("설정 파일 로드 실패 ({}): {}", cli.config, e))?;

    // RUST_LOG / LOG_FORMAT 환경 변수는 설정 파일보다 우선
    if std::env::var("RUST_LOG").is_ok() || std::env::var("LOG_FORMAT").is_ok() {
        init_logging_from_env().map_err(|e| anyhow!("로깅 초기화 실패: {}", e))?;
    } else {
        let log_config = LogConfig::new(&config.logging.level).with_format(
            config
                .logging
                .format
                .parse::<LogFormat>()
                .unwrap_or_default(),
        );
        init_logging(log_config).map_err(|e| anyhow!("로깅 초기화 실패: {}", e))?;
    }

    let notifier = build_notifier(&config);

    match cli.command {
        Commands::Update => commands::update::run(&config, &notifier).await?,

        Commands::Recommend { lottery, no_save } => {
            let selection = parse_selection(&lottery)?;
            commands::recommend::run(&config, selection, !no_save, &notifier).await?;
        }

        Commands::Check => commands::check::run(&config, &notifier).await?,

        Commands::Cycles { lottery } => {
            let selection = parse_selection(&lottery)?;
            commands::cycles::run(&config, selection)?;
        }

        Commands::Triplets {
            lottery,
            days,
            from,
            top,
        } => {
            let selection = parse_selection(&lottery)?;
            commands::triplets::run(&config, selection, days, from, top)?;
        }

        Commands::Validate { lottery } => {
            let selection = parse_selection(&lottery)?;
            commands::validate::run(&config, selection)?;
        }

        Commands::Health => commands::health::run(&config, &cli.config)?,
    }

    Ok(())
}
