//! 데이터 갱신 명령어.
//!
//! 설정된 모든 소스의 과거 결과 CSV를 다운로드하고 (실패 시
//! 로컬 사본 폴백) 병합 아카이브를 다시 만듭니다.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use lotto_core::AppConfig;
use lotto_data::DrawStore;
use lotto_notification::NotificationManager;
use tracing::{info, warn};

pub async fn run(config: &AppConfig, notifier: &NotificationManager) -> Result<()> {
    let store = DrawStore::new(config.data.clone())
        .context("데이터 저장소를 초기화할 수 없습니다")?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message("과거 결과 다운로드 중...");

    let report = store.update_all().await.context("데이터 갱신 실패")?;

    pb.finish_with_message(format!("{}개 추첨 병합 완료", report.merged));

    println!("\n📥 데이터 갱신 완료");
    for source in &report.sources {
        let freshness = if source.stale {
            "⚠️ 오래된 로컬 사본"
        } else {
            "✅ 최신"
        };
        println!(
            "  {} — {}개 추첨, {}개 행 건너뜀 ({})",
            source.lottery, source.draws, source.skipped, freshness
        );
    }
    println!(
        "  병합 아카이브: {} ({}개 추첨)",
        store.archive_path().display(),
        report.merged
    );

    if report.stale_sources() > 0 {
        warn!(
            stale = report.stale_sources(),
            "Some sources fell back to stale local copies"
        );
    }
    info!(merged = report.merged, "Update completed");

    if notifier.has_enabled_sender() {
        if let Err(e) = notifier
            .notify_data_updated(
                report.sources.len(),
                report.stale_sources(),
                report.merged,
            )
            .await
        {
            warn!(error = %e, "Update notification failed");
        }
    }

    Ok(())
}
