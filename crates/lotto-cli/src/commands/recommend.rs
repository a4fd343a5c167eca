//! 번호 추천 명령어.
//!
//! 전체 파이프라인을 한 번에 실행합니다: 보정 탐지 → 주기 위상
//! 결정 → 위상별 윈도우 선택 → 번호 점수 → 티켓 생성/저장/알림.

use anyhow::{Context, Result};
use lotto_analytics::{
    detect_calibrations, estimate_next_calibration, recommend, CyclePhase, PhaseWindows,
};
use lotto_core::AppConfig;
use lotto_data::DrawStore;
use lotto_notification::NotificationManager;
use tracing::{info, warn};

use super::{today, Selection};

pub async fn run(
    config: &AppConfig,
    selection: Selection,
    save: bool,
    notifier: &NotificationManager,
) -> Result<()> {
    let store = DrawStore::new(config.data.clone())
        .context("데이터 저장소를 초기화할 수 없습니다")?;
    let draws = selection.load(&store)?;
    let today = today();
    let cycle_days = selection.cycle_days(config);

    println!("\n🎰 번호 추천 — {}", selection.label());
    println!("  이력: {}개 추첨 ({} ~ {})", draws.len(), draws[0].date, draws[draws.len() - 1].date);

    // 1. 보정 탐지 및 주기 위상
    let calibrations = detect_calibrations(
        &draws,
        config.analysis.drift_window,
        config.analysis.max_calibration_points,
        cycle_days,
    );

    let (phase, windows) = match calibrations.last() {
        Some(&last) => {
            let next = estimate_next_calibration(last, cycle_days);
            let phase = CyclePhase::determine(
                today,
                last,
                next,
                config.analysis.post_calibration_days,
                config.analysis.pre_calibration_days,
            );
            println!("  마지막 보정 추정일: {} (다음: {})", last, next);
            println!("  주기 위상: {}", phase.description());
            (Some(phase), phase.windows(cycle_days))
        }
        None => {
            // 이력이 짧아 보정을 못 찾으면 설정 기본 윈도우 사용
            println!("  보정일 미탐지 — 기본 분석 윈도우 사용");
            (
                None,
                PhaseWindows {
                    bias_days: config.analysis.bias_days,
                    momentum_days: config.analysis.momentum_days,
                },
            )
        }
    };
    println!(
        "  분석 윈도우: 편향 {}일 / 모멘텀 {}일",
        windows.bias_days, windows.momentum_days
    );

    // 2. 점수 계산 및 티켓 생성
    let rec = recommend(
        &draws,
        today,
        windows.momentum_days,
        windows.bias_days,
        &config.scoring,
    )
    .context("점수 계산 실패")?;

    println!(
        "\n📊 편향 윈도우 균등성 검정: χ² = {:.1}, p = {:.4} ({})",
        rec.global.statistic,
        rec.global.p_value,
        match rec.global.significance() {
            lotto_analytics::Significance::Significant => "유의한 편향 ✅",
            lotto_analytics::Significance::Marginal => "경계선 편향 ⚠️",
            lotto_analytics::Significance::NotSignificant => "편향 없음",
        }
    );
    println!(
        "  추첨 수: 편향 {} / 모멘텀 {}, 번호당 기대 빈도 {:.1}",
        rec.bias_draws, rec.momentum_draws, rec.expected
    );

    println!("\n  상위 12개 번호:");
    println!("  번호 | 총점   | 모멘텀 | 이력  | 트리플렛 | 카이제곱 | 지연");
    for score in rec.top(12) {
        println!(
            "   {:>2}  | {:>6.1} | {:>6.1} | {:>5.1} | {:>8.1} | {:>8.1} | {:>4.1}",
            score.number,
            score.total,
            score.momentum,
            score.history,
            score.triplet,
            score.chi,
            score.delay
        );
    }

    println!("\n🎫 추천 티켓 ({})", rec.ticket.generated_on);
    println!("  주 베팅:   {}", rec.ticket.primary);
    println!("  보조 베팅: {}", rec.ticket.secondary);

    // 3. 저장 및 알림
    if save {
        store.save_ticket(&rec.ticket).context("티켓 저장 실패")?;
        println!("  저장됨: {}", store.tickets_path().display());
    }

    info!(
        lottery = selection.label(),
        bias_draws = rec.bias_draws,
        p_value = rec.global.p_value,
        "Recommendation generated"
    );

    if notifier.has_enabled_sender() {
        let phase_label = phase
            .map(|p| p.description().to_string())
            .unwrap_or_else(|| "기본 윈도우".to_string());
        if let Err(e) = notifier
            .notify_ticket_generated(
                selection.label(),
                rec.ticket.generated_on,
                &rec.ticket.primary.to_string(),
                &rec.ticket.secondary.to_string(),
                &phase_label,
                rec.global.p_value,
                rec.bias_draws,
            )
            .await
        {
            warn!(error = %e, "Ticket notification failed");
        }
    }

    Ok(())
}
