//! 보상-모멘텀 가설 검증 명령어.
//!
//! 과거 주기마다 "주기 끝에 깨어난 콜드 번호(보상 중)가 동결
//! 콜드 번호보다 주기 직후 추첨에 더 자주 나오는가"를 확인합니다.

use anyhow::{Context, Result};
use lotto_analytics::{detect_calibrations, validate_momentum_hypothesis, HypothesisVerdict};
use lotto_core::AppConfig;
use lotto_data::DrawStore;
use tracing::info;

use super::Selection;

pub fn run(config: &AppConfig, selection: Selection) -> Result<()> {
    let store = DrawStore::new(config.data.clone())
        .context("데이터 저장소를 초기화할 수 없습니다")?;
    let draws = selection.load(&store)?;
    let cycle_days = selection.cycle_days(config);

    let calibrations = detect_calibrations(
        &draws,
        config.analysis.drift_window,
        config.analysis.max_calibration_points,
        cycle_days,
    );

    println!("\n🧪 보상-모멘텀 가설 검증 — {}", selection.label());

    let Some(report) = validate_momentum_hypothesis(&draws, &calibrations, &config.analysis)
    else {
        println!("  검증 가능한 주기가 없습니다 (이력 또는 보정일 부족)");
        return Ok(());
    };

    println!(
        "  주기 꼬리 윈도우 {}개 추첨, 후속 윈도우 {}개 추첨",
        config.analysis.cold_momentum_window, config.analysis.validation_window
    );
    println!("\n  주기 시작일  ~ 종료일     | 보상 중 % | 동결 % | 승자");
    for row in &report.rows {
        let winner = if row.hypothesis_wins() {
            "보상 중 ✅"
        } else {
            "동결"
        };
        println!(
            "  {} ~ {} | {:>8.1} | {:>6.1} | {}",
            row.cycle_start, row.cycle_end, row.compensating_pct, row.frozen_pct, winner
        );
    }

    let verdict = match report.verdict {
        HypothesisVerdict::Confirmed => "✅ 가설 확인 — 보상 중 콜드 번호에 가중치 부여 타당",
        HypothesisVerdict::Weak => "⚠️ 약한 경향 — 참고용으로만 사용",
        HypothesisVerdict::Rejected => "❌ 가설 기각 — 콜드 구분은 잡음",
    };
    println!(
        "\n  평균 출현율: 보상 중 {:.1}% vs 동결 {:.1}%",
        report.avg_compensating_pct, report.avg_frozen_pct
    );
    println!(
        "  가설 승률: {}/{} ({:.0}%) — {}",
        report.wins,
        report.total,
        report.wins as f64 / report.total as f64 * 100.0,
        verdict
    );

    info!(
        cycles = report.total,
        wins = report.wins,
        "Momentum hypothesis validation completed"
    );

    Ok(())
}
