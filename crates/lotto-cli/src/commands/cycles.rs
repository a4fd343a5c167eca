//! 보정 주기 분석 명령어.
//!
//! 보정일 탐지, 주기별 분포 통계, 보상 분석, p-값 백분위 밴드를
//! 한 번에 보고합니다.

use anyhow::{Context, Result};
use lotto_analytics::{
    compensation_analysis, cycle_distribution, detect_calibrations, estimate_next_calibration,
    p_value_band, BandPosition, HypothesisVerdict,
};
use lotto_core::AppConfig;
use lotto_data::DrawStore;
use tracing::info;

use super::{today, Selection};

pub fn run(config: &AppConfig, selection: Selection) -> Result<()> {
    let store = DrawStore::new(config.data.clone())
        .context("데이터 저장소를 초기화할 수 없습니다")?;
    let draws = selection.load(&store)?;
    let today = today();
    let cycle_days = selection.cycle_days(config);

    println!("\n🔄 보정 주기 분석 — {}", selection.label());
    println!(
        "  이력: {}개 추첨, 드리프트 윈도우 {}개, 주기 길이 {}일",
        draws.len(),
        config.analysis.drift_window,
        cycle_days
    );

    // 1. 보정일 탐지
    let calibrations = detect_calibrations(
        &draws,
        config.analysis.drift_window,
        config.analysis.max_calibration_points,
        cycle_days,
    );

    if calibrations.is_empty() {
        println!("\n  보정일을 찾지 못했습니다 (이력이 짧거나 분포가 안정적)");
        return Ok(());
    }

    println!("\n  탐지된 보정 후보일 {}개:", calibrations.len());
    for date in &calibrations {
        println!("    • {}", date);
    }
    let last = *calibrations.last().unwrap();
    println!(
        "  다음 보정 추정일: {}",
        estimate_next_calibration(last, cycle_days)
    );

    // 2. 주기별 분포
    let cycles = cycle_distribution(&draws, &calibrations, today, &config.analysis);
    if cycles.is_empty() {
        println!(
            "\n  유효한 주기 없음 (추첨 수 {}~{} 범위 밖)",
            config.analysis.cycle_min_draws, config.analysis.cycle_max_draws
        );
        return Ok(());
    }

    println!("\n  주기별 분포 ({}개):", cycles.len());
    println!("  시작일      ~ 종료일     | 추첨수 | p-값    | 콜드 | 핫");
    for cycle in &cycles {
        println!(
            "  {} ~ {} | {:>5} | {:>7.4} | {:>4} | {:>3}",
            cycle.start,
            cycle.end,
            cycle.draws,
            cycle.p_value,
            cycle.cold.len(),
            cycle.hot.len()
        );
    }

    // 3. 보상 분석
    match compensation_analysis(&cycles) {
        Some(report) => {
            let verdict = match report.verdict {
                HypothesisVerdict::Confirmed => "✅ 가설 확인",
                HypothesisVerdict::Weak => "⚠️ 약한 경향",
                HypothesisVerdict::Rejected => "❌ 가설 기각",
            };
            println!(
                "\n  보상 분석: 콜드 번호 {}개 중 {}개가 다음 주기에 보상 ({:.0}%) — {}",
                report.total,
                report.compensated,
                report.ratio * 100.0,
                verdict
            );
        }
        None => println!("\n  보상 분석 불가 (비교할 연속 주기 없음)"),
    }

    // 4. p-값 백분위 밴드와 현재 주기 위치
    match p_value_band(&cycles) {
        Some(band) => {
            let current = cycles.last().unwrap();
            let position = match band.classify(current.p_value) {
                BandPosition::BelowLow => "하한 아래 — 실제 편향 가능성 🔴",
                BandPosition::InRange => "정상 범위 🟢",
                BandPosition::AboveHigh => "상한 위 — 균등 분포에 가까움",
            };
            println!(
                "  과거 주기 p-값 밴드 (P10~P90): {:.4} ~ {:.4}",
                band.low, band.high
            );
            println!(
                "  현재 주기 p-값 {:.4}: {}",
                current.p_value, position
            );
        }
        None => println!("  p-값 밴드 불가 (완료된 과거 주기 없음)"),
    }

    info!(
        calibrations = calibrations.len(),
        cycles = cycles.len(),
        "Cycle analysis completed"
    );

    Ok(())
}
