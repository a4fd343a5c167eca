//! 보정 주기별 분포 분석.
//!
//! 탐지된 보정일들로 이력을 구간(주기)으로 자르고, 주기마다
//! 빈도/카이제곱/콜드·핫 번호를 계산합니다. 그 위에 두 가지
//! 상위 분석을 얹습니다:
//! - 보상 분석: 한 주기의 콜드 번호가 다음 주기에 기대 이상으로
//!   나오는지 (콜드 번호 플레이 가설의 근거 검증)
//! - p-값 백분위 밴드: 과거 주기들의 p-값 분포로 현재 주기의
//!   p-값이 정상 범위인지 판정

use crate::chi_square::global_uniformity_test;
use crate::frequency::FrequencyTable;
use chrono::NaiveDate;
use lotto_core::{AnalysisConfig, DrawRecord};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 한 보정 주기의 통계.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleStats {
    /// 주기 시작일 (보정일, 포함)
    pub start: NaiveDate,
    /// 주기 종료일 (다음 보정일, 미포함)
    pub end: NaiveDate,
    /// 주기 내 추첨 수
    pub draws: usize,
    /// 전역 카이제곱 p-값
    pub p_value: f64,
    /// 콜드 번호 (빈도 오름차순)
    pub cold: Vec<u8>,
    /// 핫 번호 (빈도 내림차순)
    pub hot: Vec<u8>,
    /// 번호별 빈도
    pub frequency: FrequencyTable,
}

/// 가설 검증 판정.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HypothesisVerdict {
    /// 비율 > 0.60 — 가설 확인
    Confirmed,
    /// 비율 > 0.50 — 약한 경향
    Weak,
    /// 그 외 — 가설 기각
    Rejected,
}

impl HypothesisVerdict {
    /// 성공 비율로부터 판정.
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio > 0.60 {
            Self::Confirmed
        } else if ratio > 0.50 {
            Self::Weak
        } else {
            Self::Rejected
        }
    }
}

/// 주기 하나의 보상 분석 결과.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompensationEntry {
    /// 콜드 번호를 계산한 주기의 시작일
    pub cycle_start: NaiveDate,
    /// 해당 주기의 콜드 번호
    pub cold: Vec<u8>,
    /// 다음 주기에서 기대 빈도를 넘어선 콜드 번호
    pub compensated: Vec<u8>,
    /// 보상 비율
    pub ratio: f64,
}

/// 전체 보상 분석 결과.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompensationReport {
    /// 주기별 상세
    pub entries: Vec<CompensationEntry>,
    /// 보상된 콜드 번호 총수
    pub compensated: usize,
    /// 검사한 콜드 번호 총수
    pub total: usize,
    /// 전체 보상 비율
    pub ratio: f64,
    /// 판정
    pub verdict: HypothesisVerdict,
}

/// 과거 주기 p-값의 백분위 밴드.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileBand {
    /// 10 백분위 (하한)
    pub low: f64,
    /// 90 백분위 (상한)
    pub high: f64,
}

/// 현재 주기 p-값의 밴드 내 위치.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BandPosition {
    /// 하한 아래 — 실제 편향 가능성
    BelowLow,
    /// 정상 범위
    InRange,
    /// 상한 위 — 완전히 정상적인 분포
    AboveHigh,
}

impl PercentileBand {
    /// p-값의 밴드 내 위치 분류.
    pub fn classify(&self, p_value: f64) -> BandPosition {
        if p_value < self.low {
            BandPosition::BelowLow
        } else if p_value > self.high {
            BandPosition::AboveHigh
        } else {
            BandPosition::InRange
        }
    }
}

/// 주기별 분포 통계 계산.
///
/// 보정일 목록으로 구간을 만들고 (마지막 구간은 `today`까지),
/// 추첨 수가 `[cycle_min_draws, cycle_max_draws]`를 벗어나는 구간은
/// 버립니다. 보정일이 없으면 빈 벡터를 반환합니다.
pub fn cycle_distribution(
    draws: &[DrawRecord],
    calibrations: &[NaiveDate],
    today: NaiveDate,
    config: &AnalysisConfig,
) -> Vec<CycleStats> {
    let Some(&last) = calibrations.last() else {
        return Vec::new();
    };

    let mut bounds: Vec<(NaiveDate, NaiveDate)> = calibrations
        .windows(2)
        .map(|pair| (pair[0], pair[1]))
        .collect();
    bounds.push((last, today));

    let mut cycles = Vec::new();

    for (start, end) in bounds {
        let cycle_draws: Vec<DrawRecord> = draws
            .iter()
            .filter(|d| d.date >= start && d.date < end)
            .copied()
            .collect();

        if cycle_draws.len() < config.cycle_min_draws || cycle_draws.len() > config.cycle_max_draws
        {
            debug!(
                start = %start,
                end = %end,
                draws = cycle_draws.len(),
                "Cycle outside draw-count bounds, skipped"
            );
            continue;
        }

        let frequency = FrequencyTable::from_draws(&cycle_draws);
        let p_value = global_uniformity_test(&frequency)
            .map(|t| t.p_value)
            .unwrap_or(1.0);

        cycles.push(CycleStats {
            start,
            end,
            draws: cycle_draws.len(),
            p_value,
            cold: frequency.cold_numbers(config.cold_ratio),
            hot: frequency.hot_numbers(config.hot_ratio),
            frequency,
        });
    }

    cycles
}

/// 보상 분석: 주기 i의 콜드 번호가 주기 i+1에서 기대 빈도를
/// 넘어서는 비율.
///
/// 비교할 연속 주기 쌍이 없으면 `None`을 반환합니다.
pub fn compensation_analysis(cycles: &[CycleStats]) -> Option<CompensationReport> {
    if cycles.len() < 2 {
        return None;
    }

    let mut entries = Vec::new();
    let mut compensated_total = 0usize;
    let mut checked_total = 0usize;

    for pair in cycles.windows(2) {
        let current = &pair[0];
        let next = &pair[1];

        if current.cold.is_empty() {
            continue;
        }

        let next_expected = next.frequency.expected();
        let compensated: Vec<u8> = current
            .cold
            .iter()
            .copied()
            .filter(|&n| next.frequency.count(n) as f64 > next_expected)
            .collect();

        let ratio = compensated.len() as f64 / current.cold.len() as f64;
        compensated_total += compensated.len();
        checked_total += current.cold.len();

        entries.push(CompensationEntry {
            cycle_start: current.start,
            cold: current.cold.clone(),
            compensated,
            ratio,
        });
    }

    if checked_total == 0 {
        return None;
    }

    let ratio = compensated_total as f64 / checked_total as f64;
    Some(CompensationReport {
        entries,
        compensated: compensated_total,
        total: checked_total,
        ratio,
        verdict: HypothesisVerdict::from_ratio(ratio),
    })
}

/// 선형 보간 백분위 (numpy 방식).
fn percentile(sorted: &[f64], pct: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let frac = rank - lower as f64;
    if lower + 1 < sorted.len() {
        sorted[lower] + frac * (sorted[lower + 1] - sorted[lower])
    } else {
        sorted[lower]
    }
}

/// 과거 주기(현재 주기 제외)의 p-값 10/90 백분위 밴드.
///
/// 완료된 과거 주기가 없으면 `None`을 반환합니다.
pub fn p_value_band(cycles: &[CycleStats]) -> Option<PercentileBand> {
    if cycles.len() < 2 {
        return None;
    }

    let mut historical: Vec<f64> = cycles[..cycles.len() - 1]
        .iter()
        .map(|c| c.p_value)
        .collect();
    historical.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    Some(PercentileBand {
        low: percentile(&historical, 10.0),
        high: percentile(&historical, 90.0),
    })
}
