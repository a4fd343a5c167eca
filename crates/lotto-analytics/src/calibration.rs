//! 휴리스틱 보정일(분포 변화점) 탐지기.
//!
//! 각 추첨 인덱스 i에 대해, 직전 `window`개와 직후 `window`개 추첨의
//! 번호별 빈도 히스토그램 사이의 맨해튼 거리를 계산해 드리프트
//! 시계열을 만듭니다. 드리프트가 평균 + 1×표준편차를 넘는 지점 중
//! 서로 충분히 떨어진 지점들을 보정 후보일로 선택합니다.
//!
//! CUSUM이나 베이지안 변화점 기법 같은 통계적 보장은 없는
//! 휴리스틱입니다. 결과는 후보일일 뿐 검증된 변화점이 아닙니다.

use chrono::{Duration, NaiveDate};
use lotto_core::{DrawRecord, NUMBER_POOL};
use serde::{Deserialize, Serialize};

/// 드리프트 시계열의 한 지점.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftPoint {
    /// 추첨 목록 내 인덱스
    pub index: usize,
    /// 해당 추첨 날짜
    pub date: NaiveDate,
    /// 전후 윈도우 히스토그램 간 맨해튼 거리
    pub drift: u32,
}

/// 드리프트 시계열 계산.
///
/// 양 끝에서 `window`개 이내의 인덱스는 제외됩니다. 추첨 수가
/// `2 × window`보다 적으면 빈 벡터를 반환합니다.
pub fn drift_series(draws: &[DrawRecord], window: usize) -> Vec<DriftPoint> {
    if window == 0 || draws.len() < 2 * window {
        return Vec::new();
    }

    let mut points = Vec::with_capacity(draws.len() - 2 * window);

    for i in window..draws.len() - window {
        let mut before = [0i32; NUMBER_POOL];
        let mut after = [0i32; NUMBER_POOL];

        for record in &draws[i - window..i] {
            for n in record.numbers.iter() {
                before[(n - 1) as usize] += 1;
            }
        }
        for record in &draws[i..i + window] {
            for n in record.numbers.iter() {
                after[(n - 1) as usize] += 1;
            }
        }

        let drift: u32 = (0..NUMBER_POOL)
            .map(|idx| (before[idx] - after[idx]).unsigned_abs())
            .sum();

        points.push(DriftPoint {
            index: i,
            date: draws[i].date,
            drift,
        });
    }

    points
}

/// 보정 후보일 탐지.
///
/// 선택 규칙:
/// 1. 드리프트가 평균 + 1×표준편차를 넘는 지점만 후보
/// 2. 드리프트 내림차순으로 훑으며, 이미 선택된 지점들과 인덱스 거리가
///    `window` 초과인 지점만 추가 (최대 `max_points`개)
/// 3. 남은 지점을 날짜순으로 정렬한 뒤, 직전 선택일과 `cycle_days / 2`일
///    이하로 가까운 지점은 버림
pub fn detect_calibrations(
    draws: &[DrawRecord],
    window: usize,
    max_points: usize,
    cycle_days: i64,
) -> Vec<NaiveDate> {
    let points = drift_series(draws, window);
    if points.is_empty() {
        return Vec::new();
    }

    let mean = points.iter().map(|p| p.drift as f64).sum::<f64>() / points.len() as f64;
    let variance = points
        .iter()
        .map(|p| {
            let diff = p.drift as f64 - mean;
            diff * diff
        })
        .sum::<f64>()
        / points.len() as f64;
    let threshold = mean + variance.sqrt();

    let mut by_drift = points.clone();
    // 안정 정렬: 동률이면 앞쪽 인덱스 우선
    by_drift.sort_by(|a, b| b.drift.cmp(&a.drift));

    let mut peaks: Vec<DriftPoint> = Vec::new();
    for point in by_drift {
        if (point.drift as f64) < threshold {
            break;
        }
        let far_enough = peaks
            .iter()
            .all(|p| point.index.abs_diff(p.index) > window);
        if far_enough {
            peaks.push(point);
        }
        if peaks.len() >= max_points {
            break;
        }
    }

    peaks.sort_by_key(|p| p.date);

    let min_gap = Duration::days(cycle_days / 2);
    let mut filtered: Vec<NaiveDate> = Vec::new();
    for peak in peaks {
        match filtered.last() {
            Some(&last) if peak.date - last <= min_gap => {}
            _ => filtered.push(peak.date),
        }
    }

    filtered
}

/// 다음 보정일 추정: 마지막 보정일 + 주기 길이.
pub fn estimate_next_calibration(last: NaiveDate, cycle_days: i64) -> NaiveDate {
    last + Duration::days(cycle_days)
}

/// 주기 내 위상.
///
/// 위상에 따라 점수 계산에 쓰는 편향/모멘텀 윈도우가 달라집니다.
/// 보정 직후에는 새 분포의 데이터가 적어 신뢰도가 낮고, 보정 직전에는
/// 누적된 편향이 최대가 됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CyclePhase {
    /// 보정 직후 (기본: 60일 이내)
    PostCalibration,
    /// 다음 보정 임박 (기본: 45일 이내)
    PreCalibration,
    /// 주기 중반
    Mature,
}

/// 위상별 분석 윈도우.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseWindows {
    /// 편향 윈도우 (일)
    pub bias_days: i64,
    /// 모멘텀 윈도우 (일)
    pub momentum_days: i64,
}

impl CyclePhase {
    /// 오늘 날짜와 보정일로부터 위상을 결정합니다.
    pub fn determine(
        today: NaiveDate,
        last_calibration: NaiveDate,
        next_calibration: NaiveDate,
        post_days: i64,
        pre_days: i64,
    ) -> Self {
        let since_last = (today - last_calibration).num_days();
        let until_next = (next_calibration - today).num_days();

        if since_last <= post_days {
            Self::PostCalibration
        } else if until_next <= pre_days {
            Self::PreCalibration
        } else {
            Self::Mature
        }
    }

    /// 위상에 맞는 분석 윈도우.
    ///
    /// - 보정 직후: 짧은 윈도우 (보정 이전 데이터 오염 방지)
    /// - 보정 직전: 주기 전체를 편향 윈도우로, 모멘텀 30일
    /// - 중반: 주기 전체, 모멘텀은 주기의 1/10 (최소 25일)
    pub fn windows(&self, cycle_days: i64) -> PhaseWindows {
        match self {
            Self::PostCalibration => PhaseWindows {
                bias_days: 45,
                momentum_days: 10,
            },
            Self::PreCalibration => PhaseWindows {
                bias_days: cycle_days,
                momentum_days: 30,
            },
            Self::Mature => PhaseWindows {
                bias_days: cycle_days,
                momentum_days: (cycle_days / 10).max(25),
            },
        }
    }

    /// 보고서용 설명.
    pub fn description(&self) -> &'static str {
        match self {
            Self::PostCalibration => "🟡 보정 직후 (데이터 부족, 낮은 신뢰도)",
            Self::PreCalibration => "🔴 보정 임박 (편향 최대 구간)",
            Self::Mature => "🟢 주기 중반 (전체 윈도우, 높은 신뢰도)",
        }
    }
}
