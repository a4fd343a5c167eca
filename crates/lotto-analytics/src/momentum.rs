//! 콜드 번호 모멘텀 분류 및 가설 검증.
//!
//! 주기 안에서 콜드로 분류된 번호를 둘로 나눕니다:
//! - **보상 중(Compensating)**: 주기 마지막 N개 추첨에 다시 나타난 번호
//! - **동결(Frozen)**: 마지막 N개 추첨에도 전혀 안 나온 번호
//!
//! 검증 하네스는 과거 주기마다 "보상 중 콜드 번호가 동결 번호보다
//! 주기 직후 추첨들에 더 많이 나오는가"를 확인해 가설의 승률을
//! 집계합니다.

use crate::cycles::HypothesisVerdict;
use crate::frequency::FrequencyTable;
use chrono::NaiveDate;
use lotto_core::{AnalysisConfig, DrawRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 콜드 번호 분류 결과.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColdClassification {
    /// 최근 윈도우에 다시 나타난 콜드 번호
    pub compensating: Vec<u8>,
    /// 최근 윈도우에도 안 나온 콜드 번호
    pub frozen: Vec<u8>,
}

/// 주기 추첨 목록의 마지막 `window`개를 기준으로 콜드 번호를 분류합니다.
pub fn classify_cold(
    cycle_draws: &[DrawRecord],
    cold: &[u8],
    window: usize,
) -> ColdClassification {
    let tail_start = cycle_draws.len().saturating_sub(window);
    let recent = FrequencyTable::from_draws(&cycle_draws[tail_start..]);

    let mut compensating = Vec::new();
    let mut frozen = Vec::new();
    for &n in cold {
        if recent.count(n) > 0 {
            compensating.push(n);
        } else {
            frozen.push(n);
        }
    }

    ColdClassification {
        compensating,
        frozen,
    }
}

/// 주기 하나의 검증 행.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentumValidationRow {
    /// 주기 시작일
    pub cycle_start: NaiveDate,
    /// 주기 종료일
    pub cycle_end: NaiveDate,
    /// 후속 추첨에 나타난 보상 중 번호 비율 (%)
    pub compensating_pct: f64,
    /// 후속 추첨에 나타난 동결 번호 비율 (%)
    pub frozen_pct: f64,
}

impl MomentumValidationRow {
    /// 이 주기에서 가설이 이겼는지 (보상 중 > 동결).
    pub fn hypothesis_wins(&self) -> bool {
        self.compensating_pct > self.frozen_pct
    }
}

/// 전체 검증 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentumValidationReport {
    /// 주기별 상세
    pub rows: Vec<MomentumValidationRow>,
    /// 보상 중 번호 평균 출현율 (%)
    pub avg_compensating_pct: f64,
    /// 동결 번호 평균 출현율 (%)
    pub avg_frozen_pct: f64,
    /// 가설이 이긴 주기 수
    pub wins: usize,
    /// 검증한 주기 수
    pub total: usize,
    /// 판정
    pub verdict: HypothesisVerdict,
}

/// 보상-모멘텀 가설 검증.
///
/// 연속된 보정일 쌍으로 주기를 만들어 (마지막 미완료 주기는 제외),
/// 주기마다:
/// 1. 주기 빈도에서 콜드 번호 추출
/// 2. 주기 마지막 `cold_momentum_window`개 추첨으로 보상 중/동결 분류
/// 3. 주기 종료 직후 `validation_window`개 추첨에 각 그룹이 나타난
///    비율 비교
///
/// 두 그룹 중 하나라도 비어 있거나 주기가 너무 짧으면 그 주기는
/// 건너뜁니다. 검증 가능한 주기가 없으면 `None`을 반환합니다.
pub fn validate_momentum_hypothesis(
    draws: &[DrawRecord],
    calibrations: &[NaiveDate],
    config: &AnalysisConfig,
) -> Option<MomentumValidationReport> {
    let mut rows = Vec::new();

    let min_len = config.cycle_min_draws + config.cold_momentum_window + config.validation_window;

    for pair in calibrations.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        let cycle_draws: Vec<DrawRecord> = draws
            .iter()
            .filter(|d| d.date >= start && d.date < end)
            .copied()
            .collect();

        if cycle_draws.len() < min_len {
            continue;
        }

        let frequency = FrequencyTable::from_draws(&cycle_draws);
        let cold = frequency.cold_numbers(config.cold_ratio);
        if cold.is_empty() {
            continue;
        }

        let classified = classify_cold(&cycle_draws, &cold, config.cold_momentum_window);
        if classified.compensating.is_empty() || classified.frozen.is_empty() {
            continue;
        }

        // 주기 종료 이후 첫 추첨부터 validation_window개
        let Some(follow_start) = draws.iter().position(|d| d.date >= end) else {
            continue;
        };
        if follow_start + config.validation_window > draws.len() {
            continue;
        }

        let mut follow_numbers: BTreeSet<u8> = BTreeSet::new();
        for record in &draws[follow_start..follow_start + config.validation_window] {
            follow_numbers.extend(record.numbers.iter());
        }

        let appeared = |group: &[u8]| {
            group.iter().filter(|n| follow_numbers.contains(n)).count() as f64
                / group.len() as f64
                * 100.0
        };

        rows.push(MomentumValidationRow {
            cycle_start: start,
            cycle_end: end,
            compensating_pct: appeared(&classified.compensating),
            frozen_pct: appeared(&classified.frozen),
        });
    }

    if rows.is_empty() {
        return None;
    }

    let total = rows.len();
    let wins = rows.iter().filter(|r| r.hypothesis_wins()).count();
    let avg_compensating_pct =
        rows.iter().map(|r| r.compensating_pct).sum::<f64>() / total as f64;
    let avg_frozen_pct = rows.iter().map(|r| r.frozen_pct).sum::<f64>() / total as f64;

    Some(MomentumValidationReport {
        rows,
        avg_compensating_pct,
        avg_frozen_pct,
        wins,
        total,
        verdict: HypothesisVerdict::from_ratio(wins as f64 / total as f64),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use lotto_core::{DrawNumbers, Lottery};

    fn draw(date: NaiveDate, numbers: [u8; 6]) -> DrawRecord {
        DrawRecord::new(date, DrawNumbers::new(numbers).unwrap(), Lottery::Primitiva)
    }

    fn base() -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 1, 1).unwrap()
    }

    #[test]
    fn test_classify_cold_split() {
        // 콜드 번호 30은 마지막 추첨에 나타나고, 31은 끝까지 안 나옴
        let mut draws: Vec<DrawRecord> = (0..20i64)
            .map(|i| {
                let o = (i % 4) as u8;
                draw(
                    base() + Duration::days(i),
                    [1 + o, 6 + o, 11 + o, 16 + o, 21 + o, 26 + o],
                )
            })
            .collect();
        draws.push(draw(
            base() + Duration::days(20),
            [30, 1, 6, 11, 16, 21],
        ));

        let classified = classify_cold(&draws, &[30, 31], 10);
        assert_eq!(classified.compensating, vec![30]);
        assert_eq!(classified.frozen, vec![31]);
    }

    /// 구성: 주기 동안 1~29만 출현 (30~49 콜드), 주기 끝 무렵
    /// 30~35가 깨어나고, 주기 직후 추첨에도 30~35만 나옴.
    #[test]
    fn test_hypothesis_confirmed_on_planted_history() {
        let mut draws = Vec::new();
        let config = AnalysisConfig {
            cycle_min_draws: 30,
            cold_momentum_window: 10,
            validation_window: 5,
            ..Default::default()
        };

        // 주기 본문: 52 추첨, 1~24만
        for i in 0..52i64 {
            let o = (i % 4) as u8;
            draws.push(draw(
                base() + Duration::days(i),
                [1 + o, 5 + o, 9 + o, 13 + o, 17 + o, 21 + o],
            ));
        }
        // 주기 꼬리: 3 추첨만 30~35가 깨어남 (콜드 판정은 유지될 만큼 적게)
        for i in 52..55i64 {
            draws.push(draw(
                base() + Duration::days(i),
                [30, 31, 32, 33, 34, 35],
            ));
        }
        // 주기 종료 후: 5 추첨, 30~35만 계속
        let cycle_end = base() + Duration::days(55);
        for i in 55..60i64 {
            draws.push(draw(
                base() + Duration::days(i),
                [30, 31, 32, 33, 34, 35],
            ));
        }

        let calibrations = vec![base(), cycle_end];
        let report = validate_momentum_hypothesis(&draws, &calibrations, &config).unwrap();

        assert_eq!(report.total, 1);
        assert_eq!(report.wins, 1);
        assert_eq!(report.verdict, HypothesisVerdict::Confirmed);
        assert!(report.avg_compensating_pct > report.avg_frozen_pct);
        // 동결 번호(36~49 등)는 후속 추첨에 전혀 안 나옴
        assert_eq!(report.avg_frozen_pct, 0.0);
    }

    #[test]
    fn test_no_validatable_cycles() {
        let draws: Vec<DrawRecord> = (0..10i64)
            .map(|i| draw(base() + Duration::days(i), [1, 2, 3, 4, 5, 6]))
            .collect();
        let calibrations = vec![base(), base() + Duration::days(10)];
        let config = AnalysisConfig::default();

        assert!(validate_momentum_hypothesis(&draws, &calibrations, &config).is_none());
    }
}
