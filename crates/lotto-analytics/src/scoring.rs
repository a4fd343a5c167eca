//! 종합 번호 점수 및 티켓 추천.
//!
//! 네 가지(옵션 포함 다섯 가지) 독립 신호를 가중 합산합니다:
//! - 모멘텀: 최근 윈도우에서 출현율이 임계값을 넘으면 고정 보너스
//! - 편향 이력: 편향 윈도우 출현 횟수 × 가중치
//! - 트리플렛 친화도: 상위 트리플렛에 포함될 때마다 보너스
//! - 카이제곱: 유의하게 과다 출현이면 보너스, 과소 출현이면 페널티
//! - 지연 (옵션): 현재 갭이 역대 최대 갭에 근접하면 보너스
//!
//! 점수 내림차순 상위 6개가 주 베팅, 7~12위가 보조 베팅이 됩니다.

use crate::chi_square::{global_uniformity_test, per_number_tests, GlobalChiSquare};
use crate::delay::delay_table;
use crate::frequency::FrequencyTable;
use crate::triplets::TripletCounter;
use chrono::{Duration, NaiveDate};
use lotto_core::{
    DrawNumbers, DrawRecord, LottoError, LottoResult, ScoringConfig, Ticket, Triplet, DRAW_SIZE,
    MAX_NUMBER, MIN_NUMBER,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 번호 하나의 점수 상세.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// 번호
    pub number: u8,
    /// 모멘텀 점수
    pub momentum: f64,
    /// 편향 이력 점수
    pub history: f64,
    /// 트리플렛 친화도 점수
    pub triplet: f64,
    /// 카이제곱 보너스/페널티
    pub chi: f64,
    /// 지연 점수
    pub delay: f64,
    /// 총점
    pub total: f64,
    /// 번호별 카이제곱 p-값
    pub p_value: f64,
    /// 부호 있는 편차 (관측 - 기대)
    pub deviation: f64,
}

/// 추천 실행 결과.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    /// 점수 내림차순 정렬된 49개 번호
    pub scores: Vec<ScoreBreakdown>,
    /// 편향 윈도우의 전역 카이제곱 검정
    pub global: GlobalChiSquare,
    /// 모멘텀 윈도우 추첨 수
    pub momentum_draws: usize,
    /// 편향 윈도우 추첨 수
    pub bias_draws: usize,
    /// 번호당 기대 빈도 (편향 윈도우)
    pub expected: f64,
    /// 편향 윈도우 상위 트리플렛
    pub top_triplets: Vec<(Triplet, u32)>,
    /// 생성된 티켓
    pub ticket: Ticket,
}

impl Recommendation {
    /// 상위 k개 점수.
    pub fn top(&self, k: usize) -> &[ScoreBreakdown] {
        &self.scores[..k.min(self.scores.len())]
    }
}

/// 번호 점수를 계산하고 티켓을 추천합니다.
///
/// `draws`는 날짜 오름차순의 전체 이력이어야 합니다 (지연 계산에
/// 전체 이력이 필요). 윈도우 필터링은 내부에서 수행합니다.
/// 편향 윈도우에 추첨이 없으면 `InsufficientData` 에러를 반환합니다.
pub fn recommend(
    draws: &[DrawRecord],
    today: NaiveDate,
    momentum_days: i64,
    bias_days: i64,
    config: &ScoringConfig,
) -> LottoResult<Recommendation> {
    let momentum_limit = today - Duration::days(momentum_days);
    let bias_limit = today - Duration::days(bias_days);

    let momentum_window: Vec<DrawRecord> = draws
        .iter()
        .filter(|d| d.date >= momentum_limit)
        .copied()
        .collect();
    let bias_window: Vec<DrawRecord> = draws
        .iter()
        .filter(|d| d.date >= bias_limit)
        .copied()
        .collect();

    if bias_window.is_empty() {
        return Err(LottoError::InsufficientData(format!(
            "편향 윈도우({}일)에 추첨 없음",
            bias_days
        )));
    }

    let momentum_freq = FrequencyTable::from_draws(&momentum_window);
    let bias_freq = FrequencyTable::from_draws(&bias_window);
    let triplet_counter = TripletCounter::from_draws(&bias_window);
    let top_triplets = triplet_counter.top(config.top_triplets);
    let deviations = per_number_tests(&bias_freq);
    let global = global_uniformity_test(&bias_freq)
        .ok_or_else(|| LottoError::Internal("empty bias window after check".to_string()))?;

    let delays = if config.use_delay {
        Some(delay_table(draws))
    } else {
        None
    };

    debug!(
        momentum_draws = momentum_window.len(),
        bias_draws = bias_window.len(),
        top_triplets = top_triplets.len(),
        "Scoring input assembled"
    );

    let momentum_trigger = momentum_window.len() as f64 * config.momentum_threshold;

    let mut scores: Vec<ScoreBreakdown> = (MIN_NUMBER..=MAX_NUMBER)
        .map(|n| {
            let momentum = if momentum_freq.count(n) as f64 > momentum_trigger {
                config.momentum_bonus
            } else {
                0.0
            };

            let history = bias_freq.count(n) as f64 * config.history_weight;

            let triplet = top_triplets
                .iter()
                .filter(|(t, _)| t.contains(&n))
                .count() as f64
                * config.triplet_bonus;

            let dev = &deviations[(n - 1) as usize];
            let chi = if dev.deviation > 0.0 {
                if dev.p_value < 0.05 {
                    config.chi_strong_bonus
                } else if dev.p_value < 0.10 {
                    config.chi_weak_bonus
                } else {
                    0.0
                }
            } else if dev.p_value < 0.05 {
                -config.chi_strong_bonus
            } else if dev.p_value < 0.10 {
                -config.chi_weak_bonus
            } else {
                0.0
            };

            let delay = match &delays {
                Some(table) => {
                    let stats = &table[(n - 1) as usize];
                    match stats.gap_ratio() {
                        Some(r) if r >= config.delay_critical_ratio => config.delay_critical_bonus,
                        Some(r) if r > config.delay_high_ratio => config.delay_high_bonus,
                        _ => 0.0,
                    }
                }
                None => 0.0,
            };

            ScoreBreakdown {
                number: n,
                momentum,
                history,
                triplet,
                chi,
                delay,
                total: momentum + history + triplet + chi + delay,
                p_value: dev.p_value,
                deviation: dev.deviation,
            }
        })
        .collect();

    // 안정 정렬: 총점 동률이면 작은 번호 우선
    scores.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(std::cmp::Ordering::Equal));

    let primary_numbers: Vec<u8> = scores[..DRAW_SIZE].iter().map(|s| s.number).collect();
    let secondary_numbers: Vec<u8> = scores[DRAW_SIZE..2 * DRAW_SIZE]
        .iter()
        .map(|s| s.number)
        .collect();

    let ticket = Ticket::new(
        today,
        DrawNumbers::from_slice(&primary_numbers)?,
        DrawNumbers::from_slice(&secondary_numbers)?,
    );

    Ok(Recommendation {
        scores,
        global,
        momentum_draws: momentum_window.len(),
        bias_draws: bias_window.len(),
        expected: bias_freq.expected(),
        top_triplets,
        ticket,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotto_core::Lottery;

    fn draw(date: NaiveDate, numbers: [u8; 6]) -> DrawRecord {
        DrawRecord::new(date, DrawNumbers::new(numbers).unwrap(), Lottery::Primitiva)
    }

    fn base() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    /// 90일 이력: 7, 14, 21이 매 추첨에 나오는 강한 편향.
    fn biased_history() -> Vec<DrawRecord> {
        (0..45i64)
            .map(|i| {
                let o = (i % 5) as u8;
                draw(
                    base() + Duration::days(i * 2),
                    [7, 14, 21, 28 + o, 35 + o, 42 + o],
                )
            })
            .collect()
    }

    #[test]
    fn test_planted_numbers_rank_top() {
        let draws = biased_history();
        let today = base() + Duration::days(90);
        let config = ScoringConfig::default();

        let rec = recommend(&draws, today, 30, 90, &config).unwrap();

        let top6: Vec<u8> = rec.top(6).iter().map(|s| s.number).collect();
        assert!(top6.contains(&7));
        assert!(top6.contains(&14));
        assert!(top6.contains(&21));

        // 심은 번호들은 모든 신호를 다 받음
        let s7 = rec.scores.iter().find(|s| s.number == 7).unwrap();
        assert_eq!(s7.momentum, config.momentum_bonus);
        assert!(s7.history > 0.0);
        assert!(s7.triplet > 0.0);
        assert_eq!(s7.chi, config.chi_strong_bonus);
    }

    #[test]
    fn test_ticket_structure() {
        let draws = biased_history();
        let today = base() + Duration::days(90);

        let rec = recommend(&draws, today, 30, 90, &ScoringConfig::default()).unwrap();

        // 주 베팅 = 상위 6개 번호 (오름차순 정렬됨)
        let mut expected_primary: Vec<u8> = rec.top(6).iter().map(|s| s.number).collect();
        expected_primary.sort_unstable();
        assert_eq!(
            rec.ticket.primary.as_slice(),
            expected_primary.as_slice()
        );

        // 주/보조 베팅은 겹치지 않음
        assert_eq!(rec.ticket.primary.match_count(&rec.ticket.secondary), 0);
        assert_eq!(rec.ticket.generated_on, today);
    }

    #[test]
    fn test_never_seen_numbers_penalized() {
        let draws = biased_history();
        let today = base() + Duration::days(90);

        let rec = recommend(&draws, today, 30, 90, &ScoringConfig::default()).unwrap();

        // 1번은 한 번도 안 나옴: 유의한 과소 출현 → 카이제곱 페널티
        let s1 = rec.scores.iter().find(|s| s.number == 1).unwrap();
        assert!(s1.chi < 0.0);
        assert!(s1.total < 0.0);
    }

    #[test]
    fn test_empty_bias_window_is_error() {
        let draws = biased_history();
        // 이력보다 한참 뒤의 날짜에서 짧은 윈도우로 조회
        let today = base() + Duration::days(400);

        let result = recommend(&draws, today, 30, 90, &ScoringConfig::default());
        assert!(matches!(result, Err(LottoError::InsufficientData(_))));
    }

    #[test]
    fn test_delay_scoring_toggle() {
        let draws = biased_history();
        let today = base() + Duration::days(90);
        let config = ScoringConfig {
            use_delay: true,
            ..Default::default()
        };

        let rec = recommend(&draws, today, 30, 90, &config).unwrap();
        // 지연 점수가 켜져도 전 번호가 0일 수는 있지만, 구조는 유지
        assert_eq!(rec.scores.len(), 49);
        assert!(rec.scores.iter().all(|s| s.delay >= 0.0));
    }
}
