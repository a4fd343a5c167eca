//! 트리플렛(3개 번호 조합) 동시 출현 카운터.
//!
//! 추첨마다 C(6,3) = 20개의 트리플렛이 나오고, 전체 풀에서 가능한
//! 트리플렛은 C(49,3) = 18424개입니다. 따라서 한 추첨에서 특정
//! 트리플렛이 나올 이론 확률은 20/18424입니다.

use lotto_core::{DrawRecord, Triplet, TOTAL_TRIPLETS, TRIPLETS_PER_DRAW};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 트리플렛 출현 횟수 카운터.
#[derive(Debug, Clone, Default)]
pub struct TripletCounter {
    counts: HashMap<Triplet, u32>,
    draws: usize,
}

/// 트리플렛 하나의 통계.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripletStats {
    /// 트리플렛 (오름차순)
    pub triplet: Triplet,
    /// 출현 횟수
    pub count: u32,
    /// 관측 출현율 (횟수 / 추첨수)
    pub observed_rate: f64,
    /// 이론 기대 출현 횟수
    pub expected_count: f64,
    /// 관측/이론 배율
    pub multiplier: f64,
}

impl TripletStats {
    /// 이론 확률의 2배 이상 출현한 트리플렛인지.
    pub fn is_hot(&self) -> bool {
        self.multiplier >= 2.0
    }
}

impl TripletCounter {
    /// 한 추첨에서 특정 트리플렛이 나올 이론 확률: 20/18424.
    pub fn theoretical_probability() -> f64 {
        TRIPLETS_PER_DRAW as f64 / TOTAL_TRIPLETS as f64
    }

    /// 추첨 목록에서 카운터를 만듭니다.
    pub fn from_draws(draws: &[DrawRecord]) -> Self {
        let mut counts: HashMap<Triplet, u32> = HashMap::new();
        for record in draws {
            for triplet in record.numbers.triplets() {
                *counts.entry(triplet).or_insert(0) += 1;
            }
        }
        Self {
            counts,
            draws: draws.len(),
        }
    }

    /// 집계된 추첨 수.
    pub fn draws(&self) -> usize {
        self.draws
    }

    /// 서로 다른 트리플렛 수.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// 출현 횟수 상위 k개 트리플렛.
    ///
    /// 횟수 내림차순, 동률이면 사전식으로 작은 트리플렛 우선
    /// (실행 간 결정적 순서 보장).
    pub fn top(&self, k: usize) -> Vec<(Triplet, u32)> {
        let mut ranked: Vec<(Triplet, u32)> =
            self.counts.iter().map(|(&t, &c)| (t, c)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.truncate(k);
        ranked
    }

    /// 상위 k개 트리플렛의 상세 통계.
    pub fn ranking(&self, k: usize) -> Vec<TripletStats> {
        let prob = Self::theoretical_probability();
        let draws = self.draws as f64;

        self.top(k)
            .into_iter()
            .map(|(triplet, count)| {
                let observed_rate = if self.draws > 0 {
                    count as f64 / draws
                } else {
                    0.0
                };
                TripletStats {
                    triplet,
                    count,
                    observed_rate,
                    expected_count: draws * prob,
                    multiplier: observed_rate / prob,
                }
            })
            .collect()
    }
}
