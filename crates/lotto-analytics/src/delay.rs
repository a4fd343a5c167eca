//! 번호별 미출현 갭(지연) 추적.
//!
//! 각 번호에 대해 마지막 출현 이후 지나간 추첨 수(현재 갭)와
//! 이력 전체에서 가장 길었던 갭(최대 갭)을 추적합니다.
//! 현재 갭이 최대 갭에 근접한 번호는 "역대급으로 밀린" 번호로,
//! 점수 계산에서 지연 보너스를 받습니다.

use lotto_core::{DrawRecord, MAX_NUMBER, MIN_NUMBER};
use serde::{Deserialize, Serialize};

/// 번호 하나의 지연 통계.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayStats {
    /// 번호
    pub number: u8,
    /// 마지막 출현 이후 지나간 추첨 수. 한 번도 안 나왔으면 전체 추첨 수.
    pub current_gap: usize,
    /// 이력상 최대 갭 (두 출현 사이 추첨 수). 출현이 1회 이하면 0.
    pub max_gap: usize,
}

impl DelayStats {
    /// 최대 갭 대비 현재 갭 비율. 최대 갭이 없으면 `None`.
    pub fn gap_ratio(&self) -> Option<f64> {
        if self.max_gap == 0 {
            None
        } else {
            Some(self.current_gap as f64 / self.max_gap as f64)
        }
    }
}

/// 전체 이력에서 49개 번호의 지연 테이블을 계산합니다.
///
/// 갭은 두 출현 *사이*의 추첨 수입니다: 연속된 두 추첨에 모두 나온
/// 번호의 갭은 0입니다.
pub fn delay_table(draws: &[DrawRecord]) -> Vec<DelayStats> {
    let mut last_seen: [Option<usize>; 49] = [None; 49];
    let mut max_gap = [0usize; 49];

    for (idx, record) in draws.iter().enumerate() {
        for n in record.numbers.iter() {
            let slot = (n - 1) as usize;
            if let Some(prev) = last_seen[slot] {
                let gap = idx - prev - 1;
                if gap > max_gap[slot] {
                    max_gap[slot] = gap;
                }
            }
            last_seen[slot] = Some(idx);
        }
    }

    (MIN_NUMBER..=MAX_NUMBER)
        .map(|n| {
            let slot = (n - 1) as usize;
            let current_gap = match last_seen[slot] {
                Some(idx) => draws.len() - idx - 1,
                None => draws.len(),
            };
            DelayStats {
                number: n,
                current_gap,
                max_gap: max_gap[slot],
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use lotto_core::{DrawNumbers, DrawRecord, Lottery};

    fn draw(day: i64, numbers: [u8; 6]) -> DrawRecord {
        DrawRecord::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(day),
            DrawNumbers::new(numbers).unwrap(),
            Lottery::Primitiva,
        )
    }

    #[test]
    fn test_gaps() {
        // 번호 1: 추첨 0과 3에 출현 → 최대 갭 2, 현재 갭 1
        let draws = vec![
            draw(0, [1, 10, 20, 30, 40, 49]),
            draw(1, [2, 11, 21, 31, 41, 48]),
            draw(2, [3, 12, 22, 32, 42, 47]),
            draw(3, [1, 13, 23, 33, 43, 46]),
            draw(4, [4, 14, 24, 34, 44, 45]),
        ];
        let table = delay_table(&draws);

        let n1 = table[0];
        assert_eq!(n1.number, 1);
        assert_eq!(n1.max_gap, 2);
        assert_eq!(n1.current_gap, 1);
        assert!((n1.gap_ratio().unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_never_seen_number() {
        let draws = vec![
            draw(0, [1, 2, 3, 4, 5, 6]),
            draw(1, [1, 2, 3, 4, 5, 6]),
        ];
        let table = delay_table(&draws);

        let n49 = table[48];
        assert_eq!(n49.current_gap, 2);
        assert_eq!(n49.max_gap, 0);
        assert!(n49.gap_ratio().is_none());
    }

    #[test]
    fn test_consecutive_appearances_have_zero_gap() {
        let draws = vec![
            draw(0, [7, 10, 20, 30, 40, 49]),
            draw(1, [7, 11, 21, 31, 41, 48]),
        ];
        let table = delay_table(&draws);

        let n7 = table[6];
        assert_eq!(n7.max_gap, 0);
        assert_eq!(n7.current_gap, 0);
    }

    #[test]
    fn test_empty_history() {
        let table = delay_table(&[]);
        assert_eq!(table.len(), 49);
        assert!(table.iter().all(|s| s.current_gap == 0 && s.max_gap == 0));
    }
}
