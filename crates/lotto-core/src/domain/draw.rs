//! 추첨 기록 및 번호 조합.

use crate::error::{LottoError, LottoResult};
use crate::types::{DRAW_SIZE, MAX_NUMBER, MIN_NUMBER, TRIPLETS_PER_DRAW};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Lottery;

/// 한 추첨에서 뽑을 수 있는 3개 번호의 비순서 조합.
pub type Triplet = [u8; 3];

/// 검증된 6개 번호 조합.
///
/// 생성 시점에 불변식을 강제합니다: 정확히 6개, 모두 서로 다른 값,
/// 모두 1~49 범위. 내부 저장은 항상 오름차순 정렬 상태입니다.
/// 원본 스크립트들은 이 검증을 파일마다 다르게 (또는 전혀) 수행했는데,
/// 여기서는 타입 수준에서 한 번만 수행합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct DrawNumbers([u8; DRAW_SIZE]);

impl DrawNumbers {
    /// 6개 번호로 조합을 생성합니다.
    ///
    /// 번호는 내부적으로 오름차순 정렬됩니다. 개수가 다르거나,
    /// 범위를 벗어나거나, 중복이 있으면 `InvalidInput` 에러를 반환합니다.
    pub fn new(mut numbers: [u8; DRAW_SIZE]) -> LottoResult<Self> {
        numbers.sort_unstable();

        for n in numbers {
            if !(MIN_NUMBER..=MAX_NUMBER).contains(&n) {
                return Err(LottoError::InvalidInput(format!(
                    "번호 {}는 {}~{} 범위를 벗어남",
                    n, MIN_NUMBER, MAX_NUMBER
                )));
            }
        }

        // 정렬 후 인접 중복 검사
        for pair in numbers.windows(2) {
            if pair[0] == pair[1] {
                return Err(LottoError::InvalidInput(format!(
                    "중복 번호: {}",
                    pair[0]
                )));
            }
        }

        Ok(Self(numbers))
    }

    /// 슬라이스에서 조합을 생성합니다. 길이가 6이 아니면 실패합니다.
    pub fn from_slice(numbers: &[u8]) -> LottoResult<Self> {
        let arr: [u8; DRAW_SIZE] = numbers.try_into().map_err(|_| {
            LottoError::InvalidInput(format!(
                "번호 개수가 {}개가 아님: {}개",
                DRAW_SIZE,
                numbers.len()
            ))
        })?;
        Self::new(arr)
    }

    /// 정렬된 번호 슬라이스.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// 번호 포함 여부.
    pub fn contains(&self, n: u8) -> bool {
        self.0.binary_search(&n).is_ok()
    }

    /// 번호 반복자 (오름차순).
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }

    /// 이 추첨의 모든 3개 조합 (C(6,3) = 20개).
    ///
    /// 각 트리플렛은 오름차순이며, 전체 목록은 사전식 순서입니다.
    pub fn triplets(&self) -> Vec<Triplet> {
        let mut out = Vec::with_capacity(TRIPLETS_PER_DRAW);
        for i in 0..DRAW_SIZE - 2 {
            for j in i + 1..DRAW_SIZE - 1 {
                for k in j + 1..DRAW_SIZE {
                    out.push([self.0[i], self.0[j], self.0[k]]);
                }
            }
        }
        out
    }

    /// 다른 조합과 일치하는 번호 목록 (오름차순).
    pub fn matched(&self, other: &DrawNumbers) -> Vec<u8> {
        self.iter().filter(|n| other.contains(*n)).collect()
    }

    /// 다른 조합과 일치하는 번호 개수.
    pub fn match_count(&self, other: &DrawNumbers) -> usize {
        self.iter().filter(|n| other.contains(*n)).count()
    }
}

impl TryFrom<Vec<u8>> for DrawNumbers {
    type Error = LottoError;

    fn try_from(v: Vec<u8>) -> Result<Self, Self::Error> {
        Self::from_slice(&v)
    }
}

impl From<DrawNumbers> for Vec<u8> {
    fn from(n: DrawNumbers) -> Self {
        n.0.to_vec()
    }
}

impl fmt::Display for DrawNumbers {
    /// 티켓 표기: `02 - 11 - 23 - 31 - 40 - 47`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted: Vec<String> = self.0.iter().map(|n| format!("{:02}", n)).collect();
        write!(f, "{}", formatted.join(" - "))
    }
}

/// 하나의 과거 추첨 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRecord {
    /// 추첨 날짜
    pub date: NaiveDate,
    /// 추첨된 6개 번호
    pub numbers: DrawNumbers,
    /// 복권 종류
    pub lottery: Lottery,
}

impl DrawRecord {
    /// 새 추첨 기록 생성.
    pub fn new(date: NaiveDate, numbers: DrawNumbers, lottery: Lottery) -> Self {
        Self {
            date,
            numbers,
            lottery,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_numbers_sorted_on_construction() {
        let numbers = DrawNumbers::new([47, 2, 31, 11, 40, 23]).unwrap();
        assert_eq!(numbers.as_slice(), &[2, 11, 23, 31, 40, 47]);
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(DrawNumbers::new([0, 2, 3, 4, 5, 6]).is_err());
        assert!(DrawNumbers::new([1, 2, 3, 4, 5, 50]).is_err());
    }

    #[test]
    fn test_rejects_duplicates() {
        assert!(DrawNumbers::new([1, 2, 3, 4, 5, 5]).is_err());
    }

    #[test]
    fn test_rejects_wrong_count() {
        assert!(DrawNumbers::from_slice(&[1, 2, 3]).is_err());
        assert!(DrawNumbers::from_slice(&[1, 2, 3, 4, 5, 6, 7]).is_err());
    }

    #[test]
    fn test_triplets_count_and_order() {
        let numbers = DrawNumbers::new([1, 2, 3, 4, 5, 6]).unwrap();
        let triplets = numbers.triplets();
        assert_eq!(triplets.len(), 20);
        assert_eq!(triplets[0], [1, 2, 3]);
        assert_eq!(triplets[19], [4, 5, 6]);

        // 모두 서로 다른 조합
        let mut unique = triplets.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 20);
    }

    #[test]
    fn test_match_count() {
        let a = DrawNumbers::new([1, 2, 3, 4, 5, 6]).unwrap();
        let b = DrawNumbers::new([4, 5, 6, 7, 8, 9]).unwrap();
        assert_eq!(a.match_count(&b), 3);
        assert_eq!(a.matched(&b), vec![4, 5, 6]);
    }

    proptest! {
        /// 유효하게 생성된 조합은 항상 정렬 + 중복 없음 + 범위 내.
        #[test]
        fn prop_valid_numbers_invariant(mut pool in proptest::sample::subsequence((1u8..=49).collect::<Vec<_>>(), 6)) {
            pool.reverse();
            let arr: [u8; 6] = pool.try_into().unwrap();
            let numbers = DrawNumbers::new(arr).unwrap();
            let slice = numbers.as_slice();

            prop_assert!(slice.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(slice.iter().all(|n| (1..=49).contains(n)));
        }
    }
}
