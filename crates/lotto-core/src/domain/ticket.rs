//! 생성된 베팅 티켓.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::DrawNumbers;

/// 베팅 종류.
///
/// 점수 순위 1~6위가 주 베팅, 7~12위가 보조 베팅이 됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BetKind {
    /// 주 베팅 (순수 데이터 기반)
    Primary,
    /// 보조 베팅 (차순위)
    Secondary,
}

impl BetKind {
    /// 티켓 파일의 `Tipus` 열 값.
    ///
    /// 기존 스크립트들이 쓰던 파일 형식과의 호환을 위해 원래 표기를
    /// 유지합니다.
    pub fn archive_str(&self) -> &'static str {
        match self {
            Self::Primary => "Principal",
            Self::Secondary => "Secundaria",
        }
    }

    /// `Tipus` 열 값에서 파싱.
    pub fn from_archive_str(s: &str) -> Option<Self> {
        match s {
            "Principal" => Some(Self::Primary),
            "Secundaria" => Some(Self::Secondary),
            _ => None,
        }
    }
}

/// 한 번의 추천 실행이 만든 티켓 (주 베팅 + 보조 베팅).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// 생성 날짜
    pub generated_on: NaiveDate,
    /// 주 베팅
    pub primary: DrawNumbers,
    /// 보조 베팅
    pub secondary: DrawNumbers,
}

impl Ticket {
    /// 새 티켓 생성.
    pub fn new(generated_on: NaiveDate, primary: DrawNumbers, secondary: DrawNumbers) -> Self {
        Self {
            generated_on,
            primary,
            secondary,
        }
    }

    /// 종류별 베팅 조회.
    pub fn bet(&self, kind: BetKind) -> &DrawNumbers {
        match kind {
            BetKind::Primary => &self.primary,
            BetKind::Secondary => &self.secondary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bet_kind_archive_roundtrip() {
        assert_eq!(BetKind::from_archive_str("Principal"), Some(BetKind::Primary));
        assert_eq!(
            BetKind::from_archive_str("Secundaria"),
            Some(BetKind::Secondary)
        );
        assert_eq!(BetKind::from_archive_str("???"), None);
        assert_eq!(BetKind::Primary.archive_str(), "Principal");
    }
}
