//! CLI 명령어 구현 모듈.

pub mod check;
pub mod cycles;
pub mod health;
pub mod recommend;
pub mod triplets;
pub mod update;
pub mod validate;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use lotto_core::{AppConfig, DrawRecord, Lottery};
use lotto_data::DrawStore;

/// 분석 대상 선택: 복권 하나 또는 병합 아카이브 전체.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// 복권 하나
    One(Lottery),
    /// 병합 아카이브 전체
    Merged,
}

impl Selection {
    /// CLI 인자에서 파싱.
    pub fn from_arg(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "all" | "tots" | "merged" => Some(Self::Merged),
            other => Lottery::from_str(other).map(Self::One),
        }
    }

    /// 보고서용 라벨.
    pub fn label(&self) -> &'static str {
        match self {
            Self::One(lottery) => lottery.display_name(),
            Self::Merged => "Totes les loteries",
        }
    }

    /// 이 선택에 적용할 보정 주기 길이 (일).
    ///
    /// 복권 하나는 소스 설정 재정의 또는 복권별 기본값을 씁니다.
    /// 병합 아카이브는 두 복권 기본값의 평균을 씁니다.
    pub fn cycle_days(&self, config: &AppConfig) -> i64 {
        match self {
            Self::One(lottery) => config
                .source(lottery.key())
                .and_then(|s| s.cycle_days)
                .unwrap_or_else(|| lottery.default_cycle_days()),
            Self::Merged => {
                let all = Lottery::all();
                all.iter().map(|l| l.default_cycle_days()).sum::<i64>() / all.len() as i64
            }
        }
    }

    /// 아카이브에서 추첨 목록을 읽습니다 (날짜 오름차순).
    pub fn load(&self, store: &DrawStore) -> Result<Vec<DrawRecord>> {
        let draws = match self {
            Self::One(lottery) => store.load_lottery(*lottery),
            Self::Merged => store.load_merged(),
        }
        .context("아카이브를 읽을 수 없습니다. 먼저 `lotto update`를 실행하세요")?;

        if draws.is_empty() {
            bail!("{} 추첨 데이터가 비어 있습니다", self.label());
        }
        Ok(draws)
    }
}

/// 분석 기준일 (로컬 날짜).
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_parsing() {
        assert_eq!(
            Selection::from_arg("primitiva"),
            Some(Selection::One(Lottery::Primitiva))
        );
        assert_eq!(
            Selection::from_arg("BONO"),
            Some(Selection::One(Lottery::Bonoloto))
        );
        assert_eq!(Selection::from_arg("all"), Some(Selection::Merged));
        assert_eq!(Selection::from_arg("tots"), Some(Selection::Merged));
        assert_eq!(Selection::from_arg("euromillones"), None);
    }

    #[test]
    fn test_merged_cycle_is_mean_of_defaults() {
        let config = AppConfig::default();
        assert_eq!(Selection::Merged.cycle_days(&config), (297 + 251) / 2);
        assert_eq!(
            Selection::One(Lottery::Primitiva).cycle_days(&config),
            297
        );
    }
}
