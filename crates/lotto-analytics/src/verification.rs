//! 저장된 티켓의 적중 확인.
//!
//! 최근 기간의 추첨과 저장된 베팅을 비교해 3개 이상 일치하는
//! 추첨을 모두 보고합니다. 6개 일치가 1등이고, 5/4/3개 일치가
//! 그 아래 등수입니다.

use chrono::{Duration, NaiveDate};
use lotto_core::{BetKind, DrawRecord, Lottery, Ticket};
use serde::{Deserialize, Serialize};

/// 당첨 등급.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PrizeTier {
    /// 3개 일치
    Three,
    /// 4개 일치
    Four,
    /// 5개 일치
    Five,
    /// 6개 모두 일치
    Jackpot,
}

impl PrizeTier {
    /// 일치 개수로부터 등급. 3개 미만이면 `None`.
    pub fn from_matches(matches: usize) -> Option<Self> {
        match matches {
            6 => Some(Self::Jackpot),
            5 => Some(Self::Five),
            4 => Some(Self::Four),
            3 => Some(Self::Three),
            _ => None,
        }
    }

    /// 보고서용 라벨.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Jackpot => "🏆 1등 (6개 일치)",
            Self::Five => "🥈 5개 일치",
            Self::Four => "🥉 4개 일치",
            Self::Three => "✅ 3개 일치",
        }
    }
}

/// 베팅 하나가 추첨 하나에 적중한 기록.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetHit {
    /// 적중한 추첨 날짜
    pub draw_date: NaiveDate,
    /// 적중한 추첨의 복권 종류
    pub lottery: Lottery,
    /// 적중한 베팅 종류
    pub kind: BetKind,
    /// 일치한 번호 (오름차순)
    pub matched: Vec<u8>,
    /// 당첨 등급
    pub tier: PrizeTier,
}

/// 티켓 확인 결과.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketCheck {
    /// 확인 기간 시작일 (포함)
    pub since: NaiveDate,
    /// 기간 내 확인한 추첨 수
    pub checked_draws: usize,
    /// 적중 목록 (날짜 오름차순, 등급 높은 순)
    pub hits: Vec<BetHit>,
}

impl TicketCheck {
    /// 가장 높은 등급의 적중.
    pub fn best(&self) -> Option<&BetHit> {
        self.hits.iter().max_by_key(|h| h.tier)
    }
}

/// 티켓의 두 베팅을 최근 `back_days`일의 추첨과 비교합니다.
///
/// `today - back_days`부터 `today`까지(양 끝 포함)의 추첨만 검사하며,
/// 주 베팅과 보조 베팅 각각에 대해 3개 이상 일치하는 모든 추첨을
/// 적중으로 기록합니다.
pub fn check_ticket(
    ticket: &Ticket,
    draws: &[DrawRecord],
    today: NaiveDate,
    back_days: i64,
) -> TicketCheck {
    let since = today - Duration::days(back_days);

    let mut checked_draws = 0usize;
    let mut hits = Vec::new();

    for record in draws {
        if record.date < since || record.date > today {
            continue;
        }
        checked_draws += 1;

        for kind in [BetKind::Primary, BetKind::Secondary] {
            let bet = ticket.bet(kind);
            let matched = bet.matched(&record.numbers);
            if let Some(tier) = PrizeTier::from_matches(matched.len()) {
                hits.push(BetHit {
                    draw_date: record.date,
                    lottery: record.lottery,
                    kind,
                    matched,
                    tier,
                });
            }
        }
    }

    hits.sort_by(|a, b| a.draw_date.cmp(&b.draw_date).then(b.tier.cmp(&a.tier)));

    TicketCheck {
        since,
        checked_draws,
        hits,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotto_core::DrawNumbers;

    fn draw(date: NaiveDate, numbers: [u8; 6]) -> DrawRecord {
        DrawRecord::new(date, DrawNumbers::new(numbers).unwrap(), Lottery::Bonoloto)
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    fn ticket() -> Ticket {
        Ticket::new(
            date(1),
            DrawNumbers::new([1, 2, 3, 4, 5, 6]).unwrap(),
            DrawNumbers::new([10, 11, 12, 13, 14, 15]).unwrap(),
        )
    }

    #[test]
    fn test_tier_from_matches() {
        assert_eq!(PrizeTier::from_matches(6), Some(PrizeTier::Jackpot));
        assert_eq!(PrizeTier::from_matches(3), Some(PrizeTier::Three));
        assert_eq!(PrizeTier::from_matches(2), None);
        assert_eq!(PrizeTier::from_matches(0), None);
    }

    #[test]
    fn test_hits_both_bets() {
        let draws = vec![
            // 주 베팅과 4개 일치
            draw(date(5), [1, 2, 3, 4, 20, 30]),
            // 보조 베팅과 3개 일치
            draw(date(6), [10, 11, 12, 40, 41, 42]),
            // 일치 2개 이하, 미적중
            draw(date(7), [1, 2, 20, 30, 40, 49]),
        ];

        let check = check_ticket(&ticket(), &draws, date(8), 7);

        assert_eq!(check.checked_draws, 3);
        assert_eq!(check.hits.len(), 2);

        assert_eq!(check.hits[0].kind, BetKind::Primary);
        assert_eq!(check.hits[0].tier, PrizeTier::Four);
        assert_eq!(check.hits[0].matched, vec![1, 2, 3, 4]);

        assert_eq!(check.hits[1].kind, BetKind::Secondary);
        assert_eq!(check.hits[1].tier, PrizeTier::Three);

        assert_eq!(check.best().unwrap().tier, PrizeTier::Four);
    }

    #[test]
    fn test_jackpot() {
        let draws = vec![draw(date(5), [1, 2, 3, 4, 5, 6])];
        let check = check_ticket(&ticket(), &draws, date(8), 7);

        assert_eq!(check.hits.len(), 1);
        assert_eq!(check.hits[0].tier, PrizeTier::Jackpot);
        assert_eq!(check.hits[0].matched.len(), 6);
    }

    #[test]
    fn test_window_bounds() {
        let draws = vec![
            // 기간 이전: 제외
            draw(date(1), [1, 2, 3, 4, 5, 6]),
            // 기간 경계(정확히 back_days일 전): 포함
            draw(date(3), [1, 2, 3, 40, 41, 42]),
            // 미래 날짜: 제외
            draw(date(20), [1, 2, 3, 4, 5, 6]),
        ];

        let check = check_ticket(&ticket(), &draws, date(10), 7);

        assert_eq!(check.since, date(3));
        assert_eq!(check.checked_draws, 1);
        assert_eq!(check.hits.len(), 1);
        assert_eq!(check.hits[0].draw_date, date(3));
    }

    #[test]
    fn test_no_recent_draws() {
        let check = check_ticket(&ticket(), &[], date(10), 7);
        assert_eq!(check.checked_draws, 0);
        assert!(check.hits.is_empty());
        assert!(check.best().is_none());
    }
}
