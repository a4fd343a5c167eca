//! 트리플렛 순위 명령어.

use anyhow::{bail, Context, Result};
use chrono::{Duration, NaiveDate};
use lotto_analytics::TripletCounter;
use lotto_core::{AppConfig, DrawRecord};
use lotto_data::DrawStore;
use tracing::info;

use super::{today, Selection};

pub fn run(
    config: &AppConfig,
    selection: Selection,
    days: Option<i64>,
    from: Option<String>,
    top: usize,
) -> Result<()> {
    let store = DrawStore::new(config.data.clone())
        .context("데이터 저장소를 초기화할 수 없습니다")?;
    let draws = selection.load(&store)?;

    // 되돌아보기 기간: --from이 --days보다 우선
    let since: Option<NaiveDate> = match (&from, days) {
        (Some(raw), _) => Some(
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .with_context(|| format!("날짜 형식 오류: {} (YYYY-MM-DD)", raw))?,
        ),
        (None, Some(n)) => Some(today() - Duration::days(n)),
        (None, None) => None,
    };

    let window: Vec<DrawRecord> = match since {
        Some(limit) => draws.into_iter().filter(|d| d.date >= limit).collect(),
        None => draws,
    };
    if window.is_empty() {
        bail!("선택한 기간에 추첨이 없습니다");
    }

    let counter = TripletCounter::from_draws(&window);
    let ranking = counter.ranking(top);

    println!("\n🧩 트리플렛 순위 — {}", selection.label());
    if let Some(limit) = since {
        println!("  기간: {} 이후", limit);
    }
    println!(
        "  추첨 {}개, 서로 다른 트리플렛 {}개, 이론 확률 {:.6}",
        counter.draws(),
        counter.distinct(),
        TripletCounter::theoretical_probability()
    );

    println!("\n  순위 | 트리플렛       | 출현 | 배율");
    for (rank, stats) in ranking.iter().enumerate() {
        let hot = if stats.is_hot() { " 🔥" } else { "" };
        println!(
            "  {:>4} | [{:>2}, {:>2}, {:>2}] | {:>4} | {:>5.2}x{}",
            rank + 1,
            stats.triplet[0],
            stats.triplet[1],
            stats.triplet[2],
            stats.count,
            stats.multiplier,
            hot
        );
    }

    info!(
        draws = counter.draws(),
        distinct = counter.distinct(),
        "Triplet ranking completed"
    );

    Ok(())
}
