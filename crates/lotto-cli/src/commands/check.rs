//! 저장된 티켓 적중 확인 명령어.

use anyhow::{Context, Result};
use lotto_analytics::check_ticket;
use lotto_core::AppConfig;
use lotto_data::DrawStore;
use lotto_notification::NotificationManager;
use tracing::{info, warn};

use super::today;

pub async fn run(config: &AppConfig, notifier: &NotificationManager) -> Result<()> {
    let store = DrawStore::new(config.data.clone())
        .context("데이터 저장소를 초기화할 수 없습니다")?;

    let ticket = store
        .load_ticket()
        .context("저장된 티켓이 없습니다. 먼저 `lotto recommend`를 실행하세요")?;
    let draws = store
        .load_merged()
        .context("아카이브를 읽을 수 없습니다. 먼저 `lotto update`를 실행하세요")?;

    let today = today();
    let check = check_ticket(&ticket, &draws, today, config.analysis.check_back_days);

    println!("\n🔍 티켓 적중 확인 (생성일 {})", ticket.generated_on);
    println!("  주 베팅:   {}", ticket.primary);
    println!("  보조 베팅: {}", ticket.secondary);
    println!(
        "  확인 기간: {} ~ {} ({}개 추첨)",
        check.since, today, check.checked_draws
    );

    let mut details = Vec::new();
    if check.hits.is_empty() {
        println!("\n  적중 없음");
    } else {
        println!("\n  적중 {}건:", check.hits.len());
        for hit in &check.hits {
            let numbers: Vec<String> = hit.matched.iter().map(|n| n.to_string()).collect();
            let line = format!(
                "{} {} — {} ({}: {})",
                hit.draw_date,
                hit.lottery,
                hit.tier.label(),
                hit.kind.archive_str(),
                numbers.join(", ")
            );
            println!("  {}", line);
            details.push(line);
        }
    }

    info!(
        hits = check.hits.len(),
        checked = check.checked_draws,
        "Ticket check completed"
    );

    if notifier.has_enabled_sender() {
        let best_tier = check.best().map(|h| h.tier.label().to_string());
        if let Err(e) = notifier
            .notify_ticket_checked(
                "Totes les loteries",
                check.checked_draws,
                check.hits.len(),
                best_tier,
                details,
            )
            .await
        {
            warn!(error = %e, "Check notification failed");
        }
    }

    Ok(())
}
