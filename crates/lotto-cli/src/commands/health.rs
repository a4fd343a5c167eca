//! 시스템 상태 확인 명령어.
//!
//! 설정, 데이터 파일, 알림 자격 증명의 존재 여부를 점검합니다.
//! 네트워크 호출은 하지 않습니다.

use anyhow::{Context, Result};
use lotto_core::{AppConfig, Lottery};
use lotto_data::DrawStore;
use std::path::Path;

pub fn run(config: &AppConfig, config_path: &str) -> Result<()> {
    println!("\n🩺 시스템 상태 확인");

    // 설정 파일
    if Path::new(config_path).exists() {
        println!("  ✅ 설정 파일: {}", config_path);
    } else {
        println!("  ⚠️ 설정 파일 없음 ({}) — 기본값 사용 중", config_path);
    }

    // 데이터 소스 설정
    for lottery in Lottery::all() {
        match config.source(lottery.key()) {
            Some(source) if !source.csv_url.is_empty() => {
                println!("  ✅ {} 소스: {}", lottery, source.csv_url);
            }
            Some(_) => println!("  ⚠️ {} 소스: URL 미설정", lottery),
            None => println!("  ⚠️ {} 소스: 설정 없음", lottery),
        }
    }

    let store = DrawStore::new(config.data.clone())
        .context("데이터 저장소를 초기화할 수 없습니다")?;

    // 로컬 데이터 파일
    for lottery in Lottery::all() {
        match store.history_path(lottery) {
            Some(path) if path.exists() => {
                println!("  ✅ {} 로컬 이력: {}", lottery, path.display());
            }
            Some(path) => {
                println!(
                    "  ⚠️ {} 로컬 이력 없음: {} (`lotto update` 필요)",
                    lottery,
                    path.display()
                );
            }
            None => {}
        }
    }

    // 병합 아카이브
    match store.load_merged() {
        Ok(draws) if !draws.is_empty() => {
            println!(
                "  ✅ 병합 아카이브: {}개 추첨 ({} ~ {})",
                draws.len(),
                draws[0].date,
                draws[draws.len() - 1].date
            );
        }
        Ok(_) => println!("  ⚠️ 병합 아카이브가 비어 있음"),
        Err(_) => println!(
            "  ⚠️ 병합 아카이브 없음: {} (`lotto update` 필요)",
            store.archive_path().display()
        ),
    }

    // 저장된 티켓
    match store.load_ticket() {
        Ok(ticket) => println!("  ✅ 저장된 티켓: {} 생성", ticket.generated_on),
        Err(_) => println!("  ⚠️ 저장된 티켓 없음 (`lotto recommend` 필요)"),
    }

    // 텔레그램 자격 증명
    let has_token = std::env::var("TELEGRAM_BOT_TOKEN").is_ok();
    let has_chat = std::env::var("TELEGRAM_CHAT_ID").is_ok();
    if config.notifications.telegram_enabled {
        if has_token && has_chat {
            println!("  ✅ 텔레그램: 자격 증명 설정됨");
        } else {
            println!("  ⚠️ 텔레그램: TELEGRAM_BOT_TOKEN / TELEGRAM_CHAT_ID 환경 변수 필요");
        }
    } else {
        println!("  ℹ️ 텔레그램: 설정에서 비활성화됨");
    }

    Ok(())
}
