//! # Lotto Notification
//!
//! 파이프라인 결과 푸시 알림.
//!
//! 지원 채널:
//! - Telegram (`sendMessage` 푸시 전용 — 봇 명령/폴링 없음)
//!
//! 알림 실패는 파이프라인을 중단시키지 않습니다. 호출부는 에러를
//! 로그로 남기고 계속 진행합니다.

pub mod telegram;
pub mod types;

pub use telegram::*;
pub use types::*;
