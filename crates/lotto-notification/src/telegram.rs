//! 텔레그램 알림 전송.
//!
//! Telegram Bot API의 `sendMessage` 엔드포인트로 파이프라인 결과를
//! 푸시합니다. 봇 명령 처리나 폴링은 하지 않습니다 — 전송 전용입니다.

use crate::types::{
    Notification, NotificationError, NotificationEvent, NotificationPriority, NotificationResult,
    NotificationSender,
};
use async_trait::async_trait;
use tracing::{debug, error, info, warn};

/// 텔레그램 알림 전송 설정.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// @BotFather에서 받은 봇 토큰
    pub bot_token: String,
    /// 메시지를 보낼 채팅 ID
    pub chat_id: String,
    /// 전송 활성화 여부
    pub enabled: bool,
    /// 파싱 모드 (Markdown 또는 HTML)
    pub parse_mode: String,
    /// API 베이스 URL (테스트에서 재정의)
    pub api_base: String,
}

impl TelegramConfig {
    /// 새 텔레그램 설정을 생성합니다.
    pub fn new(bot_token: String, chat_id: String) -> Self {
        Self {
            bot_token,
            chat_id,
            enabled: true,
            parse_mode: "Markdown".to_string(),
            api_base: "https://api.telegram.org".to_string(),
        }
    }

    /// 환경 변수에서 설정을 생성합니다.
    ///
    /// `TELEGRAM_BOT_TOKEN`과 `TELEGRAM_CHAT_ID`가 모두 있어야 하며,
    /// `TELEGRAM_ENABLED=false`로 끌 수 있습니다.
    pub fn from_env() -> Option<Self> {
        let bot_token = std::env::var("TELEGRAM_BOT_TOKEN").ok()?;
        let chat_id = std::env::var("TELEGRAM_CHAT_ID").ok()?;
        let enabled = std::env::var("TELEGRAM_ENABLED")
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(true);

        Some(Self {
            bot_token,
            chat_id,
            enabled,
            parse_mode: "Markdown".to_string(),
            api_base: "https://api.telegram.org".to_string(),
        })
    }
}

/// 텔레그램 알림 전송기.
pub struct TelegramSender {
    config: TelegramConfig,
    client: reqwest::Client,
}

impl TelegramSender {
    /// 새 텔레그램 전송기를 생성합니다.
    pub fn new(config: TelegramConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// 환경 변수에서 전송기를 생성합니다.
    pub fn from_env() -> Option<Self> {
        TelegramConfig::from_env().map(Self::new)
    }

    /// 알림을 텔레그램 메시지로 포맷합니다.
    fn format_message(&self, notification: &Notification) -> String {
        let priority_emoji = match notification.priority {
            NotificationPriority::Low => "ℹ️",
            NotificationPriority::Normal => "📊",
            NotificationPriority::High => "🎉",
            NotificationPriority::Critical => "🚨",
        };

        let content = match &notification.event {
            NotificationEvent::TicketGenerated {
                lottery,
                generated_on,
                primary,
                secondary,
                cycle_phase,
                p_value,
                draws_analyzed,
            } => {
                format!(
                    "🎰 *추천 티켓 생성* ({lottery})\n\n\
                     날짜: {generated_on}\n\
                     주 베팅: `{primary}`\n\
                     보조 베팅: `{secondary}`\n\
                     주기 위상: {cycle_phase}\n\
                     카이제곱 p-값: {p_value:.4}\n\
                     분석 추첨 수: {draws_analyzed}"
                )
            }

            NotificationEvent::TicketChecked {
                lottery,
                checked_draws,
                hits,
                best_tier,
                details,
            } => {
                if *hits == 0 {
                    format!(
                        "🔍 *적중 확인* ({lottery})\n\n\
                         최근 {checked_draws}개 추첨에서 적중 없음"
                    )
                } else {
                    let best = best_tier.as_deref().unwrap_or("-");
                    format!(
                        "🎉 *적중!* ({lottery})\n\n\
                         최근 {checked_draws}개 추첨에서 {hits}건 적중\n\
                         최고 등급: {best}\n\n{}",
                        details.join("\n")
                    )
                }
            }

            NotificationEvent::DataUpdated {
                sources,
                stale_sources,
                merged_draws,
            } => {
                let stale_note = if *stale_sources > 0 {
                    format!("\n⚠️ 오래된 사본 사용: {stale_sources}개 소스")
                } else {
                    String::new()
                };
                format!(
                    "📥 *데이터 갱신 완료*\n\n\
                     소스: {sources}개\n\
                     병합 추첨 수: {merged_draws}{stale_note}"
                )
            }

            NotificationEvent::SystemError { stage, message } => {
                format!(
                    "🚨 *파이프라인 오류*\n\n\
                     단계: `{stage}`\n\
                     메시지: {message}"
                )
            }

            NotificationEvent::Custom { title, message } => {
                format!("{priority_emoji} *{title}*\n\n{message}")
            }
        };

        let timestamp = notification.timestamp.format("%Y-%m-%d %H:%M:%S UTC");
        format!("{content}\n\n_🕐 {timestamp}_")
    }

    /// 텔레그램에 원시 메시지를 전송합니다.
    async fn send_message(&self, text: &str) -> NotificationResult<()> {
        let url = format!(
            "{}/bot{}/sendMessage",
            self.config.api_base, self.config.bot_token
        );

        let params = serde_json::json!({
            "chat_id": self.config.chat_id,
            "text": text,
            "parse_mode": self.config.parse_mode,
            "disable_web_page_preview": true,
        });

        debug!(chat_id = %self.config.chat_id, "Sending Telegram message");

        let response = self
            .client
            .post(&url)
            .json(&params)
            .send()
            .await
            .map_err(NotificationError::NetworkError)?;

        if response.status().is_success() {
            info!("Telegram notification sent");
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                warn!("Telegram rate limited");
                return Err(NotificationError::RateLimited(60));
            }

            error!(%status, body, "Failed to send Telegram message");
            Err(NotificationError::SendFailed(format!(
                "HTTP {}: {}",
                status, body
            )))
        }
    }
}

#[async_trait]
impl NotificationSender for TelegramSender {
    async fn send(&self, notification: &Notification) -> NotificationResult<()> {
        if !self.is_enabled() {
            debug!("Telegram notifications are disabled, skipping");
            return Ok(());
        }

        let message = self.format_message(notification);
        self.send_message(&message).await
    }

    fn is_enabled(&self) -> bool {
        self.config.enabled && !self.config.bot_token.is_empty() && !self.config.chat_id.is_empty()
    }

    fn name(&self) -> &str {
        "telegram"
    }
}

/// 여러 전송기를 관리하는 알림 관리자.
///
/// 전송 실패는 로그로 남기고 파이프라인을 계속 진행합니다.
/// 활성화된 전송기가 하나뿐이면 그 실패를 에러로 돌려줍니다.
pub struct NotificationManager {
    senders: Vec<Box<dyn NotificationSender>>,
}

impl NotificationManager {
    /// 새 알림 관리자를 생성합니다.
    pub fn new() -> Self {
        Self {
            senders: Vec::new(),
        }
    }

    /// 알림 전송기를 추가합니다.
    pub fn add_sender<S: NotificationSender + 'static>(&mut self, sender: S) {
        self.senders.push(Box::new(sender));
    }

    /// 활성화된 전송기가 있는지 확인합니다.
    pub fn has_enabled_sender(&self) -> bool {
        self.senders.iter().any(|s| s.is_enabled())
    }

    /// 활성화된 모든 전송기를 통해 알림을 전송합니다.
    pub async fn notify(&self, notification: &Notification) -> NotificationResult<()> {
        let mut last_error = None;

        for sender in &self.senders {
            if sender.is_enabled() {
                if let Err(e) = sender.send(notification).await {
                    error!(sender = sender.name(), error = %e, "Notification failed");
                    last_error = Some(e);
                }
            }
        }

        if let Some(e) = last_error {
            if self.senders.iter().filter(|s| s.is_enabled()).count() == 1 {
                return Err(e);
            }
        }

        Ok(())
    }

    /// 추천 티켓 생성 알림을 전송합니다.
    #[allow(clippy::too_many_arguments)]
    pub async fn notify_ticket_generated(
        &self,
        lottery: &str,
        generated_on: chrono::NaiveDate,
        primary: &str,
        secondary: &str,
        cycle_phase: &str,
        p_value: f64,
        draws_analyzed: usize,
    ) -> NotificationResult<()> {
        let notification = Notification::new(NotificationEvent::TicketGenerated {
            lottery: lottery.to_string(),
            generated_on,
            primary: primary.to_string(),
            secondary: secondary.to_string(),
            cycle_phase: cycle_phase.to_string(),
            p_value,
            draws_analyzed,
        });
        self.notify(&notification).await
    }

    /// 적중 확인 알림을 전송합니다. 적중이 있으면 우선순위를 올립니다.
    pub async fn notify_ticket_checked(
        &self,
        lottery: &str,
        checked_draws: usize,
        hits: usize,
        best_tier: Option<String>,
        details: Vec<String>,
    ) -> NotificationResult<()> {
        let priority = if hits > 0 {
            NotificationPriority::High
        } else {
            NotificationPriority::Low
        };

        let notification = Notification::new(NotificationEvent::TicketChecked {
            lottery: lottery.to_string(),
            checked_draws,
            hits,
            best_tier,
            details,
        })
        .with_priority(priority);

        self.notify(&notification).await
    }

    /// 데이터 갱신 알림을 전송합니다.
    pub async fn notify_data_updated(
        &self,
        sources: usize,
        stale_sources: usize,
        merged_draws: usize,
    ) -> NotificationResult<()> {
        let notification = Notification::new(NotificationEvent::DataUpdated {
            sources,
            stale_sources,
            merged_draws,
        });
        self.notify(&notification).await
    }

    /// 시스템 오류 알림을 전송합니다.
    pub async fn notify_system_error(
        &self,
        stage: &str,
        message: &str,
    ) -> NotificationResult<()> {
        let notification = Notification::new(NotificationEvent::SystemError {
            stage: stage.to_string(),
            message: message.to_string(),
        })
        .with_priority(NotificationPriority::Critical);

        self.notify(&notification).await
    }
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new()
    }
}
