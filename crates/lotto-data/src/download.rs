//! 과거 결과 CSV 다운로드.
//!
//! 설정된 내보내기 URL에서 복권별 이력 CSV를 받아 로컬 파일로
//! 저장합니다. 재시도 정책:
//! - 재시도 가능한 실패(네트워크, HTTP 429/5xx)는 지수 백오프로
//!   최대 `max_retries`회 재시도
//! - 최종 실패 시 기존 로컬 사본으로 폴백하고, 호출자에게
//!   신선도를 보고
//! - 로컬 사본도 없으면 에러

use crate::error::{DataError, Result};
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// 다운로드 재시도 정책.
#[derive(Debug, Clone)]
pub struct DownloadPolicy {
    /// 최대 재시도 횟수 (첫 시도 제외)
    pub max_retries: u32,
    /// 백오프 기본 대기 시간 (밀리초). n번째 재시도 전 대기는
    /// `base_delay_ms × 2^n`.
    pub base_delay_ms: u64,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
}

impl Default for DownloadPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 500,
            timeout_secs: 15,
        }
    }
}

/// 다운로드 결과의 신선도.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// 방금 다운로드한 데이터
    Fresh,
    /// 다운로드 실패로 기존 로컬 사본 사용
    Stale,
}

/// 한 소스의 다운로드 결과.
#[derive(Debug, Clone)]
pub struct FetchReport {
    /// 신선도
    pub freshness: Freshness,
    /// 로컬 파일 크기 (바이트)
    pub bytes: u64,
}

impl FetchReport {
    /// 오래된 로컬 사본인지.
    pub fn is_stale(&self) -> bool {
        self.freshness == Freshness::Stale
    }
}

/// 다운로드용 HTTP 클라이언트를 생성합니다.
pub fn build_client(policy: &DownloadPolicy) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(policy.timeout_secs))
        .build()
        .map_err(|e| DataError::ConfigError(format!("HTTP 클라이언트 생성 실패: {}", e)))
}

/// URL에서 CSV를 받아 `dest`에 저장합니다.
///
/// 성공하면 `Fresh` 보고서를 반환합니다. 모든 시도가 실패하면
/// 기존 로컬 사본이 있을 때 `Stale` 보고서를, 없으면
/// `NoLocalCopy` 에러를 반환합니다.
pub async fn fetch_history(
    client: &Client,
    url: &str,
    dest: &Path,
    policy: &DownloadPolicy,
) -> Result<FetchReport> {
    let mut last_error = None;

    for attempt in 0..=policy.max_retries {
        if attempt > 0 {
            let delay = policy.base_delay_ms * (1u64 << (attempt - 1));
            debug!(url, attempt, delay_ms = delay, "Retrying download");
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        match try_fetch(client, url).await {
            Ok(body) => {
                if let Some(parent) = dest.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(dest, &body)?;
                info!(
                    url,
                    path = %dest.display(),
                    bytes = body.len(),
                    "History downloaded"
                );
                return Ok(FetchReport {
                    freshness: Freshness::Fresh,
                    bytes: body.len() as u64,
                });
            }
            Err(e) if e.is_retryable() && attempt < policy.max_retries => {
                warn!(url, attempt, error = %e, "Retryable download failure");
                last_error = Some(e);
            }
            Err(e) => {
                last_error = Some(e);
                break;
            }
        }
    }

    let error = last_error.unwrap_or_else(|| DataError::FetchError("unknown".to_string()));

    // 폴백: 기존 로컬 사본
    match std::fs::metadata(dest) {
        Ok(meta) if meta.is_file() => {
            warn!(
                url,
                path = %dest.display(),
                error = %error,
                "Download failed, falling back to stale local copy"
            );
            Ok(FetchReport {
                freshness: Freshness::Stale,
                bytes: meta.len(),
            })
        }
        _ => Err(DataError::NoLocalCopy(format!("{} ({})", url, error))),
    }
}

async fn try_fetch(client: &Client, url: &str) -> Result<Vec<u8>> {
    let response = client.get(url).send().await?;
    let status = response.status();

    if !status.is_success() {
        return Err(DataError::HttpStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let body = response.bytes().await?;
    if body.is_empty() {
        return Err(DataError::InvalidData(format!("빈 응답: {}", url)));
    }

    Ok(body.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "Fecha,N1,N2,N3,N4,N5,N6\n15/02/2024,5,12,23,31,40,47\n";

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("lotto-download-{}-{}", std::process::id(), name))
    }

    fn fast_policy() -> DownloadPolicy {
        DownloadPolicy {
            max_retries: 2,
            base_delay_ms: 1,
            timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn test_fresh_download() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/history.csv")
            .with_status(200)
            .with_body(SAMPLE_CSV)
            .create_async()
            .await;

        let policy = fast_policy();
        let client = build_client(&policy).unwrap();
        let dest = temp_path("fresh.csv");
        std::fs::remove_file(&dest).ok();

        let report = fetch_history(
            &client,
            &format!("{}/history.csv", server.url()),
            &dest,
            &policy,
        )
        .await
        .unwrap();

        assert_eq!(report.freshness, Freshness::Fresh);
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), SAMPLE_CSV);

        mock.assert_async().await;
        std::fs::remove_file(&dest).ok();
    }

    #[tokio::test]
    async fn test_fallback_to_stale_copy() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/history.csv")
            .with_status(500)
            .expect(3) // 첫 시도 + 재시도 2회
            .create_async()
            .await;

        let policy = fast_policy();
        let client = build_client(&policy).unwrap();
        let dest = temp_path("stale.csv");
        std::fs::write(&dest, SAMPLE_CSV).unwrap();

        let report = fetch_history(
            &client,
            &format!("{}/history.csv", server.url()),
            &dest,
            &policy,
        )
        .await
        .unwrap();

        assert!(report.is_stale());
        // 로컬 사본은 그대로 유지됨
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), SAMPLE_CSV);

        mock.assert_async().await;
        std::fs::remove_file(&dest).ok();
    }

    #[tokio::test]
    async fn test_non_retryable_fails_fast_without_copy() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/history.csv")
            .with_status(404)
            .expect(1) // 404는 재시도하지 않음
            .create_async()
            .await;

        let policy = fast_policy();
        let client = build_client(&policy).unwrap();
        let dest = temp_path("missing.csv");
        std::fs::remove_file(&dest).ok();

        let result = fetch_history(
            &client,
            &format!("{}/history.csv", server.url()),
            &dest,
            &policy,
        )
        .await;

        assert!(matches!(result, Err(DataError::NoLocalCopy(_))));
        mock.assert_async().await;
    }
}
