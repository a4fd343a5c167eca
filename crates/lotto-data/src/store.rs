//! 추첨 데이터 저장소 파사드.
//!
//! 다운로드 → 파싱 → 병합 아카이브 갱신을 한 번에 수행하고,
//! 분석 파이프라인에 날짜 오름차순으로 정렬된 추첨 목록을
//! 공급합니다. 모든 경로는 `DataConfig` 기준입니다.

use crate::archive::{read_archive, write_archive};
use crate::download::{build_client, fetch_history, DownloadPolicy};
use crate::error::{DataError, Result};
use crate::parser::parse_history_file;
use crate::tickets;
use lotto_core::{DataConfig, DrawRecord, Lottery, Ticket};
use reqwest::Client;
use std::path::PathBuf;
use tracing::{info, warn};

/// 한 소스의 갱신 결과.
#[derive(Debug, Clone)]
pub struct SourceUpdate {
    /// 복권 종류
    pub lottery: Lottery,
    /// 파싱된 추첨 수
    pub draws: usize,
    /// 건너뛴 행 수
    pub skipped: usize,
    /// 오래된 로컬 사본 사용 여부
    pub stale: bool,
}

/// 전체 갱신 결과.
#[derive(Debug, Clone)]
pub struct UpdateReport {
    /// 소스별 상세
    pub sources: Vec<SourceUpdate>,
    /// 병합 아카이브에 기록된 추첨 수
    pub merged: usize,
}

impl UpdateReport {
    /// 오래된 사본을 쓴 소스 수.
    pub fn stale_sources(&self) -> usize {
        self.sources.iter().filter(|s| s.stale).count()
    }
}

/// 추첨 데이터 저장소.
pub struct DrawStore {
    config: DataConfig,
    client: Client,
}

impl DrawStore {
    /// 설정으로 저장소를 생성합니다.
    pub fn new(config: DataConfig) -> Result<Self> {
        let client = build_client(&DownloadPolicy {
            max_retries: config.max_retries,
            base_delay_ms: config.retry_base_delay_ms,
            timeout_secs: config.download_timeout_secs,
        })?;
        Ok(Self { config, client })
    }

    fn policy(&self) -> DownloadPolicy {
        DownloadPolicy {
            max_retries: self.config.max_retries,
            base_delay_ms: self.config.retry_base_delay_ms,
            timeout_secs: self.config.download_timeout_secs,
        }
    }

    /// 병합 아카이브 경로.
    pub fn archive_path(&self) -> PathBuf {
        PathBuf::from(&self.config.data_dir).join(&self.config.archive_file)
    }

    /// 티켓 파일 경로.
    pub fn tickets_path(&self) -> PathBuf {
        PathBuf::from(&self.config.data_dir).join(&self.config.tickets_file)
    }

    /// 복권의 로컬 이력 파일 경로. 소스 설정이 없으면 `None`.
    pub fn history_path(&self, lottery: Lottery) -> Option<PathBuf> {
        self.config
            .sources
            .get(lottery.key())
            .map(|s| PathBuf::from(&self.config.data_dir).join(&s.file))
    }

    /// 모든 소스를 다운로드하고 병합 아카이브를 다시 만듭니다.
    ///
    /// 소스 설정이 없는 복권은 경고 후 건너뜁니다. 다운로드에
    /// 실패한 소스는 로컬 사본으로 폴백합니다 (보고서의 `stale`).
    /// 갱신할 소스가 하나도 없으면 에러를 반환합니다.
    pub async fn update_all(&self) -> Result<UpdateReport> {
        let policy = self.policy();
        let mut sources = Vec::new();
        let mut merged: Vec<DrawRecord> = Vec::new();

        for lottery in Lottery::all() {
            let Some(source) = self.config.sources.get(lottery.key()) else {
                warn!(lottery = %lottery, "No source configured, skipped");
                continue;
            };

            let dest = PathBuf::from(&self.config.data_dir).join(&source.file);
            let report = fetch_history(&self.client, &source.csv_url, &dest, &policy).await?;
            let outcome = parse_history_file(&dest, lottery)?;

            info!(
                lottery = %lottery,
                draws = outcome.draws.len(),
                skipped = outcome.skipped,
                stale = report.is_stale(),
                "Source updated"
            );

            sources.push(SourceUpdate {
                lottery,
                draws: outcome.draws.len(),
                skipped: outcome.skipped,
                stale: report.is_stale(),
            });
            merged.extend(outcome.draws);
        }

        if sources.is_empty() {
            return Err(DataError::ConfigError(
                "갱신할 데이터 소스가 설정되지 않음".to_string(),
            ));
        }

        let written = write_archive(self.archive_path(), &merged)?;

        Ok(UpdateReport {
            sources,
            merged: written,
        })
    }

    /// 병합 아카이브 전체를 읽습니다 (날짜 오름차순).
    pub fn load_merged(&self) -> Result<Vec<DrawRecord>> {
        read_archive(self.archive_path())
    }

    /// 병합 아카이브에서 한 복권의 추첨만 읽습니다 (날짜 오름차순).
    pub fn load_lottery(&self, lottery: Lottery) -> Result<Vec<DrawRecord>> {
        let draws = self.load_merged()?;
        Ok(draws.into_iter().filter(|d| d.lottery == lottery).collect())
    }

    /// 생성된 티켓을 저장합니다.
    pub fn save_ticket(&self, ticket: &Ticket) -> Result<()> {
        tickets::save_ticket(self.tickets_path(), ticket)
    }

    /// 저장된 티켓을 불러옵니다.
    pub fn load_ticket(&self) -> Result<Ticket> {
        tickets::load_ticket(self.tickets_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotto_core::SourceConfig;
    use std::collections::HashMap;

    const PRIMITIVA_CSV: &str = "\
Fecha,N1,N2,N3,N4,N5,N6
15/02/2024,5,12,23,31,40,47
17/02/2024,1,2,3,4,5,6
";
    const BONOLOTO_CSV: &str = "\
Fecha,N1,N2,N3,N4,N5,N6
16/02/2024,7,8,9,10,11,12
";

    fn temp_config(name: &str) -> DataConfig {
        let dir = std::env::temp_dir().join(format!(
            "lotto-store-{}-{}",
            std::process::id(),
            name
        ));
        DataConfig {
            data_dir: dir.to_string_lossy().into_owned(),
            max_retries: 1,
            retry_base_delay_ms: 1,
            ..Default::default()
        }
    }

    fn with_sources(mut config: DataConfig, base_url: &str) -> DataConfig {
        let mut sources = HashMap::new();
        sources.insert(
            "primitiva".to_string(),
            SourceConfig {
                csv_url: format!("{}/primitiva.csv", base_url),
                file: "primitiva.csv".to_string(),
                cycle_days: None,
            },
        );
        sources.insert(
            "bonoloto".to_string(),
            SourceConfig {
                csv_url: format!("{}/bonoloto.csv", base_url),
                file: "bonoloto.csv".to_string(),
                cycle_days: None,
            },
        );
        config.sources = sources;
        config
    }

    #[tokio::test]
    async fn test_update_all_and_load() {
        let mut server = mockito::Server::new_async().await;
        let _primitiva = server
            .mock("GET", "/primitiva.csv")
            .with_status(200)
            .with_body(PRIMITIVA_CSV)
            .create_async()
            .await;
        let _bonoloto = server
            .mock("GET", "/bonoloto.csv")
            .with_status(200)
            .with_body(BONOLOTO_CSV)
            .create_async()
            .await;

        let config = with_sources(temp_config("update"), &server.url());
        let data_dir = config.data_dir.clone();
        let store = DrawStore::new(config).unwrap();

        let report = store.update_all().await.unwrap();
        assert_eq!(report.sources.len(), 2);
        assert_eq!(report.merged, 3);
        assert_eq!(report.stale_sources(), 0);

        // 병합 아카이브는 두 복권이 날짜순으로 섞여 있음
        let merged = store.load_merged().unwrap();
        assert_eq!(merged.len(), 3);
        assert!(merged.windows(2).all(|w| w[0].date <= w[1].date));
        assert_eq!(merged[1].lottery, Lottery::Bonoloto);

        let primitiva = store.load_lottery(Lottery::Primitiva).unwrap();
        assert_eq!(primitiva.len(), 2);

        std::fs::remove_dir_all(&data_dir).ok();
    }

    #[tokio::test]
    async fn test_update_all_with_stale_fallback() {
        let mut server = mockito::Server::new_async().await;
        let _primitiva = server
            .mock("GET", "/primitiva.csv")
            .with_status(500)
            .expect_at_least(1)
            .create_async()
            .await;
        let _bonoloto = server
            .mock("GET", "/bonoloto.csv")
            .with_status(200)
            .with_body(BONOLOTO_CSV)
            .create_async()
            .await;

        let config = with_sources(temp_config("stale"), &server.url());
        let data_dir = config.data_dir.clone();

        // 미리 로컬 사본을 심어 폴백이 동작하게 함
        std::fs::create_dir_all(&data_dir).unwrap();
        std::fs::write(
            PathBuf::from(&data_dir).join("primitiva.csv"),
            PRIMITIVA_CSV,
        )
        .unwrap();

        let store = DrawStore::new(config).unwrap();
        let report = store.update_all().await.unwrap();

        assert_eq!(report.stale_sources(), 1);
        assert_eq!(report.merged, 3);

        std::fs::remove_dir_all(&data_dir).ok();
    }

    #[tokio::test]
    async fn test_update_all_without_sources_is_error() {
        let config = temp_config("empty");
        let store = DrawStore::new(config).unwrap();

        assert!(matches!(
            store.update_all().await,
            Err(DataError::ConfigError(_))
        ));
    }

    #[test]
    fn test_ticket_roundtrip_through_store() {
        use chrono::NaiveDate;
        use lotto_core::DrawNumbers;

        let config = temp_config("tickets");
        let data_dir = config.data_dir.clone();
        let store = DrawStore::new(config).unwrap();

        let ticket = Ticket::new(
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            DrawNumbers::new([1, 2, 3, 4, 5, 6]).unwrap(),
            DrawNumbers::new([10, 11, 12, 13, 14, 15]).unwrap(),
        );

        store.save_ticket(&ticket).unwrap();
        assert_eq!(store.load_ticket().unwrap(), ticket);

        std::fs::remove_dir_all(&data_dir).ok();
    }
}
