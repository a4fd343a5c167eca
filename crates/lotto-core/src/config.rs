//! 설정 관리.
//!
//! 기존 스크립트들에 흩어져 있던 매직 넘버(모멘텀 임계값 0.15,
//! 콜드 비율 0.70, 드리프트 윈도우 90 등)를 전부 명명된 설정 필드로
//! 끌어올렸습니다. 기본값은 원본 스크립트의 값과 동일하므로 설정 파일
//! 없이 실행해도 같은 결과를 냅니다.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 데이터 수집/저장 설정
    pub data: DataConfig,
    /// 분석 윈도우 및 임계값
    pub analysis: AnalysisConfig,
    /// 점수 가중치
    pub scoring: ScoringConfig,
    /// 알림 설정
    pub notifications: NotificationsConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
}

/// 데이터 수집/저장 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DataConfig {
    /// CSV 파일이 저장되는 디렉토리
    pub data_dir: String,
    /// 병합 아카이브 파일명 (Data/Combinacio/Origen)
    pub archive_file: String,
    /// 생성된 티켓 파일명
    pub tickets_file: String,
    /// 다운로드 타임아웃 (초)
    pub download_timeout_secs: u64,
    /// 다운로드 최대 재시도 횟수
    pub max_retries: u32,
    /// 재시도 기본 대기 시간 (밀리초, 지수 백오프의 밑)
    pub retry_base_delay_ms: u64,
    /// 복권별 데이터 소스 (키: 복권 식별자)
    pub sources: HashMap<String, SourceConfig>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            archive_file: "estadistiques_loteries_NETA.csv".to_string(),
            tickets_file: "apostes_actuals.csv".to_string(),
            download_timeout_secs: 15,
            max_retries: 3,
            retry_base_delay_ms: 500,
            sources: HashMap::new(),
        }
    }
}

/// 복권 하나의 데이터 소스.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceConfig {
    /// 과거 결과 CSV 내보내기 URL
    pub csv_url: String,
    /// 로컬 사본 파일명 (data_dir 기준 상대 경로)
    pub file: String,
    /// 보정 주기 길이 재정의 (일). 없으면 복권별 기본값 사용.
    pub cycle_days: Option<i64>,
}

/// 분석 윈도우 및 임계값 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// 모멘텀 윈도우 (일) — 최근 편향 감지용
    pub momentum_days: i64,
    /// 편향(바이어스) 윈도우 (일) — 빈도/트리플렛/카이제곱용
    pub bias_days: i64,
    /// 드리프트 탐지 윈도우 (추첨 횟수)
    pub drift_window: usize,
    /// 드리프트 피크 최대 선택 개수
    pub max_calibration_points: usize,
    /// 콜드 번호 판정 비율 (기대 빈도 대비)
    pub cold_ratio: f64,
    /// 핫 번호 판정 비율 (기대 빈도 대비)
    pub hot_ratio: f64,
    /// 주기 통계에 포함할 최소 추첨 수
    pub cycle_min_draws: usize,
    /// 주기 통계에 포함할 최대 추첨 수
    pub cycle_max_draws: usize,
    /// 보정 직후 모드 구간 (보정일로부터 일수)
    pub post_calibration_days: i64,
    /// 보정 직전 모드 구간 (다음 예상 보정까지 일수)
    pub pre_calibration_days: i64,
    /// 콜드 번호 분류용 최근 추첨 윈도우 (추첨 횟수)
    pub cold_momentum_window: usize,
    /// 가설 검증용 후속 추첨 윈도우 (추첨 횟수)
    pub validation_window: usize,
    /// 티켓 검증 시 되돌아보는 기간 (일)
    pub check_back_days: i64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            momentum_days: 30,
            bias_days: 90,
            drift_window: 90,
            max_calibration_points: 20,
            cold_ratio: 0.70,
            hot_ratio: 1.30,
            cycle_min_draws: 50,
            cycle_max_draws: 500,
            post_calibration_days: 60,
            pre_calibration_days: 45,
            cold_momentum_window: 10,
            validation_window: 5,
            check_back_days: 7,
        }
    }
}

/// 번호 점수 가중치.
///
/// 기본값은 마스터 스크립트 계열이 수렴한 값입니다.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// 모멘텀 보너스 발동 임계값 (최근 추첨 수 대비 출현 비율)
    pub momentum_threshold: f64,
    /// 모멘텀 보너스 점수
    pub momentum_bonus: f64,
    /// 편향 윈도우 출현 1회당 점수
    pub history_weight: f64,
    /// 트리플렛 친화도 계산에 쓰는 상위 트리플렛 개수
    pub top_triplets: usize,
    /// 상위 트리플렛 하나에 포함될 때마다 더하는 점수
    pub triplet_bonus: f64,
    /// 카이제곱 보너스/페널티 (p < 0.05)
    pub chi_strong_bonus: f64,
    /// 카이제곱 보너스/페널티 (p < 0.10)
    pub chi_weak_bonus: f64,
    /// 지연(콜드 갭) 점수 사용 여부
    pub use_delay: bool,
    /// 지연 비율이 delay_critical_ratio 이상일 때 점수
    pub delay_critical_bonus: f64,
    /// 지연 비율이 delay_high_ratio 초과일 때 점수
    pub delay_high_bonus: f64,
    /// 최대 지연 대비 현재 지연 비율 임계값 (critical)
    pub delay_critical_ratio: f64,
    /// 최대 지연 대비 현재 지연 비율 임계값 (high)
    pub delay_high_ratio: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            momentum_threshold: 0.15,
            momentum_bonus: 40.0,
            history_weight: 0.5,
            top_triplets: 50,
            triplet_bonus: 10.0,
            chi_strong_bonus: 50.0,
            chi_weak_bonus: 25.0,
            use_delay: false,
            delay_critical_bonus: 150.0,
            delay_high_bonus: 60.0,
            delay_critical_ratio: 0.95,
            delay_high_ratio: 0.8,
        }
    }
}

/// 알림 설정.
///
/// 봇 토큰과 채팅 ID는 설정 파일이 아닌 환경 변수
/// (`TELEGRAM_BOT_TOKEN`, `TELEGRAM_CHAT_ID`)에서만 읽습니다.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NotificationsConfig {
    /// 텔레그램 전송 활성화 여부
    pub telegram_enabled: bool,
    /// 메시지 파싱 모드 (Markdown 또는 HTML)
    pub parse_mode: String,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            telegram_enabled: true,
            parse_mode: "Markdown".to_string(),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 환경 변수는 `LOTTO_` 접두사와 `__` 구분자를 사용합니다.
    /// 예: `LOTTO_ANALYSIS__BIAS_DAYS=120`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("LOTTO")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// 경로의 설정 파일을 로드합니다. 파일이 없으면 기본값을 사용합니다.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// 복권의 데이터 소스 설정을 조회합니다.
    pub fn source(&self, key: &str) -> Option<&SourceConfig> {
        self.data.sources.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_legacy_scripts() {
        let config = AppConfig::default();

        assert_eq!(config.analysis.momentum_days, 30);
        assert_eq!(config.analysis.bias_days, 90);
        assert_eq!(config.analysis.drift_window, 90);
        assert_eq!(config.analysis.cold_ratio, 0.70);
        assert_eq!(config.analysis.hot_ratio, 1.30);
        assert_eq!(config.scoring.momentum_threshold, 0.15);
        assert_eq!(config.scoring.momentum_bonus, 40.0);
        assert_eq!(config.scoring.chi_strong_bonus, 50.0);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = AppConfig::load_or_default("/nonexistent/lotto.toml").unwrap();
        assert_eq!(config.analysis.bias_days, 90);
        assert_eq!(config.scoring.momentum_bonus, 40.0);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
            [analysis]
            bias_days = 120
        "#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(config.analysis.bias_days, 120);
        // 나머지는 기본값 유지
        assert_eq!(config.analysis.momentum_days, 30);
        assert_eq!(config.scoring.top_triplets, 50);
    }
}
