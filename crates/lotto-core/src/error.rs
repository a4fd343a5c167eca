//! 분석 파이프라인의 에러 타입.
//!
//! 이 모듈은 파이프라인 전반에서 사용되는 에러 타입을 정의합니다.

use thiserror::Error;

/// 핵심 파이프라인 에러.
#[derive(Debug, Error)]
pub enum LottoError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 데이터 에러
    #[error("데이터 에러: {0}")]
    Data(String),

    /// 네트워크 에러
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// 요청 한도 초과
    #[error("요청 한도 초과: {0}")]
    RateLimit(String),

    /// 파싱 에러
    #[error("파싱 에러: {0}")]
    Parse(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 찾을 수 없음
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 분석에 필요한 데이터 부족
    #[error("데이터 부족: {0}")]
    InsufficientData(String),

    /// 알림 에러
    #[error("알림 에러: {0}")]
    Notification(String),

    /// 내부 에러
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 파이프라인 작업을 위한 Result 타입.
pub type LottoResult<T> = Result<T, LottoError>;

impl LottoError {
    /// 재시도 가능한 에러인지 확인합니다.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LottoError::Network(_) | LottoError::RateLimit(_))
    }

    /// 치명적인 에러인지 확인합니다.
    ///
    /// 치명적인 에러는 파이프라인 실행을 중단해야 합니다. 네트워크 실패는
    /// 로컬 사본 폴백으로 계속 진행할 수 있으므로 치명적이지 않습니다.
    pub fn is_critical(&self) -> bool {
        matches!(self, LottoError::Config(_) | LottoError::Internal(_))
    }
}

impl From<serde_json::Error> for LottoError {
    fn from(err: serde_json::Error) -> Self {
        LottoError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for LottoError {
    fn from(err: std::io::Error) -> Self {
        LottoError::Data(err.to_string())
    }
}
