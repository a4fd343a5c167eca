//! 데이터 모듈 에러 타입.

use thiserror::Error;

/// 데이터 관련 에러.
#[derive(Debug, Error)]
pub enum DataError {
    /// 외부 소스에서 가져오기 실패
    #[error("가져오기 실패: {0}")]
    FetchError(String),

    /// HTTP 상태 에러
    #[error("HTTP {status}: {url}")]
    HttpStatus { status: u16, url: String },

    /// 재시도 소진 후 로컬 사본도 없음
    #[error("다운로드 실패 후 로컬 사본 없음: {0}")]
    NoLocalCopy(String),

    /// 파싱 에러
    #[error("파싱 에러: {0}")]
    ParseError(String),

    /// 잘못된 데이터 형식
    #[error("잘못된 데이터: {0}")]
    InvalidData(String),

    /// 파일을 찾을 수 없음
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 입출력 에러
    #[error("입출력 에러: {0}")]
    IoError(String),

    /// 설정 에러
    #[error("설정 에러: {0}")]
    ConfigError(String),
}

impl DataError {
    /// 재시도할 가치가 있는 에러인지 확인합니다.
    ///
    /// 네트워크 실패와 429/5xx 응답만 재시도합니다. 그 외의
    /// HTTP 에러(404 등)는 재시도해도 결과가 달라지지 않습니다.
    pub fn is_retryable(&self) -> bool {
        match self {
            DataError::FetchError(_) => true,
            DataError::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for DataError {
    fn from(err: reqwest::Error) -> Self {
        DataError::FetchError(err.to_string())
    }
}

impl From<csv::Error> for DataError {
    fn from(err: csv::Error) -> Self {
        DataError::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for DataError {
    fn from(err: std::io::Error) -> Self {
        DataError::IoError(err.to_string())
    }
}

/// 데이터 작업용 Result 타입.
pub type Result<T> = std::result::Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(DataError::FetchError("timeout".into()).is_retryable());
        assert!(DataError::HttpStatus {
            status: 503,
            url: "http://x".into()
        }
        .is_retryable());
        assert!(DataError::HttpStatus {
            status: 429,
            url: "http://x".into()
        }
        .is_retryable());
        assert!(!DataError::HttpStatus {
            status: 404,
            url: "http://x".into()
        }
        .is_retryable());
        assert!(!DataError::ParseError("bad row".into()).is_retryable());
    }
}
