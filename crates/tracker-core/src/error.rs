//! 대시보드 공통 에러 타입.
//!
//! 입력 검증과 설정 단계에서 발생하는 에러를 정의합니다.
//! 시세 조회 실패는 `tracker-data`의 `DataError`가 담당합니다.

use thiserror::Error;

/// 핵심 에러.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 잘못된 티커
    #[error("잘못된 티커: {0}")]
    InvalidTicker(String),

    /// 잘못된 조회 기간
    #[error("잘못된 기간: {0}")]
    InvalidPeriod(String),

    /// 데이터 에러
    #[error("데이터 에러: {0}")]
    Data(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),

    /// 찾을 수 없음
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 내부 에러
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 핵심 작업을 위한 Result 타입.
pub type TrackerResult<T> = Result<T, TrackerError>;

impl TrackerError {
    /// 사용자 입력으로 인한 에러인지 확인합니다.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            TrackerError::InvalidTicker(_) | TrackerError::InvalidPeriod(_)
        )
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        TrackerError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for TrackerError {
    fn from(err: config::ConfigError) -> Self {
        TrackerError::Config(err.to_string())
    }
}
