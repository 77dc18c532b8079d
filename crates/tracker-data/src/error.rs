//! 데이터 모듈 오류 타입.

use thiserror::Error;

/// 시세 조회 오류.
///
/// "데이터 없음"은 오류가 아니라 `Ok(None)` 또는 빈 시계열로 표현합니다.
#[derive(Debug, Error)]
pub enum DataError {
    /// 제공자 연결 오류
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// 외부 소스 조회 오류
    #[error("Fetch error: {0}")]
    FetchError(String),

    /// 응답 파싱 오류
    #[error("Parse error: {0}")]
    ParseError(String),
}

pub type Result<T> = std::result::Result<T, DataError>;
