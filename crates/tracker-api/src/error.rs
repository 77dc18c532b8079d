//! 통합 API 에러 응답 타입.
//!
//! HTTP 수준의 문제(잘못된 티커, 잘못된 기간, 없는 세션)만 이 형식으로 응답합니다.
//! 시세 조회 실패 같은 데이터 문제는 렌더 모델의 배너로 전달됩니다.

use axum::http::{Method, StatusCode, Uri};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracker_core::TrackerError;
use tracker_data::DataError;

/// 통합 API 에러 응답.
///
/// # 예시
///
/// ```json
/// {
///   "code": "SESSION_NOT_FOUND",
///   "message": "세션을 찾을 수 없습니다: 123e4567-e89b-12d3-a456-426614174000",
///   "timestamp": 1738300800
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "INVALID_TICKER", "SESSION_NOT_FOUND")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 추가 에러 상세 정보 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// 에러 발생 타임스탬프 (Unix timestamp, 선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    /// HTTP 메서드
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// 요청 경로
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ApiErrorResponse {
    /// 기본 에러 생성 (타임스탬프 포함).
    ///
    /// ```
    /// use tracker_api::error::ApiErrorResponse;
    ///
    /// let error = ApiErrorResponse::new("NOT_FOUND", "Session not found");
    /// assert_eq!(error.code(), "NOT_FOUND");
    /// ```
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: Some(chrono::Utc::now().timestamp()),
            method: None,
            path: None,
        }
    }

    /// 상세 정보 포함 에러 생성.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        Self {
            details: Some(details),
            ..Self::new(code, message)
        }
    }

    /// 타임스탬프 없는 간단한 에러.
    pub fn simple(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: None,
            method: None,
            path: None,
        }
    }

    /// 요청 정보(메서드, 경로)를 추가합니다.
    #[must_use]
    pub fn with_request_info(mut self, method: &Method, uri: &Uri) -> Self {
        self.method = Some(method.to_string());
        self.path = Some(uri.path().to_string());
        self
    }

    /// 에러 코드 반환.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// 에러 메시지 반환.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiErrorResponse {}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, (StatusCode, Json<ApiErrorResponse>)>;

/// 에러 응답 튜플을 만듭니다.
pub fn api_error(
    status: StatusCode,
    code: &str,
    message: impl Into<String>,
) -> (StatusCode, Json<ApiErrorResponse>) {
    (status, Json(ApiErrorResponse::new(code, message)))
}

/// 입력 검증 에러를 400 응답으로 변환합니다.
pub fn validation_error(err: TrackerError) -> (StatusCode, Json<ApiErrorResponse>) {
    let code = match &err {
        TrackerError::InvalidTicker(_) => "INVALID_TICKER",
        TrackerError::InvalidPeriod(_) => "INVALID_PERIOD",
        _ => "INVALID_INPUT",
    };
    api_error(StatusCode::BAD_REQUEST, code, err.to_string())
}

/// 시세 제공자 에러를 502 응답으로 변환합니다.
pub fn upstream_error(err: DataError) -> (StatusCode, Json<ApiErrorResponse>) {
    api_error(StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", err.to_string())
}

/// 데이터 없음 404 응답.
pub fn no_data(what: &str, ticker: impl std::fmt::Display) -> (StatusCode, Json<ApiErrorResponse>) {
    api_error(
        StatusCode::NOT_FOUND,
        "DATA_NOT_AVAILABLE",
        format!("No {} available for {}", what, ticker),
    )
}
