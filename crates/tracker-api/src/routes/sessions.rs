//! 대시보드 세션 endpoint.
//!
//! 세션 하나가 브라우저 탭 하나에 해당합니다. 모든 동작은 렌더 모델을 돌려줍니다.

use axum::{
    extract::{Path, State},
    http::{Method, StatusCode, Uri},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use tracker_core::Period;
use tracker_dashboard::{RenderModel, UserAction};
use uuid::Uuid;

use crate::error::{validation_error, ApiErrorResponse, ApiResult};
use crate::metrics::record_user_action;
use crate::state::{AppState, SharedSession};

/// 세션 생성 요청. 모든 필드는 선택입니다.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateSessionRequest {
    pub ticker: Option<String>,
    pub period: Option<Period>,
    pub api_key: Option<String>,
}

/// 세션 생성 응답.
#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
    pub view: RenderModel,
}

/// 세션 생성.
///
/// POST /api/v1/sessions
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateSessionRequest>,
) -> ApiResult<(StatusCode, Json<CreateSessionResponse>)> {
    let (session_id, session) = state.create_session().await;
    let mut session = session.lock().await;

    if let Some(ticker) = request.ticker.as_deref() {
        if let Err(e) = session.set_ticker_input(ticker) {
            drop(session);
            state.remove_session(&session_id).await;
            return Err(validation_error(e));
        }
    }
    if let Some(period) = request.period {
        session.set_period(period);
    }
    if let Some(key) = request.api_key.as_deref() {
        session.set_api_key_input(key);
    }

    info!(%session_id, ticker = %session.ticker(), "session created");
    let view = state.handler.handle(&mut session, UserAction::View).await;
    record_user_action(UserAction::View.name());

    Ok((
        StatusCode::CREATED,
        Json(CreateSessionResponse { session_id, view }),
    ))
}

/// 현재 화면 조회.
///
/// GET /api/v1/sessions/{id}
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    method: Method,
    uri: Uri,
) -> ApiResult<Json<RenderModel>> {
    let session = find_session(&state, &id, &method, &uri).await?;
    let mut session = session.lock().await;
    let view = state.handler.handle(&mut session, UserAction::View).await;
    record_user_action(UserAction::View.name());
    Ok(Json(view))
}

/// 사용자 동작 처리.
///
/// POST /api/v1/sessions/{id}/actions
pub async fn apply_action(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    method: Method,
    uri: Uri,
    Json(action): Json<UserAction>,
) -> ApiResult<Json<RenderModel>> {
    let session = find_session(&state, &id, &method, &uri).await?;
    let mut session = session.lock().await;

    debug!(session_id = %id, action = ?action, "applying action");
    let name = action.name();
    let view = state.handler.handle(&mut session, action).await;
    record_user_action(name);
    Ok(Json(view))
}

/// 세션 삭제.
///
/// DELETE /api/v1/sessions/{id}
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    method: Method,
    uri: Uri,
) -> ApiResult<StatusCode> {
    if state.remove_session(&id).await {
        info!(session_id = %id, "session deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(session_not_found(&id, &method, &uri))
    }
}

async fn find_session(
    state: &AppState,
    id: &Uuid,
    method: &Method,
    uri: &Uri,
) -> ApiResult<SharedSession> {
    state
        .session(id)
        .await
        .ok_or_else(|| session_not_found(id, method, uri))
}

fn session_not_found(
    id: &Uuid,
    method: &Method,
    uri: &Uri,
) -> (StatusCode, Json<ApiErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(
            ApiErrorResponse::new(
                "SESSION_NOT_FOUND",
                format!("세션을 찾을 수 없습니다: {}", id),
            )
            .with_request_info(method, uri),
        ),
    )
}

/// 세션 라우터 생성.
pub fn sessions_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_session))
        .route("/{id}", get(get_session).delete(delete_session))
        .route("/{id}/actions", post(apply_action))
}
