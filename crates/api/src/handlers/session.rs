//! Session issuance and reset.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::session_token::SessionToken;
use crate::state::AppState;

#[derive(Serialize)]
pub struct CreatedSession {
    pub token: String,
}

/// POST /api/v1/session
///
/// Issue a fresh opaque session token. Called once per browser; the client
/// sends the token back in the `x-session-token` header from then on.
pub async fn create_session(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let token = state.engine.issue_token().await;
    tracing::info!(session = %token, "Session issued");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CreatedSession { token },
        }),
    ))
}

#[derive(Serialize)]
pub struct ResetOutcome {
    pub reset: bool,
}

/// POST /api/v1/reset
///
/// Discard all state for this session immediately: photo, style, job
/// record, and any results. The next request with the same token starts
/// from a blank workflow.
pub async fn reset_session(
    token: SessionToken,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    state.engine.reset(token.as_str()).await;
    Ok(Json(DataResponse {
        data: ResetOutcome { reset: true },
    }))
}
