//! Generation job endpoints: start, poll, cancel, results.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use booth_core::capture::to_data_url;
use booth_core::job::JobSnapshot;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::session_token::SessionToken;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct StartRequest {
    /// Up to four per-image refinements; missing entries default to empty.
    #[serde(default)]
    pub prompts: Vec<String>,
}

#[derive(Serialize)]
pub struct StartAccepted {
    pub accepted: bool,
}

/// POST /api/v1/generation/start
///
/// Kick off the background job that sequentially produces four images.
/// Returns `202 Accepted` as soon as the task is scheduled -- this request
/// never waits on a transform call. `MISSING_INPUT` without a capture and
/// style, `CONFLICT` while a job is already running.
pub async fn start_generation(
    token: SessionToken,
    State(state): State<AppState>,
    Json(input): Json<StartRequest>,
) -> AppResult<impl IntoResponse> {
    state.engine.start_job(token.as_str(), input.prompts).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(DataResponse {
            data: StartAccepted { accepted: true },
        }),
    ))
}

/// GET /api/v1/generation/status
///
/// Current job snapshot for this session; `idle` when no job has run.
/// Pure read -- polling never mutates job state.
pub async fn generation_status(
    token: SessionToken,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<JobSnapshot>>> {
    let snapshot = state.engine.poll_status(token.as_str()).await;
    Ok(Json(DataResponse { data: snapshot }))
}

#[derive(Serialize)]
pub struct CancelAccepted {
    pub accepted: bool,
}

/// POST /api/v1/generation/cancel
///
/// Request cancellation. Always accepted: the running task observes the
/// flag before its next transform call; an in-flight call is not
/// interrupted.
pub async fn cancel_generation(
    token: SessionToken,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    state.engine.cancel_job(token.as_str()).await;
    Ok(Json(DataResponse {
        data: CancelAccepted { accepted: true },
    }))
}

#[derive(Serialize)]
pub struct ResultSheet {
    /// Exactly four generated images as data URLs, in generation order.
    pub images: Vec<String>,
}

/// GET /api/v1/results
///
/// The four approved images for the print layout page. `NOT_READY` until
/// the job has published them.
pub async fn fetch_results(
    token: SessionToken,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let images = state.engine.fetch_results(token.as_str()).await?;
    let images = images
        .iter()
        .map(|bytes| to_data_url("image/png", bytes))
        .collect();

    Ok(Json(DataResponse {
        data: ResultSheet { images },
    }))
}
