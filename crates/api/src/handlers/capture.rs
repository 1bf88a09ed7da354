//! Photo capture intake and review.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use booth_core::capture::{parse_image_data_url, to_data_url};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::session_token::SessionToken;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CaptureRequest {
    /// Camera output as a `data:image/...;base64,...` URL.
    pub image_data: String,
}

#[derive(Serialize)]
pub struct CaptureAccepted {
    pub mime: String,
}

/// POST /api/v1/capture
///
/// Validate and store the captured photo. Rejected payloads never touch
/// session state.
pub async fn submit_capture(
    token: SessionToken,
    State(state): State<AppState>,
    Json(input): Json<CaptureRequest>,
) -> AppResult<impl IntoResponse> {
    let captured = parse_image_data_url(&input.image_data)?;
    let mime = captured.mime.clone();

    tracing::info!(
        session = %token.as_str(),
        bytes = captured.bytes.len(),
        %mime,
        "Capture stored"
    );
    state.engine.register_capture(token.as_str(), captured).await;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CaptureAccepted { mime },
        }),
    ))
}

#[derive(Serialize)]
pub struct CaptureView {
    pub image_data: String,
}

/// GET /api/v1/capture
///
/// Return the captured photo as a data URL for the review page.
/// `NOT_READY` when the camera step has not run for this session.
pub async fn get_capture(
    token: SessionToken,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let captured = state.engine.captured_image(token.as_str()).await?;
    Ok(Json(DataResponse {
        data: CaptureView {
            image_data: to_data_url(&captured.mime, &captured.bytes),
        },
    }))
}
