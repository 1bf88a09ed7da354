//! Style selection.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use booth_core::style::{StickerStyle, ALL_STYLES};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::session_token::SessionToken;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct StyleRequest {
    pub style: String,
}

#[derive(Serialize)]
pub struct StyleSelected {
    pub style: &'static str,
    pub base_prompt: &'static str,
}

/// POST /api/v1/style
///
/// Select one of the catalog styles. The base prompt is derived here;
/// requires a capture (`MISSING_INPUT` otherwise), rejects unknown style
/// keys (`INVALID_PAYLOAD`).
pub async fn select_style(
    token: SessionToken,
    State(state): State<AppState>,
    Json(input): Json<StyleRequest>,
) -> AppResult<impl IntoResponse> {
    let style = StickerStyle::from_key(&input.style)?;
    state.engine.select_style(token.as_str(), style).await?;

    tracing::info!(session = %token.as_str(), style = style.key(), "Style selected");
    Ok(Json(DataResponse {
        data: StyleSelected {
            style: style.key(),
            base_prompt: style.base_prompt(),
        },
    }))
}

#[derive(Serialize)]
pub struct StyleEntry {
    pub key: &'static str,
    pub label: &'static str,
    pub base_prompt: &'static str,
}

#[derive(Serialize)]
pub struct StyleCatalog {
    pub selected: Option<&'static str>,
    pub styles: Vec<StyleEntry>,
}

/// GET /api/v1/style
///
/// The style catalog plus the session's current selection, so the page can
/// re-render a previously chosen style.
pub async fn get_styles(
    token: SessionToken,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let selected = state
        .engine
        .selected_style(token.as_str())
        .await
        .map(|s| s.key());

    let styles = ALL_STYLES
        .into_iter()
        .map(|s| StyleEntry {
            key: s.key(),
            label: s.label(),
            base_prompt: s.base_prompt(),
        })
        .collect();

    Ok(Json(DataResponse {
        data: StyleCatalog { selected, styles },
    }))
}
