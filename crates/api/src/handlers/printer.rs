//! CUPS printing endpoints.
//!
//! Direct printing is optional; kiosks without a configured printer fall
//! back to the browser's print dialog. The sheet is piped straight to
//! `lp`, never written to disk, and a successful print retires the whole
//! session so photo data is reclaimed immediately.

use std::process::Stdio;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use booth_core::capture::parse_image_data_url;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::session_token::SessionToken;
use crate::state::AppState;

#[derive(Serialize)]
pub struct PrinterInfo {
    pub available: bool,
    pub default: Option<String>,
    pub raw: Option<String>,
}

/// GET /api/v1/printer
///
/// Report CUPS status so the UI can show which printers (if any) are
/// usable. A missing `lpstat` binary is not an error, just "unavailable".
pub async fn printer_info(State(_state): State<AppState>) -> Json<DataResponse<PrinterInfo>> {
    let info = match Command::new("lpstat").args(["-p", "-d"]).output().await {
        Ok(output) => {
            let raw = String::from_utf8_lossy(&output.stdout).to_string();
            let default = raw
                .lines()
                .find_map(|line| line.split_once("system default destination:"))
                .map(|(_, dest)| dest.trim().to_string());
            PrinterInfo {
                available: output.status.success(),
                default,
                raw: Some(raw),
            }
        }
        Err(e) => {
            tracing::debug!(error = %e, "lpstat not usable");
            PrinterInfo {
                available: false,
                default: None,
                raw: None,
            }
        }
    };

    Json(DataResponse { data: info })
}

#[derive(Deserialize)]
pub struct PrintRequest {
    /// Assembled print sheet as a `data:image/png;base64,...` URL.
    pub sheet: String,
}

#[derive(Serialize)]
pub struct PrintOutcome {
    pub message: String,
}

/// POST /api/v1/print
///
/// Pipe the PNG sheet to the default CUPS printer via `lp`. On success the
/// session is removed entirely -- no lingering photo data.
pub async fn print_direct(
    token: SessionToken,
    State(state): State<AppState>,
    Json(input): Json<PrintRequest>,
) -> AppResult<impl IntoResponse> {
    let sheet = parse_image_data_url(&input.sheet)
        .map_err(|_| AppError::BadRequest("Invalid sheet payload".into()))?;
    if sheet.mime != "image/png" {
        return Err(AppError::BadRequest("Print sheet must be a PNG".into()));
    }

    let mut child = Command::new("lp")
        .args(["-o", "media=A4", "-o", "fit-to-page"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::BadRequest(
                    "Direct print not available (lp not found). Use browser Print.".into(),
                )
            } else {
                AppError::InternalError(format!("Failed to spawn lp: {e}"))
            }
        })?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| AppError::InternalError("lp stdin not piped".into()))?;
    stdin
        .write_all(&sheet.bytes)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to write to lp: {e}")))?;
    drop(stdin);

    let output = child
        .wait_with_output()
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to wait for lp: {e}")))?;

    let mut message = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            message = format!("{message} {}", stderr.trim()).trim().to_string();
        }
        return Err(AppError::Print(message));
    }

    tracing::info!(session = %token.as_str(), "Sheet sent to printer");
    state.engine.complete_print(token.as_str()).await;

    Ok(Json(DataResponse {
        data: PrintOutcome { message },
    }))
}
