//! Session token extractor for Axum handlers.
//!
//! The booth frontend obtains an opaque token from `POST /api/v1/session`
//! once per browser and sends it on every subsequent request in the
//! `x-session-token` header. Tokens are bearer capabilities: unguessable,
//! but carrying no identity beyond "this browser's workflow state".
//!
//! A token that no longer resolves to a live session (expired or reset) is
//! not an error; the store transparently creates a fresh empty session for
//! it, which routes the client back to the start of the workflow.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use booth_core::error::CoreError;

use crate::error::AppError;
use crate::state::AppState;

/// Request header carrying the session token.
pub const SESSION_TOKEN_HEADER: &str = "x-session-token";

/// Longest token we accept; real tokens are 32 hex characters.
const MAX_TOKEN_LEN: usize = 64;

/// Opaque per-browser session token extracted from [`SESSION_TOKEN_HEADER`].
#[derive(Debug, Clone)]
pub struct SessionToken(pub String);

impl SessionToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromRequestParts<AppState> for SessionToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(SESSION_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(format!(
                    "Missing {SESSION_TOKEN_HEADER} header"
                )))
            })?;

        // Tokens are store keys; reject junk before it becomes one.
        if token.is_empty()
            || token.len() > MAX_TOKEN_LEN
            || !token.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Malformed session token".into(),
            )));
        }

        Ok(SessionToken(token.to_string()))
    }
}
