use serde::Serialize;

/// Domain-level error type shared by all crates.
///
/// Variants map one-to-one onto the error codes the API layer surfaces.
/// `NotReady` is a normal control-flow signal (the workflow has not reached
/// the requested stage yet), not a fault.
#[derive(Debug, thiserror::Error, Serialize)]
pub enum CoreError {
    /// A workflow prerequisite (capture, style, base prompt) is absent.
    #[error("Missing input: {0}")]
    MissingInput(String),

    /// Malformed input at a capture boundary (not a valid image payload).
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// A read was attempted before the workflow reached the expected stage.
    #[error("Not ready: {0}")]
    NotReady(String),

    /// The requested operation conflicts with the current session state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The request is missing or carries an unusable session token.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// An unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}
