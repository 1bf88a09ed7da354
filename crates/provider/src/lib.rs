//! Transform provider collaborator.
//!
//! The booth treats image styling as an opaque remote operation: bytes plus
//! an instruction in, bytes out, or a single well-defined failure. The
//! [`TransformProvider`] trait is the seam the session engine depends on;
//! [`client::OpenAiImageClient`] is the production implementation targeting
//! an OpenAI-compatible `images/edits` endpoint.

pub mod client;
pub mod response;

pub use client::{OpenAiImageClient, TransformProvider, DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Errors from the transform provider boundary.
///
/// Every malformed, missing, or failed response degrades to one of these
/// variants; the session engine surfaces the message verbatim to pollers.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The HTTP request could not be sent or the transport failed.
    #[error("Transform request failed: {0}")]
    Request(String),

    /// The provider answered with a non-success status.
    #[error("Transform provider returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The response body did not match any recognized shape, or carried no
    /// usable image payload.
    #[error("No image returned from model")]
    NoImage,

    /// The response carried an image field that could not be decoded.
    #[error("Malformed image payload: {0}")]
    Decode(String),
}
