//! Typed decode of the provider's image response.
//!
//! Historical SDKs exposed the generated image under several envelope
//! shapes. All of that variability is isolated here behind one function
//! with a single "no usable payload" failure path, so the rest of the
//! system never inspects raw provider JSON.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use serde::Deserialize;

use crate::ProviderError;

/// Response envelope of the `images/edits` endpoint.
#[derive(Debug, Deserialize)]
pub struct ImagesResponse {
    #[serde(default)]
    pub data: Vec<ImageDatum>,
}

/// One generated image entry.
///
/// `b64_json` is the inline payload this system requires; `url` is a known
/// alternative shape we deliberately treat as unusable (fetching result
/// URLs would add a second remote dependency for no benefit).
#[derive(Debug, Deserialize)]
pub struct ImageDatum {
    #[serde(default)]
    pub b64_json: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Error envelope returned by the provider on non-success statuses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
}

/// Extract the first generated image as raw bytes.
///
/// Fails with [`ProviderError::NoImage`] when the envelope carries no
/// inline payload, and with [`ProviderError::Decode`] when the payload is
/// present but not valid base64.
pub fn extract_image_bytes(response: ImagesResponse) -> Result<Vec<u8>, ProviderError> {
    let first = response.data.into_iter().next().ok_or(ProviderError::NoImage)?;

    let b64 = first.b64_json.ok_or(ProviderError::NoImage)?;

    BASE64_STANDARD
        .decode(b64.as_bytes())
        .map_err(|e| ProviderError::Decode(e.to_string()))
}

/// Pull a human-readable message out of an error body, falling back to the
/// raw text when it is not the documented JSON envelope.
pub fn extract_error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(ApiErrorResponse {
            error: Some(ApiErrorBody { message }),
        }) if !message.is_empty() => message,
        _ => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn extracts_inline_b64_payload() {
        let response: ImagesResponse =
            serde_json::from_str(r#"{ "data": [ { "b64_json": "aGVsbG8=" } ] }"#).unwrap();
        assert_eq!(extract_image_bytes(response).unwrap(), b"hello");
    }

    #[test]
    fn empty_data_is_no_image() {
        let response: ImagesResponse = serde_json::from_str(r#"{ "data": [] }"#).unwrap();
        assert_matches!(extract_image_bytes(response), Err(ProviderError::NoImage));
    }

    #[test]
    fn missing_data_field_is_no_image() {
        let response: ImagesResponse = serde_json::from_str("{}").unwrap();
        assert_matches!(extract_image_bytes(response), Err(ProviderError::NoImage));
    }

    #[test]
    fn url_only_entry_is_no_image() {
        let response: ImagesResponse =
            serde_json::from_str(r#"{ "data": [ { "url": "https://example.com/x.png" } ] }"#)
                .unwrap();
        assert_matches!(extract_image_bytes(response), Err(ProviderError::NoImage));
    }

    #[test]
    fn invalid_base64_is_decode_error() {
        let response: ImagesResponse =
            serde_json::from_str(r#"{ "data": [ { "b64_json": "%%%" } ] }"#).unwrap();
        assert_matches!(extract_image_bytes(response), Err(ProviderError::Decode(_)));
    }

    #[test]
    fn error_message_from_json_envelope() {
        let body = r#"{ "error": { "message": "Billing hard limit reached" } }"#;
        assert_eq!(extract_error_message(body), "Billing hard limit reached");
    }

    #[test]
    fn error_message_falls_back_to_raw_body() {
        assert_eq!(extract_error_message("  upstream timeout  "), "upstream timeout");
    }
}
