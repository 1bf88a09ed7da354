//! Capture payload parsing and validation.
//!
//! The browser camera submits captures as base64 data URLs. Payloads are
//! validated before any session mutation: the URL shape, the base64 body,
//! and the image magic bytes must all check out, otherwise the capture is
//! rejected with `InvalidPayload`.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;

use crate::error::CoreError;

/// A validated captured image held in session memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    pub bytes: Vec<u8>,
    pub mime: String,
}

/// Parse and validate a `data:image/...;base64,...` URL.
pub fn parse_image_data_url(input: &str) -> Result<CapturedImage, CoreError> {
    let rest = input
        .strip_prefix("data:image/")
        .ok_or_else(|| CoreError::InvalidPayload("Invalid image data".into()))?;

    let (header, body) = rest
        .split_once(',')
        .ok_or_else(|| CoreError::InvalidPayload("Invalid image data".into()))?;

    // Header is e.g. "png;base64". Only base64 data URLs are accepted.
    let subtype = header
        .strip_suffix(";base64")
        .ok_or_else(|| CoreError::InvalidPayload("Expected a base64 data URL".into()))?;

    let bytes = BASE64_STANDARD
        .decode(body)
        .map_err(|_| CoreError::InvalidPayload("Bad base64 payload".into()))?;

    // Sniff the magic bytes so junk labelled as an image is rejected here
    // rather than at the provider boundary.
    image::guess_format(&bytes)
        .map_err(|_| CoreError::InvalidPayload("Unrecognized image encoding".into()))?;

    Ok(CapturedImage {
        bytes,
        mime: format!("image/{subtype}"),
    })
}

/// Encode raw image bytes back into a data URL for the client.
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", BASE64_STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    /// Minimal PNG header: enough for format sniffing.
    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    fn png_data_url() -> String {
        format!("data:image/png;base64,{}", BASE64_STANDARD.encode(PNG_MAGIC))
    }

    #[test]
    fn parses_valid_png_data_url() {
        let captured = parse_image_data_url(&png_data_url()).unwrap();
        assert_eq!(captured.mime, "image/png");
        assert_eq!(captured.bytes, PNG_MAGIC);
    }

    #[test]
    fn rejects_non_image_scheme() {
        let err = parse_image_data_url("data:text/plain;base64,aGVsbG8=");
        assert_matches!(err, Err(CoreError::InvalidPayload(_)));
    }

    #[test]
    fn rejects_missing_comma() {
        let err = parse_image_data_url("data:image/png;base64");
        assert_matches!(err, Err(CoreError::InvalidPayload(_)));
    }

    #[test]
    fn rejects_bad_base64() {
        let err = parse_image_data_url("data:image/png;base64,!!not-base64!!");
        assert_matches!(err, Err(CoreError::InvalidPayload(_)));
    }

    #[test]
    fn rejects_bytes_that_are_not_an_image() {
        let body = BASE64_STANDARD.encode(b"just some text");
        let err = parse_image_data_url(&format!("data:image/png;base64,{body}"));
        assert_matches!(err, Err(CoreError::InvalidPayload(_)));
    }

    #[test]
    fn data_url_round_trip() {
        let url = to_data_url("image/png", PNG_MAGIC);
        let captured = parse_image_data_url(&url).unwrap();
        assert_eq!(captured.bytes, PNG_MAGIC);
    }
}
