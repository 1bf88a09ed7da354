//! HTTP client for the image transform endpoint.

use async_trait::async_trait;

use crate::response::{extract_error_message, extract_image_bytes, ImagesResponse};
use crate::ProviderError;

/// Image edit model used for all transforms.
pub const DEFAULT_MODEL: &str = "gpt-image-1";

/// Default API root for the hosted provider.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// The seam between the session engine and the remote transform operation.
///
/// Implementations take the original captured bytes plus a composed
/// instruction and return the styled image bytes, or a single well-defined
/// failure. Calls may take seconds; callers must not hold locks across
/// them.
#[async_trait]
pub trait TransformProvider: Send + Sync {
    async fn transform(
        &self,
        image: &[u8],
        mime: &str,
        instruction: &str,
    ) -> Result<Vec<u8>, ProviderError>;
}

/// Production [`TransformProvider`] targeting an OpenAI-compatible
/// `images/edits` endpoint.
pub struct OpenAiImageClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    output_size: String,
}

impl OpenAiImageClient {
    /// Create a client with the given credential and output size token
    /// (e.g. `1024x1024`).
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        output_size: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: DEFAULT_MODEL.to_string(),
            output_size: output_size.into(),
        }
    }

    fn build_form(
        &self,
        image: &[u8],
        mime: &str,
        instruction: &str,
    ) -> Result<reqwest::multipart::Form, ProviderError> {
        let part = reqwest::multipart::Part::bytes(image.to_vec())
            .file_name("input.png")
            .mime_str(mime)
            .map_err(|e| ProviderError::Request(format!("Invalid capture mime type: {e}")))?;

        Ok(reqwest::multipart::Form::new()
            .text("model", self.model.clone())
            .text("prompt", instruction.to_string())
            .text("size", self.output_size.clone())
            .part("image", part))
    }
}

#[async_trait]
impl TransformProvider for OpenAiImageClient {
    async fn transform(
        &self,
        image: &[u8],
        mime: &str,
        instruction: &str,
    ) -> Result<Vec<u8>, ProviderError> {
        let url = format!("{}/images/edits", self.base_url);
        let form = self.build_form(image, mime, instruction)?;

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read provider error body".to_string());
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
        }

        let parsed: ImagesResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Request(format!("Failed to parse provider response: {e}")))?;

        let bytes = extract_image_bytes(parsed)?;
        tracing::debug!(bytes = bytes.len(), "Transform completed");
        Ok(bytes)
    }
}
