//! Gemini content provider
//!
//! Calls the `generateContent` endpoint with the prompt and, when given, the
//! representative image inlined as base64 PNG data.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::{json, Value};
use tracing::debug;

use crate::domain::errors::DomainError;
use crate::ports::ContentPort;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Content provider backed by the Google Gemini HTTP API
pub struct GeminiContentProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiContentProvider {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::ContentFail(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the client at another API host
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    /// POST to the endpoint; the key goes in a header, never the URL
    fn request(&self, body: &Value) -> reqwest::RequestBuilder {
        self.client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
    }

    /// Request body with a text part and an optional inline image part
    pub fn request_body(prompt: &str, image_png: Option<&[u8]>) -> Value {
        let mut parts = vec![json!({ "text": prompt })];
        if let Some(bytes) = image_png {
            parts.push(json!({
                "inline_data": {
                    "mime_type": "image/png",
                    "data": BASE64.encode(bytes),
                }
            }));
        }
        json!({ "contents": [{ "role": "user", "parts": parts }] })
    }

    /// First candidate text of a `generateContent` response
    pub fn extract_text(response: &Value) -> Result<String, DomainError> {
        response["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                DomainError::ContentFail("Gemini response contained no candidate text".to_string())
            })
    }
}

#[async_trait]
impl ContentPort for GeminiContentProvider {
    fn name(&self) -> &str {
        "GEMINI"
    }

    async fn generate(&self, prompt: &str, image: Option<&Path>) -> Result<String, DomainError> {
        let image_png = match image {
            Some(path) => Some(tokio::fs::read(path).await.map_err(|e| {
                DomainError::ContentFail(format!("Cannot read image {}: {}", path.display(), e))
            })?),
            None => None,
        };

        let body = Self::request_body(prompt, image_png.as_deref());
        debug!("Requesting Gemini model {}", self.model);

        let response = self.request(&body).send().await.map_err(|e| {
            DomainError::ContentFail(format!("Gemini request failed: {}", e.without_url()))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(DomainError::ContentFail(format!(
                "Gemini API error ({}): {}",
                status, error_text
            )));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| {
                DomainError::ContentFail(format!("Invalid Gemini response: {}", e.without_url()))
            })?;

        Self::extract_text(&json)
    }
}
