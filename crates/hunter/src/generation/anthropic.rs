//! Anthropic Messages API backend.

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};

use super::error::GenerationError;
use super::types::{CompletionRequest, Message, MessagesResponse};
use super::{MAX_OUTPUT_TOKENS, REQUEST_TIMEOUT, error_for_status};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Backend for the Anthropic Messages API.
#[derive(Clone)]
pub struct AnthropicBackend {
    inner: Arc<AnthropicBackendInner>,
}

struct AnthropicBackendInner {
    client: reqwest::Client,
    model: String,
}

impl AnthropicBackend {
    /// Create a new Anthropic backend.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Client`] if the API key is not a valid
    /// header value, or [`GenerationError::Http`] if the HTTP client cannot
    /// be built.
    pub fn new(api_key: &SecretString, model: &str) -> Result<Self, GenerationError> {
        let mut key_header = HeaderValue::from_str(api_key.expose_secret())
            .map_err(|_| GenerationError::Client("invalid Anthropic API key".to_string()))?;
        key_header.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("x-api-key", key_header);
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            inner: Arc::new(AnthropicBackendInner {
                client,
                model: model.to_string(),
            }),
        })
    }

    /// Model this backend requests.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.inner.model
    }

    /// Send `prompt` as a single user turn and return the first text block.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API returns an error
    /// status, or the reply carries no text.
    #[instrument(skip(self, prompt), fields(model = %self.inner.model, prompt_len = prompt.len()))]
    pub async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = CompletionRequest {
            model: self.inner.model.clone(),
            max_tokens: MAX_OUTPUT_TOKENS,
            messages: vec![Message::user(prompt)],
        };

        let response = self
            .inner
            .client
            .post(ANTHROPIC_API_URL)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(error_for_status(status, response).await);
        }

        let body = response.text().await?;
        let reply: MessagesResponse = serde_json::from_str(&body)
            .map_err(|e| GenerationError::Parse(format!("Failed to parse response: {e}")))?;

        debug!(id = %reply.id, stop_reason = ?reply.stop_reason, "Received completion");

        reply
            .first_text()
            .map(str::to_owned)
            .ok_or(GenerationError::EmptyResponse)
    }
}
