//! OpenAI-compatible Chat Completions backend.
//!
//! Serves both `OpenAI` itself and the `OpenRouter` gateway, which speaks the
//! same protocol at a different base URL.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};

use super::error::GenerationError;
use super::types::{ChatCompletionResponse, CompletionRequest, Message};
use super::{MAX_OUTPUT_TOKENS, REQUEST_TIMEOUT, error_for_status};

/// `OpenAI` Chat Completions endpoint.
pub const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

/// `OpenRouter` Chat Completions endpoint.
pub const OPENROUTER_CHAT_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Backend for any Chat Completions compatible API.
#[derive(Clone)]
pub struct ChatCompletionsBackend {
    inner: Arc<ChatCompletionsInner>,
}

struct ChatCompletionsInner {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl ChatCompletionsBackend {
    /// Create a backend posting to `endpoint` with bearer `api_key`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Client`] if the API key is not a valid
    /// header value, or [`GenerationError::Http`] if the HTTP client cannot
    /// be built.
    pub fn new(
        endpoint: &str,
        api_key: &SecretString,
        model: &str,
    ) -> Result<Self, GenerationError> {
        let mut auth_header =
            HeaderValue::from_str(&format!("Bearer {}", api_key.expose_secret()))
                .map_err(|_| GenerationError::Client("invalid API key".to_string()))?;
        auth_header.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, auth_header);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            inner: Arc::new(ChatCompletionsInner {
                client,
                endpoint: endpoint.to_string(),
                model: model.to_string(),
            }),
        })
    }

    /// Model this backend requests.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.inner.model
    }

    /// Send `prompt` as a single user turn and return the first choice's text.
    ///
    /// A choice with null content yields an empty string; the interpreter
    /// treats that as an unparseable reply rather than a failed call.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API returns an error
    /// status, or the reply has no choices.
    #[instrument(
        skip(self, prompt),
        fields(
            model = %self.inner.model,
            endpoint = %self.inner.endpoint,
            prompt_len = prompt.len()
        )
    )]
    pub async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = CompletionRequest {
            model: self.inner.model.clone(),
            max_tokens: MAX_OUTPUT_TOKENS,
            messages: vec![Message::user(prompt)],
        };

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(error_for_status(status, response).await);
        }

        let body = response.text().await?;
        let reply: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| GenerationError::Parse(format!("Failed to parse response: {e}")))?;

        let choice = reply
            .choices
            .into_iter()
            .next()
            .ok_or(GenerationError::EmptyResponse)?;

        debug!(finish_reason = ?choice.finish_reason, "Received completion");

        Ok(choice.message.content.unwrap_or_default())
    }
}
