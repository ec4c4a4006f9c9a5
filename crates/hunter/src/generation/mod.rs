//! Generative-text backends behind a single `generate(prompt) -> text` call.
//!
//! # Backends
//!
//! | Provider     | Protocol          | Model                                   |
//! |--------------|-------------------|-----------------------------------------|
//! | `anthropic`  | Messages API      | `claude-sonnet-4-20250514`              |
//! | `openai`     | Chat Completions  | `gpt-4o`                                |
//! | `openrouter` | Chat Completions  | configurable, default [`DEFAULT_OPENROUTER_MODEL`] |
//!
//! Every request is a single user turn with a [`MAX_OUTPUT_TOKENS`] budget.
//! Which backend serves a run is decided once, at construction, from
//! [`GenerationSettings`]; a missing credential is rejected while loading
//! configuration, before any client exists.

use std::time::Duration;

use tracing::info;

use crate::config::{AiProvider, GenerationSettings};

pub mod anthropic;
pub mod chat_completions;
pub mod error;
pub mod types;

pub use anthropic::AnthropicBackend;
pub use chat_completions::{ChatCompletionsBackend, OPENAI_CHAT_URL, OPENROUTER_CHAT_URL};
pub use error::GenerationError;

use error::ApiErrorResponse;

/// Output-token budget for every generation request.
pub const MAX_OUTPUT_TOKENS: u32 = 1024;

/// Model used by the `anthropic` provider.
pub const ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";

/// Model used by the `openai` provider.
pub const OPENAI_MODEL: &str = "gpt-4o";

/// Gateway model used by the `openrouter` provider unless overridden.
pub const DEFAULT_OPENROUTER_MODEL: &str = "nvidia/nemotron-nano-9b-v2:free";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Something that turns a prompt into generated text.
pub trait Generate {
    /// Generate a reply to `prompt`.
    fn generate(&self, prompt: &str)
    -> impl Future<Output = Result<String, GenerationError>> + Send;
}

/// The backend selected for this run.
#[derive(Clone)]
pub enum GenerationClient {
    Anthropic(AnthropicBackend),
    OpenAi(ChatCompletionsBackend),
    OpenRouter(ChatCompletionsBackend),
}

impl GenerationClient {
    /// Build the backend named by `settings`.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential cannot be used as an HTTP header or
    /// the HTTP client cannot be built.
    pub fn new(settings: &GenerationSettings) -> Result<Self, GenerationError> {
        let client = match settings {
            GenerationSettings::Anthropic { api_key } => {
                Self::Anthropic(AnthropicBackend::new(api_key, ANTHROPIC_MODEL)?)
            }
            GenerationSettings::OpenAi { api_key } => Self::OpenAi(ChatCompletionsBackend::new(
                OPENAI_CHAT_URL,
                api_key,
                OPENAI_MODEL,
            )?),
            GenerationSettings::OpenRouter { api_key, model } => Self::OpenRouter(
                ChatCompletionsBackend::new(OPENROUTER_CHAT_URL, api_key, model)?,
            ),
        };

        info!(provider = %client.provider(), model = client.model(), "Generation backend ready");
        Ok(client)
    }

    #[must_use]
    pub const fn provider(&self) -> AiProvider {
        match self {
            Self::Anthropic(_) => AiProvider::Anthropic,
            Self::OpenAi(_) => AiProvider::OpenAi,
            Self::OpenRouter(_) => AiProvider::OpenRouter,
        }
    }

    #[must_use]
    pub fn model(&self) -> &str {
        match self {
            Self::Anthropic(backend) => backend.model(),
            Self::OpenAi(backend) | Self::OpenRouter(backend) => backend.model(),
        }
    }
}

impl Generate for GenerationClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        match self {
            Self::Anthropic(backend) => backend.complete(prompt).await,
            Self::OpenAi(backend) | Self::OpenRouter(backend) => backend.complete(prompt).await,
        }
    }
}

/// Map an unsuccessful HTTP status to a [`GenerationError`].
async fn error_for_status(
    status: reqwest::StatusCode,
    response: reqwest::Response,
) -> GenerationError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);
        return GenerationError::RateLimited(retry_after);
    }

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return GenerationError::Unauthorized(format!("backend rejected credential ({status})"));
    }

    match response.text().await {
        Ok(body) => match serde_json::from_str::<ApiErrorResponse>(&body) {
            Ok(api_error) => GenerationError::Api {
                error_type: api_error
                    .error
                    .error_type
                    .unwrap_or_else(|| status.to_string()),
                message: api_error.error.message,
            },
            Err(_) => GenerationError::Api {
                error_type: status.to_string(),
                message: body,
            },
        },
        Err(e) => GenerationError::Http(e),
    }
}
