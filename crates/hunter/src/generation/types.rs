//! Wire types for the generation backends.
//!
//! Only the subset needed for a single-turn text request is modelled.

use serde::{Deserialize, Serialize};

/// A single chat message. Both APIs accept `{role, content}` with string
/// content for plain-text turns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// "user" or "assistant".
    pub role: String,
    /// Message text.
    pub content: String,
}

impl Message {
    /// A user turn carrying `content`.
    #[must_use]
    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }
}

/// Request body shared by the Anthropic Messages API and the OpenAI Chat
/// Completions API.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    /// Model to use (e.g., "claude-sonnet-4-20250514").
    pub model: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Conversation messages.
    pub messages: Vec<Message>,
}

// =============================================================================
// Anthropic Messages API
// =============================================================================

/// Response from the Messages API (non-streaming).
#[derive(Debug, Clone, Deserialize)]
pub struct MessagesResponse {
    /// Unique response ID.
    pub id: String,
    /// Model that generated the response.
    pub model: String,
    /// Response content blocks.
    pub content: Vec<ContentBlock>,
    /// Reason the model stopped.
    pub stop_reason: Option<String>,
}

/// A content block within a Messages API response.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    /// Text content.
    #[serde(rename = "text")]
    Text {
        /// The text content.
        text: String,
    },
    /// Any block type we do not consume (tool use, thinking, ...).
    #[serde(other)]
    Other,
}

impl MessagesResponse {
    /// Text of the first text block, if any.
    #[must_use]
    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(|block| match block {
            ContentBlock::Text { text } => Some(text.as_str()),
            ContentBlock::Other => None,
        })
    }
}

// =============================================================================
// OpenAI Chat Completions API
// =============================================================================

/// Response from the Chat Completions API (non-streaming).
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    /// Completion choices; only the first is used.
    pub choices: Vec<Choice>,
    /// Model that generated the response.
    #[serde(default)]
    pub model: Option<String>,
}

/// One completion choice.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    /// The generated assistant message.
    pub message: ChoiceMessage,
    /// Reason the model stopped.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Assistant message in a completion choice. `content` is null when the
/// model produced no text (e.g. refusals on some gateways).
#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}
