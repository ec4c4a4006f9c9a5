//! Run configuration loaded from actor input and environment variables.
//!
//! # Input (JSON)
//!
//! Accepted in snake_case or the platform's camelCase:
//!
//! | Field                     | Alias                   | Default             |
//! |---------------------------|-------------------------|---------------------|
//! | `category`                |                         | `Kitchen Gadgets`   |
//! | `max_products`            | `maxProducts`           | 10 (1-50)           |
//! | `ai_provider`             | `aiProvider`            | `openrouter`        |
//! | `anthropic_api_key`       | `anthropicApiKey`       |                     |
//! | `openai_api_key`          | `openaiApiKey`          |                     |
//! | `openrouter_api_key`      | `openrouterApiKey`      |                     |
//! | `openrouter_model`        | `openrouterModel`       |                     |
//! | `include_review_analysis` | `includeReviewAnalysis` | true                |
//! | `min_sales_count`         | `minSalesCount`         | 100 (>= 0)          |
//!
//! # Environment Variables
//!
//! ## Credential fallbacks (used when the input omits them)
//! - `ANTHROPIC_API_KEY` - Anthropic API key
//! - `OPENAI_API_KEY` - `OpenAI` API key
//! - `OPENROUTER_API_KEY`, then `ANTHROPIC_AUTH_TOKEN` - `OpenRouter` API key
//! - `OPENROUTER_MODEL`, then `ANTHROPIC_MODEL` - `OpenRouter` model
//!
//! ## Platform (set when running as an Apify actor)
//! - `APIFY_TOKEN` - API token for scraping, dataset and charge calls
//! - `APIFY_API_BASE_URL` - API base URL (default: <https://api.apify.com>)
//! - `APIFY_DEFAULT_DATASET_ID` - Dataset receiving the results
//! - `APIFY_DEFAULT_KEY_VALUE_STORE_ID` - Store holding the run input
//! - `APIFY_INPUT_KEY` - Input record key (default: INPUT)
//! - `ACTOR_RUN_ID` - Run to charge pay-per-event usage against
//! - `APIFY_IS_AT_HOME` - Set on the platform; switches logs to JSON
//! - `APIFY_INPUT` - Input JSON, when not given as a file
//! - `APIFY_LOCAL_STORAGE_DIR` - Local storage root (default: ./storage)
//!
//! Only the selected provider's credential is checked. Keys for the other
//! providers may be absent.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

use crate::generation::DEFAULT_OPENROUTER_MODEL;
use crate::prompt::PromptOptions;
use crate::retrieval::RetrievalQuery;

/// Category searched when the input does not name one.
pub const DEFAULT_CATEGORY: &str = "Kitchen Gadgets";
/// Products analyzed when the input does not say.
pub const DEFAULT_MAX_PRODUCTS: i64 = 10;
/// Upper bound for `max_products`.
pub const MAX_PRODUCTS_LIMIT: i64 = 50;
/// Sales threshold when the input does not say.
pub const DEFAULT_MIN_SALES_COUNT: i64 = 100;

const DEFAULT_APIFY_API_BASE_URL: &str = "https://api.apify.com";
const DEFAULT_INPUT_KEY: &str = "INPUT";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "your_",
    "changeme",
    "replace",
    "placeholder",
    "xxx",
    "insert",
    "put-your",
    "add-your",
];

/// Configuration errors. All of them abort the run before any work starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
    #[error("Unknown AI provider: {0} (expected anthropic, openai or openrouter)")]
    UnknownProvider(String),
    #[error("{provider} API key is required when using the {provider} provider (set it in the input or {env_var})")]
    MissingCredential {
        provider: AiProvider,
        env_var: &'static str,
    },
    #[error("Failed to read input {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid input JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Generative-text provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AiProvider {
    Anthropic,
    OpenAi,
    #[default]
    OpenRouter,
}

impl AiProvider {
    /// Name as written in input and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Anthropic => "anthropic",
            Self::OpenAi => "openai",
            Self::OpenRouter => "openrouter",
        }
    }
}

impl fmt::Display for AiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AiProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "anthropic" => Ok(Self::Anthropic),
            "openai" => Ok(Self::OpenAi),
            "openrouter" => Ok(Self::OpenRouter),
            _ => Err(ConfigError::UnknownProvider(s.to_string())),
        }
    }
}

/// Raw actor input, before defaults are validated and credentials resolved.
///
/// Implements `Debug` manually to redact the API keys.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct ActorInput {
    pub category: String,
    #[serde(alias = "maxProducts")]
    pub max_products: i64,
    #[serde(alias = "aiProvider")]
    pub ai_provider: String,
    #[serde(alias = "anthropicApiKey")]
    pub anthropic_api_key: Option<String>,
    #[serde(alias = "openaiApiKey")]
    pub openai_api_key: Option<String>,
    #[serde(alias = "openrouterApiKey")]
    pub openrouter_api_key: Option<String>,
    #[serde(alias = "openrouterModel")]
    pub openrouter_model: Option<String>,
    #[serde(alias = "includeReviewAnalysis")]
    pub include_review_analysis: bool,
    #[serde(alias = "minSalesCount")]
    pub min_sales_count: i64,
}

impl Default for ActorInput {
    fn default() -> Self {
        Self {
            category: DEFAULT_CATEGORY.to_string(),
            max_products: DEFAULT_MAX_PRODUCTS,
            ai_provider: AiProvider::default().as_str().to_string(),
            anthropic_api_key: None,
            openai_api_key: None,
            openrouter_api_key: None,
            openrouter_model: None,
            include_review_analysis: true,
            min_sales_count: DEFAULT_MIN_SALES_COUNT,
        }
    }
}

impl fmt::Debug for ActorInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |key: &Option<String>| key.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("ActorInput")
            .field("category", &self.category)
            .field("max_products", &self.max_products)
            .field("ai_provider", &self.ai_provider)
            .field("anthropic_api_key", &redact(&self.anthropic_api_key))
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("openrouter_api_key", &redact(&self.openrouter_api_key))
            .field("openrouter_model", &self.openrouter_model)
            .field("include_review_analysis", &self.include_review_analysis)
            .field("min_sales_count", &self.min_sales_count)
            .finish()
    }
}

/// Credentials and model for the selected provider.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub enum GenerationSettings {
    Anthropic { api_key: SecretString },
    OpenAi { api_key: SecretString },
    OpenRouter { api_key: SecretString, model: String },
}

impl GenerationSettings {
    #[must_use]
    pub const fn provider(&self) -> AiProvider {
        match self {
            Self::Anthropic { .. } => AiProvider::Anthropic,
            Self::OpenAi { .. } => AiProvider::OpenAi,
            Self::OpenRouter { .. } => AiProvider::OpenRouter,
        }
    }
}

impl fmt::Debug for GenerationSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("GenerationSettings");
        s.field("provider", &self.provider())
            .field("api_key", &"[REDACTED]");
        if let Self::OpenRouter { model, .. } = self {
            s.field("model", model);
        }
        s.finish()
    }
}

/// Validated configuration for one pipeline run.
#[derive(Debug, Clone)]
pub struct HunterConfig {
    pub query: RetrievalQuery,
    pub generation: GenerationSettings,
    pub prompt: PromptOptions,
}

impl ActorInput {
    /// Parse input JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if the text is not a valid input object.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read input JSON from a file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Json`] if it is not a valid input object.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Load input from `path`, the `APIFY_INPUT` variable, or local actor
    /// storage, in that order. Falls back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an input source exists but cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        if let Some(json) = non_empty(get_optional_env("APIFY_INPUT")) {
            return Self::from_json_str(&json);
        }

        let local = local_input_path();
        if local.is_file() {
            tracing::info!(path = %local.display(), "Loading input from local storage");
            return Self::from_file(&local);
        }

        Ok(Self::default())
    }

    /// Validate the input and resolve credentials from the process environment.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// See [`ActorInput::resolve_with`].
    pub fn resolve(self) -> Result<HunterConfig, ConfigError> {
        let _ = dotenvy::dotenv();
        self.resolve_with(get_optional_env)
    }

    /// Validate the input and resolve credentials, reading fallbacks through
    /// `lookup` instead of the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a value is out of range, the provider is
    /// unknown, or the selected provider has no credential.
    pub fn resolve_with(
        self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<HunterConfig, ConfigError> {
        if !(1..=MAX_PRODUCTS_LIMIT).contains(&self.max_products) {
            return Err(ConfigError::InvalidValue(
                "max_products",
                format!(
                    "must be between 1 and {MAX_PRODUCTS_LIMIT} (got {})",
                    self.max_products
                ),
            ));
        }
        let max_products = usize::try_from(self.max_products)
            .map_err(|e| ConfigError::InvalidValue("max_products", e.to_string()))?;

        let min_sales_count = u64::try_from(self.min_sales_count).map_err(|_| {
            ConfigError::InvalidValue(
                "min_sales_count",
                format!("must be >= 0 (got {})", self.min_sales_count),
            )
        })?;

        let provider: AiProvider = self.ai_provider.parse()?;
        let generation = match provider {
            AiProvider::Anthropic => GenerationSettings::Anthropic {
                api_key: credential(
                    provider,
                    self.anthropic_api_key,
                    &["ANTHROPIC_API_KEY"],
                    &lookup,
                )?,
            },
            AiProvider::OpenAi => GenerationSettings::OpenAi {
                api_key: credential(provider, self.openai_api_key, &["OPENAI_API_KEY"], &lookup)?,
            },
            AiProvider::OpenRouter => GenerationSettings::OpenRouter {
                api_key: credential(
                    provider,
                    self.openrouter_api_key,
                    &["OPENROUTER_API_KEY", "ANTHROPIC_AUTH_TOKEN"],
                    &lookup,
                )?,
                model: non_empty(self.openrouter_model)
                    .or_else(|| non_empty(lookup("OPENROUTER_MODEL")))
                    .or_else(|| non_empty(lookup("ANTHROPIC_MODEL")))
                    .unwrap_or_else(|| DEFAULT_OPENROUTER_MODEL.to_string()),
            },
        };

        Ok(HunterConfig {
            query: RetrievalQuery {
                category: self.category,
                max_products,
                min_sales_count,
            },
            generation,
            prompt: PromptOptions {
                include_reviews: self.include_review_analysis,
            },
        })
    }
}

/// Platform environment for running as an Apify actor.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct PlatformEnv {
    pub token: Option<SecretString>,
    pub api_base_url: String,
    pub dataset_id: Option<String>,
    pub key_value_store_id: Option<String>,
    pub input_key: String,
    pub run_id: Option<String>,
    pub is_at_home: bool,
}

impl fmt::Debug for PlatformEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformEnv")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("api_base_url", &self.api_base_url)
            .field("dataset_id", &self.dataset_id)
            .field("key_value_store_id", &self.key_value_store_id)
            .field("input_key", &self.input_key)
            .field("run_id", &self.run_id)
            .field("is_at_home", &self.is_at_home)
            .finish()
    }
}

impl PlatformEnv {
    /// Read the platform environment from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(get_optional_env)
    }

    /// Read the platform environment through `lookup`.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            token: non_empty(lookup("APIFY_TOKEN")).map(SecretString::from),
            api_base_url: non_empty(lookup("APIFY_API_BASE_URL"))
                .unwrap_or_else(|| DEFAULT_APIFY_API_BASE_URL.to_string()),
            dataset_id: non_empty(lookup("APIFY_DEFAULT_DATASET_ID")),
            key_value_store_id: non_empty(lookup("APIFY_DEFAULT_KEY_VALUE_STORE_ID")),
            input_key: non_empty(lookup("APIFY_INPUT_KEY"))
                .unwrap_or_else(|| DEFAULT_INPUT_KEY.to_string()),
            run_id: non_empty(lookup("ACTOR_RUN_ID")),
            is_at_home: lookup("APIFY_IS_AT_HOME").is_some_and(|v| v == "1" || v == "true"),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Treat blank strings as absent.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Path of the input record in local actor storage.
fn local_input_path() -> PathBuf {
    let root = get_optional_env("APIFY_LOCAL_STORAGE_DIR").unwrap_or_else(|| "storage".to_string());
    Path::new(&root)
        .join("key_value_stores")
        .join("default")
        .join(format!("{DEFAULT_INPUT_KEY}.json"))
}

/// Resolve the credential for `provider`: input value first, then each
/// environment variable in order.
fn credential(
    provider: AiProvider,
    input_value: Option<String>,
    env_vars: &[&'static str],
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    let key = non_empty(input_value)
        .or_else(|| env_vars.iter().find_map(|var| non_empty(lookup(var))))
        .ok_or(ConfigError::MissingCredential {
            provider,
            env_var: env_vars.first().copied().unwrap_or("the environment"),
        })?;

    if let Some(pattern) = placeholder_pattern(&key) {
        tracing::warn!(%provider, pattern, "API key looks like a placeholder");
    }

    Ok(SecretString::from(key))
}

/// The blocklisted pattern `secret` contains, if any.
fn placeholder_pattern(secret: &str) -> Option<&'static str> {
    let lower = secret.to_lowercase();
    PLACEHOLDER_PATTERNS
        .iter()
        .copied()
        .find(|pattern| lower.contains(pattern))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_values() {
        let input = ActorInput::default();
        assert_eq!(input.category, "Kitchen Gadgets");
        assert_eq!(input.max_products, 10);
        assert_eq!(input.ai_provider, "openrouter");
        assert_eq!(input.min_sales_count, 100);
        assert!(input.include_review_analysis);
    }

    #[test]
    fn test_from_camel_case() {
        let input = ActorInput::from_json_str(
            r#"{"maxProducts": 25, "aiProvider": "openai", "includeReviewAnalysis": false, "minSalesCount": 500}"#,
        )
        .unwrap();
        assert_eq!(input.max_products, 25);
        assert_eq!(input.ai_provider, "openai");
        assert!(!input.include_review_analysis);
        assert_eq!(input.min_sales_count, 500);
        assert_eq!(input.category, "Kitchen Gadgets");
    }

    #[test]
    fn test_from_snake_case() {
        let input =
            ActorInput::from_json_str(r#"{"category": "Beauty", "max_products": 3}"#).unwrap();
        assert_eq!(input.category, "Beauty");
        assert_eq!(input.max_products, 3);
    }

    #[test]
    fn test_resolve_defaults_with_env_credential() {
        let config = ActorInput::default()
            .resolve_with(env(&[("ANTHROPIC_AUTH_TOKEN", "sk-or-v1-abc123")]))
            .unwrap();

        assert_eq!(config.query.category, "Kitchen Gadgets");
        assert_eq!(config.query.max_products, 10);
        assert_eq!(config.query.min_sales_count, 100);
        assert!(config.prompt.include_reviews);
        match config.generation {
            GenerationSettings::OpenRouter { api_key, model } => {
                assert_eq!(api_key.expose_secret(), "sk-or-v1-abc123");
                assert_eq!(model, DEFAULT_OPENROUTER_MODEL);
            }
            other => panic!("unexpected settings: {other:?}"),
        }
    }

    #[test]
    fn test_input_credential_wins_over_env() {
        let input = ActorInput {
            ai_provider: "anthropic".to_string(),
            anthropic_api_key: Some("sk-ant-from-input".to_string()),
            ..ActorInput::default()
        };
        let config = input
            .resolve_with(env(&[("ANTHROPIC_API_KEY", "sk-ant-from-env")]))
            .unwrap();

        match config.generation {
            GenerationSettings::Anthropic { api_key } => {
                assert_eq!(api_key.expose_secret(), "sk-ant-from-input");
            }
            other => panic!("unexpected settings: {other:?}"),
        }
    }

    #[test]
    fn test_missing_credential_for_selected_provider_fails() {
        let input = ActorInput {
            ai_provider: "openai".to_string(),
            anthropic_api_key: Some("sk-ant-unused".to_string()),
            ..ActorInput::default()
        };
        let err = input.resolve_with(env(&[])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingCredential {
                provider: AiProvider::OpenAi,
                env_var: "OPENAI_API_KEY"
            }
        ));
    }

    #[test]
    fn test_blank_credential_counts_as_missing() {
        let input = ActorInput {
            ai_provider: "anthropic".to_string(),
            anthropic_api_key: Some(String::new()),
            ..ActorInput::default()
        };
        assert!(matches!(
            input.resolve_with(env(&[])),
            Err(ConfigError::MissingCredential { .. })
        ));
    }

    #[test]
    fn test_unused_provider_keys_not_checked() {
        let input = ActorInput {
            ai_provider: "anthropic".to_string(),
            ..ActorInput::default()
        };
        let config = input
            .resolve_with(env(&[("ANTHROPIC_API_KEY", "sk-ant-k3y")]))
            .unwrap();
        assert_eq!(config.generation.provider(), AiProvider::Anthropic);
    }

    #[test]
    fn test_openrouter_model_override() {
        let input = ActorInput {
            openrouter_api_key: Some("sk-or-key".to_string()),
            ..ActorInput::default()
        };
        let config = input
            .resolve_with(env(&[("ANTHROPIC_MODEL", "z-ai/glm-4.5-air:free")]))
            .unwrap();
        match config.generation {
            GenerationSettings::OpenRouter { model, .. } => {
                assert_eq!(model, "z-ai/glm-4.5-air:free");
            }
            other => panic!("unexpected settings: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_provider() {
        let input = ActorInput {
            ai_provider: "gemini".to_string(),
            ..ActorInput::default()
        };
        assert!(matches!(
            input.resolve_with(env(&[])),
            Err(ConfigError::UnknownProvider(p)) if p == "gemini"
        ));
    }

    #[test]
    fn test_max_products_bounds() {
        for bad in [0, 51, -3] {
            let input = ActorInput {
                max_products: bad,
                openrouter_api_key: Some("k".to_string()),
                ..ActorInput::default()
            };
            assert!(matches!(
                input.resolve_with(env(&[])),
                Err(ConfigError::InvalidValue("max_products", _))
            ));
        }

        for good in [1, 50] {
            let input = ActorInput {
                max_products: good,
                openrouter_api_key: Some("k".to_string()),
                ..ActorInput::default()
            };
            assert!(input.resolve_with(env(&[])).is_ok());
        }
    }

    #[test]
    fn test_negative_min_sales_rejected() {
        let input = ActorInput {
            min_sales_count: -1,
            openrouter_api_key: Some("k".to_string()),
            ..ActorInput::default()
        };
        assert!(matches!(
            input.resolve_with(env(&[])),
            Err(ConfigError::InvalidValue("min_sales_count", _))
        ));
    }

    #[test]
    fn test_provider_parse() {
        assert_eq!("Anthropic".parse::<AiProvider>().unwrap(), AiProvider::Anthropic);
        assert_eq!("openai".parse::<AiProvider>().unwrap(), AiProvider::OpenAi);
        assert_eq!(AiProvider::OpenRouter.to_string(), "openrouter");
        assert!("claude".parse::<AiProvider>().is_err());
    }

    #[test]
    fn test_placeholder_detection() {
        assert_eq!(placeholder_pattern("your-api-key-here"), Some("your-"));
        assert_eq!(placeholder_pattern("sk-ant-api03-Zq9"), None);
    }

    #[test]
    fn test_actor_input_debug_redacts_secrets() {
        let input = ActorInput {
            anthropic_api_key: Some("sk-ant-super-secret-key".to_string()),
            ..ActorInput::default()
        };
        let debug_output = format!("{input:?}");

        assert!(debug_output.contains("Kitchen Gadgets"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("sk-ant-super-secret-key"));
    }

    #[test]
    fn test_generation_settings_debug_redacts_secrets() {
        let settings = GenerationSettings::OpenRouter {
            api_key: SecretString::from("sk-or-super-secret"),
            model: "nvidia/nemotron-nano-9b-v2:free".to_string(),
        };
        let debug_output = format!("{settings:?}");

        assert!(debug_output.contains("nvidia/nemotron-nano-9b-v2:free"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("sk-or-super-secret"));
    }

    #[test]
    fn test_platform_env() {
        let platform = PlatformEnv::from_lookup(env(&[
            ("APIFY_TOKEN", "apify_api_tok"),
            ("APIFY_DEFAULT_DATASET_ID", "ds1"),
            ("ACTOR_RUN_ID", "run1"),
            ("APIFY_IS_AT_HOME", "1"),
        ]));

        assert!(platform.token.is_some());
        assert_eq!(platform.api_base_url, "https://api.apify.com");
        assert_eq!(platform.dataset_id.as_deref(), Some("ds1"));
        assert_eq!(platform.run_id.as_deref(), Some("run1"));
        assert_eq!(platform.input_key, "INPUT");
        assert!(platform.is_at_home);
        assert!(!format!("{platform:?}").contains("apify_api_tok"));

        let local = PlatformEnv::from_lookup(env(&[]));
        assert!(local.token.is_none());
        assert!(!local.is_at_home);
    }
}
