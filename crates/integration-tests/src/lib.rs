//! Integration tests for Trend Hunter.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p trend-hunter-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `pipeline_fallbacks` - Degraded analyses flowing end to end
//! - `pipeline_ranking` - Scored analyses, ranking and emitted records
//! - `pipeline_collaborators` - Retrieval, sink and metering contracts
//!
//! The helpers below stand in for the network-bound collaborators so the
//! pipeline runs offline and deterministically.

use std::sync::Mutex;

use trend_hunter::apify::ApifyError;
use trend_hunter::generation::{Generate, GenerationError};
use trend_hunter::metering::{Meter, MeterError};
use trend_hunter::retrieval::{RetrievalQuery, Retrieve};
use trend_hunter::sink::{Sink, SinkError};
use trend_hunter_core::{EnrichedProduct, ProductRecord};

/// Generator whose backend is always unreachable.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableGenerator;

impl Generate for UnavailableGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::Api {
            error_type: "503 Service Unavailable".to_string(),
            message: "backend unavailable".to_string(),
        })
    }
}

/// Generator replying per product title, with a fallback reply for the rest.
///
/// Every prompt it receives is recorded in call order.
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    replies: Vec<(String, Result<String, String>)>,
    fallback: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    /// A generator that fails for every product not scripted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply `text` to prompts for the product titled `title`.
    #[must_use]
    pub fn reply(mut self, title: &str, text: &str) -> Self {
        self.replies.push((title.to_string(), Ok(text.to_string())));
        self
    }

    /// Fail the call for the product titled `title`.
    #[must_use]
    pub fn fail(mut self, title: &str, message: &str) -> Self {
        self.replies.push((title.to_string(), Err(message.to_string())));
        self
    }

    /// Reply `text` to every unscripted product.
    #[must_use]
    pub fn otherwise(mut self, text: &str) -> Self {
        self.fallback = Some(text.to_string());
        self
    }

    /// Prompts received so far.
    ///
    /// # Panics
    ///
    /// Panics if the prompt log is poisoned.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Generate for ScriptedGenerator {
    #[allow(clippy::unwrap_used)]
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        let scripted = self
            .replies
            .iter()
            .find(|(title, _)| prompt.contains(&format!("Product Title: {title}\n")))
            .map(|(_, reply)| reply.clone());

        match (scripted, &self.fallback) {
            (Some(Ok(text)), _) => Ok(text),
            (Some(Err(message)), _) => Err(GenerationError::Unauthorized(message)),
            (None, Some(text)) => Ok(text.clone()),
            (None, None) => Err(GenerationError::EmptyResponse),
        }
    }
}

/// Retriever returning a fixed product list, ignoring the query.
#[derive(Debug, Clone, Default)]
pub struct StaticRetriever(pub Vec<ProductRecord>);

impl Retrieve for StaticRetriever {
    async fn fetch(&self, _query: &RetrievalQuery) -> Vec<ProductRecord> {
        self.0.clone()
    }
}

/// Sink rejecting every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrokenSink;

impl Sink for BrokenSink {
    async fn push(&mut self, _product: &EnrichedProduct) -> Result<(), SinkError> {
        Err(SinkError::Io(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "sink closed",
        )))
    }
}

/// Meter that refuses charges after `allowed` successful ones.
#[derive(Debug, Clone, Default)]
pub struct QuotaMeter {
    pub allowed: u32,
    pub charged: u32,
}

impl Meter for QuotaMeter {
    async fn charge(&mut self, event: &str, count: u32) -> Result<(), MeterError> {
        if self.charged + count > self.allowed {
            return Err(MeterError::Charge {
                event: event.to_string(),
                source: ApifyError::Response("quota exhausted".to_string()),
            });
        }
        self.charged += count;
        Ok(())
    }
}

/// A query for the Kitchen Gadgets category.
#[must_use]
pub fn kitchen_query(max_products: usize, min_sales_count: u64) -> RetrievalQuery {
    RetrievalQuery {
        category: "Kitchen Gadgets".to_string(),
        max_products,
        min_sales_count,
    }
}

/// A well-formed analysis reply with the given score, wrapped in a code fence.
#[must_use]
pub fn fenced_analysis(score: u8) -> String {
    format!(
        "```json\n{{\n  \"virality_score\": {score},\n  \"why_winning\": \"Highly visual and solves a daily chore.\",\n  \"problem_solved\": \"Messy cleanup\",\n  \"emotional_triggers\": [\"relief\"],\n  \"marketing_angles\": [\"before/after\"],\n  \"quality_flags\": [],\n  \"target_audience\": \"Home cooks\",\n  \"ad_hooks\": [\"Stop scrubbing\"]\n}}\n```"
    )
}
