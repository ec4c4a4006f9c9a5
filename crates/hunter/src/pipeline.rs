//! The analysis pipeline: retrieve, analyze each product, rank, emit.
//!
//! Products are processed strictly one at a time, in retrieval order. A
//! product's generation call, interpretation and metering charge all finish
//! before the next product starts.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use trend_hunter_core::{EnrichedProduct, rank};

use crate::generation::Generate;
use crate::interpreter::interpret_outcome;
use crate::metering::{Meter, MeterError, PRODUCT_ANALYZED_EVENT};
use crate::prompt::{PromptOptions, build_prompt};
use crate::retrieval::{RetrievalQuery, Retrieve};
use crate::sink::{Sink, SinkError};

/// Products listed in the end-of-run summary.
pub const SUMMARY_SIZE: usize = 3;

/// Characters of the explanation shown in the summary.
const SUMMARY_EXPLANATION_CHARS: usize = 100;

/// Failures that abort a run. Retrieval, generation and interpretation
/// failures are recovered per item and never surface here.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Meter(#[from] MeterError),
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Outcome of one run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Enriched products, highest score first.
    pub products: Vec<EnrichedProduct>,
    /// How many analyses are fallbacks.
    pub degraded: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    /// The highest-scoring products.
    #[must_use]
    pub fn top(&self, n: usize) -> &[EnrichedProduct] {
        self.products.get(..n).unwrap_or(&self.products)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Pipeline wiring a retriever, a generator, a sink and a meter.
#[derive(Debug)]
pub struct Pipeline<R, G, S, M> {
    retriever: R,
    generator: G,
    sink: S,
    meter: M,
    prompt: PromptOptions,
}

impl<R, G, S, M> Pipeline<R, G, S, M>
where
    R: Retrieve,
    G: Generate,
    S: Sink,
    M: Meter,
{
    pub const fn new(retriever: R, generator: G, sink: S, meter: M, prompt: PromptOptions) -> Self {
        Self {
            retriever,
            generator,
            sink,
            meter,
            prompt,
        }
    }

    /// Run the pipeline once for `query`.
    ///
    /// An empty retrieval is not an error: the report is empty and nothing is
    /// emitted or charged.
    ///
    /// # Errors
    ///
    /// Returns an error if a metering charge or a sink push fails.
    #[instrument(skip(self), fields(category = %query.category))]
    pub async fn run(&mut self, query: &RetrievalQuery) -> Result<RunReport, PipelineError> {
        let started_at = Utc::now();
        info!(
            max_products = query.max_products,
            min_sales_count = query.min_sales_count,
            "Starting trend analysis"
        );

        let products = self.retriever.fetch(query).await;
        if products.is_empty() {
            warn!("No products found matching criteria");
            return Ok(RunReport {
                products: Vec::new(),
                degraded: 0,
                started_at,
                finished_at: Utc::now(),
            });
        }
        info!(count = products.len(), "Retrieved products");

        let total = products.len();
        let mut enriched = Vec::with_capacity(total);
        for (i, product) in products.into_iter().enumerate() {
            info!(
                index = i + 1,
                total,
                product = product.title(),
                "Analyzing product"
            );

            let prompt = build_prompt(&product, self.prompt);
            let outcome = self.generator.generate(&prompt).await;
            let analysis = interpret_outcome(outcome, product.title());
            debug!(score = %analysis.virality_score, "Analysis complete");

            enriched.push(EnrichedProduct::combine(product, analysis));
            self.meter.charge(PRODUCT_ANALYZED_EVENT, 1).await?;
        }

        let ranked = rank(enriched);
        for product in &ranked {
            self.sink.push(product).await?;
        }

        let report = RunReport {
            degraded: ranked.iter().filter(|p| p.is_degraded()).count(),
            products: ranked,
            started_at,
            finished_at: Utc::now(),
        };

        info!(
            analyzed = report.products.len(),
            degraded = report.degraded,
            "Analysis complete"
        );
        for (position, product) in report.top(SUMMARY_SIZE).iter().enumerate() {
            info!(
                rank = position + 1,
                score = %product.virality_score(),
                product = product.product_title(),
                why_winning = truncate(&product.analysis().why_winning, SUMMARY_EXPLANATION_CHARS),
                "Top product"
            );
        }

        Ok(report)
    }

    pub const fn generator(&self) -> &G {
        &self.generator
    }

    pub const fn sink(&self) -> &S {
        &self.sink
    }

    pub const fn meter(&self) -> &M {
        &self.meter
    }

    /// Take the pipeline apart, returning the sink and meter.
    pub fn into_parts(self) -> (S, M) {
        (self.sink, self.meter)
    }
}

/// First `max` characters of `text`.
fn truncate(text: &str, max: usize) -> &str {
    text.char_indices()
        .nth(max)
        .and_then(|(end, _)| text.get(..end))
        .unwrap_or(text)
}
