//! Product retrieval.
//!
//! A retriever never fails from the pipeline's point of view. Transport or
//! API failures are logged and replaced by the [`fixture`] data set, filtered
//! the same way as live results.

use thiserror::Error;
use trend_hunter_core::ProductRecord;

use crate::apify::ApifyError;

pub mod fixture;
pub mod scraper;

pub use fixture::FixtureRetriever;
pub use scraper::{ApifyRetriever, DEFAULT_SCRAPER_ACTOR};

/// What to retrieve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalQuery {
    /// Category or search phrase.
    pub category: String,
    /// Upper bound on the number of products returned.
    pub max_products: usize,
    /// Products with fewer sales are dropped.
    pub min_sales_count: u64,
}

impl RetrievalQuery {
    /// Apply the sales threshold and the length cap, keeping input order.
    #[must_use]
    pub fn filter(&self, products: impl IntoIterator<Item = ProductRecord>) -> Vec<ProductRecord> {
        products
            .into_iter()
            .filter(|p| p.sales_count() >= self.min_sales_count)
            .take(self.max_products)
            .collect()
    }
}

/// Errors from a live retrieval attempt. Retrievers recover from these by
/// using the fixture data set.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("no Apify token configured")]
    NoToken,
    #[error("scraper call failed: {0}")]
    Apify(#[from] ApifyError),
}

/// Source of product listings.
pub trait Retrieve {
    /// Fetch at most `query.max_products` products, each with at least
    /// `query.min_sales_count` sales.
    fn fetch(&self, query: &RetrievalQuery) -> impl Future<Output = Vec<ProductRecord>> + Send;
}

/// The retriever selected for this run.
#[derive(Debug, Clone)]
pub enum ProductSource {
    Fixture(FixtureRetriever),
    Apify(ApifyRetriever),
}

impl Retrieve for ProductSource {
    async fn fetch(&self, query: &RetrievalQuery) -> Vec<ProductRecord> {
        match self {
            Self::Fixture(retriever) => retriever.fetch(query).await,
            Self::Apify(retriever) => retriever.fetch(query).await,
        }
    }
}
