//! Output sinks receiving ranked products, one record per push.

use std::io::Write;

use thiserror::Error;
use tracing::debug;
use trend_hunter_core::EnrichedProduct;

use crate::apify::{ApifyClient, ApifyError};

/// Errors that can occur when emitting a record.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to write record: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to push record to dataset: {0}")]
    Dataset(#[from] ApifyError),
}

/// Destination for enriched products.
pub trait Sink {
    /// Emit one record.
    fn push(
        &mut self,
        product: &EnrichedProduct,
    ) -> impl Future<Output = Result<(), SinkError>> + Send;
}

/// Writes one JSON object per line.
#[derive(Debug)]
pub struct JsonLinesSink<W> {
    writer: W,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Flush and return the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    pub fn into_inner(mut self) -> Result<W, SinkError> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write + Send> Sink for JsonLinesSink<W> {
    async fn push(&mut self, product: &EnrichedProduct) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.writer, product)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Pushes records to an Apify dataset.
#[derive(Debug, Clone)]
pub struct ApifyDatasetSink {
    client: ApifyClient,
    dataset_id: String,
}

impl ApifyDatasetSink {
    #[must_use]
    pub fn new(client: ApifyClient, dataset_id: impl Into<String>) -> Self {
        Self {
            client,
            dataset_id: dataset_id.into(),
        }
    }
}

impl Sink for ApifyDatasetSink {
    async fn push(&mut self, product: &EnrichedProduct) -> Result<(), SinkError> {
        self.client.push_items(&self.dataset_id, product).await?;
        debug!(product_id = %product.product_id(), "Pushed record to dataset");
        Ok(())
    }
}

/// Collects records in memory.
impl Sink for Vec<EnrichedProduct> {
    async fn push(&mut self, product: &EnrichedProduct) -> Result<(), SinkError> {
        Vec::push(self, product.clone());
        Ok(())
    }
}

/// The sink selected for this run.
pub enum OutputSink {
    JsonLines(JsonLinesSink<Box<dyn Write + Send>>),
    Dataset(ApifyDatasetSink),
}

impl std::fmt::Debug for OutputSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::JsonLines(_) => f.write_str("OutputSink::JsonLines"),
            Self::Dataset(sink) => f.debug_tuple("OutputSink::Dataset").field(sink).finish(),
        }
    }
}

impl Sink for OutputSink {
    async fn push(&mut self, product: &EnrichedProduct) -> Result<(), SinkError> {
        match self {
            Self::JsonLines(sink) => sink.push(product).await,
            Self::Dataset(sink) => sink.push(product).await,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use trend_hunter_core::{AnalysisResult, ProductDraft, ProductRecord};

    use super::*;

    fn enriched(id: &str) -> EnrichedProduct {
        let product = ProductRecord::try_from(ProductDraft {
            id: id.to_string(),
            title: "Silicone Stretch Lids".to_string(),
            price: Decimal::new(1299, 2),
            original_price: Some(Decimal::new(1999, 2)),
            sales_count: 25678,
            ..ProductDraft::default()
        })
        .unwrap();
        EnrichedProduct::combine(product, AnalysisResult::parse_failure())
    }

    #[tokio::test]
    async fn test_json_lines_one_object_per_line() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.push(&enriched("a")).await.unwrap();
        sink.push(&enriched("b")).await.unwrap();

        let bytes = sink.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["product_id"], "a");
        assert_eq!(first["virality_score"], 50);
        assert_eq!(first["discount_percentage"], 35.0);
        assert_eq!(first["quality_flags"][0], "Analysis incomplete");
    }

    #[tokio::test]
    async fn test_vec_sink_collects_in_order() {
        let mut sink: Vec<EnrichedProduct> = Vec::new();
        Sink::push(&mut sink, &enriched("x")).await.unwrap();
        Sink::push(&mut sink, &enriched("y")).await.unwrap();

        let ids: Vec<&str> = sink.iter().map(|p| p.product_id().as_str()).collect();
        assert_eq!(ids, ["x", "y"]);
    }
}
