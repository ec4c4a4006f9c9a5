//! Pay-per-event usage metering.

use thiserror::Error;
use tracing::info;

use crate::apify::{ApifyClient, ApifyError};

/// Event charged once for every product pushed through the pipeline.
pub const PRODUCT_ANALYZED_EVENT: &str = "product-analyzed";

/// Errors that can occur when charging an event.
#[derive(Debug, Error)]
pub enum MeterError {
    #[error("Failed to charge {event}: {source}")]
    Charge {
        event: String,
        source: ApifyError,
    },
}

/// Records billable events.
pub trait Meter {
    /// Charge `count` occurrences of `event`.
    fn charge(
        &mut self,
        event: &str,
        count: u32,
    ) -> impl Future<Output = Result<(), MeterError>> + Send;
}

/// Meter that only logs and counts charges. Used outside the platform.
#[derive(Debug, Clone, Default)]
pub struct LogMeter {
    charges: Vec<(String, u32)>,
}

impl LogMeter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every charge recorded so far, in order.
    #[must_use]
    pub fn charges(&self) -> &[(String, u32)] {
        &self.charges
    }

    /// Total count charged for `event`.
    #[must_use]
    pub fn total(&self, event: &str) -> u64 {
        self.charges
            .iter()
            .filter(|(name, _)| name == event)
            .map(|(_, count)| u64::from(*count))
            .sum()
    }
}

impl Meter for LogMeter {
    async fn charge(&mut self, event: &str, count: u32) -> Result<(), MeterError> {
        self.charges.push((event.to_string(), count));
        info!(event, count, total = self.total(event), "Charged event");
        Ok(())
    }
}

/// Meter charging events against a platform run.
#[derive(Debug, Clone)]
pub struct ApifyMeter {
    client: ApifyClient,
    run_id: String,
}

impl ApifyMeter {
    #[must_use]
    pub fn new(client: ApifyClient, run_id: impl Into<String>) -> Self {
        Self {
            client,
            run_id: run_id.into(),
        }
    }
}

impl Meter for ApifyMeter {
    async fn charge(&mut self, event: &str, count: u32) -> Result<(), MeterError> {
        self.client
            .charge(&self.run_id, event, count)
            .await
            .map_err(|source| MeterError::Charge {
                event: event.to_string(),
                source,
            })
    }
}

/// The meter selected for this run.
#[derive(Debug, Clone)]
pub enum RunMeter {
    Log(LogMeter),
    Apify(ApifyMeter),
}

impl Meter for RunMeter {
    async fn charge(&mut self, event: &str, count: u32) -> Result<(), MeterError> {
        match self {
            Self::Log(meter) => meter.charge(event, count).await,
            Self::Apify(meter) => meter.charge(event, count).await,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_meter_records_charges() {
        let mut meter = LogMeter::new();
        meter.charge(PRODUCT_ANALYZED_EVENT, 1).await.unwrap();
        meter.charge(PRODUCT_ANALYZED_EVENT, 1).await.unwrap();
        meter.charge("actor-start", 1).await.unwrap();

        assert_eq!(meter.charges().len(), 3);
        assert_eq!(meter.total(PRODUCT_ANALYZED_EVENT), 2);
        assert_eq!(meter.total("unknown"), 0);
    }

    #[tokio::test]
    async fn test_run_meter_dispatches() {
        let mut meter = RunMeter::Log(LogMeter::new());
        meter.charge(PRODUCT_ANALYZED_EVENT, 3).await.unwrap();

        let RunMeter::Log(inner) = meter else {
            panic!("expected log meter");
        };
        assert_eq!(inner.total(PRODUCT_ANALYZED_EVENT), 3);
    }
}
