//! Apify REST API client.
//!
//! Covers the calls the pipeline makes as an actor: running the scraper
//! actor synchronously, pushing dataset items, charging pay-per-event usage
//! and reading the run input.

use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

/// Scraper runs can take minutes before the dataset is returned.
const RUN_SYNC_TIMEOUT: Duration = Duration::from_secs(300);

/// Errors that can occur when calling the Apify API.
#[derive(Debug, Error)]
pub enum ApifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid API URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Apify API returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Unexpected response: {0}")]
    Response(String),
}

/// Apify API client.
#[derive(Clone)]
pub struct ApifyClient {
    client: Client,
    base_url: Url,
    token: SecretString,
}

impl std::fmt::Debug for ApifyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApifyClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChargeRequest<'a> {
    event_name: &'a str,
    count: u32,
}

impl ApifyClient {
    /// Create a client for the API at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a valid URL or the HTTP client
    /// cannot be built.
    pub fn new(base_url: &str, token: SecretString) -> Result<Self, ApifyError> {
        let client = Client::builder().timeout(RUN_SYNC_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
            token,
        })
    }

    /// Build `{base}/v2/{segments...}` with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApifyError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ApifyError::Response(format!("base URL {} cannot be a base", self.base_url))
            })?
            .pop_if_empty()
            .push("v2")
            .extend(segments);
        Ok(url)
    }

    /// Run an actor to completion and return its default dataset items.
    ///
    /// `actor_id` may use either `user/name` or `user~name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the run fails, or the response
    /// is not a JSON array.
    #[instrument(skip(self, input))]
    pub async fn run_actor_sync(
        &self,
        actor_id: &str,
        input: &serde_json::Value,
    ) -> Result<Vec<serde_json::Value>, ApifyError> {
        let actor = actor_id.replace('/', "~");
        let url = self.endpoint(&["acts", &actor, "run-sync-get-dataset-items"])?;

        let response = self
            .client
            .post(url)
            .bearer_auth(self.token.expose_secret())
            .json(input)
            .send()
            .await?;
        let response = check_status(response).await?;

        let items: serde_json::Value = response.json().await?;
        match items {
            serde_json::Value::Array(items) => {
                debug!(count = items.len(), "Actor run returned dataset items");
                Ok(items)
            }
            other => Err(ApifyError::Response(format!(
                "expected an array of dataset items, got {other}"
            ))),
        }
    }

    /// Append items to a dataset.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    #[instrument(skip(self, items))]
    pub async fn push_items<T: Serialize + Sync + ?Sized>(
        &self,
        dataset_id: &str,
        items: &T,
    ) -> Result<(), ApifyError> {
        let url = self.endpoint(&["datasets", dataset_id, "items"])?;
        let response = self
            .client
            .post(url)
            .bearer_auth(self.token.expose_secret())
            .json(items)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    /// Charge a pay-per-event event against a run.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    #[instrument(skip(self))]
    pub async fn charge(
        &self,
        run_id: &str,
        event_name: &str,
        count: u32,
    ) -> Result<(), ApifyError> {
        let url = self.endpoint(&["actor-runs", run_id, "charge"])?;
        let response = self
            .client
            .post(url)
            .bearer_auth(self.token.expose_secret())
            .json(&ChargeRequest { event_name, count })
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    /// Read a JSON record from a key-value store. Returns `None` if the record
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the record is not JSON.
    #[instrument(skip(self))]
    pub async fn get_record(
        &self,
        store_id: &str,
        key: &str,
    ) -> Result<Option<serde_json::Value>, ApifyError> {
        let url = self.endpoint(&["key-value-stores", store_id, "records", key])?;
        let response = self
            .client
            .get(url)
            .bearer_auth(self.token.expose_secret())
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check_status(response).await?;
        Ok(Some(response.json().await?))
    }
}

/// Pass successful responses through; turn the rest into [`ApifyError::Status`].
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApifyError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApifyError::Status { status, body })
}
