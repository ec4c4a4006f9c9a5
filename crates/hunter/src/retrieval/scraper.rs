//! Live retrieval through a scraper actor on the Apify platform.

use rust_decimal::Decimal;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{error, info, instrument, warn};
use trend_hunter_core::{ProductDraft, ProductError, ProductRecord};

use super::{RetrievalError, RetrievalQuery, Retrieve, fixture};
use crate::apify::ApifyClient;
use crate::prompt::MAX_PROMPT_REVIEWS;

/// Scraper actor run when none is configured.
pub const DEFAULT_SCRAPER_ACTOR: &str = "clockworks/tiktok-scraper";

/// Why one scraped item was skipped.
#[derive(Debug, Error)]
enum ItemError {
    #[error("item is not an object")]
    NotAnObject,
    #[error("invalid {field}: {value}")]
    InvalidNumber { field: &'static str, value: String },
    #[error(transparent)]
    Product(#[from] ProductError),
}

/// Retriever that runs a scraper actor and falls back to the fixture data set.
#[derive(Debug, Clone)]
pub struct ApifyRetriever {
    client: Option<ApifyClient>,
    actor_id: String,
}

impl ApifyRetriever {
    /// A retriever using `client`, or the fixture data set when `client` is
    /// `None`.
    #[must_use]
    pub fn new(client: Option<ApifyClient>, actor_id: impl Into<String>) -> Self {
        Self {
            client,
            actor_id: actor_id.into(),
        }
    }

    #[instrument(skip(self), fields(actor = %self.actor_id))]
    async fn scrape(&self, query: &RetrievalQuery) -> Result<Vec<ProductRecord>, RetrievalError> {
        let client = self.client.as_ref().ok_or(RetrievalError::NoToken)?;
        let input = json!({
            "searchQueries": [query.category],
            "resultsPerPage": query.max_products,
            "shouldDownloadVideos": false,
            "shouldDownloadCovers": false,
        });

        let items = client.run_actor_sync(&self.actor_id, &input).await?;
        let received = items.len();
        let products = query.filter(items.iter().filter_map(|item| {
            transform_item(item, &query.category)
                .inspect_err(|e| warn!(error = %e, "Failed to parse item"))
                .ok()
        }));

        info!(received, kept = products.len(), "Scraped products");
        Ok(products)
    }
}

impl Retrieve for ApifyRetriever {
    async fn fetch(&self, query: &RetrievalQuery) -> Vec<ProductRecord> {
        match self.scrape(query).await {
            Ok(products) => products,
            Err(RetrievalError::NoToken) => {
                warn!("No Apify token available, using fixture data");
                fixture::products(query)
            }
            Err(e) => {
                error!(error = %e, "Scraping failed, using fixture data");
                fixture::products(query)
            }
        }
    }
}

/// Map one scraper dataset item onto a product.
fn transform_item(item: &Value, category: &str) -> Result<ProductRecord, ItemError> {
    let obj = item.as_object().ok_or(ItemError::NotAnObject)?;
    let field = |name: &str| obj.get(name).filter(|v| !v.is_null());

    let draft = ProductDraft {
        id: field("id").map(scalar_string).unwrap_or_default(),
        title: field("title")
            .or_else(|| field("desc"))
            .and_then(Value::as_str)
            .unwrap_or("Unknown")
            .to_string(),
        url: field("webVideoUrl")
            .or_else(|| field("url"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        price: field("price")
            .map(|v| decimal("price", v))
            .transpose()?
            .unwrap_or(Decimal::ZERO),
        original_price: field("originalPrice")
            .map(|v| decimal("originalPrice", v))
            .transpose()?,
        sales_count: field("playCount")
            .or_else(|| field("salesCount"))
            .map(|v| count("playCount", v))
            .transpose()?
            .unwrap_or(0),
        rating: field("rating").map(|v| decimal("rating", v)).transpose()?,
        review_count: field("commentCount")
            .map(|v| count("commentCount", v))
            .transpose()?
            .unwrap_or(0),
        shop_name: field("authorMeta")
            .and_then(|meta| meta.get("name"))
            .and_then(Value::as_str)
            .map(str::to_string),
        category: Some(category.to_string()),
        reviews: field("comments")
            .and_then(Value::as_array)
            .map(|comments| {
                comments
                    .iter()
                    .filter_map(comment_text)
                    .take(MAX_PROMPT_REVIEWS)
                    .collect()
            })
            .unwrap_or_default(),
        image_url: field("covers")
            .and_then(Value::as_array)
            .and_then(|covers| covers.first())
            .and_then(Value::as_str)
            .map(str::to_string),
    };

    Ok(ProductRecord::try_from(draft)?)
}

fn scalar_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Comments are either plain strings or objects with a `text` field.
fn comment_text(comment: &Value) -> Option<String> {
    match comment {
        Value::String(text) => Some(text.clone()),
        Value::Object(obj) => obj.get("text").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

/// A number or numeric string as a decimal.
fn decimal(field: &'static str, value: &Value) -> Result<Decimal, ItemError> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    };
    text.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| ItemError::InvalidNumber { field, value: text })
}

/// A non-negative whole number, given as a number or numeric string.
fn count(field: &'static str, value: &Value) -> Result<u64, ItemError> {
    let parsed = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| ItemError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn query() -> RetrievalQuery {
        RetrievalQuery {
            category: "Kitchen Gadgets".to_string(),
            max_products: 10,
            min_sales_count: 100,
        }
    }

    #[test]
    fn test_transform_full_item() {
        let item = json!({
            "id": 7_301_234_567_890_u64,
            "desc": "Mini waffle maker #kitchen",
            "webVideoUrl": "https://www.tiktok.com/@chef/video/7301234567890",
            "price": "19.99",
            "originalPrice": 29.99,
            "playCount": 125_000,
            "rating": 4.4,
            "commentCount": 312,
            "authorMeta": {"name": "chef"},
            "comments": ["so cute", {"text": "works great"}, 42],
            "covers": ["https://p16.example.com/cover.jpg"]
        });

        let product = transform_item(&item, "Kitchen Gadgets").unwrap();
        assert_eq!(product.id().as_str(), "7301234567890");
        assert_eq!(product.title(), "Mini waffle maker #kitchen");
        assert_eq!(product.url(), "https://www.tiktok.com/@chef/video/7301234567890");
        assert_eq!(product.price(), Decimal::new(1999, 2));
        assert_eq!(product.original_price(), Some(Decimal::new(2999, 2)));
        assert_eq!(product.sales_count(), 125_000);
        assert_eq!(product.rating(), Some(Decimal::new(44, 1)));
        assert_eq!(product.review_count(), 312);
        assert_eq!(product.shop_name(), Some("chef"));
        assert_eq!(product.category(), Some("Kitchen Gadgets"));
        assert_eq!(product.reviews(), ["so cute", "works great"]);
        assert_eq!(product.image_url(), Some("https://p16.example.com/cover.jpg"));
    }

    #[test]
    fn test_transform_minimal_item_defaults() {
        let product = transform_item(&json!({"id": "abc", "salesCount": 500}), "Beauty").unwrap();
        assert_eq!(product.title(), "Unknown");
        assert_eq!(product.url(), "");
        assert_eq!(product.price(), Decimal::ZERO);
        assert_eq!(product.sales_count(), 500);
        assert_eq!(product.review_count(), 0);
        assert!(product.reviews().is_empty());
        assert!(product.image_url().is_none());
    }

    #[test]
    fn test_transform_caps_comments() {
        let comments: Vec<String> = (0..25).map(|i| format!("comment {i}")).collect();
        let product = transform_item(&json!({"id": "x", "comments": comments}), "c").unwrap();
        assert_eq!(product.reviews().len(), MAX_PROMPT_REVIEWS);
    }

    #[test]
    fn test_transform_rejects_bad_items() {
        assert!(matches!(
            transform_item(&json!([1, 2]), "c"),
            Err(ItemError::NotAnObject)
        ));
        assert!(matches!(
            transform_item(&json!({"id": "x", "price": "free"}), "c"),
            Err(ItemError::InvalidNumber { field: "price", .. })
        ));
        assert!(matches!(
            transform_item(&json!({"price": 10}), "c"),
            Err(ItemError::Product(_))
        ));
        assert!(matches!(
            transform_item(&json!({"id": "x", "price": -1}), "c"),
            Err(ItemError::Product(_))
        ));
    }

    #[tokio::test]
    async fn test_without_client_uses_fixture() {
        let retriever = ApifyRetriever::new(None, DEFAULT_SCRAPER_ACTOR);
        let products = retriever.fetch(&query()).await;
        assert_eq!(products.len(), fixture::FIXTURE_SIZE);
        assert_eq!(products[0].id().as_str(), "mock_001");
    }

    #[tokio::test]
    async fn test_unreachable_platform_uses_filtered_fixture() {
        // Nothing listens on the discard port, so the actor run fails to connect.
        let client =
            ApifyClient::new("http://127.0.0.1:9", secrecy::SecretString::from("apify_api_test"))
                .unwrap();
        let retriever = ApifyRetriever::new(Some(client), DEFAULT_SCRAPER_ACTOR);

        let products = retriever
            .fetch(&RetrievalQuery {
                category: "Kitchen Gadgets".to_string(),
                max_products: 2,
                min_sales_count: 10_000,
            })
            .await;

        let ids: Vec<&str> = products.iter().map(|p| p.id().as_str()).collect();
        assert_eq!(ids, ["mock_001", "mock_003"]);
    }
}
