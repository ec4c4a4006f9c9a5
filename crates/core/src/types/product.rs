//! Raw product listing data.
//!
//! A [`ProductRecord`] is what retrieval hands to the analysis pipeline. It is
//! built from a plain [`ProductDraft`] so that every record in circulation has
//! passed validation.

use rust_decimal::Decimal;
use serde::Serialize;

use super::id::{ProductId, ProductIdError};

/// Highest rating a listing can carry.
const MAX_RATING: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// Errors that can occur when validating a [`ProductDraft`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductError {
    /// The listing id is blank.
    #[error(transparent)]
    Id(#[from] ProductIdError),
    /// A monetary field is negative.
    #[error("{field} cannot be negative (got {value})")]
    NegativeAmount {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: Decimal,
    },
    /// The rating is outside 0-5.
    #[error("rating must be between 0 and 5 (got {0})")]
    RatingOutOfRange(Decimal),
}

/// Unvalidated product fields, as produced by a scraper or fixture.
///
/// Convert with `ProductRecord::try_from(draft)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDraft {
    pub id: String,
    pub title: String,
    pub url: String,
    pub price: Decimal,
    pub original_price: Option<Decimal>,
    pub sales_count: u64,
    pub rating: Option<Decimal>,
    pub review_count: u64,
    pub shop_name: Option<String>,
    pub category: Option<String>,
    pub reviews: Vec<String>,
    pub image_url: Option<String>,
}

/// A validated product listing.
///
/// ## Constraints
///
/// - `id` is not blank
/// - `price` and `original_price` are non-negative
/// - `rating`, when present, is within 0-5
///
/// `original_price` is usually at least `price`, but that is not enforced; it
/// only feeds the discount calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRecord {
    #[serde(rename = "product_id")]
    id: ProductId,
    #[serde(rename = "product_title")]
    title: String,
    #[serde(rename = "product_url")]
    url: String,
    #[serde(with = "rust_decimal::serde::float")]
    price: Decimal,
    #[serde(with = "rust_decimal::serde::float_option")]
    original_price: Option<Decimal>,
    sales_count: u64,
    #[serde(with = "rust_decimal::serde::float_option")]
    rating: Option<Decimal>,
    review_count: u64,
    shop_name: Option<String>,
    category: Option<String>,
    reviews: Vec<String>,
    image_url: Option<String>,
}

impl TryFrom<ProductDraft> for ProductRecord {
    type Error = ProductError;

    fn try_from(draft: ProductDraft) -> Result<Self, Self::Error> {
        let id = ProductId::try_from(draft.id)?;

        if draft.price < Decimal::ZERO {
            return Err(ProductError::NegativeAmount {
                field: "price",
                value: draft.price,
            });
        }
        if let Some(original) = draft.original_price {
            if original < Decimal::ZERO {
                return Err(ProductError::NegativeAmount {
                    field: "original_price",
                    value: original,
                });
            }
        }
        if let Some(rating) = draft.rating {
            if rating < Decimal::ZERO || rating > MAX_RATING {
                return Err(ProductError::RatingOutOfRange(rating));
            }
        }

        Ok(Self {
            id,
            title: draft.title,
            url: draft.url,
            price: draft.price,
            original_price: draft.original_price,
            sales_count: draft.sales_count,
            rating: draft.rating,
            review_count: draft.review_count,
            shop_name: draft.shop_name,
            category: draft.category,
            reviews: draft.reviews,
            image_url: draft.image_url,
        })
    }
}

impl ProductRecord {
    #[must_use]
    pub const fn id(&self) -> &ProductId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub const fn price(&self) -> Decimal {
        self.price
    }

    #[must_use]
    pub const fn original_price(&self) -> Option<Decimal> {
        self.original_price
    }

    #[must_use]
    pub const fn sales_count(&self) -> u64 {
        self.sales_count
    }

    #[must_use]
    pub const fn rating(&self) -> Option<Decimal> {
        self.rating
    }

    #[must_use]
    pub const fn review_count(&self) -> u64 {
        self.review_count
    }

    #[must_use]
    pub fn shop_name(&self) -> Option<&str> {
        self.shop_name.as_deref()
    }

    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Review texts in source order.
    #[must_use]
    pub fn reviews(&self) -> &[String] {
        &self.reviews
    }

    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn draft() -> ProductDraft {
        ProductDraft {
            id: "test_001".to_string(),
            title: "Test Product".to_string(),
            url: "https://example.com/product".to_string(),
            price: Decimal::new(1999, 2),
            sales_count: 1000,
            ..ProductDraft::default()
        }
    }

    #[test]
    fn test_create_product_record() {
        let product = ProductRecord::try_from(draft()).unwrap();
        assert_eq!(product.id().as_str(), "test_001");
        assert_eq!(product.price(), Decimal::new(1999, 2));
        assert_eq!(product.review_count(), 0);
        assert!(product.reviews().is_empty());
        assert!(product.rating().is_none());
    }

    #[test]
    fn test_product_record_keeps_review_order() {
        let product = ProductRecord::try_from(ProductDraft {
            reviews: vec!["Great product!".to_string(), "Highly recommend".to_string()],
            ..draft()
        })
        .unwrap();
        assert_eq!(product.reviews(), ["Great product!", "Highly recommend"]);
    }

    #[test]
    fn test_empty_id_rejected() {
        let result = ProductRecord::try_from(ProductDraft {
            id: String::new(),
            ..draft()
        });
        assert_eq!(result, Err(ProductError::Id(ProductIdError::Empty)));
    }

    #[test]
    fn test_negative_price_rejected() {
        let result = ProductRecord::try_from(ProductDraft {
            price: Decimal::new(-1, 0),
            ..draft()
        });
        assert!(matches!(
            result,
            Err(ProductError::NegativeAmount { field: "price", .. })
        ));

        let result = ProductRecord::try_from(ProductDraft {
            original_price: Some(Decimal::new(-500, 2)),
            ..draft()
        });
        assert!(matches!(
            result,
            Err(ProductError::NegativeAmount {
                field: "original_price",
                ..
            })
        ));
    }

    #[test]
    fn test_zero_price_accepted() {
        assert!(
            ProductRecord::try_from(ProductDraft {
                price: Decimal::ZERO,
                ..draft()
            })
            .is_ok()
        );
    }

    #[test]
    fn test_rating_bounds() {
        for rating in [Decimal::ZERO, Decimal::new(47, 1), Decimal::new(5, 0)] {
            assert!(
                ProductRecord::try_from(ProductDraft {
                    rating: Some(rating),
                    ..draft()
                })
                .is_ok()
            );
        }

        let result = ProductRecord::try_from(ProductDraft {
            rating: Some(Decimal::new(51, 1)),
            ..draft()
        });
        assert_eq!(
            result,
            Err(ProductError::RatingOutOfRange(Decimal::new(51, 1)))
        );
    }

    #[test]
    fn test_serializes_with_listing_field_names() {
        let product = ProductRecord::try_from(ProductDraft {
            original_price: Some(Decimal::new(2999, 2)),
            ..draft()
        })
        .unwrap();
        let json = serde_json::to_value(&product).unwrap();

        assert_eq!(json["product_id"], "test_001");
        assert_eq!(json["product_title"], "Test Product");
        assert_eq!(json["price"], 19.99);
        assert_eq!(json["original_price"], 29.99);
        assert!(json["rating"].is_null());
    }
}
