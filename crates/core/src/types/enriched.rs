//! Product data merged with its analysis, and ranking.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::analysis::{AnalysisResult, ViralityScore};
use super::id::ProductId;
use super::product::ProductRecord;

/// Discount off the original price, in percent with one decimal place.
///
/// Returns `None` unless `original_price > price`.
///
/// ```
/// use rust_decimal::Decimal;
/// use trend_hunter_core::discount_percentage;
///
/// let discount = discount_percentage(Decimal::new(1999, 2), Some(Decimal::new(2999, 2)));
/// assert_eq!(discount, Some(Decimal::new(333, 1)));
///
/// assert_eq!(discount_percentage(Decimal::TEN, Some(Decimal::TEN)), None);
/// assert_eq!(discount_percentage(Decimal::TEN, None), None);
/// ```
#[must_use]
pub fn discount_percentage(price: Decimal, original_price: Option<Decimal>) -> Option<Decimal> {
    let original = original_price.filter(|original| *original > price)?;
    let ratio = price.checked_div(original)?;
    Some(
        ((Decimal::ONE - ratio) * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero),
    )
}

/// A product listing with its analysis, as emitted by the pipeline.
///
/// Serializes as one flat object. Review texts are prompt input only and are
/// not carried over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedProduct {
    product_id: ProductId,
    product_title: String,
    product_url: String,
    #[serde(with = "rust_decimal::serde::float")]
    price: Decimal,
    #[serde(with = "rust_decimal::serde::float_option")]
    original_price: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    discount_percentage: Option<Decimal>,
    sales_count: u64,
    #[serde(with = "rust_decimal::serde::float_option")]
    rating: Option<Decimal>,
    review_count: u64,
    shop_name: Option<String>,
    category: Option<String>,
    image_url: Option<String>,
    #[serde(flatten)]
    analysis: AnalysisResult,
}

impl EnrichedProduct {
    /// Merge a product with its analysis.
    #[must_use]
    pub fn combine(product: ProductRecord, analysis: AnalysisResult) -> Self {
        let discount_percentage = discount_percentage(product.price(), product.original_price());
        Self {
            product_id: product.id().clone(),
            product_title: product.title().to_owned(),
            product_url: product.url().to_owned(),
            price: product.price(),
            original_price: product.original_price(),
            discount_percentage,
            sales_count: product.sales_count(),
            rating: product.rating(),
            review_count: product.review_count(),
            shop_name: product.shop_name().map(str::to_owned),
            category: product.category().map(str::to_owned),
            image_url: product.image_url().map(str::to_owned),
            analysis,
        }
    }

    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    #[must_use]
    pub fn product_title(&self) -> &str {
        &self.product_title
    }

    #[must_use]
    pub const fn price(&self) -> Decimal {
        self.price
    }

    #[must_use]
    pub const fn discount_percentage(&self) -> Option<Decimal> {
        self.discount_percentage
    }

    #[must_use]
    pub const fn sales_count(&self) -> u64 {
        self.sales_count
    }

    #[must_use]
    pub const fn virality_score(&self) -> ViralityScore {
        self.analysis.virality_score
    }

    /// The analysis half of the record.
    #[must_use]
    pub const fn analysis(&self) -> &AnalysisResult {
        &self.analysis
    }

    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.analysis.is_degraded()
    }
}

/// Order products by virality score, highest first.
///
/// The sort is stable: products with equal scores keep their relative order.
#[must_use]
pub fn rank(mut products: Vec<EnrichedProduct>) -> Vec<EnrichedProduct> {
    products.sort_by(|a, b| b.virality_score().cmp(&a.virality_score()));
    products
}
