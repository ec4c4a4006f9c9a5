//! Deterministic sample listings used when live retrieval is unavailable.

use rust_decimal::Decimal;
use tracing::{error, info};
use trend_hunter_core::{ProductDraft, ProductRecord};

use super::{RetrievalQuery, Retrieve};

/// Number of listings in the fixture data set.
pub const FIXTURE_SIZE: usize = 5;

struct Sample {
    id: &'static str,
    title: &'static str,
    price_cents: i64,
    original_price_cents: i64,
    sales_count: u64,
    rating_tenths: i64,
    review_count: u64,
    shop_name: &'static str,
    image: &'static str,
    reviews: [&'static str; 5],
}

const SAMPLES: [Sample; FIXTURE_SIZE] = [
    Sample {
        id: "mock_001",
        title: "Portable Blender USB Rechargeable",
        price_cents: 2499,
        original_price_cents: 3999,
        sales_count: 15420,
        rating_tenths: 47,
        review_count: 2341,
        shop_name: "KitchenGadgetsPro",
        image: "blender",
        reviews: [
            "Perfect for my morning smoothies! So convenient for the office.",
            "Battery lasts all week, amazing quality for the price!",
            "Bought this for my gym bag, absolute game changer!",
            "My kids love making their own fruit drinks now.",
            "Wish I bought this sooner, makes healthy eating so easy!",
        ],
    },
    Sample {
        id: "mock_002",
        title: "Electric Vegetable Chopper 3-in-1",
        price_cents: 3499,
        original_price_cents: 4999,
        sales_count: 8932,
        rating_tenths: 45,
        review_count: 1256,
        shop_name: "HomeChefTools",
        image: "chopper",
        reviews: [
            "Saves me so much time meal prepping!",
            "Finally, no more crying while cutting onions!",
            "The cleanup is super easy, dishwasher safe.",
            "Bought for my mom and she absolutely loves it.",
            "Great for making salsa and guacamole quickly.",
        ],
    },
    Sample {
        id: "mock_003",
        title: "Silicone Stretch Lids Set of 12",
        price_cents: 1299,
        original_price_cents: 1999,
        sales_count: 25678,
        rating_tenths: 48,
        review_count: 4521,
        shop_name: "EcoKitchenStore",
        image: "lids",
        reviews: [
            "No more plastic wrap! These are incredible.",
            "Fit perfectly on all my bowls and containers.",
            "Such a simple solution, why didn't I buy these sooner?",
            "Great for keeping food fresh, very stretchy.",
            "Eco-friendly and actually works great!",
        ],
    },
    Sample {
        id: "mock_004",
        title: "Magnetic Spice Rack Organizer",
        price_cents: 2899,
        original_price_cents: 4499,
        sales_count: 6234,
        rating_tenths: 46,
        review_count: 892,
        shop_name: "OrganizeMyHome",
        image: "spicerack",
        reviews: [
            "Finally organized my tiny kitchen!",
            "The magnets are super strong, no falling jars.",
            "Looks so aesthetic on my fridge.",
            "Space saver for small apartments!",
            "Great gift idea for home cooks.",
        ],
    },
    Sample {
        id: "mock_005",
        title: "Air Fryer Liners Disposable 100pcs",
        price_cents: 999,
        original_price_cents: 1499,
        sales_count: 42156,
        rating_tenths: 49,
        review_count: 7823,
        shop_name: "AirFryerEssentials",
        image: "liners",
        reviews: [
            "Makes cleanup a breeze, love these!",
            "No more scrubbing my air fryer basket.",
            "Great quality and perfect fit for my Ninja.",
            "Reordering for the third time, can't live without them.",
            "Food doesn't stick anymore, highly recommend!",
        ],
    },
];

impl Sample {
    fn draft(&self, category: &str) -> ProductDraft {
        ProductDraft {
            id: self.id.to_string(),
            title: self.title.to_string(),
            url: format!("https://tiktokshop.com/product/{}", self.id),
            price: Decimal::new(self.price_cents, 2),
            original_price: Some(Decimal::new(self.original_price_cents, 2)),
            sales_count: self.sales_count,
            rating: Some(Decimal::new(self.rating_tenths, 1)),
            review_count: self.review_count,
            shop_name: Some(self.shop_name.to_string()),
            category: Some(category.to_string()),
            reviews: self.reviews.iter().map(|r| (*r).to_string()).collect(),
            image_url: Some(format!("https://example.com/{}.jpg", self.image)),
        }
    }
}

/// The fixture data set for `query`: every sample in fixed order, labelled
/// with the requested category, then filtered like live results.
#[must_use]
pub fn products(query: &RetrievalQuery) -> Vec<ProductRecord> {
    let all = SAMPLES.iter().filter_map(|sample| {
        match ProductRecord::try_from(sample.draft(&query.category)) {
            Ok(product) => Some(product),
            Err(e) => {
                error!(id = sample.id, error = %e, "Invalid fixture product");
                None
            }
        }
    });
    query.filter(all)
}

/// Retriever serving only the fixture data set.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureRetriever;

impl Retrieve for FixtureRetriever {
    async fn fetch(&self, query: &RetrievalQuery) -> Vec<ProductRecord> {
        let products = products(query);
        info!(count = products.len(), "Using fixture product data");
        products
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn query(max_products: usize, min_sales_count: u64) -> RetrievalQuery {
        RetrievalQuery {
            category: "Home Decor".to_string(),
            max_products,
            min_sales_count,
        }
    }

    #[test]
    fn test_all_samples_are_valid() {
        let products = products(&query(50, 0));
        assert_eq!(products.len(), FIXTURE_SIZE);

        let ids: Vec<&str> = products.iter().map(|p| p.id().as_str()).collect();
        assert_eq!(ids, ["mock_001", "mock_002", "mock_003", "mock_004", "mock_005"]);
    }

    #[test]
    fn test_category_is_requested_one() {
        assert!(
            products(&query(50, 0))
                .iter()
                .all(|p| p.category() == Some("Home Decor"))
        );
    }

    #[test]
    fn test_min_sales_filter() {
        let products = products(&query(50, 10_000));
        let ids: Vec<&str> = products.iter().map(|p| p.id().as_str()).collect();
        assert_eq!(ids, ["mock_001", "mock_003", "mock_005"]);
        assert!(products.iter().all(|p| p.sales_count() >= 10_000));
    }

    #[test]
    fn test_max_products_limit() {
        let products = products(&query(2, 100));
        let ids: Vec<&str> = products.iter().map(|p| p.id().as_str()).collect();
        assert_eq!(ids, ["mock_001", "mock_002"]);
    }

    #[test]
    fn test_sample_details() {
        let products = products(&query(1, 0));
        let blender = &products[0];
        assert_eq!(blender.price(), Decimal::new(2499, 2));
        assert_eq!(blender.original_price(), Some(Decimal::new(3999, 2)));
        assert_eq!(blender.rating(), Some(Decimal::new(47, 1)));
        assert_eq!(blender.url(), "https://tiktokshop.com/product/mock_001");
        assert_eq!(blender.image_url(), Some("https://example.com/blender.jpg"));
        assert_eq!(blender.reviews().len(), 5);
    }

    #[test]
    fn test_threshold_above_every_sample() {
        assert!(products(&query(10, 1_000_000)).is_empty());
    }

    #[tokio::test]
    async fn test_fixture_retriever() {
        let products = FixtureRetriever.fetch(&query(3, 0)).await;
        assert_eq!(products.len(), 3);
    }
}
