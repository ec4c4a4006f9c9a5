//! The `prompt` command: render the analysis prompt for a sample product.

use std::io::Write;

use trend_hunter::prompt::{PromptOptions, build_prompt};
use trend_hunter::retrieval::{RetrievalQuery, fixture};

/// Write the prompt for fixture product `product_id` to stdout.
///
/// # Errors
///
/// Returns an error if no sample product has that ID or stdout is closed.
pub fn render(
    product_id: &str,
    category: &str,
    include_reviews: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let query = RetrievalQuery {
        category: category.to_string(),
        max_products: fixture::FIXTURE_SIZE,
        min_sales_count: 0,
    };
    let product = fixture::products(&query)
        .into_iter()
        .find(|p| p.id().as_str() == product_id)
        .ok_or_else(|| format!("No sample product with ID {product_id}"))?;

    let prompt = build_prompt(&product, PromptOptions { include_reviews });

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{prompt}")?;
    Ok(())
}
