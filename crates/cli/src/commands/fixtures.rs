//! The `fixtures` command: print the sample products as JSON Lines.

use std::io::Write;

use trend_hunter::retrieval::{RetrievalQuery, fixture};

/// Write the filtered sample products to stdout, one JSON object per line.
///
/// # Errors
///
/// Returns an error if serialization fails or stdout is closed.
pub fn print(
    category: &str,
    max_products: usize,
    min_sales_count: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let query = RetrievalQuery {
        category: category.to_string(),
        max_products,
        min_sales_count,
    };
    let products = fixture::products(&query);

    let mut stdout = std::io::stdout().lock();
    for product in &products {
        serde_json::to_writer(&mut stdout, product)?;
        writeln!(stdout)?;
    }

    tracing::info!(count = products.len(), "Printed sample products");
    Ok(())
}
