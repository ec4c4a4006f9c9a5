//! Analysis prompt construction.
//!
//! The prompt asks for a single JSON object with exactly the eight fields of
//! [`AnalysisResult`](trend_hunter_core::AnalysisResult). The interpreter
//! relies on that shape, so the field names here must not drift.

use std::fmt::Write as _;

use trend_hunter_core::ProductRecord;

/// Maximum number of reviews embedded in a prompt.
pub const MAX_PROMPT_REVIEWS: usize = 10;

/// Placeholder used when no review text is embedded.
pub const NO_REVIEWS: &str = "No reviews available";

/// Knobs for prompt construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptOptions {
    /// Embed review text in the prompt.
    pub include_reviews: bool,
}

impl Default for PromptOptions {
    fn default() -> Self {
        Self {
            include_reviews: true,
        }
    }
}

/// Build the analysis prompt for one product.
#[must_use]
pub fn build_prompt(product: &ProductRecord, options: PromptOptions) -> String {
    let rating = product
        .rating()
        .map_or_else(|| "N/A".to_string(), |rating| rating.to_string());
    let category = product.category().unwrap_or("Unknown");
    let reviews = if options.include_reviews {
        format_reviews(product.reviews())
    } else {
        NO_REVIEWS.to_string()
    };

    format!(
        r#"You are an expert e-commerce analyst specializing in viral product identification for TikTok Shop and social commerce.

Analyze the following product data and provide a detailed assessment:

Product Title: {title}
Price: ${price}
Sales Count: {sales_count}
Rating: {rating}
Review Count: {review_count}
Category: {category}

Recent Reviews:
{reviews}

Based on this data, provide your analysis in the following JSON format:
{{
    "virality_score": <0-100 score based on sales velocity, review sentiment, and viral potential>,
    "why_winning": "<2-3 sentence explanation of why this product is trending>",
    "problem_solved": "<The main pain point or problem this product addresses>",
    "emotional_triggers": ["<emotional trigger 1>", "<emotional trigger 2>", ...],
    "marketing_angles": ["<marketing angle 1>", "<marketing angle 2>", ...],
    "quality_flags": ["<potential quality issue 1>", ...],
    "target_audience": "<Description of the ideal customer>",
    "ad_hooks": ["<video ad hook idea 1>", "<video ad hook idea 2>", ...]
}}

Consider:
- Sales velocity (high sales = proven demand)
- Review sentiment and emotional language
- Problem-solution clarity
- Viral/shareable qualities
- Price point attractiveness
- Potential quality concerns from reviews

Respond ONLY with the JSON object, no additional text."#,
        title = product.title(),
        price = product.price(),
        sales_count = product.sales_count(),
        review_count = product.review_count(),
    )
}

/// One review per line, `- ` prefixed, capped at [`MAX_PROMPT_REVIEWS`].
fn format_reviews(reviews: &[String]) -> String {
    if reviews.is_empty() {
        return NO_REVIEWS.to_string();
    }

    let mut out = String::new();
    for (i, review) in reviews.iter().take(MAX_PROMPT_REVIEWS).enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = write!(out, "- {review}");
    }
    out
}
