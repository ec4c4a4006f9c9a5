//! Core types for Trend Hunter.
//!
//! This module provides type-safe wrappers for the pipeline's domain values.

pub mod analysis;
pub mod enriched;
pub mod id;
pub mod product;

pub use analysis::{
    AnalysisError, AnalysisResult, GENERATION_FAILURE_FLAG, PARSE_FAILURE_FLAG, ViralityScore,
};
pub use enriched::{EnrichedProduct, discount_percentage, rank};
pub use id::{ProductId, ProductIdError};
pub use product::{ProductDraft, ProductError, ProductRecord};
