//! Trend Hunter Core - Shared types library.
//!
//! This crate provides the data model used across all Trend Hunter components:
//! - `trend-hunter` - Retrieval, generation and analysis pipeline
//! - `trend-hunter-cli` - Command-line entry point
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product records, AI analysis results and the enriched
//!   (merged and ranked) output records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
