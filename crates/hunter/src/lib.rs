//! Trend Hunter - trending product retrieval and AI analysis.
//!
//! Retrieves product listings for a category, asks a language model to
//! assess each one, and emits the products ranked by virality score.
//!
//! # Architecture
//!
//! ```text
//! Retrieve ──► build_prompt ──► Generate ──► interpret ──► combine
//!                                                             │
//!                         Sink ◄── rank ◄─────────────────────┘
//!                                   (Meter charged per product)
//! ```
//!
//! Each collaborator is a trait with an enum selecting the concrete
//! implementation for a run:
//!
//! - [`retrieval::Retrieve`] - [`retrieval::ProductSource`]
//! - [`generation::Generate`] - [`generation::GenerationClient`]
//! - [`sink::Sink`] - [`sink::OutputSink`]
//! - [`metering::Meter`] - [`metering::RunMeter`]
//!
//! # Modules
//!
//! - [`config`] - Actor input, environment fallbacks and validation
//! - [`prompt`] - Analysis prompt construction
//! - [`generation`] - Anthropic and OpenAI-compatible backends
//! - [`interpreter`] - Generated text to analysis, with fallbacks
//! - [`retrieval`] - Scraper actor and fixture data
//! - [`pipeline`] - The sequential driver
//! - [`apify`] - Apify REST API client

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod apify;
pub mod config;
pub mod generation;
pub mod interpreter;
pub mod metering;
pub mod pipeline;
pub mod prompt;
pub mod retrieval;
pub mod sink;

pub use config::{ActorInput, AiProvider, ConfigError, HunterConfig, PlatformEnv};
pub use pipeline::{Pipeline, PipelineError, RunReport};
