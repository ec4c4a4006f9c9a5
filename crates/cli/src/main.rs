//! Trend Hunter CLI - Run the trending product analysis pipeline.
//!
//! # Usage
//!
//! ```bash
//! # Analyze kitchen gadgets with input from storage/key_value_stores/default/INPUT.json
//! trend-hunter run
//!
//! # Override input values and write JSON Lines to a file
//! trend-hunter run --category "Beauty" --max-products 5 --provider anthropic -o results.jsonl
//!
//! # Render the prompt for a sample product without calling any backend
//! trend-hunter prompt --product-id mock_003
//!
//! # Print the sample data set
//! trend-hunter fixtures --min-sales 10000
//! ```
//!
//! # Commands
//!
//! - `run` - Retrieve, analyze, rank and emit products
//! - `prompt` - Render the analysis prompt for a sample product
//! - `fixtures` - Print the sample products as JSON Lines
//!
//! Logs go to stderr. Set `SENTRY_DSN` to report errors and warnings to Sentry.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trend_hunter::PlatformEnv;

mod commands;

#[derive(Parser)]
#[command(name = "trend-hunter")]
#[command(author, version, about = "Find and analyze trending e-commerce products")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the analysis pipeline
    Run(RunArgs),
    /// Render the analysis prompt for a sample product (no network)
    Prompt {
        /// Sample product ID (`mock_001` to `mock_005`)
        #[arg(short, long)]
        product_id: String,

        /// Category written into the prompt
        #[arg(short, long, default_value = trend_hunter::config::DEFAULT_CATEGORY)]
        category: String,

        /// Leave review text out of the prompt
        #[arg(long)]
        no_reviews: bool,
    },
    /// Print the sample products as JSON Lines
    Fixtures(FilterArgs),
}

/// Values overriding the loaded input.
#[derive(Args)]
struct RunArgs {
    /// Input JSON file (defaults to local actor storage, then built-in defaults)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Product category to search
    #[arg(short, long)]
    category: Option<String>,

    /// Maximum number of products to analyze (1-50)
    #[arg(short, long)]
    max_products: Option<i64>,

    /// AI provider (`anthropic`, `openai`, `openrouter`)
    #[arg(short, long)]
    provider: Option<String>,

    /// `OpenRouter` model
    #[arg(long)]
    model: Option<String>,

    /// Minimum sales count
    #[arg(long)]
    min_sales: Option<i64>,

    /// Leave review text out of prompts
    #[arg(long)]
    no_reviews: bool,

    /// Use the sample products instead of the scraper
    #[arg(long)]
    fixtures: bool,

    /// Scraper actor to run
    #[arg(long, default_value = trend_hunter::retrieval::DEFAULT_SCRAPER_ACTOR)]
    actor: String,

    /// Write JSON Lines here instead of stdout or the platform dataset
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct FilterArgs {
    /// Category assigned to every product
    #[arg(short, long, default_value = trend_hunter::config::DEFAULT_CATEGORY)]
    category: String,

    /// Maximum number of products
    #[arg(short, long, default_value_t = 50)]
    max_products: usize,

    /// Minimum sales count
    #[arg(long, default_value_t = 0)]
    min_sales: u64,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry() -> Option<sentry::ClientInitGuard> {
    let dsn = std::env::var("SENTRY_DSN").ok().filter(|dsn| !dsn.is_empty())?;

    let guard = sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: std::env::var("SENTRY_ENVIRONMENT")
                .ok()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Map tracing levels to Sentry: errors and warnings become events, the rest
/// breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing(json: bool) {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "trend_hunter=info,trend_hunter_cli=info".into());

    // JSON on the platform for structured log parsing, text locally
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let platform = PlatformEnv::from_env();

    let _sentry_guard = init_sentry();
    init_tracing(platform.is_at_home);

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, platform).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, platform: PlatformEnv) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Run(args) => commands::run::execute(args, platform).await?,
        Commands::Prompt {
            product_id,
            category,
            no_reviews,
        } => commands::prompt::render(&product_id, &category, !no_reviews)?,
        Commands::Fixtures(filter) => {
            commands::fixtures::print(&filter.category, filter.max_products, filter.min_sales)?;
        }
    }
    Ok(())
}
