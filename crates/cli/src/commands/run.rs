//! The `run` command: execute the analysis pipeline once.
//!
//! # Collaborators
//!
//! | Concern    | Platform (`APIFY_TOKEN` set)                | Local                  |
//! |------------|---------------------------------------------|------------------------|
//! | Input      | Key-value store record (`APIFY_INPUT_KEY`)  | `--input`, storage dir |
//! | Retrieval  | Scraper actor                               | Fixture data           |
//! | Output     | Default dataset (`APIFY_DEFAULT_DATASET_ID`)| `--output` or stdout   |
//! | Metering   | Run charges (`ACTOR_RUN_ID`)                | Log only               |
//!
//! `--output` always wins over the platform dataset.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{info, warn};
use trend_hunter::apify::ApifyClient;
use trend_hunter::generation::GenerationClient;
use trend_hunter::metering::{ApifyMeter, LogMeter, RunMeter};
use trend_hunter::retrieval::{ApifyRetriever, FixtureRetriever, ProductSource};
use trend_hunter::sink::{ApifyDatasetSink, JsonLinesSink, OutputSink};
use trend_hunter::{ActorInput, Pipeline, PlatformEnv};

use crate::RunArgs;

/// Load input, build the collaborators and run the pipeline.
///
/// # Errors
///
/// Returns an error if the input is invalid, the selected provider has no
/// credential, or a sink or metering call fails.
pub async fn execute(
    args: RunArgs,
    platform: PlatformEnv,
) -> Result<(), Box<dyn std::error::Error>> {
    let apify = platform
        .token
        .clone()
        .map(|token| ApifyClient::new(&platform.api_base_url, token))
        .transpose()?;

    let mut input = load_input(args.input.as_deref(), &platform, apify.as_ref()).await?;
    apply_overrides(&mut input, &args);
    info!(?input, "Loaded input");

    let config = input.resolve()?;
    let generator = GenerationClient::new(&config.generation)?;

    let retriever = if args.fixtures {
        ProductSource::Fixture(FixtureRetriever)
    } else {
        ProductSource::Apify(ApifyRetriever::new(apify.clone(), args.actor))
    };

    let sink = match (args.output, &apify, &platform.dataset_id) {
        (Some(path), _, _) => {
            info!(path = %path.display(), "Writing results to file");
            let file: Box<dyn Write + Send> = Box::new(BufWriter::new(File::create(path)?));
            OutputSink::JsonLines(JsonLinesSink::new(file))
        }
        (None, Some(client), Some(dataset_id)) => {
            info!(dataset_id = %dataset_id, "Pushing results to dataset");
            OutputSink::Dataset(ApifyDatasetSink::new(client.clone(), dataset_id.clone()))
        }
        _ => {
            let stdout: Box<dyn Write + Send> = Box::new(std::io::stdout());
            OutputSink::JsonLines(JsonLinesSink::new(stdout))
        }
    };

    let meter = match (&apify, &platform.run_id) {
        (Some(client), Some(run_id)) => {
            RunMeter::Apify(ApifyMeter::new(client.clone(), run_id.clone()))
        }
        _ => RunMeter::Log(LogMeter::new()),
    };

    let mut pipeline = Pipeline::new(retriever, generator, sink, meter, config.prompt);
    let report = pipeline.run(&config.query).await?;

    if report.is_empty() {
        warn!("Run produced no results");
    }
    if let OutputSink::JsonLines(sink) = pipeline.into_parts().0 {
        sink.into_inner()?;
    }

    let elapsed = report.finished_at - report.started_at;
    info!(
        products = report.products.len(),
        degraded = report.degraded,
        elapsed_ms = elapsed.num_milliseconds(),
        "Run finished"
    );

    Ok(())
}

/// Read the run input: `--input` first, then the platform's key-value store,
/// then local sources.
async fn load_input(
    path: Option<&Path>,
    platform: &PlatformEnv,
    apify: Option<&ApifyClient>,
) -> Result<ActorInput, Box<dyn std::error::Error>> {
    if path.is_none() {
        if let (Some(client), Some(store_id)) = (apify, &platform.key_value_store_id) {
            if let Some(record) = client.get_record(store_id, &platform.input_key).await? {
                info!(
                    store_id = %store_id,
                    key = %platform.input_key,
                    "Loaded input from key-value store"
                );
                return Ok(serde_json::from_value(record)?);
            }
        }
    }
    Ok(ActorInput::load(path)?)
}

fn apply_overrides(input: &mut ActorInput, args: &RunArgs) {
    if let Some(category) = &args.category {
        input.category.clone_from(category);
    }
    if let Some(max_products) = args.max_products {
        input.max_products = max_products;
    }
    if let Some(provider) = &args.provider {
        input.ai_provider.clone_from(provider);
    }
    if let Some(model) = &args.model {
        input.openrouter_model = Some(model.clone());
    }
    if let Some(min_sales) = args.min_sales {
        input.min_sales_count = min_sales;
    }
    if args.no_reviews {
        input.include_review_analysis = false;
    }
}
