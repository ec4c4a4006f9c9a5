//! Scored analyses, ranking and the emitted records.

use trend_hunter::metering::LogMeter;
use trend_hunter::prompt::{NO_REVIEWS, PromptOptions};
use trend_hunter::retrieval::FixtureRetriever;
use trend_hunter::sink::JsonLinesSink;
use trend_hunter::Pipeline;
use trend_hunter_core::{EnrichedProduct, PARSE_FAILURE_FLAG};
use trend_hunter_integration_tests::{
    ScriptedGenerator, UnavailableGenerator, fenced_analysis, kitchen_query,
};

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn test_fenced_reply_is_used_verbatim() {
    let generator = ScriptedGenerator::new()
        .reply("Silicone Stretch Lids Set of 12", &fenced_analysis(85))
        .otherwise("not json");
    let mut pipeline = Pipeline::new(
        FixtureRetriever,
        generator,
        Vec::<EnrichedProduct>::new(),
        LogMeter::new(),
        PromptOptions::default(),
    );

    let report = pipeline.run(&kitchen_query(10, 100)).await.unwrap();

    let top = &report.products[0];
    assert_eq!(top.product_id().as_str(), "mock_003");
    assert_eq!(top.virality_score().get(), 85);
    assert!(!top.is_degraded());
    assert!(
        !top.analysis()
            .quality_flags
            .iter()
            .any(|flag| flag == PARSE_FAILURE_FLAG)
    );
    assert_eq!(top.analysis().target_audience, "Home cooks");
    assert_eq!(report.degraded, 4);
}

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn test_products_emitted_highest_score_first() {
    let generator = ScriptedGenerator::new()
        .reply("Portable Blender USB Rechargeable", &fenced_analysis(72))
        .reply("Electric Vegetable Chopper 3-in-1", &fenced_analysis(91))
        .reply("Silicone Stretch Lids Set of 12", &fenced_analysis(72))
        .reply("Magnetic Spice Rack Organizer", &fenced_analysis(40))
        .reply("Air Fryer Liners Disposable 100pcs", &fenced_analysis(100));
    let mut pipeline = Pipeline::new(
        FixtureRetriever,
        generator,
        Vec::<EnrichedProduct>::new(),
        LogMeter::new(),
        PromptOptions::default(),
    );

    pipeline.run(&kitchen_query(10, 0)).await.unwrap();

    let emitted: Vec<(&str, u8)> = pipeline
        .sink()
        .iter()
        .map(|p| (p.product_id().as_str(), p.virality_score().get()))
        .collect();
    assert_eq!(
        emitted,
        [
            ("mock_005", 100),
            ("mock_002", 91),
            ("mock_001", 72),
            ("mock_003", 72),
            ("mock_004", 40),
        ]
    );
}

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn test_generation_happens_in_retrieval_order() {
    let generator = ScriptedGenerator::new().otherwise(&fenced_analysis(60));
    let mut pipeline = Pipeline::new(
        FixtureRetriever,
        generator,
        Vec::<EnrichedProduct>::new(),
        LogMeter::new(),
        PromptOptions { include_reviews: false },
    );

    pipeline.run(&kitchen_query(10, 10_000)).await.unwrap();

    let prompts = pipeline.generator().prompts();
    assert_eq!(prompts.len(), 3);
    assert!(prompts[0].contains("Product Title: Portable Blender USB Rechargeable\n"));
    assert!(prompts[1].contains("Product Title: Silicone Stretch Lids Set of 12\n"));
    assert!(prompts[2].contains("Product Title: Air Fryer Liners Disposable 100pcs\n"));
    assert!(prompts.iter().all(|p| p.contains(NO_REVIEWS)));
}

#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn test_json_lines_records_are_flat() {
    let mut pipeline = Pipeline::new(
        FixtureRetriever,
        UnavailableGenerator,
        JsonLinesSink::new(Vec::<u8>::new()),
        LogMeter::new(),
        PromptOptions::default(),
    );

    pipeline.run(&kitchen_query(2, 0)).await.unwrap();

    let (sink, _) = pipeline.into_parts();
    let text = String::from_utf8(sink.into_inner().unwrap()).unwrap();
    let records: Vec<serde_json::Value> = text
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(records.len(), 2);
    let blender = &records[0];
    assert_eq!(blender["product_id"], "mock_001");
    assert_eq!(blender["product_title"], "Portable Blender USB Rechargeable");
    assert_eq!(blender["price"], 24.99);
    assert_eq!(blender["original_price"], 39.99);
    assert_eq!(blender["discount_percentage"], 37.5);
    assert_eq!(blender["category"], "Kitchen Gadgets");
    assert_eq!(blender["virality_score"], 0);
    assert_eq!(blender["quality_flags"][0], "Analysis failed");
    assert!(blender.get("reviews").is_none());
}
