//! Shared setup for integration tests

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Once;

use lineage::{FamilyEngine, FileSource, InlineSource, TaxonomySource};

static TRACING: Once = Once::new();

/// Install a test subscriber once per binary. `RUST_LOG=lineage=debug`
/// shows resolution and scoring detail.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Main and conlang fixture files, in load order
pub fn fixture_sources() -> Vec<Box<dyn TaxonomySource>> {
    vec![
        Box::new(FileSource::new(fixture("languages.csv"))),
        Box::new(FileSource::new(fixture("conlangs.csv"))),
    ]
}

pub fn inline_sources(blocks: &[&str]) -> Vec<Box<dyn TaxonomySource>> {
    blocks
        .iter()
        .enumerate()
        .map(|(i, text)| Box::new(InlineSource::new(format!("block{i}"), *text)) as Box<dyn TaxonomySource>)
        .collect()
}

/// Engine with both fixture files loaded
pub async fn loaded_engine() -> FamilyEngine {
    init_tracing();
    let engine = FamilyEngine::new();
    engine
        .load(&fixture_sources())
        .await
        .expect("fixture taxonomy loads");
    engine
}

pub fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
