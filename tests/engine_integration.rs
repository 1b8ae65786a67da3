//! End-to-end tests: load the fixture taxonomy, resolve tags, score, diff.

mod helpers;

use helpers::{fixture, inline_sources, init_tracing, loaded_engine, names};
use lineage::{
    AncestryWalker, Comparison, FamilyEngine, FileSource, LoadError, LoadStatus, LookupError,
    NodeLevel, TaxonomySource,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

#[tokio::test]
async fn english_german_share_germanic() {
    let engine = loaded_engine().await;

    let comparison = engine.resolve_and_compare("en", "de");
    let result = comparison.result().expect("both tags resolve");

    assert_eq!(result.common_ancestor.as_deref(), Some("Germanic"));
    assert!(result.distance_score > 0 && result.distance_score < 100);
    assert_eq!(result.guess_ancestry, names(&["English", "Germanic", "Indo-European"]));

    let diff = engine.ancestry_diff(&result.guess_ancestry, &result.correct_ancestry);
    assert_eq!(diff.shared_prefix, names(&["Indo-European", "Germanic"]));
    assert_eq!(diff.guess_branch, names(&["English"]));
    assert_eq!(diff.correct_branch, names(&["German"]));
    assert_eq!(diff.correct_root(), Some("Indo-European"));
}

#[tokio::test]
async fn deeper_branch_scores_lower() {
    let engine = loaded_engine().await;

    let german = engine.resolve_and_compare("en", "de").score().unwrap();
    let swedish = engine.resolve_and_compare("en", "sv").score().unwrap();
    let french = engine.resolve_and_compare("en", "fr").score().unwrap();

    assert_eq!(german, 50);
    assert_eq!(swedish, 40);
    assert_eq!(french, 0);
}

#[tokio::test]
async fn identical_and_same_node_scores() {
    let engine = loaded_engine().await;

    assert_eq!(engine.resolve_and_compare("de", "de").score(), Some(100));
    assert_eq!(engine.resolve_and_compare("de-AT", "de-CH").score(), Some(99));
}

#[tokio::test]
async fn serbian_croatian_are_siblings_via_fallback() {
    let engine = loaded_engine().await;

    let resolved = engine.resolve("sr-Latn").unwrap();
    assert!(resolved.via_fallback);
    assert_eq!(resolved.code, "hbs");

    let result = engine.resolve_and_compare("sr", "hr").into_result().unwrap();
    assert_eq!(result.distance_score, 99);
    assert_eq!(result.common_ancestor.as_deref(), Some("Serbian-Croatian-Bosnian"));

    let diff = engine.ancestry_diff(&result.guess_ancestry, &result.correct_ancestry);
    assert!(diff.guess_branch.is_empty());
    assert!(diff.correct_branch.is_empty());
    assert!(diff.is_siblings(result.distance_score));
}

#[tokio::test]
async fn unrelated_languages_score_zero() {
    let engine = loaded_engine().await;

    let result = engine.resolve_and_compare("eo", "eu").into_result().unwrap();
    assert_eq!(result.common_ancestor, None);
    assert_eq!(result.distance_score, 0);
    assert_eq!(result.guess_ancestry, names(&["Esperanto", "Artificial Language"]));

    let diff = lineage::diff_result(&result);
    assert!(diff.shared_prefix.is_empty());
    assert_eq!(diff.correct_root(), Some("Basque"));
}

#[tokio::test]
async fn unresolvable_is_not_a_zero_score() {
    let engine = loaded_engine().await;

    assert_eq!(
        engine.resolve_and_compare("klingon", "en"),
        Comparison::Unresolvable {
            tag: "klingon".to_string()
        }
    );
    assert_eq!(
        engine.resolve_and_compare("en", "qq"),
        Comparison::Unresolvable {
            tag: "qq".to_string()
        }
    );
}

#[tokio::test]
async fn comparisons_before_load_are_not_ready() {
    init_tracing();
    let engine = FamilyEngine::new();

    assert_eq!(engine.status(), LoadStatus::Pending);
    assert_eq!(engine.resolve_and_compare("en", "de"), Comparison::NotReady);
    assert_eq!(engine.resolve_and_compare("en", "en"), Comparison::NotReady);
    assert_eq!(engine.display_entry("eng"), Err(LookupError::NotReady));
}

#[tokio::test]
async fn display_entries() {
    let engine = loaded_engine().await;

    let quoted = engine.display_entry("npl").unwrap();
    assert_eq!(quoted.name, "Nahuatl, Southeastern Puebla");
    assert_eq!(quoted.level, NodeLevel::Language);

    let conlang = engine.display_entry("epo").unwrap();
    assert_eq!(conlang.name, "Esperanto");

    let via_fallback = engine.display_entry("bos").unwrap();
    assert_eq!(via_fallback.code, "bos");
    assert_eq!(via_fallback.name, "Serbian-Croatian-Bosnian");

    assert_eq!(
        engine.display_entry("tlh"),
        Err(LookupError::Unresolvable("tlh".to_string()))
    );
}

#[tokio::test]
async fn root_family_hint() {
    let engine = loaded_engine().await;

    assert_eq!(engine.root_family("sv").unwrap().as_deref(), Some("Indo-European"));
    assert_eq!(engine.root_family("eu").unwrap().as_deref(), Some("Basque"));
    assert_eq!(engine.root_family("zh-TW").unwrap().as_deref(), Some("Sino-Tibetan"));
}

#[tokio::test]
async fn every_fixture_node_reaches_a_root() {
    let engine = loaded_engine().await;
    let taxonomy = engine.store().taxonomy().unwrap();
    let walker = AncestryWalker::new(taxonomy);

    for node in taxonomy.nodes() {
        let chain = walker.nodes(&node.id).unwrap();
        assert_eq!(chain.first().map(|n| n.id.as_str()), Some(node.id.as_str()));
        assert!(chain.last().unwrap().is_root(), "{} does not reach a root", node.id);
    }
}

#[tokio::test]
async fn missing_file_fails_load_permanently() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let engine = FamilyEngine::new();

    let sources: Vec<Box<dyn TaxonomySource>> = vec![
        Box::new(FileSource::new(fixture("languages.csv"))),
        Box::new(FileSource::new(dir.path().join("conlangs.csv"))),
    ];
    let err = engine.load(&sources).await.unwrap_err();

    assert!(matches!(err, LoadError::Io { .. }));
    assert_eq!(engine.status(), LoadStatus::Failed);
    assert!(!engine.is_ready());
    assert_eq!(engine.resolve_and_compare("en", "de"), Comparison::NotReady);
    assert!(matches!(
        engine.load(&helpers::fixture_sources()).await,
        Err(LoadError::AlreadyAttempted)
    ));
}

#[tokio::test]
async fn later_block_overrides_earlier() {
    init_tracing();
    let main = "ID,Name,ISO639P3code,Level,Parent_ID\n\
                germ1287,Germanic,,family,\n\
                stan1293,English,eng,language,germ1287\n";
    let patch = "ID,Name,ISO639P3code,Level,Parent_ID\n\
                 stan1293,Modern English,eng,language,germ1287\n";

    let engine = FamilyEngine::new();
    let report = engine.load(&inline_sources(&[main, patch])).await.unwrap();

    assert_eq!(report.blocks, 2);
    assert_eq!(report.duplicate_ids, 1);
    assert_eq!(engine.display_entry("eng").unwrap().name, "Modern English");
}

#[tokio::test]
async fn waiters_see_load_complete() {
    init_tracing();
    let engine = Arc::new(FamilyEngine::new());

    let waiter = {
        let engine = engine.clone();
        tokio::spawn(async move { engine.wait_settled().await })
    };

    engine.load(&helpers::fixture_sources()).await.unwrap();

    assert_eq!(waiter.await.unwrap(), LoadStatus::Ready);
    assert!(engine.resolve_and_compare("en", "de").is_ready());
}

#[tokio::test]
async fn concurrent_loads_admit_one() {
    init_tracing();
    let engine = Arc::new(FamilyEngine::new());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let engine = engine.clone();
            tokio::spawn(async move { engine.load(&helpers::fixture_sources()).await.is_ok() })
        })
        .collect();

    let mut succeeded = 0;
    for handle in handles {
        if handle.await.unwrap() {
            succeeded += 1;
        }
    }

    assert_eq!(succeeded, 1);
    assert_eq!(engine.status(), LoadStatus::Ready);
}

#[tokio::test]
async fn comparison_serializes_tagged() {
    let engine = loaded_engine().await;

    let json = serde_json::to_value(engine.resolve_and_compare("en", "de")).unwrap();
    assert_eq!(json["type"], "ready");
    assert_eq!(json["common_ancestor"], "Germanic");

    let json = serde_json::to_value(FamilyEngine::new().resolve_and_compare("en", "de")).unwrap();
    assert_eq!(json["type"], "not_ready");
}

struct StalledSource;

#[async_trait::async_trait]
impl TaxonomySource for StalledSource {
    fn describe(&self) -> String {
        "stalled".to_string()
    }

    async fn fetch(&self) -> Result<String, LoadError> {
        std::future::pending().await
    }
}

#[tokio::test]
async fn timed_out_load_settles_as_failed() {
    use std::time::Duration;

    init_tracing();
    let engine = FamilyEngine::new();
    let sources: Vec<Box<dyn TaxonomySource>> = vec![Box::new(StalledSource)];

    let attempt = tokio::time::timeout(Duration::from_millis(50), engine.load(&sources)).await;
    assert!(attempt.is_err());

    let settled = tokio::time::timeout(Duration::from_secs(1), engine.wait_settled()).await;
    assert_eq!(settled.ok(), Some(LoadStatus::Failed));
    assert!(!engine.is_ready());
    assert_eq!(engine.resolve_and_compare("en", "de"), Comparison::NotReady);
    assert!(matches!(
        engine.load(&helpers::fixture_sources()).await,
        Err(LoadError::AlreadyAttempted)
    ));
}
