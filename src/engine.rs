//! Query facade over a taxonomy store
//!
//! `FamilyEngine` is what a game layer holds: it owns the store, the
//! resolver and the walk bound, and turns every lookup into either a typed
//! result or a `LookupError`. Clones share the same store.

use lineage_types::{AncestryDiff, Comparison, DisplayEntry, LoadStatus};
use std::sync::Arc;
use tracing::instrument;

use crate::ancestry::{AncestryWalker, DEFAULT_MAX_DEPTH};
use crate::config::LineageConfig;
use crate::diff;
use crate::error::{ConfigError, LoadError, LookupError};
use crate::resolver::{IdentifierResolver, MacrolanguageFallbacks, ResolvedLanguage};
use crate::scorer::{into_comparison, DistanceScorer};
use crate::taxonomy::{LoadReport, TaxonomySource, TaxonomyStore};

#[derive(Debug, Clone)]
pub struct FamilyEngine {
    store: Arc<TaxonomyStore>,
    resolver: IdentifierResolver,
    max_depth: usize,
}

impl Default for FamilyEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FamilyEngine {
    /// Engine over an empty store with the built-in fallbacks.
    pub fn new() -> Self {
        Self::with_fallbacks(MacrolanguageFallbacks::default())
    }

    pub fn with_fallbacks(fallbacks: MacrolanguageFallbacks) -> Self {
        Self {
            store: Arc::new(TaxonomyStore::new()),
            resolver: IdentifierResolver::new(fallbacks),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Engine and its sources as described by a config. Nothing is fetched
    /// until `load()` is called with the returned sources.
    pub fn from_config(
        config: &LineageConfig,
    ) -> Result<(Self, Vec<Box<dyn TaxonomySource>>), ConfigError> {
        let sources = config.build_sources()?;
        let engine = Self::with_fallbacks(config.fallbacks()).with_max_depth(config.max_ancestry_depth);
        Ok((engine, sources))
    }

    pub fn store(&self) -> &Arc<TaxonomyStore> {
        &self.store
    }

    pub fn is_ready(&self) -> bool {
        self.store.is_ready()
    }

    pub fn status(&self) -> LoadStatus {
        self.store.status()
    }

    /// Wait for the load to succeed or fail.
    pub async fn wait_settled(&self) -> LoadStatus {
        self.store.wait_settled().await
    }

    pub async fn load(&self, sources: &[Box<dyn TaxonomySource>]) -> Result<LoadReport, LoadError> {
        self.store.load(sources).await
    }

    pub fn resolve(&self, tag: &str) -> Result<ResolvedLanguage, LookupError> {
        let taxonomy = self.store.taxonomy()?;
        self.resolver.resolve(taxonomy, tag)
    }

    /// Compare a guessed locale tag with the correct one.
    #[instrument(skip(self))]
    pub fn resolve_and_compare(&self, guess_tag: &str, correct_tag: &str) -> Comparison {
        match self.store.taxonomy() {
            Ok(taxonomy) => DistanceScorer::new(taxonomy, &self.resolver)
                .with_max_depth(self.max_depth)
                .compare_tags(guess_tag, correct_tag),
            Err(e) => into_comparison(Err(e)),
        }
    }

    pub fn ancestry_diff(&self, guess_chain: &[String], correct_chain: &[String]) -> AncestryDiff {
        diff::ancestry_diff(guess_chain, correct_chain)
    }

    /// Name and level for an external code, falling back to the
    /// macrolanguage table when the code itself is not in the taxonomy.
    pub fn display_entry(&self, code: &str) -> Result<DisplayEntry, LookupError> {
        let taxonomy = self.store.taxonomy()?;

        let node = taxonomy
            .node_by_external_code(code)
            .or_else(|| {
                self.resolver
                    .fallbacks()
                    .get(code)
                    .and_then(|fallback| taxonomy.node_by_external_code(fallback))
            })
            .ok_or_else(|| LookupError::Unresolvable(code.to_string()))?;

        Ok(DisplayEntry {
            code: code.to_string(),
            name: node.name.clone(),
            level: node.level,
        })
    }

    /// Name of the top-level family a locale tag belongs to.
    pub fn root_family(&self, tag: &str) -> Result<Option<String>, LookupError> {
        let taxonomy = self.store.taxonomy()?;
        let resolved = self.resolver.resolve(taxonomy, tag)?;
        let root = AncestryWalker::new(taxonomy)
            .with_max_depth(self.max_depth)
            .root(&resolved.node_id)?;
        Ok(root.map(|node| node.name.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineage_types::NodeLevel;

    const TEXT: &str = "ID,Name,ISO639P3code,Level,Parent_ID\n\
        indo1319,Indo-European,,family,\n\
        slav1255,Slavic,,family,indo1319\n\
        sout1528,Serbian-Croatian-Bosnian,hbs,language,slav1255\n\
        mand1415,Mandarin Chinese,cmn,language,sino1245\n\
        sino1245,Sino-Tibetan,,family,\n";

    fn loaded() -> FamilyEngine {
        let engine = FamilyEngine::new();
        engine.store().load_blocks(&[TEXT]).unwrap();
        engine
    }

    #[test]
    fn test_not_ready_everywhere() {
        let engine = FamilyEngine::new();
        assert!(!engine.is_ready());
        assert_eq!(engine.resolve_and_compare("en", "de"), Comparison::NotReady);
        assert_eq!(engine.resolve("en"), Err(LookupError::NotReady));
        assert_eq!(engine.display_entry("eng"), Err(LookupError::NotReady));
        assert_eq!(engine.root_family("en"), Err(LookupError::NotReady));
    }

    #[test]
    fn test_display_entry_direct_and_fallback() {
        let engine = loaded();

        let entry = engine.display_entry("hbs").unwrap();
        assert_eq!(entry.name, "Serbian-Croatian-Bosnian");
        assert_eq!(entry.level, NodeLevel::Language);

        let entry = engine.display_entry("zho").unwrap();
        assert_eq!(entry.code, "zho");
        assert_eq!(entry.name, "Mandarin Chinese");

        assert_eq!(
            engine.display_entry("eng"),
            Err(LookupError::Unresolvable("eng".to_string()))
        );
    }

    #[test]
    fn test_root_family() {
        let engine = loaded();
        assert_eq!(engine.root_family("sr-Latn").unwrap().as_deref(), Some("Indo-European"));
        assert_eq!(engine.root_family("zh-CN").unwrap().as_deref(), Some("Sino-Tibetan"));
        assert_eq!(
            engine.root_family("de"),
            Err(LookupError::Unresolvable("de".to_string()))
        );
    }

    #[test]
    fn test_clones_share_store() {
        let engine = FamilyEngine::new();
        let clone = engine.clone();
        engine.store().load_blocks(&[TEXT]).unwrap();
        assert!(clone.is_ready());
        assert_eq!(clone.resolve("hr").unwrap().node_id, "sout1528");
    }

    #[test]
    fn test_from_config() {
        let config = LineageConfig::from_yaml(
            "sources:\n  - kind: file\n    path: languages.csv\nmax_ancestry_depth: 2\nextra_fallbacks:\n  xyz: hbs\n",
        )
        .unwrap();
        let (engine, sources) = FamilyEngine::from_config(&config).unwrap();
        assert_eq!(sources.len(), 1);

        engine.store().load_blocks(&[TEXT]).unwrap();
        assert_eq!(engine.resolve("xyz").unwrap().node_id, "sout1528");
        // three-deep chain exceeds the configured bound
        assert_eq!(
            engine.resolve_and_compare("sr", "hr"),
            Comparison::CycleDetected {
                node_id: "sout1528".to_string()
            }
        );
    }
}
