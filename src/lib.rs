//! Lineage - language-family resolution and distance scoring
//!
//! Loads a language-family taxonomy (Glottolog-style CSV), resolves locale
//! tags to taxonomy nodes and scores how closely two languages are related
//! by the ancestry they share.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         FamilyEngine                            │
//! │     resolve_and_compare / ancestry_diff / display_entry         │
//! └─────────────────────────────────────────────────────────────────┘
//!            │                    │                     │
//!            ▼                    ▼                     ▼
//! ┌────────────────────┐ ┌──────────────────┐ ┌───────────────────┐
//! │ IdentifierResolver │ │  DistanceScorer  │ │   ancestry_diff   │
//! │ tag → code → node  │ │ chains → score   │ │ chains → branches │
//! └────────────────────┘ └──────────────────┘ └───────────────────┘
//!            │                    │
//!            ▼                    ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │             TaxonomyStore (write-once, watch status)            │
//! └─────────────────────────────────────────────────────────────────┘
//!                                 ▲
//!                                 │ load()
//! ┌─────────────────────────────────────────────────────────────────┐
//! │          TaxonomySource: HttpSource / FileSource / Inline       │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use lineage::{FamilyEngine, LineageConfig};
//!
//! let config = LineageConfig::from_env()?;
//! let (engine, sources) = FamilyEngine::from_config(&config)?;
//! engine.load(&sources).await?;
//!
//! if let Some(result) = engine.resolve_and_compare("en-GB", "de").result() {
//!     let diff = engine.ancestry_diff(&result.guess_ancestry, &result.correct_ancestry);
//!     println!("{:?} {}", result.common_ancestor, result.distance_score);
//! }
//! ```

pub mod ancestry;
pub mod config;
pub mod diff;
pub mod engine;
pub mod error;
pub mod resolver;
pub mod scorer;
pub mod taxonomy;

pub use ancestry::{AncestryWalker, DEFAULT_MAX_DEPTH};
pub use config::{LineageConfig, SourceConfig};
pub use diff::{ancestry_diff, diff_result};
pub use engine::FamilyEngine;
pub use error::{ConfigError, LoadError, LookupError, RecordError};
pub use resolver::{IdentifierResolver, MacrolanguageFallbacks, ResolvedLanguage};
pub use scorer::{score_chains, DistanceScorer};
pub use taxonomy::{
    FileSource, HttpSource, InlineSource, LoadReport, Taxonomy, TaxonomySource, TaxonomyStore,
};

pub use lineage_types::{
    AncestryDiff, Comparison, DisplayEntry, FamilyComparisonResult, LoadStatus, NodeLevel,
    TaxonomyNode,
};
