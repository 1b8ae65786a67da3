//! Shared value types for lineage
//!
//! Everything a caller (typically a UI layer) receives from the scoring engine
//! is defined here, so the boundary stays in one place.
//!
//! ## Rules
//!
//! 1. Pure values - no I/O, no references into the taxonomy store
//! 2. Tagged enums only: `#[serde(tag = "type")]`
//! 3. Ancestry chains are node names, leaf first, unless a method says otherwise

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// TAXONOMY
// ============================================================================

/// Classification level of a taxonomy node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeLevel {
    /// Terminal language node
    Language,
    /// Variety below a language
    Dialect,
    /// Intermediate family / group node
    #[default]
    Family,
}

impl NodeLevel {
    /// Parse a level field from tabular data.
    ///
    /// Returns `None` for unrecognised values so the caller can decide how
    /// loudly to complain. Empty input is a family node.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "family" => Some(Self::Family),
            "language" => Some(Self::Language),
            "dialect" => Some(Self::Dialect),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Language => "language",
            Self::Dialect => "dialect",
            Self::Family => "family",
        }
    }

    /// Languages and dialects are leaves a player can guess.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Family)
    }
}

impl fmt::Display for NodeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the language-family taxonomy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyNode {
    /// Opaque, stable identifier (e.g. a Glottolog code like `stan1295`)
    pub id: String,
    /// Display name; ancestry comparison is done on this field
    pub name: String,
    /// ISO 639-3 code, absent for most family nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_code: Option<String>,
    #[serde(default)]
    pub level: NodeLevel,
    /// Absent only for roots
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl TaxonomyNode {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Human-readable entry for an external code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayEntry {
    /// Code the entry was requested with
    pub code: String,
    pub name: String,
    pub level: NodeLevel,
}

/// Lifecycle of a taxonomy store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    /// Created, `load()` not called yet
    #[default]
    Pending,
    /// `load()` in progress
    Loading,
    /// Loaded; terminal
    Ready,
    /// Load failed; terminal, the store never becomes ready
    Failed,
}

impl LoadStatus {
    /// `Ready` and `Failed` never change again.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Ready | Self::Failed)
    }
}

// ============================================================================
// COMPARISON
// ============================================================================

/// Outcome of comparing a guessed language with the correct one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyComparisonResult {
    /// Nearest shared ancestor name, `None` when the languages are unrelated
    pub common_ancestor: Option<String>,
    /// 0-100, where 100 = same language, 0 = totally unrelated
    pub distance_score: u8,
    /// Guess ancestry, leaf first
    pub guess_ancestry: Vec<String>,
    /// Correct ancestry, leaf first
    pub correct_ancestry: Vec<String>,
}

/// Tagged comparison outcome.
///
/// `NotReady` and `Unresolvable` are separate variants so that a caller can
/// never mistake "could not compare" for a genuine zero-relation score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Comparison {
    Ready(FamilyComparisonResult),
    /// Taxonomy not loaded (yet, or ever)
    NotReady,
    /// An input tag did not map to any taxonomy node
    Unresolvable { tag: String },
    /// Ancestry walk hit a parent cycle or the depth bound
    CycleDetected { node_id: String },
}

impl Comparison {
    pub fn result(&self) -> Option<&FamilyComparisonResult> {
        match self {
            Self::Ready(result) => Some(result),
            _ => None,
        }
    }

    pub fn into_result(self) -> Option<FamilyComparisonResult> {
        match self {
            Self::Ready(result) => Some(result),
            _ => None,
        }
    }

    /// Score of a ready comparison
    pub fn score(&self) -> Option<u8> {
        self.result().map(|r| r.distance_score)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

// ============================================================================
// ANCESTRY DIFF
// ============================================================================

/// Two ancestry chains split at the point where they diverge.
///
/// All three lists read root to leaf.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AncestryDiff {
    /// Root down to the common ancestor
    pub shared_prefix: Vec<String>,
    /// Below the common ancestor down to the guessed language
    pub guess_branch: Vec<String>,
    /// Below the common ancestor down to the correct language
    pub correct_branch: Vec<String>,
}

impl AncestryDiff {
    /// Rows needed to draw both branches side by side (no padding applied).
    pub fn branch_steps(&self) -> usize {
        self.guess_branch.len().max(self.correct_branch.len())
    }

    /// Deepest shared name
    pub fn common_ancestor(&self) -> Option<&str> {
        self.shared_prefix.last().map(String::as_str)
    }

    /// Same lineage, different leaf: nothing diverges but the score says the
    /// languages are not identical.
    pub fn is_siblings(&self, distance_score: u8) -> bool {
        self.guess_branch.is_empty() && self.correct_branch.is_empty() && distance_score < 100
    }

    /// Top-level family of the correct language
    pub fn correct_root(&self) -> Option<&str> {
        self.shared_prefix
            .first()
            .or_else(|| self.correct_branch.first())
            .map(String::as_str)
    }

    /// Full guess chain, root first
    pub fn guess_root_first(&self) -> Vec<String> {
        self.shared_prefix
            .iter()
            .chain(&self.guess_branch)
            .cloned()
            .collect()
    }

    /// Full correct chain, root first
    pub fn correct_root_first(&self) -> Vec<String> {
        self.shared_prefix
            .iter()
            .chain(&self.correct_branch)
            .cloned()
            .collect()
    }
}
