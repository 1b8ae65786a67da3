//! Distance scoring
//!
//! Two languages are compared through their ancestry chains (leaf first).
//! The common ancestor is the first name of the correct chain that also
//! appears in the guess chain, and the score falls off with the number of
//! steps from each leaf up to that ancestor:
//!
//! ```text
//! max   = len(guess) + len(correct) - 2
//! total = guess_depth + correct_depth
//! score = round((max - total) / max * 100)
//! ```
//!
//! Identical tags score 100; different tags on the same node score 99.
//! Matching is by name, so two unrelated nodes that share a name will be
//! treated as related.

use lineage_types::{Comparison, FamilyComparisonResult};
use std::collections::HashSet;
use tracing::{debug, instrument, warn};

use crate::ancestry::{AncestryWalker, DEFAULT_MAX_DEPTH};
use crate::error::LookupError;
use crate::resolver::IdentifierResolver;
use crate::taxonomy::Taxonomy;

/// Score for identical input tags
pub const IDENTICAL_SCORE: u8 = 100;
/// Score for different tags resolving to the same node
pub const SAME_NODE_SCORE: u8 = 99;

/// Common ancestor and depth-based score of two leaf-first chains.
///
/// No shared name scores 0. When both chains are a single node the
/// normaliser is zero and the score is 100.
pub fn score_chains(guess: &[String], correct: &[String]) -> (Option<String>, u8) {
    let guess_names: HashSet<&str> = guess.iter().map(String::as_str).collect();

    let Some((correct_depth, ancestor)) = correct
        .iter()
        .enumerate()
        .find(|(_, name)| guess_names.contains(name.as_str()))
    else {
        return (None, 0);
    };

    let guess_depth = guess
        .iter()
        .position(|name| name == ancestor)
        .unwrap_or_default();

    let max = guess.len() + correct.len() - 2;
    let total = guess_depth + correct_depth;

    (Some(ancestor.clone()), normalised(max, total))
}

/// `round((max - total) / max * 100)`, half up, in integer arithmetic.
fn normalised(max: usize, total: usize) -> u8 {
    if max == 0 {
        return IDENTICAL_SCORE;
    }
    let remaining = max.saturating_sub(total);
    let score = (200 * remaining + max) / (2 * max);
    score.min(100) as u8
}

/// Compares languages within one loaded taxonomy.
#[derive(Debug, Clone, Copy)]
pub struct DistanceScorer<'a> {
    taxonomy: &'a Taxonomy,
    resolver: &'a IdentifierResolver,
    max_depth: usize,
}

impl<'a> DistanceScorer<'a> {
    pub fn new(taxonomy: &'a Taxonomy, resolver: &'a IdentifierResolver) -> Self {
        Self {
            taxonomy,
            resolver,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    fn walker(&self) -> AncestryWalker<'a> {
        AncestryWalker::new(self.taxonomy).with_max_depth(self.max_depth)
    }

    /// Resolve both tags and compare them.
    ///
    /// The guess tag is resolved first, so when both fail the guess is the
    /// one reported.
    #[instrument(level = "debug", skip(self))]
    pub fn compare_tags(&self, guess_tag: &str, correct_tag: &str) -> Comparison {
        let outcome = self
            .resolver
            .resolve(self.taxonomy, guess_tag)
            .and_then(|guess| {
                let correct = self.resolver.resolve(self.taxonomy, correct_tag)?;
                Ok((guess, correct))
            })
            .and_then(|(guess, correct)| {
                if guess_tag == correct_tag {
                    return Ok(self.identical(&guess.node_id));
                }
                self.compare_nodes(&guess.node_id, &correct.node_id)
            });

        into_comparison(outcome)
    }

    /// Identical tags score 100 without depending on the walk. A walk that
    /// fails leaves just the node's own name on both chains.
    fn identical(&self, node_id: &str) -> FamilyComparisonResult {
        let ancestry = self.walker().chain(node_id).unwrap_or_else(|e| {
            warn!(node_id, error = %e, "Ancestry walk failed for identical tags");
            self.taxonomy
                .node_by_id(node_id)
                .map(|node| vec![node.name.clone()])
                .unwrap_or_default()
        });

        FamilyComparisonResult {
            common_ancestor: ancestry.first().cloned(),
            distance_score: IDENTICAL_SCORE,
            guess_ancestry: ancestry.clone(),
            correct_ancestry: ancestry,
        }
    }

    /// Compare two node ids.
    ///
    /// The same id on both sides scores 99; the identical-tag rule only
    /// applies in `compare_tags`.
    pub fn compare_nodes(
        &self,
        guess_id: &str,
        correct_id: &str,
    ) -> Result<FamilyComparisonResult, LookupError> {
        let walker = self.walker();
        let guess_ancestry = walker.chain(guess_id)?;
        let correct_ancestry = walker.chain(correct_id)?;

        let (common_ancestor, mut distance_score) =
            score_chains(&guess_ancestry, &correct_ancestry);
        if guess_id == correct_id {
            distance_score = SAME_NODE_SCORE;
        }

        debug!(
            guess_id,
            correct_id,
            common_ancestor = ?common_ancestor,
            distance_score,
            "Compared ancestry chains"
        );

        Ok(FamilyComparisonResult {
            common_ancestor,
            distance_score,
            guess_ancestry,
            correct_ancestry,
        })
    }
}

/// Fold a lookup outcome into the tagged comparison result.
pub(crate) fn into_comparison(outcome: Result<FamilyComparisonResult, LookupError>) -> Comparison {
    match outcome {
        Ok(result) => Comparison::Ready(result),
        Err(LookupError::NotReady) => Comparison::NotReady,
        Err(LookupError::Unresolvable(tag)) => Comparison::Unresolvable { tag },
        Err(LookupError::CycleDetected { node_id, .. }) => Comparison::CycleDetected { node_id },
    }
}
