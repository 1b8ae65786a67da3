//! Ancestry walking
//!
//! Follows parent links from a node to its root. Chains are leaf first: the
//! start node's name comes first, the root's name last.

use lineage_types::TaxonomyNode;
use std::collections::HashSet;

use crate::error::LookupError;
use crate::taxonomy::Taxonomy;

/// Walks longer than this are treated as cycles.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Bounded parent-link walker over a loaded taxonomy.
#[derive(Debug, Clone, Copy)]
pub struct AncestryWalker<'a> {
    taxonomy: &'a Taxonomy,
    max_depth: usize,
}

impl<'a> AncestryWalker<'a> {
    pub fn new(taxonomy: &'a Taxonomy) -> Self {
        Self {
            taxonomy,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Nodes from `node_id` up to its root.
    ///
    /// An unknown start id gives an empty chain. A parent id that names no
    /// node ends the chain there.
    pub fn nodes(&self, node_id: &str) -> Result<Vec<&'a TaxonomyNode>, LookupError> {
        let mut chain: Vec<&'a TaxonomyNode> = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut current = self.taxonomy.node_by_id(node_id);

        while let Some(node) = current {
            if !visited.insert(node.id.as_str()) || chain.len() >= self.max_depth {
                let mut path: Vec<String> = chain.iter().map(|n| n.id.clone()).collect();
                path.push(node.id.clone());
                return Err(LookupError::CycleDetected {
                    node_id: node_id.to_string(),
                    path,
                });
            }
            chain.push(node);
            current = node
                .parent_id
                .as_deref()
                .and_then(|parent| self.taxonomy.node_by_id(parent));
        }

        Ok(chain)
    }

    /// Names from `node_id` up to its root, leaf first.
    pub fn chain(&self, node_id: &str) -> Result<Vec<String>, LookupError> {
        Ok(self
            .nodes(node_id)?
            .into_iter()
            .map(|node| node.name.clone())
            .collect())
    }

    /// Topmost ancestor of `node_id`, the node itself when it is a root.
    pub fn root(&self, node_id: &str) -> Result<Option<&'a TaxonomyNode>, LookupError> {
        Ok(self.nodes(node_id)?.last().copied())
    }
}
