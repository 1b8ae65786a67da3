//! Taxonomy store
//!
//! `Taxonomy` is the loaded, read-only node graph with its external-code
//! index. `TaxonomyStore` wraps it with the load lifecycle: it starts empty,
//! `load()` fills it exactly once, and a failed load leaves it permanently
//! not ready.
//!
//! ```text
//! Pending ──load()──► Loading ──ok──► Ready   (terminal)
//!                        │
//!                        └──err──► Failed     (terminal)
//! ```

use lineage_types::{LoadStatus, TaxonomyNode};
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;
use tokio::sync::watch;
use tracing::{error, info, instrument, warn};

use crate::error::{LoadError, LookupError, RecordError};
use crate::taxonomy::record::parse_block;
use crate::taxonomy::source::TaxonomySource;

/// Statistics of a completed load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Text blocks parsed
    pub blocks: usize,
    /// Nodes in the final graph
    pub nodes: usize,
    /// Rows skipped as malformed
    pub skipped: Vec<RecordError>,
    /// Rows whose id was already defined (the later row won)
    pub duplicate_ids: usize,
    /// External codes claimed by more than one node (the later node won)
    pub duplicate_codes: usize,
    /// Nodes whose parent id names no node
    pub dangling_parents: usize,
    pub roots: usize,
}

// ============================================================================
// TAXONOMY
// ============================================================================

/// Loaded node graph keyed by node id, plus external code → node id.
#[derive(Debug, Default)]
pub struct Taxonomy {
    nodes: HashMap<String, TaxonomyNode>,
    by_code: HashMap<String, String>,
}

impl Taxonomy {
    /// Build a taxonomy from raw text blocks.
    ///
    /// Blocks are concatenated in order; a later definition of the same id
    /// replaces the earlier one. Fails on an empty result or a parent cycle.
    pub fn from_blocks<S: AsRef<str>>(blocks: &[S]) -> Result<(Self, LoadReport), LoadError> {
        let mut report = LoadReport {
            blocks: blocks.len(),
            ..Default::default()
        };
        let mut records = Vec::new();

        for block in blocks {
            let parsed = parse_block(block.as_ref());
            for skipped in &parsed.skipped {
                warn!(reason = %skipped, "Skipping malformed taxonomy record");
            }
            report.skipped.extend(parsed.skipped);
            records.extend(parsed.nodes);
        }

        if records.is_empty() {
            return Err(LoadError::Empty);
        }

        let (taxonomy, duplicate_ids, duplicate_codes) = Self::build(records);
        report.duplicate_ids = duplicate_ids;
        report.duplicate_codes = duplicate_codes;

        if let Some(path) = taxonomy.find_cycle() {
            return Err(LoadError::Cycle { path });
        }

        report.nodes = taxonomy.nodes.len();
        report.roots = taxonomy.nodes.values().filter(|n| n.is_root()).count();
        report.dangling_parents = taxonomy
            .nodes
            .values()
            .filter(|n| matches!(&n.parent_id, Some(p) if !taxonomy.nodes.contains_key(p)))
            .count();
        if report.dangling_parents > 0 {
            warn!(
                count = report.dangling_parents,
                "Taxonomy nodes reference missing parents; their ancestry stops there"
            );
        }

        Ok((taxonomy, report))
    }

    /// Build directly from nodes, without cycle validation.
    pub(crate) fn from_nodes(nodes: impl IntoIterator<Item = TaxonomyNode>) -> Self {
        Self::build(nodes).0
    }

    /// Index records in order. A later record replaces an earlier one with
    /// the same id, and takes over an external code claimed before it.
    fn build(records: impl IntoIterator<Item = TaxonomyNode>) -> (Self, usize, usize) {
        let mut nodes: HashMap<String, TaxonomyNode> = HashMap::new();
        let mut by_code: HashMap<String, String> = HashMap::new();
        let mut duplicate_ids = 0;
        let mut duplicate_codes = 0;

        for node in records {
            if let Some(code) = &node.external_code {
                if let Some(previous) = by_code.insert(code.clone(), node.id.clone()) {
                    if previous != node.id {
                        warn!(code = %code, previous = %previous, id = %node.id, "External code claimed twice, keeping the later node");
                        duplicate_codes += 1;
                    }
                }
            }

            if let Some(previous) = nodes.insert(node.id.clone(), node) {
                warn!(id = %previous.id, "Duplicate taxonomy id, keeping the later record");
                duplicate_ids += 1;

                let current_code = nodes.get(&previous.id).and_then(|n| n.external_code.as_ref());
                if let Some(old_code) = previous.external_code.as_ref() {
                    if current_code != Some(old_code)
                        && by_code.get(old_code) == Some(&previous.id)
                    {
                        by_code.remove(old_code);
                    }
                }
            }
        }

        (Self { nodes, by_code }, duplicate_ids, duplicate_codes)
    }

    pub fn node_by_id(&self, id: &str) -> Option<&TaxonomyNode> {
        self.nodes.get(id)
    }

    pub fn node_by_external_code(&self, code: &str) -> Option<&TaxonomyNode> {
        self.by_code.get(code).and_then(|id| self.nodes.get(id))
    }

    /// Node id for an external code
    pub fn id_for_code(&self, code: &str) -> Option<&str> {
        self.by_code.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &TaxonomyNode> {
        self.nodes.values()
    }

    /// Find one parent cycle, returned as the id path that closes it.
    ///
    /// Every node is walked at most once: chains that already reached a root
    /// are remembered and stop later walks early.
    fn find_cycle(&self) -> Option<Vec<String>> {
        let mut terminates: HashSet<&str> = HashSet::new();

        let mut ids: Vec<&str> = self.nodes.keys().map(String::as_str).collect();
        ids.sort_unstable();

        for start in ids {
            let mut path: Vec<&str> = Vec::new();
            let mut on_path: HashSet<&str> = HashSet::new();
            let mut current = Some(start);

            while let Some(id) = current {
                if terminates.contains(id) {
                    break;
                }
                if !on_path.insert(id) {
                    path.push(id);
                    error!(path = ?path, "Parent cycle detected in taxonomy");
                    return Some(path.into_iter().map(str::to_string).collect());
                }
                path.push(id);
                current = self
                    .nodes
                    .get(id)
                    .and_then(|n| n.parent_id.as_deref())
                    .filter(|parent| self.nodes.contains_key(*parent));
            }

            terminates.extend(path);
        }

        None
    }
}

// ============================================================================
// STORE
// ============================================================================

/// Write-once holder of a `Taxonomy` with an observable load status.
#[derive(Debug)]
pub struct TaxonomyStore {
    taxonomy: OnceLock<Taxonomy>,
    status: watch::Sender<LoadStatus>,
}

impl Default for TaxonomyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaxonomyStore {
    /// Create an empty store. Nothing is loaded until `load()` is awaited.
    pub fn new() -> Self {
        let (status, _) = watch::channel(LoadStatus::Pending);
        Self {
            taxonomy: OnceLock::new(),
            status,
        }
    }

    /// Fetch every source in order and install the combined taxonomy.
    ///
    /// Only the first call on a store does anything; later calls return
    /// `LoadError::AlreadyAttempted`, whether the first succeeded or not.
    #[instrument(skip_all, fields(sources = sources.len()))]
    pub async fn load(
        &self,
        sources: &[Box<dyn TaxonomySource>],
    ) -> Result<LoadReport, LoadError> {
        self.begin()?;
        let _guard = LoadGuard {
            status: &self.status,
        };
        info!("Loading taxonomy");

        let mut blocks = Vec::with_capacity(sources.len());
        for source in sources {
            match source.fetch().await {
                Ok(text) => blocks.push(text),
                Err(e) => return Err(self.fail(e)),
            }
        }

        self.finish(&blocks)
    }

    /// Synchronous variant of `load()` for text that is already in memory.
    pub fn load_blocks<S: AsRef<str>>(&self, blocks: &[S]) -> Result<LoadReport, LoadError> {
        self.begin()?;
        let _guard = LoadGuard {
            status: &self.status,
        };
        self.finish(blocks)
    }

    fn begin(&self) -> Result<(), LoadError> {
        let started = self.status.send_if_modified(|status| {
            if *status == LoadStatus::Pending {
                *status = LoadStatus::Loading;
                true
            } else {
                false
            }
        });
        if started {
            Ok(())
        } else {
            Err(LoadError::AlreadyAttempted)
        }
    }

    fn finish<S: AsRef<str>>(&self, blocks: &[S]) -> Result<LoadReport, LoadError> {
        let (taxonomy, report) = Taxonomy::from_blocks(blocks).map_err(|e| self.fail(e))?;

        if self.taxonomy.set(taxonomy).is_err() {
            // begin() admits exactly one loader
            return Err(self.fail(LoadError::AlreadyAttempted));
        }
        self.status.send_replace(LoadStatus::Ready);

        info!(
            nodes = report.nodes,
            roots = report.roots,
            skipped = report.skipped.len(),
            duplicate_ids = report.duplicate_ids,
            "Taxonomy loaded"
        );
        Ok(report)
    }

    fn fail(&self, e: LoadError) -> LoadError {
        error!(error = %e, "Taxonomy load failed; store stays not ready");
        self.status.send_replace(LoadStatus::Failed);
        e
    }

    /// True once the status is `Ready`, which is published only after the
    /// taxonomy is installed.
    pub fn is_ready(&self) -> bool {
        self.status() == LoadStatus::Ready
    }

    pub fn status(&self) -> LoadStatus {
        *self.status.borrow()
    }

    /// Receiver that observes every status transition.
    pub fn subscribe(&self) -> watch::Receiver<LoadStatus> {
        self.status.subscribe()
    }

    /// Wait until the store is `Ready` or `Failed`.
    pub async fn wait_settled(&self) -> LoadStatus {
        let mut rx = self.status.subscribe();
        let settled = match rx.wait_for(LoadStatus::is_settled).await {
            Ok(status) => *status,
            Err(_) => self.status(),
        };
        settled
    }

    /// The loaded taxonomy, or `NotReady`.
    pub fn taxonomy(&self) -> Result<&Taxonomy, LookupError> {
        if !self.is_ready() {
            return Err(LookupError::NotReady);
        }
        self.taxonomy.get().ok_or(LookupError::NotReady)
    }

    pub fn node_by_id(&self, id: &str) -> Result<Option<&TaxonomyNode>, LookupError> {
        Ok(self.taxonomy()?.node_by_id(id))
    }

    pub fn node_by_external_code(&self, code: &str) -> Result<Option<&TaxonomyNode>, LookupError> {
        Ok(self.taxonomy()?.node_by_external_code(code))
    }
}

/// Marks an unfinished load as failed when it is dropped, so a cancelled
/// `load()` future cannot leave the store in `Loading`.
struct LoadGuard<'a> {
    status: &'a watch::Sender<LoadStatus>,
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        let abandoned = self.status.send_if_modified(|status| {
            if *status == LoadStatus::Loading {
                *status = LoadStatus::Failed;
                true
            } else {
                false
            }
        });
        if abandoned {
            warn!("Taxonomy load abandoned before completion; store stays not ready");
        }
    }
}
