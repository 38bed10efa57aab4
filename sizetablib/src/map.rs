//! Label hierarchies consumed by the renderer.
//!
//! A hierarchy is built once from an ordered leaf sequence and read-only
//! thereafter. Ancestor nodes at every depth are aggregated at construction
//! time, along with a per-depth name index, so the renderer resolves a
//! parent name to its own size in constant time.

use std::collections::{HashMap, HashSet};

use crate::error::SizetabError;
use crate::label::{DiffStatus, Label};
use crate::Result;

/// An aggregated ancestor node at one hierarchy depth.
///
/// Its size is the sum of all leaf sizes beneath its path. Its status is
/// `Added`/`Removed` only when every leaf beneath shares that status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthNode {
    /// Ancestor name at this depth
    pub name: String,
    /// Aggregated size of the subtree
    pub size: i64,
    /// Aggregated diff status of the subtree
    pub status: DiffStatus,
}

/// A plain, pre-built label hierarchy.
///
/// Invariants enforced at construction: every label's parents tuple spans
/// the full hierarchy depth, and labels sharing a parent path are
/// contiguous in the leaf sequence.
#[derive(Debug)]
pub struct DataSourceMap {
    ds_names: Vec<String>,
    labels: Vec<Label>,
    /// Per ancestor depth: aggregated nodes in first-appearance order
    depth_nodes: Vec<Vec<DepthNode>>,
    /// Per ancestor depth: name to index of the first node bearing it
    depth_index: Vec<HashMap<String, usize>>,
}

impl DataSourceMap {
    /// Build a hierarchy from data-source names and ordered leaf labels.
    ///
    /// Fails fast on a malformed hierarchy rather than rendering
    /// misaligned rows.
    pub fn from_labels(ds_names: Vec<String>, labels: Vec<Label>) -> Result<Self> {
        let depth = ds_names.len();
        for label in &labels {
            if label.parents.len() + 1 != depth {
                return Err(SizetabError::ParentsDepthMismatch {
                    label: label.name.clone(),
                    expected: depth.saturating_sub(1),
                    found: label.parents.len(),
                });
            }
        }
        validate_contiguous(&labels, depth.saturating_sub(1))?;

        let (depth_nodes, depth_index) = aggregate(&labels, depth.saturating_sub(1));
        Ok(Self {
            ds_names,
            labels,
            depth_nodes,
            depth_index,
        })
    }

    /// Data-source names, one per hierarchy depth. These become the
    /// rendered column headers.
    pub fn ds_names(&self) -> &[String] {
        &self.ds_names
    }

    /// The ordered leaf sequence.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Resolve an ancestor name at a depth to its aggregated node.
    ///
    /// When distinct paths place the same name at one depth, the first
    /// node in leaf order wins.
    pub fn node_at(&self, depth: usize, name: &str) -> Option<&DepthNode> {
        let index = self.depth_index.get(depth)?;
        let &i = index.get(name)?;
        self.depth_nodes[depth].get(i)
    }
}

/// Reject a parent path that reappears after a different path intervened.
fn validate_contiguous(labels: &[Label], ancestor_depths: usize) -> Result<()> {
    let mut last_prefix: Vec<Option<&[String]>> = vec![None; ancestor_depths];
    let mut seen: Vec<HashSet<&[String]>> = vec![HashSet::new(); ancestor_depths];
    for label in labels {
        for d in 0..label.parents.len() {
            let prefix = &label.parents[..=d];
            if last_prefix[d] == Some(prefix) {
                continue;
            }
            if !seen[d].insert(prefix) {
                return Err(SizetabError::NonContiguousHierarchy {
                    path: label.parents[..=d].join("/"),
                    label: label.name.clone(),
                });
            }
            last_prefix[d] = Some(prefix);
        }
    }
    Ok(())
}

/// Aggregate ancestor nodes per depth, keyed by full prefix path, and
/// index them by name (first occurrence wins).
fn aggregate(
    labels: &[Label],
    ancestor_depths: usize,
) -> (Vec<Vec<DepthNode>>, Vec<HashMap<String, usize>>) {
    let mut depth_nodes: Vec<Vec<DepthNode>> = vec![Vec::new(); ancestor_depths];
    let mut node_by_path: Vec<HashMap<Vec<String>, usize>> = vec![HashMap::new(); ancestor_depths];

    for label in labels {
        for d in 0..label.parents.len() {
            let prefix = label.parents[..=d].to_vec();
            let idx = match node_by_path[d].get(&prefix).copied() {
                Some(idx) => idx,
                None => {
                    depth_nodes[d].push(DepthNode {
                        name: label.parents[d].clone(),
                        size: 0,
                        status: label.status,
                    });
                    node_by_path[d].insert(prefix, depth_nodes[d].len() - 1);
                    depth_nodes[d].len() - 1
                }
            };
            let node = &mut depth_nodes[d][idx];
            node.size += label.size;
            if node.status != label.status {
                node.status = DiffStatus::Unchanged;
            }
        }
    }

    let mut depth_index: Vec<HashMap<String, usize>> = Vec::with_capacity(ancestor_depths);
    for nodes in &depth_nodes {
        let mut index = HashMap::new();
        for (i, node) in nodes.iter().enumerate() {
            index.entry(node.name.clone()).or_insert(i);
        }
        depth_index.push(index);
    }

    (depth_nodes, depth_index)
}

/// A diff hierarchy: labels carry statuses and delta sizes, and the map
/// answers whether an ancestor still has any differing descendant.
#[derive(Debug)]
pub struct DiffDataSourceMap {
    map: DataSourceMap,
    /// Ancestor names with at least one differing leaf beneath
    changed_parents: HashSet<String>,
}

impl DiffDataSourceMap {
    /// Build a diff hierarchy from already-reconciled labels.
    pub fn from_labels(ds_names: Vec<String>, labels: Vec<Label>) -> Result<Self> {
        let map = DataSourceMap::from_labels(ds_names, labels)?;
        let mut changed_parents = HashSet::new();
        for label in map.labels() {
            if label.status != DiffStatus::Unchanged || label.size != 0 {
                for parent in &label.parents {
                    changed_parents.insert(parent.clone());
                }
            }
        }
        Ok(Self {
            map,
            changed_parents,
        })
    }

    /// Does this ancestor have any added, removed, or resized descendant?
    pub fn has_diff_sublabels(&self, name: &str) -> bool {
        self.changed_parents.contains(name)
    }

    /// The wrapped plain hierarchy.
    pub fn as_map(&self) -> &DataSourceMap {
        &self.map
    }
}

/// The renderer's input: a plain hierarchy or a diff hierarchy.
#[derive(Debug)]
pub enum SourceMap {
    /// Single-report hierarchy
    Plain(DataSourceMap),
    /// Reconciled old/new hierarchy with diff annotations
    Diff(DiffDataSourceMap),
}

impl SourceMap {
    /// Whether the table should render in diff mode.
    pub fn is_diff(&self) -> bool {
        matches!(self, SourceMap::Diff(_))
    }

    /// Data-source names, one per hierarchy depth.
    pub fn ds_names(&self) -> &[String] {
        self.map().ds_names()
    }

    /// The ordered leaf sequence.
    pub fn labels(&self) -> &[Label] {
        self.map().labels()
    }

    /// Resolve an ancestor name at a depth to its aggregated node.
    pub fn node_at(&self, depth: usize, name: &str) -> Option<&DepthNode> {
        self.map().node_at(depth, name)
    }

    /// Diff query; always false for a plain hierarchy.
    pub fn has_diff_sublabels(&self, name: &str) -> bool {
        match self {
            SourceMap::Plain(_) => false,
            SourceMap::Diff(diff) => diff.has_diff_sublabels(name),
        }
    }

    fn map(&self) -> &DataSourceMap {
        match self {
            SourceMap::Plain(map) => map,
            SourceMap::Diff(diff) => diff.as_map(),
        }
    }
}

impl From<DataSourceMap> for SourceMap {
    fn from(map: DataSourceMap) -> Self {
        SourceMap::Plain(map)
    }
}

impl From<DiffDataSourceMap> for SourceMap {
    fn from(map: DiffDataSourceMap) -> Self {
        SourceMap::Diff(map)
    }
}
