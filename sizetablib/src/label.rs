//! Leaf labels of a size-report hierarchy.

use serde::{Deserialize, Serialize};

/// Diff status of a label relative to the base report.
///
/// Plain (non-diff) reports leave every label `Unchanged`. In a diff,
/// a label that exists on both sides stays `Unchanged` even when its
/// size moved; the signed delta carries the change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiffStatus {
    /// Present on both sides (size may still differ)
    #[default]
    Unchanged,
    /// Only present in the new report
    Added,
    /// Only present in the base report
    Removed,
}

impl DiffStatus {
    /// Marker rendered in the table's diff column.
    pub fn marker(&self) -> &'static str {
        match self {
            DiffStatus::Unchanged => "",
            DiffStatus::Added => "++",
            DiffStatus::Removed => "--",
        }
    }
}

/// One leaf entry in a size report.
///
/// `parents` holds the ancestor names root-first; its length plus one must
/// equal the number of data sources in the hierarchy it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Name, unique within its parent path
    pub name: String,
    /// Size in bytes; a signed delta in diff mode
    pub size: i64,
    /// Ancestor names, root first
    pub parents: Vec<String>,
    /// Diff status; `Unchanged` outside diff mode
    #[serde(default)]
    pub status: DiffStatus,
}

impl Label {
    /// Create an unchanged label.
    pub fn new(
        name: impl Into<String>,
        size: i64,
        parents: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            size,
            parents: parents.into_iter().map(Into::into).collect(),
            status: DiffStatus::Unchanged,
        }
    }

    /// Builder: set the diff status.
    pub fn with_status(mut self, status: DiffStatus) -> Self {
        self.status = status;
        self
    }
}
