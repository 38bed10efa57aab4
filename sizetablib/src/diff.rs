//! Reconciliation of two plain hierarchies into a diff hierarchy.
//!
//! Both sides are walked as ordered trees and merged branch by branch:
//! the new report's ordering dominates, and branches that only exist in
//! the base report are appended after their surviving siblings. The
//! merged sequence therefore keeps parent paths contiguous, which the
//! renderer relies on for collapsing and divider placement.

use std::collections::{HashMap, HashSet};

use crate::error::SizetabError;
use crate::label::{DiffStatus, Label};
use crate::map::{DataSourceMap, DiffDataSourceMap};
use crate::Result;

/// Reconcile a base (`old`) and a current (`new`) report into one diff
/// hierarchy.
///
/// A leaf present on both sides becomes an `Unchanged` label carrying the
/// signed size delta; a leaf only in `new` is `Added` with its full size;
/// a leaf only in `old` is `Removed` with its size negated.
pub fn diff_maps(old: &DataSourceMap, new: &DataSourceMap) -> Result<DiffDataSourceMap> {
    if old.ds_names() != new.ds_names() {
        return Err(SizetabError::DataSourceMismatch {
            left: old.ds_names().join(", "),
            right: new.ds_names().join(", "),
        });
    }

    let ancestor_depths = new.ds_names().len().saturating_sub(1);
    let old_refs: Vec<&Label> = old.labels().iter().collect();
    let new_refs: Vec<&Label> = new.labels().iter().collect();

    let mut merged = Vec::new();
    merge_level(&old_refs, &new_refs, 0, ancestor_depths, &mut merged);

    DiffDataSourceMap::from_labels(new.ds_names().to_vec(), merged)
}

/// Merge one tree level: recurse through shared and new-only branches in
/// the new report's order, then through old-only branches in the base
/// report's order.
fn merge_level(
    old: &[&Label],
    new: &[&Label],
    depth: usize,
    ancestor_depths: usize,
    merged: &mut Vec<Label>,
) {
    if depth == ancestor_depths {
        merge_leaves(old, new, merged);
        return;
    }

    let new_groups = group_by(new, depth);
    let old_groups = group_by(old, depth);
    let old_lookup: HashMap<&str, &Vec<&Label>> =
        old_groups.iter().map(|(name, group)| (*name, group)).collect();
    let new_names: HashSet<&str> = new_groups.iter().map(|(name, _)| *name).collect();
    let empty = Vec::new();

    for (name, group) in &new_groups {
        let old_sub = old_lookup.get(name).copied().unwrap_or(&empty);
        merge_level(old_sub, group, depth + 1, ancestor_depths, merged);
    }
    for (name, group) in &old_groups {
        if new_names.contains(name) {
            continue;
        }
        merge_level(group, &empty, depth + 1, ancestor_depths, merged);
    }
}

/// Reconcile the leaves of one fully-shared parent path.
fn merge_leaves(old: &[&Label], new: &[&Label], merged: &mut Vec<Label>) {
    let mut old_by_name: HashMap<&str, &Label> =
        old.iter().map(|label| (label.name.as_str(), *label)).collect();

    for &label in new {
        match old_by_name.remove(label.name.as_str()) {
            Some(old_label) => merged.push(Label {
                name: label.name.clone(),
                size: label.size - old_label.size,
                parents: label.parents.clone(),
                status: DiffStatus::Unchanged,
            }),
            None => merged.push(Label {
                name: label.name.clone(),
                size: label.size,
                parents: label.parents.clone(),
                status: DiffStatus::Added,
            }),
        }
    }
    for &label in old {
        if old_by_name.contains_key(label.name.as_str()) {
            merged.push(Label {
                name: label.name.clone(),
                size: -label.size,
                parents: label.parents.clone(),
                status: DiffStatus::Removed,
            });
        }
    }
}

/// Group labels by their ancestor name at one depth, preserving
/// first-appearance order.
fn group_by<'a>(labels: &[&'a Label], depth: usize) -> Vec<(&'a str, Vec<&'a Label>)> {
    let mut groups: Vec<(&str, Vec<&Label>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for &label in labels {
        let name = label.parents[depth].as_str();
        let idx = match index.get(name).copied() {
            Some(idx) => idx,
            None => {
                groups.push((name, Vec::new()));
                index.insert(name, groups.len() - 1);
                groups.len() - 1
            }
        };
        groups[idx].1.push(label);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(labels: Vec<Label>) -> DataSourceMap {
        DataSourceMap::from_labels(vec!["segments".into(), "symbols".into()], labels).unwrap()
    }

    #[test]
    fn test_matched_leaf_becomes_signed_delta() {
        let old = map(vec![Label::new("foo", 100, ["main"])]);
        let new = map(vec![Label::new("foo", 150, ["main"])]);
        let diff = diff_maps(&old, &new).unwrap();

        let labels = diff.as_map().labels();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].size, 50);
        assert_eq!(labels[0].status, DiffStatus::Unchanged);
    }

    #[test]
    fn test_added_and_removed_leaves() {
        let old = map(vec![
            Label::new("foo", 100, ["main"]),
            Label::new("gone", 20, ["main"]),
        ]);
        let new = map(vec![
            Label::new("foo", 100, ["main"]),
            Label::new("fresh", 30, ["main"]),
        ]);
        let diff = diff_maps(&old, &new).unwrap();

        let labels = diff.as_map().labels();
        assert_eq!(labels.len(), 3);
        assert_eq!(labels[0].name, "foo");
        assert_eq!(labels[0].size, 0);
        assert_eq!(labels[1].name, "fresh");
        assert_eq!(labels[1].status, DiffStatus::Added);
        assert_eq!(labels[1].size, 30);
        assert_eq!(labels[2].name, "gone");
        assert_eq!(labels[2].status, DiffStatus::Removed);
        assert_eq!(labels[2].size, -20);
    }

    #[test]
    fn test_removed_branch_stays_contiguous() {
        // base has a branch under "main" that vanished entirely; it must
        // land after main's surviving leaves, not after unrelated groups
        let old = map(vec![
            Label::new("keep", 10, ["main"]),
            Label::new("drop", 5, ["legacy"]),
        ]);
        let new = map(vec![
            Label::new("keep", 10, ["main"]),
            Label::new("baz", 7, ["lib"]),
        ]);
        let diff = diff_maps(&old, &new).unwrap();

        let names: Vec<&str> = diff
            .as_map()
            .labels()
            .iter()
            .map(|label| label.name.as_str())
            .collect();
        assert_eq!(names, vec!["keep", "baz", "drop"]);
        assert!(diff.has_diff_sublabels("legacy"));
        assert!(!diff.has_diff_sublabels("main"));
    }

    #[test]
    fn test_deep_removed_branch_keeps_prefix_contiguous() {
        let deep = |name: &str, size: i64, parents: [&str; 2]| Label::new(name, size, parents);
        let mk = |labels: Vec<Label>| {
            DataSourceMap::from_labels(
                vec!["a".into(), "b".into(), "c".into()],
                labels,
            )
            .unwrap()
        };
        let old = mk(vec![
            deep("x", 1, ["top", "left"]),
            deep("y", 2, ["top", "right"]),
        ]);
        let new = mk(vec![deep("x", 1, ["top", "left"])]);

        // the removed "top/right" branch must follow "top/left" so the
        // "top" prefix stays contiguous; a naive append-at-end would fail
        // hierarchy validation here if another top-level group followed
        let diff = diff_maps(&old, &new).unwrap();
        let labels = diff.as_map().labels();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[1].name, "y");
        assert_eq!(labels[1].status, DiffStatus::Removed);
        assert_eq!(labels[1].parents, vec!["top".to_string(), "right".to_string()]);
    }

    #[test]
    fn test_data_source_mismatch() {
        let old = map(vec![]);
        let new = DataSourceMap::from_labels(vec!["memories".into(), "sections".into()], vec![])
            .unwrap();
        let err = diff_maps(&old, &new).unwrap_err();
        assert!(matches!(err, SizetabError::DataSourceMismatch { .. }));
    }
}
