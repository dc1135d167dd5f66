//! Tree codec: lossless conversion between a flat list of path/value
//! entries and a nested keyed document.
//!
//! The document shape is an explicit sum type, [`TreeNode`]; deciding what
//! counts as a leaf happens once, when external input is classified (see
//! [`crate::document`]), never by runtime shape inspection here.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Errors from rebuilding a tree out of flat entries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Two entries resolved to the same tree position. The entry list
    /// itself is inconsistent, so the whole conversion is rejected.
    #[error("{path} already exists: '{existing}', won't set to '{incoming}'")]
    PathCollision {
        /// Dotted path of the occupied position.
        path: String,
        /// Rendering of the value already present there.
        existing: String,
        /// Rendering of the value that could not be placed.
        incoming: String,
    },
    /// A path contained an empty segment (leading, trailing or doubled
    /// dot). Key validation rejects these before entries are built; the
    /// codec still refuses them since it is a public API.
    #[error("empty path segment in '{path}'")]
    EmptySegment {
        /// Dotted path of the offending entry.
        path: String,
    },
}

/// A nested keyed document carrying values of type `L` at its leaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TreeNode<L> {
    /// A terminal value.
    Leaf(L),
    /// An intermediate level keyed by path segment. `BTreeMap` keeps
    /// traversal (and therefore rendered documents) sorted by key.
    Branch(BTreeMap<String, TreeNode<L>>),
}

impl<L> TreeNode<L> {
    /// An empty branch node.
    #[must_use]
    pub const fn branch() -> Self {
        Self::Branch(BTreeMap::new())
    }
}

impl<L> Default for TreeNode<L> {
    fn default() -> Self {
        Self::branch()
    }
}

/// One flattened leaf: the path segments from the root plus the leaf value.
///
/// A leaf sitting at the tree root has an empty path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatEntry<L> {
    /// Path segments from the root down to the leaf.
    pub path: Vec<String>,
    /// The leaf value.
    pub value: L,
}

/// Convert a tree into the list of its leaves, one entry per leaf.
///
/// Entries come out in sorted path order (a property of
/// [`TreeNode::Branch`]'s map); callers are expected to consume the list
/// once.
#[must_use]
pub fn flatten<L>(tree: TreeNode<L>) -> Vec<FlatEntry<L>> {
    let mut entries = Vec::new();
    let mut path = Vec::new();
    flatten_into(tree, &mut path, &mut entries);
    entries
}

/// Recursive helper for [`flatten`]: descends with the accumulated path.
fn flatten_into<L>(node: TreeNode<L>, path: &mut Vec<String>, out: &mut Vec<FlatEntry<L>>) {
    match node {
        TreeNode::Leaf(value) => out.push(FlatEntry { path: path.clone(), value }),
        TreeNode::Branch(children) => {
            for (segment, child) in children {
                path.push(segment);
                flatten_into(child, path, out);
                path.pop();
            }
        }
    }
}

/// Convert a list of entries back into a tree.
///
/// Fails fast with [`TreeError::PathCollision`] if any entry lands on an
/// already-occupied position — whether that position holds a leaf or a
/// partial subtree (e.g. both `a.b` and `a.b.c` supplied, or the same path
/// twice). Nothing is returned in that case; collisions mean the entry list
/// is inconsistent.
pub fn unflatten<L: fmt::Debug>(
    entries: impl IntoIterator<Item = FlatEntry<L>>,
) -> Result<TreeNode<L>, TreeError> {
    let mut root = TreeNode::branch();
    for entry in entries {
        insert_entry(&mut root, entry)?;
    }
    Ok(root)
}

/// Place one entry into the tree under construction.
fn insert_entry<L: fmt::Debug>(root: &mut TreeNode<L>, entry: FlatEntry<L>) -> Result<(), TreeError> {
    let FlatEntry { path, value } = entry;
    if path.iter().any(String::is_empty) {
        return Err(TreeError::EmptySegment { path: path.join(".") });
    }

    let Some((last, but_last)) = path.split_last() else {
        // A root-level leaf is only consistent with an otherwise empty
        // entry list.
        return match root {
            TreeNode::Branch(children) if children.is_empty() => {
                *root = TreeNode::Leaf(value);
                Ok(())
            }
            existing => Err(collision("", render_node(existing), &value)),
        };
    };

    let mut walked: Vec<&str> = Vec::new();
    let mut node = &mut *root;
    for segment in but_last {
        let children = match node {
            TreeNode::Branch(children) => children,
            TreeNode::Leaf(existing) => {
                return Err(collision(&walked.join("."), format!("{existing:?}"), &value));
            }
        };
        node = children.entry(segment.clone()).or_insert_with(TreeNode::branch);
        walked.push(segment.as_str());
    }

    let children = match node {
        TreeNode::Branch(children) => children,
        TreeNode::Leaf(existing) => {
            return Err(collision(&walked.join("."), format!("{existing:?}"), &value));
        }
    };
    match children.entry(last.clone()) {
        Entry::Occupied(occupied) => {
            Err(collision(&path.join("."), render_node(occupied.get()), &value))
        }
        Entry::Vacant(vacant) => {
            vacant.insert(TreeNode::Leaf(value));
            Ok(())
        }
    }
}

/// Render a node for a collision message: the value for leaves, a marker
/// for subtrees.
fn render_node<L: fmt::Debug>(node: &TreeNode<L>) -> String {
    match node {
        TreeNode::Leaf(value) => format!("{value:?}"),
        TreeNode::Branch(_) => "<subtree>".to_string(),
    }
}

/// Build the collision error for an occupied position.
fn collision<L: fmt::Debug>(path: &str, existing: String, incoming: &L) -> TreeError {
    TreeError::PathCollision {
        path: path.to_string(),
        existing,
        incoming: format!("{incoming:?}"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    fn entry(path: &str, value: &str) -> FlatEntry<String> {
        let path = if path.is_empty() {
            Vec::new()
        } else {
            path.split('.').map(str::to_string).collect()
        };
        FlatEntry { path, value: value.to_string() }
    }

    #[googletest::test]
    fn test_unflatten_builds_nested_tree() {
        let tree =
            unflatten(vec![entry("abc.xyz", "node"), entry("abc.other", "second")]).unwrap();

        let rendered = serde_json::to_value(&tree).unwrap();
        expect_that!(
            rendered,
            eq(&serde_json::json!({"abc": {"xyz": "node", "other": "second"}}))
        );
    }

    #[googletest::test]
    fn test_round_trip_preserves_tree() {
        let entries = vec![
            entry("account.messages.added", "a"),
            entry("account.messages.updated", "b"),
            entry("app.name", "c"),
            entry("alt", "d"),
        ];
        let tree = unflatten(entries).unwrap();
        let regenerated = unflatten(flatten(tree.clone())).unwrap();
        assert_that!(regenerated, eq(&tree));
    }

    #[googletest::test]
    fn test_empty_entry_list_yields_empty_tree() {
        let tree = unflatten(Vec::<FlatEntry<String>>::new()).unwrap();
        assert_that!(tree, eq(&TreeNode::branch()));
    }

    #[googletest::test]
    fn test_single_segment_paths_yield_flat_tree() {
        let tree = unflatten(vec![entry("one", "1"), entry("two", "2")]).unwrap();
        let rendered = serde_json::to_value(&tree).unwrap();
        expect_that!(rendered, eq(&serde_json::json!({"one": "1", "two": "2"})));
    }

    #[googletest::test]
    fn test_prefix_collision_is_rejected() {
        let result = unflatten(vec![entry("a.b", "leaf"), entry("a.b.c", "deeper")]);
        assert_that!(result, err(pat!(TreeError::PathCollision { path: eq("a.b"), .. })));
    }

    #[googletest::test]
    fn test_reverse_prefix_collision_is_rejected() {
        let result = unflatten(vec![entry("a.b.c", "deeper"), entry("a.b", "leaf")]);
        assert_that!(result, err(pat!(TreeError::PathCollision { path: eq("a.b"), .. })));
    }

    #[googletest::test]
    fn test_duplicate_path_is_rejected() {
        let result = unflatten(vec![entry("a.b", "first"), entry("a.b", "second")]);
        assert_that!(
            result,
            err(pat!(TreeError::PathCollision {
                path: eq("a.b"),
                existing: eq("\"first\""),
                incoming: eq("\"second\"")
            }))
        );
    }

    #[googletest::test]
    fn test_empty_segment_is_rejected() {
        let result = unflatten(vec![FlatEntry {
            path: vec!["a".to_string(), String::new()],
            value: "x".to_string(),
        }]);
        assert_that!(result, err(pat!(TreeError::EmptySegment { .. })));
    }

    #[googletest::test]
    fn test_root_leaf_round_trips() {
        let tree = unflatten(vec![entry("", "whole document")]).unwrap();
        assert_that!(tree, eq(&TreeNode::Leaf("whole document".to_string())));

        let entries = flatten(tree);
        assert_that!(
            entries,
            eq(&vec![FlatEntry { path: Vec::new(), value: "whole document".to_string() }])
        );
    }

    #[googletest::test]
    fn test_root_leaf_conflicts_with_other_entries() {
        let result = unflatten(vec![entry("a", "child"), entry("", "root")]);
        assert_that!(result, err(pat!(TreeError::PathCollision { .. })));

        let result = unflatten(vec![entry("", "root"), entry("a", "child")]);
        assert_that!(result, err(pat!(TreeError::PathCollision { .. })));
    }

    #[googletest::test]
    fn test_flatten_emits_sorted_paths() {
        let tree = unflatten(vec![
            entry("b.two", "2"),
            entry("a.one", "1"),
            entry("b.one", "3"),
        ])
        .unwrap();

        let paths: Vec<String> = flatten(tree).into_iter().map(|e| e.path.join(".")).collect();
        expect_that!(paths, eq(&vec!["a.one".to_string(), "b.one".to_string(), "b.two".to_string()]));
    }
}
