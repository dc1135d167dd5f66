//! External document shapes and their classification into [`TreeNode`]s.
//!
//! Three on-disk formats exist:
//!
//! - single-locale: leaves are `{"gloss": "...", "verified": bool}`, one
//!   document per locale;
//! - locale-tail: leaves are `{"_desc": "...", "en-US": "...", ...}`,
//!   fanning out across locales inside one tree;
//! - descriptions-only: leaves are plain strings.
//!
//! Instead of probing node shapes while walking (duck typing), each format
//! classifies the raw parsed document into a typed [`TreeNode`] exactly
//! once; everything downstream works on the sum type.

use std::collections::BTreeMap;

use serde::{
    Deserialize,
    Serialize,
};
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::tree::TreeNode;
use crate::types::LocaleCode;

/// Error for input documents whose shape is not a recognized tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// A node was neither a recognized leaf shape nor a mapping of
    /// children — or a leaf turned up where an intermediate node was
    /// required (and vice versa).
    #[error("malformed tree at '{path}': {detail}")]
    MalformedTree {
        /// Dotted path to the offending node (empty for the root).
        path: String,
        /// What was wrong with it.
        detail: String,
    },
}

impl DocumentError {
    /// Shorthand used by the classifiers below.
    fn malformed(path: &[String], detail: impl Into<String>) -> Self {
        Self::MalformedTree { path: path.join("."), detail: detail.into() }
    }
}

/// Leaf of the single-locale format: one locale's gloss plus its
/// verification flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SingleLocaleLeaf {
    /// The translated text.
    pub gloss: String,
    /// Whether a human has verified the translation.
    #[serde(default)]
    pub verified: bool,
}

/// Leaf of the locale-tail format: the key's description plus one gloss per
/// locale. The `verified` flag has no slot in this shape and is dropped on
/// export; see DESIGN.md.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleTailLeaf {
    /// Description of the key this leaf lands on.
    #[serde(rename = "_desc")]
    pub description: String,
    /// Glosses keyed by locale code. Every non-`_desc` field of the leaf
    /// must be a valid locale code mapping to a string.
    #[serde(flatten)]
    pub glosses: BTreeMap<LocaleCode, String>,
}

/// Classify a single-locale document.
///
/// A mapping is a leaf when it carries a string `gloss` field; anything
/// else must be a mapping of children.
pub fn classify_single_locale(
    document: JsonValue,
) -> Result<TreeNode<SingleLocaleLeaf>, DocumentError> {
    classify(document, &mut Vec::new(), &|value| {
        value
            .as_object()
            .is_some_and(|map| map.get("gloss").is_some_and(JsonValue::is_string))
    })
}

/// Classify a locale-tail document.
///
/// A mapping is a leaf when it carries a `_desc` field; its remaining
/// fields must all be locale codes mapping to strings.
pub fn classify_locale_tail(document: JsonValue) -> Result<TreeNode<LocaleTailLeaf>, DocumentError> {
    classify(document, &mut Vec::new(), &|value| {
        value.as_object().is_some_and(|map| map.contains_key("_desc"))
    })
}

/// Classify a descriptions-only document (leaves are plain strings).
pub fn classify_descriptions(document: JsonValue) -> Result<TreeNode<String>, DocumentError> {
    classify(document, &mut Vec::new(), &JsonValue::is_string)
}

/// Recursive classification: `is_leaf` decides which mappings terminate the
/// descent, [`Deserialize`] parses the recognized leaves strictly.
fn classify<L: for<'de> Deserialize<'de>>(
    value: JsonValue,
    path: &mut Vec<String>,
    is_leaf: &dyn Fn(&JsonValue) -> bool,
) -> Result<TreeNode<L>, DocumentError> {
    if is_leaf(&value) {
        let leaf = serde_json::from_value(value)
            .map_err(|err| DocumentError::malformed(path, err.to_string()))?;
        return Ok(TreeNode::Leaf(leaf));
    }

    let JsonValue::Object(map) = value else {
        return Err(DocumentError::malformed(
            path,
            "expected a mapping of children or a recognized leaf",
        ));
    };

    let mut children = BTreeMap::new();
    for (segment, child) in map {
        if segment.is_empty() {
            return Err(DocumentError::malformed(path, "empty path segment"));
        }
        path.push(segment.clone());
        let node = classify(child, path, is_leaf)?;
        path.pop();
        children.insert(segment, node);
    }
    Ok(TreeNode::Branch(children))
}

/// Render a tree as JSON with sorted keys and 2-space indentation (the
/// single-locale and descriptions dump format).
pub fn to_json_pretty<L: Serialize>(tree: &TreeNode<L>) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(tree)
}

/// Render a tree as YAML (the locale-tail export format).
pub fn to_yaml<L: Serialize>(tree: &TreeNode<L>) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(tree)
}
