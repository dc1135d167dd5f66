//! Export engine: renders store contents as nested documents.

use std::collections::BTreeMap;

use super::EngineError;
use crate::document::{
    LocaleTailLeaf,
    SingleLocaleLeaf,
};
use crate::store::{
    Key,
    SqliteStore,
    Value,
};
use crate::tree::{
    self,
    FlatEntry,
    TreeNode,
};
use crate::types::{
    KeyId,
    LocaleCode,
};

/// Render every value of one locale as a single-locale document.
///
/// Keys with no value for the locale are omitted.
pub fn dump_values(
    store: &SqliteStore,
    locale_code: &LocaleCode,
) -> Result<TreeNode<SingleLocaleLeaf>, EngineError> {
    let values = store.values_for_locale(locale_code)?;
    let entries: Vec<FlatEntry<SingleLocaleLeaf>> = values
        .into_iter()
        .map(|value| {
            let Value { key_id, gloss, verified, .. } = value;
            FlatEntry {
                path: key_id.segments().map(str::to_string).collect(),
                value: SingleLocaleLeaf { gloss, verified },
            }
        })
        .collect();
    Ok(tree::unflatten(entries)?)
}

/// Render key descriptions as a descriptions-only document.
///
/// Keys with empty descriptions are skipped unless `dump_empty`, in which
/// case `empty_placeholder` stands in for them.
pub fn dump_descriptions(
    store: &SqliteStore,
    dump_empty: bool,
    empty_placeholder: &str,
) -> Result<TreeNode<String>, EngineError> {
    let keys = store.keys()?;
    let entries: Vec<FlatEntry<String>> = keys
        .into_iter()
        .filter_map(|key| {
            let Key { id, description } = key;
            if description.is_empty() && !dump_empty {
                return None;
            }
            let description =
                if description.is_empty() { empty_placeholder.to_string() } else { description };
            Some(FlatEntry {
                path: id.segments().map(str::to_string).collect(),
                value: description,
            })
        })
        .collect();
    Ok(tree::unflatten(entries)?)
}

/// Render values across all locales as a locale-tail document, optionally
/// restricted to the sub-tree at `prefix`.
///
/// A key appears once, with exactly the locales that hold values for it as
/// children; keys with no values at all are omitted. With a prefix, the
/// prefix is stripped so the document is rooted at that sub-tree.
pub fn export_locale_tail(
    store: &SqliteStore,
    prefix: Option<&KeyId>,
) -> Result<TreeNode<LocaleTailLeaf>, EngineError> {
    let keys = match prefix {
        Some(prefix) => store.keys_with_prefix(prefix)?,
        None => store.keys()?,
    };
    let mut descriptions: BTreeMap<KeyId, String> =
        keys.into_iter().map(|key| (key.id, key.description)).collect();

    let mut grouped: BTreeMap<KeyId, BTreeMap<LocaleCode, String>> = BTreeMap::new();
    for value in store.values_with_prefix(prefix, None)? {
        let Value { key_id, locale_code, gloss, .. } = value;
        grouped.entry(key_id).or_default().insert(locale_code, gloss);
    }

    let mut entries = Vec::new();
    for (key_id, glosses) in grouped {
        let path = prefix
            .and_then(|prefix| key_id.path_under(prefix))
            .unwrap_or_else(|| key_id.segments().map(str::to_string).collect());
        let description = descriptions.remove(&key_id).unwrap_or_default();
        entries.push(FlatEntry { path, value: LocaleTailLeaf { description, glosses } });
    }
    Ok(tree::unflatten(entries)?)
}
