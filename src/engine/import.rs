//! Import engine: loads external nested documents into the store.

use serde_json::Value as JsonValue;

use super::{
    EngineError,
    ImportSummary,
};
use crate::document::{
    self,
    DocumentError,
};
use crate::store::{
    SqliteStore,
    StoreError,
    Value,
    ValueUpdate,
};
use crate::tree::{
    self,
    TreeNode,
};
use crate::types::{
    KeyId,
    LocaleCode,
};

/// Which existing data a locale-tail import may overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOverrides {
    /// Overwrite glosses of values that already exist (skip them
    /// otherwise).
    pub gloss: bool,
    /// Overwrite non-empty key descriptions (empty descriptions are always
    /// filled in).
    pub description: bool,
}

/// Load a single-locale document (`{gloss, verified}` leaves) against one
/// locale.
///
/// The target locale is created on first use; keys materializing here get
/// an empty description. With `override_existing` unset, already-present
/// values are skipped and counted.
pub fn load_values(
    store: &mut SqliteStore,
    locale_code: &LocaleCode,
    document: JsonValue,
    override_existing: bool,
) -> Result<ImportSummary, EngineError> {
    let tree = document::classify_single_locale(document)?;
    let entries = tree::flatten(tree);

    let tx = store.transaction()?;
    tx.ensure_locale(locale_code)?;
    let mut summary = ImportSummary::default();
    for entry in entries {
        let key_id = KeyId::from_path(None, &entry.path)?;
        match tx.find_value(&key_id, locale_code)? {
            Some(_) if !override_existing => summary.skipped += 1,
            Some(_) => {
                tx.update_value(
                    &key_id,
                    locale_code,
                    &ValueUpdate {
                        gloss: Some(entry.value.gloss),
                        verified: Some(entry.value.verified),
                    },
                )?;
                summary.updated += 1;
            }
            None => {
                tx.ensure_key(&key_id, "")?;
                tx.insert_value(&Value {
                    key_id,
                    locale_code: locale_code.clone(),
                    gloss: entry.value.gloss,
                    verified: entry.value.verified,
                })?;
                summary.created += 1;
            }
        }
    }
    tx.commit()?;
    Ok(summary)
}

/// Load a descriptions-only document (string leaves).
///
/// Missing keys are created with the given description. Keys that already
/// carry a non-empty description are skipped unless `override_existing`.
pub fn load_descriptions(
    store: &mut SqliteStore,
    document: JsonValue,
    override_existing: bool,
) -> Result<ImportSummary, EngineError> {
    let tree = document::classify_descriptions(document)?;
    let entries = tree::flatten(tree);

    let tx = store.transaction()?;
    let mut summary = ImportSummary::default();
    for entry in entries {
        let key_id = KeyId::from_path(None, &entry.path)?;
        match tx.find_key(&key_id)? {
            None => {
                tx.ensure_key(&key_id, &entry.value)?;
                summary.created += 1;
            }
            Some(key) if !key.description.is_empty() && !override_existing => {
                tracing::debug!(
                    key = %key_id,
                    existing = %key.description,
                    "key already has a description, not overriding"
                );
                summary.skipped += 1;
            }
            Some(_) => {
                tx.set_key_description(&key_id, &entry.value)?;
                summary.updated += 1;
            }
        }
    }
    tx.commit()?;
    Ok(summary)
}

/// Import a locale-tail document (`{_desc, <locale>: gloss, ...}` leaves),
/// optionally rooted at `prefix`.
///
/// The whole document is validated before anything is written: a leaf-only
/// document without a prefix, or a leaf landing on a path that existing
/// keys nest below, is malformed; a leaf naming a locale with no row aborts
/// the import. A failed run performs zero mutations.
pub fn import_locale_tail(
    store: &mut SqliteStore,
    document: JsonValue,
    prefix: Option<&KeyId>,
    overrides: ImportOverrides,
) -> Result<ImportSummary, EngineError> {
    let tree = document::classify_locale_tail(document)?;
    if prefix.is_none() && matches!(tree, TreeNode::Leaf(_)) {
        return Err(DocumentError::MalformedTree {
            path: String::new(),
            detail: "a leaf document requires a path prefix".to_string(),
        }
        .into());
    }

    let mut resolved = Vec::new();
    for entry in tree::flatten(tree) {
        let key_id = KeyId::from_path(prefix, &entry.path)?;
        resolved.push((key_id, entry.value));
    }

    let tx = store.transaction()?;
    for (key_id, leaf) in &resolved {
        if tx.has_descendant_keys(key_id)? {
            return Err(DocumentError::MalformedTree {
                path: key_id.to_string(),
                detail: "existing entries nest below this path".to_string(),
            }
            .into());
        }
        for locale_code in leaf.glosses.keys() {
            if !tx.locale_exists(locale_code)? {
                return Err(StoreError::UnknownLocale { code: locale_code.clone() }.into());
            }
        }
    }

    let mut summary = ImportSummary::default();
    for (key_id, leaf) in resolved {
        match tx.find_key(&key_id)? {
            None => {
                tx.ensure_key(&key_id, &leaf.description)?;
            }
            Some(key) if key.description.is_empty() || overrides.description => {
                tx.set_key_description(&key_id, &leaf.description)?;
            }
            Some(_) => {}
        }
        for (locale_code, gloss) in leaf.glosses {
            match tx.find_value(&key_id, &locale_code)? {
                Some(_) if !overrides.gloss => summary.skipped += 1,
                Some(_) => {
                    tx.update_value(
                        &key_id,
                        &locale_code,
                        &ValueUpdate { gloss: Some(gloss), verified: None },
                    )?;
                    summary.updated += 1;
                }
                None => {
                    tx.insert_value(&Value {
                        key_id: key_id.clone(),
                        locale_code,
                        gloss,
                        verified: false,
                    })?;
                    summary.created += 1;
                }
            }
        }
    }
    tx.commit()?;
    Ok(summary)
}
