//! Delete engine: removes keys/values matching a path.

use super::{
    DeleteSummary,
    EngineError,
};
use crate::store::SqliteStore;
use crate::types::{
    KeyId,
    LocaleCode,
};

/// Delete entries at `path`.
///
/// - non-recursive with a locale: exactly that one value;
/// - non-recursive without a locale: the exact key and all its values;
/// - recursive with a locale: every value under the path for that locale
///   only, keys stay (other locales may still hold values);
/// - recursive without a locale: every value under the path across all
///   locales, then every now-valueless key under it.
pub fn delete_entries(
    store: &mut SqliteStore,
    path: &KeyId,
    locale_code: Option<&LocaleCode>,
    recursive: bool,
) -> Result<DeleteSummary, EngineError> {
    let tx = store.transaction()?;
    let summary = match (recursive, locale_code) {
        (false, Some(locale_code)) => {
            tx.delete_value(path, locale_code)?;
            DeleteSummary { values_deleted: 1, keys_deleted: 0 }
        }
        (false, None) => {
            let values_deleted = tx.delete_key(path)?;
            DeleteSummary { values_deleted, keys_deleted: 1 }
        }
        (true, Some(locale_code)) => {
            let values_deleted = tx.delete_values_under(path, Some(locale_code))?;
            DeleteSummary { values_deleted, keys_deleted: 0 }
        }
        (true, None) => {
            let values_deleted = tx.delete_values_under(path, None)?;
            let keys_deleted = tx.delete_keys_under(path)?;
            DeleteSummary { values_deleted, keys_deleted }
        }
    };
    tx.commit()?;
    tracing::debug!(
        path = %path,
        values = summary.values_deleted,
        keys = summary.keys_deleted,
        "deleted entries"
    );
    Ok(summary)
}
