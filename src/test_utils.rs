//! Shared helpers for the in-crate test modules.
#![cfg(test)]
#![allow(clippy::unwrap_used)]

use crate::store::{
    Locale,
    SqliteStore,
};
use crate::types::{
    KeyId,
    LocaleCode,
};

/// Parse a key id that is known to be valid.
pub(crate) fn key_id(id: &str) -> KeyId {
    KeyId::new(id).unwrap()
}

/// Parse a locale code that is known to be valid.
pub(crate) fn locale_code(code: &str) -> LocaleCode {
    LocaleCode::new(code).unwrap()
}

/// An in-memory store seeded with two locales, three keys and the full
/// cross product of six values, glossed "`<key desc>` in `<locale desc>`".
pub(crate) fn seeded_store() -> SqliteStore {
    let locales = [("en-US", "English US"), ("es-EC", "Spanish Ecuador")];
    let keys = [
        ("alt.logo", "Alt text for logo"),
        ("app.name", "Application name"),
        ("app.desc", "This is a test application"),
    ];

    let mut store = SqliteStore::open_in_memory().unwrap();
    for (code, description) in locales {
        store
            .create_locale(&Locale {
                code: locale_code(code),
                description: description.to_string(),
            })
            .unwrap();
    }
    for (code, locale_description) in locales {
        for (id, key_description) in keys {
            store
                .create_value(
                    &key_id(id),
                    &locale_code(code),
                    &format!("{key_description} in {locale_description}"),
                    Some(key_description),
                )
                .unwrap();
        }
    }
    assert_eq!(store.value_count().unwrap(), 6);
    store
}
