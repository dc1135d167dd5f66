//! Store error taxonomy.

use thiserror::Error;

use crate::types::{
    KeyId,
    LocaleCode,
    ValidationError,
};

/// Errors raised by the translation store.
///
/// Every variant aborts the operation it occurs in; the surrounding
/// transaction rolls back, so no partial state is ever persisted.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A value for this key/locale pair already exists (create only;
    /// updates overwrite in place).
    #[error("value {key_id}/{locale_code} already exists")]
    AlreadyExists {
        /// Key half of the composite identity.
        key_id: KeyId,
        /// Locale half of the composite identity.
        locale_code: LocaleCode,
    },
    /// A locale with this code already exists.
    #[error("locale {code} already exists")]
    LocaleExists {
        /// The duplicated code.
        code: LocaleCode,
    },
    /// A key with this id already exists.
    #[error("key {id} already exists")]
    KeyExists {
        /// The duplicated id.
        id: KeyId,
    },
    /// The referenced locale has no row.
    #[error("no locale {code}")]
    UnknownLocale {
        /// The missing code.
        code: LocaleCode,
    },
    /// The referenced key has no row.
    #[error("key {id} doesn't exist")]
    KeyNotFound {
        /// The missing id.
        id: KeyId,
    },
    /// No value exists for this key/locale pair.
    #[error("value {key_id}/{locale_code} doesn't exist")]
    ValueNotFound {
        /// Key half of the composite identity.
        key_id: KeyId,
        /// Locale half of the composite identity.
        locale_code: LocaleCode,
    },
    /// A key materializing for the first time needs a description.
    #[error("won't create key {key_id} without description")]
    MissingDescription {
        /// The key that was about to be created.
        key_id: KeyId,
    },
    /// Explicitly created or updated entities need a non-empty description.
    #[error("{subject} requires a non-empty description")]
    EmptyDescription {
        /// What was being created or updated.
        subject: String,
    },
    /// Another entity of the same kind already carries this description.
    #[error("description '{description}' is already in use")]
    DuplicateDescription {
        /// The duplicated description.
        description: String,
    },
    /// An identifier failed its format check before persistence.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    /// The storage backend itself failed.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}
