//! Store entities and their update structs.

use crate::types::{
    KeyId,
    LocaleCode,
};

/// A translation locale (e.g. `en-US`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    /// Unique locale code.
    pub code: LocaleCode,
    /// Human-readable name, e.g. "English US".
    pub description: String,
}

/// Key for a translatable string (e.g. `groups.home-group`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    /// Dotted-path identifier; encodes the key's place in the namespace.
    pub id: KeyId,
    /// What the translated string is for.
    pub description: String,
}

/// Language-specific value for a given [`Key`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Value {
    /// The key this value translates.
    pub key_id: KeyId,
    /// The locale the gloss is written in.
    pub locale_code: LocaleCode,
    /// The translated text.
    pub gloss: String,
    /// Whether a human has verified the translation.
    pub verified: bool,
}

/// Mutable fields of a [`Locale`]. Fields left `None` are untouched;
/// anything not listed here cannot be changed through an update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleUpdate {
    /// Replacement description.
    pub description: Option<String>,
}

/// Mutable fields of a [`Key`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyUpdate {
    /// Replacement description.
    pub description: Option<String>,
}

/// Mutable fields of a [`Value`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueUpdate {
    /// Replacement gloss.
    pub gloss: Option<String>,
    /// Replacement verification flag.
    pub verified: Option<bool>,
}
