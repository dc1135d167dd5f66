//! Import, export and delete operations over the translation store.
//!
//! Every operation takes the store handle explicitly and runs as one
//! transaction: either all of its mutations commit or none do.

mod delete;
mod error;
mod export;
mod import;

pub use delete::delete_entries;
pub use error::EngineError;
pub use export::{
    dump_descriptions,
    dump_values,
    export_locale_tail,
};
pub use import::{
    ImportOverrides,
    import_locale_tail,
    load_descriptions,
    load_values,
};

/// Counts reported by an import operation. Skips are not errors; a run
/// with skips still succeeds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Entries newly created.
    pub created: usize,
    /// Entries overwritten in place.
    pub updated: usize,
    /// Entries left untouched because overriding was disabled.
    pub skipped: usize,
}

impl ImportSummary {
    /// Entries actually written (created or overwritten).
    #[must_use]
    pub const fn entry_count(&self) -> usize {
        self.created + self.updated
    }
}

/// Counts reported by a delete operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteSummary {
    /// Value rows removed.
    pub values_deleted: usize,
    /// Key rows removed.
    pub keys_deleted: usize,
}
