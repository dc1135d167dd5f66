//! i18n-entries
//!
//! Management of hierarchical translation entries: a SQLite-backed store of
//! locales, keys and values, a tree codec bridging dotted-path entry lists
//! and nested documents, and import/export/delete operations exposed
//! through an administrative CLI.

pub mod cli;
pub mod document;
pub mod engine;
pub mod store;
pub mod tree;
pub mod types;

#[cfg(test)]
mod test_utils;

pub use store::SqliteStore;
