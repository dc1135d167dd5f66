//! Persistent translation store: locales, keys and values, with the
//! cross-entity invariants enforced at this boundary.

mod error;
mod sqlite;
mod types;

pub use error::StoreError;
pub use sqlite::{
    SqliteStore,
    StoreTx,
};
pub use types::{
    Key,
    KeyUpdate,
    Locale,
    LocaleUpdate,
    Value,
    ValueUpdate,
};
