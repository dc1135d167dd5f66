//! Engine error type: anything an import/export/delete run can fail with.

use thiserror::Error;

use crate::document::DocumentError;
use crate::store::StoreError;
use crate::tree::TreeError;
use crate::types::ValidationError;

/// Errors from an import, export or delete operation.
///
/// All of these abort the operation's transaction, so a failed run leaves
/// the store untouched.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The input document's shape was not a valid tree.
    #[error(transparent)]
    Document(#[from] DocumentError),
    /// Flat entries could not be assembled into a tree.
    #[error(transparent)]
    Tree(#[from] TreeError),
    /// The store rejected an operation.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// A derived identifier failed validation.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}
