//! Error taxonomy shared by entities, getters and stores.

use crate::{common::key::Keys, store::Item};

/// Errors surfaced by entity and getter operations.
///
/// Callers can tell "does not exist" ([`Error::NotFound`]) from "exists but invalid"
/// ([`Error::Validation`]) from "already exists" ([`Error::AlreadyExists`]).
/// Anything else the store raises is passed through as [`Error::Store`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The validator rejected the current properties.
    #[error("validation failed for properties {properties:?}")]
    Validation {
        /// Snapshot of the rejected properties.
        properties: Item,
    },
    /// No item exists at the given key.
    #[error("item not found: {0}")]
    NotFound(Keys<String>),
    /// An item already exists at the given key.
    #[error("item already exists: {0}")]
    AlreadyExists(Keys<String>),
    /// The store could not interpret an item's key attributes.
    #[error("invalid key: {0}")]
    InvalidKey(String),
    /// A lifecycle hook of the entity type refused the operation.
    #[error("lifecycle hook failed: {0}")]
    Hook(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// Converting properties to or from store items failed.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_dynamo::Error),
    /// Any other failure reported by the store.
    #[error("store failed: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub(crate) fn store(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Store(Box::new(error))
    }
}

/// Result type for entity, getter and store operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
