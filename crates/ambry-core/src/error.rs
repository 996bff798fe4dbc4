//! # Store Error Taxonomy
//!
//! Collaborator failures from the blob store and metadata store surface as
//! [`StoreError`]. The decision logic in the other crates propagates these
//! unchanged — substituting stale or empty content for a failed read would
//! silently corrupt the caching guarantees, so there is no fallback path.

use thiserror::Error;

/// A failure inside a storage collaborator (blob store or metadata store).
///
/// Carries enough context to log and return a server-side error. Retry
/// policy lives with the caller; nothing in this workspace retries.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The storage backend reported a failure (connection loss, query
    /// error, serialization failure in a driver, ...).
    #[error("storage backend failure: {0}")]
    Backend(String),

    /// Filesystem-level failure from a disk-backed store.
    #[error("storage io failure: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Wrap any backend error type by its rendered message.
    pub fn backend(err: impl std::fmt::Display) -> Self {
        Self::Backend(err.to_string())
    }
}
