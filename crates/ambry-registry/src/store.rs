//! # The Version Store Seam
//!
//! The registry logic does not own persistence. [`VersionStore`] is the
//! contract a metadata backend must satisfy; [`resolve()`] layers the
//! not-found decision on top of it.

use thiserror::Error;

use ambry_core::{StoreError, VersionId};

use crate::version::VersionRecord;

/// Registry failures.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// An insert targeted a version id that already exists. Versions are
    /// append-only; this indicates a caller bug, never a retry case.
    #[error("{0} already exists and is immutable")]
    Conflict(VersionId),

    /// The requested version does not exist.
    #[error("{0} not found")]
    NotFound(VersionId),

    /// The backing store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Append-only persistence contract for version records.
///
/// Implementations must treat records as write-once: `insert_new` fails
/// with [`RegistryError::Conflict`] when the id is already present, and no
/// update or delete operation exists at this seam.
pub trait VersionStore {
    /// Append a freshly minted record.
    fn insert_new(&self, record: &VersionRecord) -> Result<(), RegistryError>;

    /// Load a record by id; `Ok(None)` when the id is unknown.
    fn load(&self, id: &VersionId) -> Result<Option<VersionRecord>, StoreError>;
}

/// Resolve a version id to its record.
///
/// Unknown ids are [`RegistryError::NotFound`]. There is no staleness
/// outcome: once a resolve has returned a record, every later resolve of
/// the same id returns the same record.
pub fn resolve<S: VersionStore + ?Sized>(
    store: &S,
    id: &VersionId,
) -> Result<VersionRecord, RegistryError> {
    store
        .load(id)?
        .ok_or(RegistryError::NotFound(*id))
}
