#![deny(missing_docs)]

//! # ambry-core — Foundational Types for Ambry
//!
//! This crate defines the types every other crate in the workspace depends
//! on. It has no internal crate dependencies — only `serde`, `serde_json`,
//! `thiserror`, `chrono`, `uuid`, and `sha2` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** Every identifier is a
//!    distinct type. You cannot pass a [`VersionId`] where an [`AssetId`]
//!    is expected.
//!
//! 2. **Fingerprints travel with their bytes.** [`AssetRecord`] recomputes
//!    its [`ContentFingerprint`] inside the same call that replaces content,
//!    so no caller can observe a record whose fingerprint does not match the
//!    bytes it describes.
//!
//! 3. **UTC-only timestamps.** [`Timestamp`] truncates to whole seconds and
//!    renders both RFC 3339 and HTTP-date forms from the same instant.
//!
//! 4. **Structured errors with `thiserror`.** No `Box<dyn Error>`, no
//!    `.unwrap()` outside tests.

pub mod asset;
pub mod error;
pub mod fingerprint;
pub mod identity;
pub mod temporal;

// Re-export primary types at crate root for ergonomic imports.
pub use asset::AssetRecord;
pub use error::StoreError;
pub use fingerprint::{
    fingerprint_bytes, ContentFingerprint, FingerprintAlgorithm, ParseFingerprintError,
};
pub use identity::{AssetId, StorageKey, VersionId};
pub use temporal::{Timestamp, TimestampError};
