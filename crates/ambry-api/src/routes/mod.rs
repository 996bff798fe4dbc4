//! # Route Modules
//!
//! - [`assets`] — upload, metadata, mutable content delivery, publication.
//! - [`versions`] — immutable version delivery.
//! - [`tokens`] — token issuance and private tokened delivery.

pub mod assets;
pub mod tokens;
pub mod versions;
