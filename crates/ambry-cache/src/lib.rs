#![deny(missing_docs)]

//! # ambry-cache — Caching Decision Logic
//!
//! Two pure components:
//!
//! - [`negotiate()`] — given the client's conditional validator header and
//!   the current content fingerprint, decide between a full response and a
//!   not-modified response.
//! - [`select()`] — map a [`DeliveryMode`] to the [`DirectiveSet`] of
//!   caching headers that mode must emit.
//!
//! Neither function performs I/O, holds state, or can fail at runtime.
//! Negotiation in particular never errors: malformed validator syntax
//! degrades to serving the full body, which is always correct, merely less
//! efficient.

pub mod directives;
pub mod negotiate;

pub use directives::{select, DeliveryMode, DirectiveSet};
pub use negotiate::{negotiate, Negotiation};
