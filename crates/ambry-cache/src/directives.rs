//! # Cache-Directive Selection
//!
//! Maps each delivery mode to the caching directives its responses must
//! carry. The mapping is the single place header policy lives — request
//! handlers render a [`DirectiveSet`] instead of assembling `Cache-Control`
//! strings ad hoc.

use serde::{Deserialize, Serialize};

/// How an asset is being delivered.
///
/// A closed enumeration: callers choose the mode, and [`select()`] is total
/// over it. There is no "unknown mode" at runtime — adding a variant forces
/// every `match` in the workspace to handle it at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    /// A mutable asset served with a strong validator for revalidation.
    Mutable,
    /// An immutable published version, permanently cacheable.
    ImmutableVersion,
    /// A private asset reached through an access token.
    Private,
}

/// Freshness lifetime granted to browser caches for mutable assets.
pub const MUTABLE_BROWSER_TTL_SECS: u32 = 60;

/// Freshness lifetime granted to shared (CDN) caches for mutable assets.
pub const MUTABLE_SHARED_TTL_SECS: u32 = 3_600;

/// Effectively-permanent lifetime for immutable versions (one year).
pub const IMMUTABLE_TTL_SECS: u32 = 31_536_000;

/// The caching directives a response must carry.
///
/// Render with [`DirectiveSet::cache_control()`]; the individual fields are
/// exposed so callers can make further decisions (e.g., skipping
/// conditional handling when `no_store` is set) without string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectiveSet {
    /// `public` when any shared cache may store the response.
    pub public: bool,
    /// `private` when only the requesting client may store it.
    pub private: bool,
    /// Browser freshness lifetime (`max-age`).
    pub max_age: Option<u32>,
    /// Shared-cache freshness lifetime (`s-maxage`).
    pub s_maxage: Option<u32>,
    /// `immutable` — clients need never revalidate within the lifetime.
    pub immutable: bool,
    /// `no-store` — nothing may write this response to cache.
    pub no_store: bool,
    /// `no-cache` — stored responses must revalidate before reuse.
    pub no_cache: bool,
    /// `must-revalidate` — stale copies may not be served.
    pub must_revalidate: bool,
}

impl DirectiveSet {
    /// Render the `Cache-Control` header value.
    pub fn cache_control(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if self.public {
            parts.push("public".to_string());
        }
        if self.private {
            parts.push("private".to_string());
        }
        if self.no_store {
            parts.push("no-store".to_string());
        }
        if self.no_cache {
            parts.push("no-cache".to_string());
        }
        if self.must_revalidate {
            parts.push("must-revalidate".to_string());
        }
        if let Some(secs) = self.max_age {
            parts.push(format!("max-age={secs}"));
        }
        if let Some(secs) = self.s_maxage {
            parts.push(format!("s-maxage={secs}"));
        }
        if self.immutable {
            parts.push("immutable".to_string());
        }
        parts.join(", ")
    }

    /// Whether any cache anywhere may store the response.
    pub fn storable(&self) -> bool {
        !self.no_store
    }
}

/// Select the directive set for a delivery mode.
///
/// Total over [`DeliveryMode`]; the policy per mode:
///
/// | Mode             | Policy                                              |
/// |------------------|-----------------------------------------------------|
/// | Mutable          | public, short browser lifetime, longer CDN lifetime |
/// | ImmutableVersion | public, one-year lifetime, no revalidation          |
/// | Private          | never stored, always revalidated                    |
pub fn select(mode: DeliveryMode) -> DirectiveSet {
    match mode {
        DeliveryMode::Mutable => DirectiveSet {
            public: true,
            private: false,
            max_age: Some(MUTABLE_BROWSER_TTL_SECS),
            s_maxage: Some(MUTABLE_SHARED_TTL_SECS),
            immutable: false,
            no_store: false,
            no_cache: false,
            must_revalidate: false,
        },
        DeliveryMode::ImmutableVersion => DirectiveSet {
            public: true,
            private: false,
            max_age: Some(IMMUTABLE_TTL_SECS),
            s_maxage: None,
            immutable: true,
            no_store: false,
            no_cache: false,
            must_revalidate: false,
        },
        DeliveryMode::Private => DirectiveSet {
            public: false,
            private: true,
            max_age: None,
            s_maxage: None,
            immutable: false,
            no_store: true,
            no_cache: true,
            must_revalidate: true,
        },
    }
}
