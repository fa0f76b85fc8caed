//! The cache tier (`§4.B`): three interchangeable strategies behind one
//! `Cache` trait, selected by [`CachingLevel`] at registration time.

mod composite;
mod dummy;
mod request_cache;

use std::collections::BTreeMap;
use std::fmt::Debug;

pub use self::composite::CompositeCache;
pub use self::dummy::DummyCache;
pub use self::request_cache::RequestCache;

use crate::request::Request;
use crate::schema::SchemaNode;

/// Selects which cache tier a registered spec runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachingLevel {
    /// No caching: every call regenerates from scratch.
    None,
    /// Cache by normalized request fingerprint (url, method, query params).
    Basic,
    /// Cache by model identity with partial-key lookup, enabling coherent
    /// collections. Requires the parsed spec's named-schema table.
    Advanced,
}

/// A discriminated union of cache-key shapes (`§3`/`§9`), each an extension
/// of the previous. Every cache accepts the widest shape and projects to
/// the subset it actually needs.
#[derive(Debug, Clone)]
pub enum CacheKey {
    /// Full request identity — what [`RequestCache`] keys on.
    Request {
        /// The request being served.
        request: Request,
    },
    /// Request plus the concrete field values a generator just produced
    /// for the model it's writing back.
    Model {
        /// The request being served.
        request: Request,
        /// Concrete values just materialized for the model, if any.
        put_fields: Option<BTreeMap<String, serde_json::Value>>,
    },
    /// The above, plus the schema identifying which per-model subcache to
    /// use. This is the shape [`CompositeCache`] actually reads.
    Composite {
        /// The request being served (or an "inner request" built by an
        /// `Object` generator — see `§4.A`).
        request: Request,
        /// Concrete values just materialized for the model, if any.
        put_fields: Option<BTreeMap<String, serde_json::Value>>,
        /// The model's own schema, used to resolve a stable model name.
        model: SchemaNode,
    },
}

impl CacheKey {
    /// The request carried by any shape of this union.
    pub(crate) fn request(&self) -> &Request {
        match self {
            CacheKey::Request { request }
            | CacheKey::Model { request, .. }
            | CacheKey::Composite { request, .. } => request,
        }
    }

    pub(crate) fn put_fields(&self) -> Option<&BTreeMap<String, serde_json::Value>> {
        match self {
            CacheKey::Request { .. } => None,
            CacheKey::Model { put_fields, .. } | CacheKey::Composite { put_fields, .. } => {
                put_fields.as_ref()
            }
        }
    }

    pub(crate) fn model(&self) -> Option<&SchemaNode> {
        match self {
            CacheKey::Composite { model, .. } => Some(model),
            _ => None,
        }
    }
}

/// The shared read/write contract all three cache tiers implement.
///
/// `get`/`put` work with the generated *value* (a JSON value), since that's
/// what generators read back and write — the response assembler is the one
/// place that needs the full `Response`, and it builds that itself from the
/// generated content plus freshly-generated headers.
pub trait Cache: Debug {
    /// Whether a value is stored for this key.
    fn has(&self, key: &CacheKey) -> bool;

    /// Stores a value under this key.
    fn put(&mut self, key: CacheKey, value: serde_json::Value);

    /// Looks up a value for this key. `ADVANCED`'s subset-search (`§4.B`)
    /// picks one candidate uniformly at random when several match, hence
    /// the `&mut Rng`.
    fn get(&mut self, key: &CacheKey, rng: &mut crate::rng::Rng) -> Option<serde_json::Value>;

    /// Values stored for this key's model whose sub-key is a superset of
    /// `key`'s own (the same subset-search `get` uses, without collapsing
    /// to a single random pick) — an empty sub-key matches every entry, so
    /// a request with no matching query parameters still sees the whole
    /// accumulated set. Only meaningful when [`Self::has_by_model`] is
    /// `true`.
    fn get_all_by_model(&self, key: &CacheKey) -> Vec<serde_json::Value>;

    /// Whether this cache supports `get_all_by_model` (only `ADVANCED`
    /// does). The `Array` generator switches into "coherent collection"
    /// mode based on this flag.
    fn has_by_model(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_key_projects_common_fields() {
        let request = Request::new("http://example.test/pets", "get");
        let key = CacheKey::Model {
            request: request.clone(),
            put_fields: None,
        };
        assert_eq!(key.request(), &request);
        assert!(key.model().is_none());
    }
}
