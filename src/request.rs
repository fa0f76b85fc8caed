//! The neutral request value that flows into the dispatch engine.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use serde_json::Value;

/// A single intercepted outbound HTTP request, in the engine's neutral shape.
///
/// All string-keyed maps are `BTreeMap`s rather than insertion-ordered maps:
/// the data model calls them "insertion order irrelevant, hashable", and
/// `BTreeMap` satisfies that literally (it implements `Hash` deterministically,
/// independent of insertion order) instead of by convention.
///
/// Adapters build a `Request` from their native request type (see the
/// `to_request` contract in the crate docs); the engine never constructs one
/// from raw bytes or a URL string beyond parsing it for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Absolute URL string, e.g. `http://petstore.swagger.io/v1/pets/1`.
    pub url: String,
    /// Lowercase HTTP verb, e.g. `"get"`.
    pub method: String,
    /// Request body fields, if any. GET-only dispatch means this is
    /// typically empty; kept for parity with the adapter contract.
    pub data: BTreeMap<String, String>,
    /// Adapter-supplied parameters (e.g. `requests`'s `params=` kwarg).
    /// Overlaid last, on top of the URL query string and path parameters,
    /// during operation dispatch (`§4.C`): a name present here always wins.
    pub parameters: BTreeMap<String, String>,
    /// Request headers as sent by the caller.
    pub headers: BTreeMap<String, String>,
    /// Path-template captures, populated only after a successful structural
    /// path match (see [`crate::dispatch::OapiSpec`]).
    pub path_params: BTreeMap<String, String>,
    /// Final, coerced query parameters, populated once an operation has
    /// validated the request. Values are typed (per their declared schema),
    /// not raw strings — this is what lets generators distinguish "no
    /// cached value" from "a cached value of `0`/`""`/`false`".
    pub query_params: BTreeMap<String, Value>,
}

// `serde_json::Value` has no `Hash` impl (its `Number` variant can hold a
// float, which doesn't hash consistently with `Eq`). `query_params` is
// hashed through its canonical JSON string form instead, which agrees with
// `Eq` for every value our schema generators ever produce.
impl Hash for Request {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.url.hash(state);
        self.method.hash(state);
        self.data.hash(state);
        self.parameters.hash(state);
        self.headers.hash(state);
        self.path_params.hash(state);
        for (key, value) in &self.query_params {
            key.hash(state);
            value.to_string().hash(state);
        }
    }
}

impl Request {
    /// Builds a request with empty parameter/header/path/query maps.
    ///
    /// This is the shape an adapter typically starts from before it fills in
    /// whatever the native request object actually carried.
    pub fn new(url: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: method.into(),
            data: BTreeMap::new(),
            parameters: BTreeMap::new(),
            headers: BTreeMap::new(),
            path_params: BTreeMap::new(),
            query_params: BTreeMap::new(),
        }
    }

    /// Parses the URL's own query string into a plain string map.
    ///
    /// This is the first ingredient merged during operation-level parameter
    /// assembly (`§4.C`): URL query string, then `path_params`, then the
    /// adapter-supplied `parameters`, each later entry overriding earlier ones.
    pub(crate) fn url_query_pairs(&self) -> BTreeMap<String, String> {
        url::Url::parse(&self.url)
            .map(|parsed| {
                parsed
                    .query_pairs()
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_request_has_empty_maps() {
        let request = Request::new("http://example.test/pets", "get");
        assert_eq!(request.method, "get");
        assert!(request.query_params.is_empty());
        assert!(request.path_params.is_empty());
    }

    #[test]
    fn url_query_pairs_parses_query_string() {
        let request = Request::new("http://example.test/pets?limit=5&tag=cute", "get");
        let pairs = request.url_query_pairs();
        assert_eq!(pairs.get("limit").map(String::as_str), Some("5"));
        assert_eq!(pairs.get("tag").map(String::as_str), Some("cute"));
    }

    #[test]
    fn url_query_pairs_empty_when_no_query() {
        let request = Request::new("http://example.test/pets", "get");
        assert!(request.url_query_pairs().is_empty());
    }

    #[test]
    fn requests_with_same_fields_hash_equal() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let a = Request::new("http://example.test/pets/1", "get");
        let b = Request::new("http://example.test/pets/1", "get");

        let mut ha = DefaultHasher::new();
        a.hash(&mut ha);
        let mut hb = DefaultHasher::new();
        b.hash(&mut hb);

        assert_eq!(ha.finish(), hb.finish());
        assert_eq!(a, b);
    }
}
