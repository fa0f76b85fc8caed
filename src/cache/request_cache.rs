use std::collections::BTreeMap;
use std::collections::HashMap;

use serde_json::Value;

use super::{Cache, CacheKey};
use crate::rng::Rng;

/// Normalized, hashable projection of a request used as the `BASIC`
/// cache's key: `(url, method, query_params)`. Two requests that agree on
/// this triple see the same stored value, per `§4.B`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Fingerprint {
    url: String,
    method: String,
    query_params: BTreeMap<String, String>,
}

impl Fingerprint {
    fn of(key: &CacheKey) -> Self {
        let request = key.request();
        Self {
            url: request.url.clone(),
            method: request.method.clone(),
            query_params: request
                .query_params
                .iter()
                .map(|(k, v)| (k.clone(), v.to_string()))
                .collect(),
        }
    }
}

/// The `BASIC` caching level: one value per normalized request fingerprint.
///
/// This is the `RequestCache` the test suite exercises — an earlier
/// `SimpleCache` that keyed on raw request identity without normalizing the
/// query string existed in the original project but is not part of the
/// contract this crate implements (`§9` Open Questions).
#[derive(Debug, Default)]
pub struct RequestCache {
    storage: HashMap<Fingerprint, Value>,
}

impl RequestCache {
    /// Number of distinct fingerprints currently stored.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

impl Cache for RequestCache {
    fn has(&self, key: &CacheKey) -> bool {
        self.storage.contains_key(&Fingerprint::of(key))
    }

    fn put(&mut self, key: CacheKey, value: Value) {
        self.storage.insert(Fingerprint::of(&key), value);
    }

    fn get(&mut self, key: &CacheKey, _rng: &mut Rng) -> Option<Value> {
        self.storage.get(&Fingerprint::of(key)).cloned()
    }

    fn get_all_by_model(&self, _key: &CacheKey) -> Vec<Value> {
        Vec::new()
    }
}
