use super::{Cache, CacheKey};
use crate::rng::Rng;

/// The `NONE` caching level: every call regenerates from scratch.
#[derive(Debug, Default, Clone, Copy)]
pub struct DummyCache;

impl Cache for DummyCache {
    fn has(&self, _key: &CacheKey) -> bool {
        false
    }

    fn put(&mut self, _key: CacheKey, _value: serde_json::Value) {}

    fn get(&mut self, _key: &CacheKey, _rng: &mut Rng) -> Option<serde_json::Value> {
        None
    }

    fn get_all_by_model(&self, _key: &CacheKey) -> Vec<serde_json::Value> {
        Vec::new()
    }
}
