use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;
use serde_json::Value;

use super::{Cache, CacheKey};
use crate::rng::Rng;
use crate::schema::SchemaNode;

/// A single previously-generated instance of a model, tagged with the
/// sub-key it was stored under.
#[derive(Debug, Clone)]
struct ModelEntry {
    subkey: BTreeMap<String, String>,
    value: Value,
}

/// The accumulated entries for one named model. Entries are only ever
/// appended (`§4.B`): nothing is ever overwritten, so a collection that
/// asked for 3 distinct pets earlier still finds them when a later request
/// asks for 5.
#[derive(Debug, Default)]
struct ModelCache {
    entries: Vec<ModelEntry>,
}

impl ModelCache {
    fn put(&mut self, subkey: BTreeMap<String, String>, value: Value) {
        self.entries.push(ModelEntry { subkey, value });
    }

    /// Entries whose sub-key is a superset of `query`. An empty `query`
    /// matches every entry — this is the literal, unmodified behavior
    /// described by `§4.B`, not a bug to route around.
    fn matching(&self, query: &BTreeMap<String, String>) -> Vec<&ModelEntry> {
        self.entries
            .iter()
            .filter(|entry| query.iter().all(|(k, v)| entry.subkey.get(k) == Some(v)))
            .collect()
    }
}

/// The `ADVANCED` caching level: values are keyed by model identity with a
/// partial-key (sub-key) lookup, so a collection endpoint can return a
/// coherent, growing set of previously-seen instances instead of a fresh
/// random batch on every call (`§4.B`).
#[derive(Debug)]
pub struct CompositeCache {
    models: BTreeMap<String, ModelCache>,
    names_by_schema: HashMap<SchemaNode, String>,
}

impl CompositeCache {
    /// Builds the cache's schema-identity index once, from the parsed
    /// spec's named-schema table, rather than resolving a model's name by
    /// linear scan on every lookup.
    pub fn new(named_schemas: &IndexMap<String, SchemaNode>) -> Self {
        let names_by_schema = named_schemas
            .iter()
            .map(|(name, schema)| (schema.clone(), name.clone()))
            .collect();
        Self {
            models: named_schemas.keys().map(|name| (name.clone(), ModelCache::default())).collect(),
            names_by_schema,
        }
    }

    fn resolve_name(&self, key: &CacheKey) -> Option<&str> {
        let model = key.model()?;
        self.names_by_schema.get(model).map(String::as_str)
    }

    /// The sub-key priority order from `§4.B`:
    ///
    /// 1. If `put_fields` is set and any of its keys are in the model's
    ///    `required` set, the sub-key is the required-only projection of
    ///    `put_fields`.
    /// 2. Else, the projection of `request.query_params` onto the model's
    ///    `required` set.
    /// 3. Else, the projection of `request.query_params` onto the model's
    ///    declared properties.
    /// 4. Else, the empty mapping.
    fn subkey(&self, key: &CacheKey) -> BTreeMap<String, String> {
        let Some(model) = key.model().and_then(SchemaNode::as_object) else {
            return BTreeMap::new();
        };
        let required = model.required();

        if let Some(put_fields) = key.put_fields() {
            let required_hit: BTreeMap<String, String> = put_fields
                .iter()
                .filter(|(name, _)| required.contains(*name))
                .map(|(name, value)| (name.clone(), value.to_string()))
                .collect();
            if !required_hit.is_empty() {
                return required_hit;
            }
        }

        let query = &key.request().query_params;
        let by_required: BTreeMap<String, String> = query
            .iter()
            .filter(|(name, _)| required.contains(*name))
            .map(|(name, value)| (name.clone(), value.to_string()))
            .collect();
        if !by_required.is_empty() {
            return by_required;
        }

        let properties = model.properties();
        query
            .iter()
            .filter(|(name, _)| properties.contains_key(*name))
            .map(|(name, value)| (name.clone(), value.to_string()))
            .collect()
    }
}

impl Cache for CompositeCache {
    fn has(&self, key: &CacheKey) -> bool {
        let Some(name) = self.resolve_name(key) else {
            return false;
        };
        let Some(model_cache) = self.models.get(name) else {
            return false;
        };
        !model_cache.matching(&self.subkey(key)).is_empty()
    }

    fn put(&mut self, key: CacheKey, value: Value) {
        let Some(name) = self.resolve_name(&key).map(str::to_string) else {
            return;
        };
        let subkey = self.subkey(&key);
        self.models.entry(name).or_default().put(subkey, value);
    }

    fn get(&mut self, key: &CacheKey, rng: &mut Rng) -> Option<Value> {
        let name = self.resolve_name(key)?;
        let model_cache = self.models.get(name)?;
        let subkey = self.subkey(key);
        let candidates = model_cache.matching(&subkey);
        if candidates.is_empty() {
            return None;
        }
        let index = rng.gen_index(candidates.len());
        Some(candidates[index].value.clone())
    }

    fn get_all_by_model(&self, key: &CacheKey) -> Vec<Value> {
        let Some(name) = self.resolve_name(key) else {
            return Vec::new();
        };
        let Some(model_cache) = self.models.get(name) else {
            return Vec::new();
        };
        let subkey = self.subkey(key);
        model_cache
            .matching(&subkey)
            .into_iter()
            .map(|entry| entry.value.clone())
            .collect()
    }

    fn has_by_model(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Request;
    use crate::schema::{BooleanSchema, IntegerSchema, ObjectSchema, PropertyTable};
    use std::collections::BTreeSet;

    fn pet_schema() -> SchemaNode {
        let mut properties = PropertyTable::new();
        properties.insert("id".to_string(), SchemaNode::Integer(IntegerSchema::unbounded()));
        properties.insert("tag".to_string(), SchemaNode::Boolean(BooleanSchema));
        let mut required = BTreeSet::new();
        required.insert("id".to_string());
        SchemaNode::Object(ObjectSchema::new(properties, required))
    }

    fn named_schemas(pet: &SchemaNode) -> IndexMap<String, SchemaNode> {
        let mut map = IndexMap::new();
        map.insert("Pet".to_string(), pet.clone());
        map
    }

    #[test]
    fn unknown_model_is_silently_ignored() {
        let pet = pet_schema();
        let mut cache = CompositeCache::new(&named_schemas(&pet));
        let mut rng = Rng::from_seed(1);

        let other = SchemaNode::Boolean(BooleanSchema);
        let key = CacheKey::Composite {
            request: Request::new("http://example.test/pets", "get"),
            put_fields: None,
            model: other,
        };
        cache.put(key.clone(), serde_json::json!(true));
        assert!(!cache.has(&key));
        assert!(cache.get(&key, &mut rng).is_none());
    }

    #[test]
    fn put_then_get_round_trips_for_a_known_model() {
        let pet = pet_schema();
        let mut cache = CompositeCache::new(&named_schemas(&pet));
        let mut rng = Rng::from_seed(1);

        let mut put_fields = BTreeMap::new();
        put_fields.insert("id".to_string(), serde_json::json!(1));
        let key = CacheKey::Composite {
            request: Request::new("http://example.test/pets/1", "get"),
            put_fields: Some(put_fields),
            model: pet.clone(),
        };
        cache.put(key.clone(), serde_json::json!({"id": 1}));

        assert!(cache.has(&key));
        assert_eq!(cache.get(&key, &mut rng), Some(serde_json::json!({"id": 1})));
    }

    #[test]
    fn query_param_subset_matches_by_required_field() {
        let pet = pet_schema();
        let mut cache = CompositeCache::new(&named_schemas(&pet));

        let mut put_fields = BTreeMap::new();
        put_fields.insert("id".to_string(), serde_json::json!(7));
        let put_key = CacheKey::Composite {
            request: Request::new("http://example.test/pets", "get"),
            put_fields: Some(put_fields),
            model: pet.clone(),
        };
        cache.put(put_key, serde_json::json!({"id": 7}));

        let mut request = Request::new("http://example.test/pets", "get");
        request.query_params.insert("id".to_string(), serde_json::json!(7));
        let get_key = CacheKey::Composite {
            request,
            put_fields: None,
            model: pet,
        };
        assert!(cache.has(&get_key));
    }

    #[test]
    fn empty_subkey_matches_every_entry() {
        let pet = pet_schema();
        let mut cache = CompositeCache::new(&named_schemas(&pet));
        let mut rng = Rng::from_seed(1);

        for id in 0..3 {
            let mut put_fields = BTreeMap::new();
            put_fields.insert("id".to_string(), serde_json::json!(id));
            let key = CacheKey::Composite {
                request: Request::new("http://example.test/pets", "get"),
                put_fields: Some(put_fields),
                model: pet.clone(),
            };
            cache.put(key, serde_json::json!({"id": id}));
        }

        let query_key = CacheKey::Composite {
            request: Request::new("http://example.test/pets", "get"),
            put_fields: None,
            model: pet.clone(),
        };
        assert_eq!(cache.get_all_by_model(&query_key).len(), 3);
        assert!(cache.get(&query_key, &mut rng).is_some());
    }
}
