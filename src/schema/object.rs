use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value};

use super::{GenContext, Generator, PropertyTable, SchemaNode};
use crate::cache::CacheKey;
use crate::request::Request;

/// An object with a declared set of properties, some of which are required
/// (`§3`). Objects are the only schema the `ADVANCED` cache keys on —
/// [`super::SchemaNode::as_object`] is how the cache inspects a model's
/// shape without this module exposing its fields directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectSchema {
    required: BTreeSet<String>,
    properties: PropertyTable,
}

impl ObjectSchema {
    /// An object schema. Panics if `required` names a property absent from
    /// `properties`, since that would describe an unsatisfiable schema.
    pub fn new(properties: PropertyTable, required: BTreeSet<String>) -> Self {
        for name in &required {
            assert!(
                properties.contains_key(name),
                "required property {name:?} is not declared"
            );
        }
        Self { required, properties }
    }

    /// Names of properties that must appear in every generated instance.
    pub fn required(&self) -> &BTreeSet<String> {
        &self.required
    }

    /// The full declared property table.
    pub fn properties(&self) -> &PropertyTable {
        &self.properties
    }

    /// Copies `request`, re-coercing each query parameter that names one of
    /// this object's own properties through that property's schema rather
    /// than whatever schema the operation-level parameter declared for it
    /// (`§4.A`). This is the "inner request" the `ADVANCED` cache keys an
    /// instance of this model against — distinct operations sharing a
    /// parameter name but declaring it with different types each get their
    /// own model identity instead of colliding.
    pub(crate) fn inner_request(&self, request: &Request) -> Request {
        let mut inner = request.clone();
        for (name, schema) in &self.properties {
            let Some(value) = request.query_params.get(name) else {
                continue;
            };
            let raw = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            if let Ok(coerced) = schema.coerce(&raw) {
                inner.query_params.insert(name.clone(), coerced);
            }
        }
        inner
    }

    pub(crate) fn generate(&self, ctx: &mut GenContext, _force_fresh: bool) -> Value {
        let inner_request = self.inner_request(ctx.request);

        let mut fields = BTreeMap::new();
        for (name, schema) in &self.properties {
            let include = self.required.contains(name) || ctx.rng.gen_bool_half();
            if !include {
                continue;
            }
            let generator = Generator::named(schema, name.clone());
            fields.insert(name.clone(), generator.generate(ctx));
        }

        let value = Value::Object(fields.iter().map(|(k, v)| (k.clone(), v.clone())).collect::<Map<_, _>>());

        let key = CacheKey::Composite {
            request: inner_request,
            put_fields: Some(fields),
            model: SchemaNode::Object(self.clone()),
        };
        ctx.cache.put(key, value.clone());

        value
    }

    pub(crate) fn validate(&self, value: &Value) -> bool {
        let Value::Object(map) = value else {
            return false;
        };
        if !self.required.iter().all(|name| map.contains_key(name)) {
            return false;
        }
        self.properties.iter().all(|(name, schema)| {
            map.get(name).is_none_or(|value| schema.validate(value))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::DummyCache;
    use crate::request::Request;
    use crate::rng::Rng;
    use crate::schema::{BooleanSchema, IntegerSchema};

    fn sample() -> ObjectSchema {
        let mut properties = PropertyTable::new();
        properties.insert("id".to_string(), SchemaNode::Integer(IntegerSchema::unbounded()));
        properties.insert("active".to_string(), SchemaNode::Boolean(BooleanSchema));
        let mut required = BTreeSet::new();
        required.insert("id".to_string());
        ObjectSchema::new(properties, required)
    }

    #[test]
    fn generate_always_includes_required_fields() {
        let schema = sample();
        let request = Request::new("http://example.test/pets", "get");
        let mut cache = DummyCache;
        let mut rng = Rng::from_seed(2);
        let mut ctx = GenContext {
            request: &request,
            cache: &mut cache,
            rng: &mut rng,
        };

        let value = schema.generate(&mut ctx, false);
        assert!(value.get("id").is_some());
        assert!(schema.validate(&value));
    }

    #[test]
    fn validate_rejects_missing_required_field() {
        let schema = sample();
        assert!(!schema.validate(&serde_json::json!({"active": true})));
    }

    #[test]
    fn validate_ignores_unknown_extra_fields() {
        let schema = sample();
        assert!(schema.validate(&serde_json::json!({"id": 1, "extra": "x"})));
    }
}
