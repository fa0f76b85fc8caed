use serde_json::Value;

use super::{GenContext, Generator, SchemaNode};
use crate::cache::{CacheKey, DummyCache};

/// A homogeneous array whose length falls within `[min_items, max_items]`
/// (`§3`).
///
/// Under the `ADVANCED` cache, an array of a cacheable (`Object`) element
/// schema draws from that model's accumulated entries instead of generating
/// every element fresh, producing a *flat list* of previously-seen values
/// (`§9` Open Questions: the flat-list reading, not a singleton-wrapped
/// list, is the behavior this crate implements).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArraySchema {
    items: Box<SchemaNode>,
    min_items: usize,
    max_items: usize,
}

impl ArraySchema {
    /// A bounded array schema.
    ///
    /// # Panics
    ///
    /// Panics if `min_items > max_items`.
    pub fn new(items: SchemaNode, min_items: usize, max_items: usize) -> Self {
        assert!(
            min_items <= max_items,
            "array schema bounds reversed: {min_items} > {max_items}"
        );
        Self {
            items: Box::new(items),
            min_items,
            max_items,
        }
    }

    /// The element schema.
    pub fn items(&self) -> &SchemaNode {
        &self.items
    }

    pub(crate) fn generate(&self, ctx: &mut GenContext) -> Value {
        let length = ctx.rng.gen_range_inclusive_usize(self.min_items, self.max_items);
        let element = Generator::anonymous(&self.items);

        if length == 0 {
            return Value::Array(Vec::new());
        }

        if ctx.cache.has_by_model() && element.is_cacheable() {
            self.generate_coherent(ctx, &element, length)
        } else {
            // Non-coherent mode: each of the `n` items is independent, so
            // every item is generated with caching disabled (`§4.A`) rather
            // than sharing the operation's real cache.
            let mut no_cache = DummyCache;
            let mut inner_ctx = GenContext {
                request: ctx.request,
                cache: &mut no_cache,
                rng: &mut *ctx.rng,
            };
            Value::Array((0..length).map(|_| element.generate(&mut inner_ctx)).collect())
        }
    }

    /// Coherent-collection mode (`§4.A`): top the model's cache up to at
    /// least `length` distinct entries, then sample `length` of them. The
    /// entries considered are narrowed by the request's own sub-key
    /// (`§4.B`) — e.g. `?name=X` restricts the pool to previously generated
    /// instances whose `name` is `X`, topping up with freshly generated
    /// (and therefore echo-matching) ones if too few already qualify.
    fn generate_coherent(&self, ctx: &mut GenContext, element: &Generator, length: usize) -> Value {
        // Matches the "inner request" an Object element keys its own cache
        // puts against (`§4.A`), so topping up and reading back resolve the
        // same sub-key.
        let key_request = element
            .schema()
            .as_object()
            .map(|object| object.inner_request(ctx.request))
            .unwrap_or_else(|| ctx.request.clone());
        let key = CacheKey::Composite {
            request: key_request,
            put_fields: None,
            model: element.schema().clone(),
        };
        let mut values = ctx.cache.get_all_by_model(&key);
        while values.len() < length {
            values.push(element.generate_fresh(ctx));
        }
        let indices = ctx.rng.sample_indices(values.len(), length);
        Value::Array(indices.into_iter().map(|i| values[i].clone()).collect())
    }

    pub(crate) fn validate(&self, value: &Value) -> bool {
        let Value::Array(items) = value else {
            return false;
        };
        items.len() >= self.min_items
            && items.len() <= self.max_items
            && items.iter().all(|item| self.items.validate(item))
    }
}
