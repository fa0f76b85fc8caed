//! Value generators (`§4.A`): per-schema synthesis and validation of
//! primitive and composite values.
//!
//! [`SchemaNode`] is a tagged enum rather than a trait-object hierarchy
//! (`§9` Design Notes) — a flat `match` replaces virtual dispatch, and the
//! whole tree derives `PartialEq`/`Eq`/`Hash` so the `ADVANCED` cache can use
//! structural equality to resolve a nested schema back to its model name.

mod array;
mod numeric;
mod object;
mod scalar;
mod string;
mod union;

use std::collections::BTreeMap;

use serde_json::Value;

pub use self::array::ArraySchema;
pub use self::numeric::{IntegerSchema, NumberSchema};
pub use self::object::ObjectSchema;
pub use self::scalar::{BooleanSchema, NullSchema};
pub use self::string::StringSchema;
pub use self::union::UnionSchema;

use crate::cache::{Cache, CacheKey};
use crate::error::CoerceError;
use crate::request::Request;
use crate::rng::Rng;

/// A parsed OAS schema, over the variants enumerated in `§3`.
///
/// `AnyOf` and `OneOf` share a representation ([`UnionSchema`]): `§9`
/// preserves the original behavior of treating `OneOf` as a disjunction on
/// `validate`, with no "exactly one" enforcement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SchemaNode {
    /// Whole numbers within `[lower, upper]`.
    Integer(IntegerSchema),
    /// Real numbers within `[lower, upper]`.
    Number(NumberSchema),
    /// Strings with a bounded length, drawn from an ASCII alphabet.
    String(StringSchema),
    /// Booleans.
    Boolean(BooleanSchema),
    /// The `null` value.
    Null(NullSchema),
    /// A homogeneous array of some element schema.
    Array(ArraySchema),
    /// An object with required and optional properties.
    Object(ObjectSchema),
    /// A value that must satisfy at least one alternative schema.
    AnyOf(UnionSchema),
    /// A value that must satisfy exactly one alternative schema (validated
    /// as a disjunction, per `§9`).
    OneOf(UnionSchema),
}

/// Everything a generator needs to produce or look up a value: the request
/// being served, the cache for this operation, and the shared RNG.
pub struct GenContext<'a> {
    /// The request driving this generation (or an Object's "inner request",
    /// see `§4.A`).
    pub request: &'a Request,
    /// The cache consulted before generating and written to afterward.
    pub cache: &'a mut dyn Cache,
    /// The shared random source.
    pub rng: &'a mut Rng,
}

/// Outcome of the common cache-read hook every generator consults before
/// falling back to random generation (`§4.A`).
///
/// This is a genuine three-way enum, not an `Option` collapsed through
/// truthiness — `§9`'s Open Question flags that the original implementation
/// conflated "no cached value" with "a cached value of `0`" by treating the
/// lookup result as falsy. Modeling the miss case as a dedicated variant
/// makes that class of bug unrepresentable.
enum CacheLookup {
    /// The ADVANCED cache already holds a value for this model identity.
    Hit(Value),
    /// No cache hit, but the generator's name matches a query parameter
    /// already present on the request — echo it instead of drawing fresh.
    EchoParam(Value),
    /// Neither of the above: proceed to random generation.
    Miss,
}

/// A schema positioned within its parent: carries the optional `name`
/// (parameter or property name) used for parameter echoing, and whether
/// this position is cache-eligible (`§4.A` — only `Object` schemas are).
///
/// This is the unit that actually generates/validates/coerces a value; bare
/// [`SchemaNode`]s only define the per-variant raw logic.
pub struct Generator<'s> {
    schema: &'s SchemaNode,
    name: Option<String>,
    cacheable: bool,
}

impl<'s> Generator<'s> {
    /// A generator with no name bound (e.g. an array's element schema).
    pub fn anonymous(schema: &'s SchemaNode) -> Self {
        Self {
            schema,
            name: None,
            cacheable: matches!(schema, SchemaNode::Object(_)),
        }
    }

    /// A generator bound to a parameter or property name, enabling
    /// parameter echo and (for objects) cache-key derivation.
    pub fn named(schema: &'s SchemaNode, name: impl Into<String>) -> Self {
        Self {
            schema,
            name: Some(name.into()),
            cacheable: matches!(schema, SchemaNode::Object(_)),
        }
    }

    /// The schema this generator wraps.
    pub fn schema(&self) -> &'s SchemaNode {
        self.schema
    }

    /// Whether this position participates in the `ADVANCED` cache (only
    /// `Object` schemas do).
    pub(crate) fn is_cacheable(&self) -> bool {
        self.cacheable
    }

    /// Produces a conforming value, consulting the cache-read hook first.
    pub fn generate(&self, ctx: &mut GenContext) -> Value {
        self.generate_inner(ctx, false)
    }

    /// Produces a conforming value *without* consulting the cache-read hook,
    /// so a fresh, distinct value is guaranteed. Used by [`ArraySchema`]
    /// while topping up a model cache to at least `n` entries (`§4.A`):
    /// parameter echo still applies (it reflects the request, not staleness),
    /// only the cache *hit* path is skipped.
    pub(crate) fn generate_fresh(&self, ctx: &mut GenContext) -> Value {
        self.generate_inner(ctx, true)
    }

    fn generate_inner(&self, ctx: &mut GenContext, force_fresh: bool) -> Value {
        match self.lookup(ctx, force_fresh) {
            CacheLookup::Hit(value) | CacheLookup::EchoParam(value) => value,
            CacheLookup::Miss => self.schema.generate_value(ctx, force_fresh),
        }
    }

    fn lookup(&self, ctx: &mut GenContext, force_fresh: bool) -> CacheLookup {
        if self.cacheable && !force_fresh {
            // Objects key the cache on their own "inner request" (`§4.A`):
            // the ambient request's query params re-coerced through this
            // object's own property schemas, not the operation's.
            let key_request = self
                .schema
                .as_object()
                .map(|object| object.inner_request(ctx.request))
                .unwrap_or_else(|| ctx.request.clone());
            let key = CacheKey::Composite {
                request: key_request,
                put_fields: None,
                model: self.schema.clone(),
            };
            if let Some(value) = ctx.cache.get(&key, ctx.rng) {
                return CacheLookup::Hit(value);
            }
        }
        if let Some(name) = &self.name
            && let Some(value) = ctx.request.query_params.get(name)
        {
            return CacheLookup::EchoParam(value.clone());
        }
        CacheLookup::Miss
    }

    /// Whether `value` conforms to this generator's schema.
    pub fn validate(&self, value: &Value) -> bool {
        self.schema.validate(value)
    }

    /// Parses a raw query/path-parameter string into a typed value.
    pub fn coerce(&self, raw: &str) -> Result<Value, CoerceError> {
        self.schema.coerce(raw)
    }
}

impl SchemaNode {
    fn generate_value(&self, ctx: &mut GenContext, force_fresh: bool) -> Value {
        match self {
            SchemaNode::Integer(schema) => schema.generate(ctx.rng),
            SchemaNode::Number(schema) => schema.generate(ctx.rng),
            SchemaNode::String(schema) => schema.generate(ctx.rng),
            SchemaNode::Boolean(schema) => schema.generate(ctx.rng),
            SchemaNode::Null(schema) => schema.generate(),
            SchemaNode::Array(schema) => schema.generate(ctx),
            SchemaNode::Object(schema) => schema.generate(ctx, force_fresh),
            SchemaNode::AnyOf(schema) | SchemaNode::OneOf(schema) => schema.generate(ctx),
        }
    }

    /// Whether `value` conforms to this schema.
    pub fn validate(&self, value: &Value) -> bool {
        match self {
            SchemaNode::Integer(schema) => schema.validate(value),
            SchemaNode::Number(schema) => schema.validate(value),
            SchemaNode::String(schema) => schema.validate(value),
            SchemaNode::Boolean(schema) => schema.validate(value),
            SchemaNode::Null(schema) => schema.validate(value),
            SchemaNode::Array(schema) => schema.validate(value),
            SchemaNode::Object(schema) => schema.validate(value),
            SchemaNode::AnyOf(schema) | SchemaNode::OneOf(schema) => schema.validate(value),
        }
    }

    /// Parses a raw string into a value of this schema's type.
    pub fn coerce(&self, raw: &str) -> Result<Value, CoerceError> {
        match self {
            SchemaNode::Integer(schema) => schema.coerce(raw),
            SchemaNode::Number(schema) => schema.coerce(raw),
            SchemaNode::String(schema) => schema.coerce(raw),
            SchemaNode::Boolean(schema) => schema.coerce(raw),
            SchemaNode::Null(schema) => schema.coerce(raw),
            SchemaNode::Array(_) | SchemaNode::Object(_) => Err(CoerceError::InvalidLiteral {
                raw: raw.to_string(),
                expected: "scalar (arrays/objects cannot appear as query/path parameters)",
            }),
            SchemaNode::AnyOf(schema) | SchemaNode::OneOf(schema) => schema.coerce(raw),
        }
    }

    /// The model's required-property names and property table, if this
    /// node is an [`SchemaNode::Object`]. Used by the `ADVANCED` cache to
    /// compute a model's sub-key (`§4.B`) without duplicating the object
    /// schema's own bookkeeping.
    pub(crate) fn as_object(&self) -> Option<&ObjectSchema> {
        match self {
            SchemaNode::Object(schema) => Some(schema),
            _ => None,
        }
    }
}

/// A declared property table shared by [`ObjectSchema`] and the `ADVANCED`
/// cache's sub-key derivation.
pub type PropertyTable = BTreeMap<String, SchemaNode>;
