use serde_json::Value;

use super::{GenContext, SchemaNode};
use crate::error::CoerceError;

/// The shared representation of `AnyOf` and `OneOf` (`§3`): a value that
/// satisfies at least one of several alternative schemas.
///
/// `§9` Open Questions settles `OneOf` as a disjunction identical to
/// `AnyOf` on `validate` — no attempt is made to enforce that exactly one
/// alternative matches, preserving the original's behavior rather than
/// tightening it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnionSchema {
    variants: Vec<SchemaNode>,
}

impl UnionSchema {
    /// A union over `variants`.
    ///
    /// # Panics
    ///
    /// Panics if `variants` is empty.
    pub fn new(variants: Vec<SchemaNode>) -> Self {
        assert!(!variants.is_empty(), "a union schema needs at least one variant");
        Self { variants }
    }

    /// The alternative schemas.
    pub fn variants(&self) -> &[SchemaNode] {
        &self.variants
    }

    pub(crate) fn generate(&self, ctx: &mut GenContext) -> Value {
        let index = ctx.rng.gen_index(self.variants.len());
        self.variants[index].generate_value(ctx, false)
    }

    pub(crate) fn validate(&self, value: &Value) -> bool {
        self.variants.iter().any(|variant| variant.validate(value))
    }

    pub(crate) fn coerce(&self, raw: &str) -> Result<Value, CoerceError> {
        self.variants
            .iter()
            .find_map(|variant| variant.coerce(raw).ok())
            .ok_or_else(|| CoerceError::InvalidLiteral {
                raw: raw.to_string(),
                expected: "a value matching one of the union's variants",
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

    fn sample() -> UnionSchema {
        UnionSchema::new(vec![
            SchemaNode::Integer(IntegerSchema::new(1, 1)),
            SchemaNode::Boolean(BooleanSchema),
        ])
    }

    #[test]
    fn generate_produces_one_of_the_variants() {
        let schema = sample();
        let request = Request::new("http://example.test/thing", "get");
        let mut cache = DummyCache;
        let mut rng = Rng::from_seed(8);
        let mut ctx = GenContext {
            request: &request,
            cache: &mut cache,
            rng: &mut rng,
        };

        for _ in 0..10 {
            let value = schema.generate(&mut ctx);
            assert!(schema.validate(&value));
        }
    }

    #[test]
    fn validate_accepts_any_matching_variant() {
        let schema = sample();
        assert!(schema.validate(&serde_json::json!(1)));
        assert!(schema.validate(&serde_json::json!(true)));
        assert!(!schema.validate(&serde_json::json!("nope")));
    }

    #[test]
    fn coerce_tries_variants_in_order() {
        let schema = sample();
        assert_eq!(schema.coerce("true"), Ok(Value::Bool(true)));
    }
}
