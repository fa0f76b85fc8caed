use serde_json::Value;

use crate::error::CoerceError;
use crate::rng::Rng;

/// A `true`/`false` value (`§3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BooleanSchema;

impl BooleanSchema {
    pub(crate) fn generate(&self, rng: &mut Rng) -> Value {
        Value::Bool(rng.gen_bool_half())
    }

    pub(crate) fn validate(&self, value: &Value) -> bool {
        value.is_boolean()
    }

    pub(crate) fn coerce(&self, raw: &str) -> Result<Value, CoerceError> {
        match raw {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(CoerceError::InvalidLiteral {
                raw: raw.to_string(),
                expected: "\"true\" or \"false\"",
            }),
        }
    }
}

/// The `null` value (`§3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NullSchema;

impl NullSchema {
    pub(crate) fn generate(&self) -> Value {
        Value::Null
    }

    pub(crate) fn validate(&self, value: &Value) -> bool {
        value.is_null()
    }

    pub(crate) fn coerce(&self, raw: &str) -> Result<Value, CoerceError> {
        if raw.is_empty() || raw == "null" {
            Ok(Value::Null)
        } else {
            Err(CoerceError::InvalidLiteral {
                raw: raw.to_string(),
                expected: "empty string or \"null\"",
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolean_generate_is_always_valid() {
        let schema = BooleanSchema;
        let mut rng = Rng::from_seed(5);
        for _ in 0..20 {
            assert!(schema.validate(&schema.generate(&mut rng)));
        }
    }

    #[test]
    fn boolean_coerce_round_trips() {
        let schema = BooleanSchema;
        assert_eq!(schema.coerce("true"), Ok(Value::Bool(true)));
        assert_eq!(schema.coerce("false"), Ok(Value::Bool(false)));
        assert!(schema.coerce("yes").is_err());
    }

    #[test]
    fn null_coerce_accepts_empty_string() {
        let schema = NullSchema;
        assert_eq!(schema.coerce(""), Ok(Value::Null));
        assert_eq!(schema.coerce("null"), Ok(Value::Null));
        assert!(schema.coerce("x").is_err());
    }
}
