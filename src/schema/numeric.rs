use serde_json::Value;

use crate::error::CoerceError;
use crate::rng::Rng;

/// Bitwise-ordered wrapper so schema bounds can derive `Eq`/`Hash` despite
/// being `f64`: two bounds participate in the same cache-key identity only
/// when they're bit-identical, which is exactly what `SchemaNode`'s
/// structural-equality cache lookup needs (`§9` Design Notes).
#[derive(Debug, Clone, Copy)]
pub(crate) struct OrderedF64(pub f64);

impl PartialEq for OrderedF64 {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for OrderedF64 {}

impl std::hash::Hash for OrderedF64 {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

/// A whole number within `[lower, upper]` (`§3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntegerSchema {
    lower: i64,
    upper: i64,
}

impl IntegerSchema {
    /// A bounded integer schema.
    ///
    /// # Panics
    ///
    /// Panics if `lower > upper`.
    pub fn new(lower: i64, upper: i64) -> Self {
        assert!(lower <= upper, "integer schema bounds reversed: {lower} > {upper}");
        Self { lower, upper }
    }

    /// Derives bounds from an OAS schema's raw `minimum`/`exclusiveMinimum`/
    /// `maximum`/`exclusiveMaximum` fields (`§4.A`): an inclusive bound wins
    /// over its exclusive counterpart when both are present, and either side
    /// falls back to the full `i64` range when neither is set.
    pub fn from_bounds(
        minimum: Option<i64>,
        exclusive_minimum: Option<i64>,
        maximum: Option<i64>,
        exclusive_maximum: Option<i64>,
    ) -> Self {
        let lower = minimum
            .or_else(|| exclusive_minimum.map(|n| n + 1))
            .unwrap_or(i64::MIN);
        let upper = maximum
            .or_else(|| exclusive_maximum.map(|n| n - 1))
            .unwrap_or(i64::MAX);
        Self::new(lower, upper)
    }

    /// An integer schema spanning the full `i64` range, the default when
    /// an OAS `integer` declares no `minimum`/`maximum`.
    pub fn unbounded() -> Self {
        Self::from_bounds(None, None, None, None)
    }

    pub(crate) fn generate(&self, rng: &mut Rng) -> Value {
        Value::from(rng.gen_range_inclusive_i64(self.lower, self.upper))
    }

    pub(crate) fn validate(&self, value: &Value) -> bool {
        value
            .as_i64()
            .is_some_and(|n| n >= self.lower && n <= self.upper)
    }

    pub(crate) fn coerce(&self, raw: &str) -> Result<Value, CoerceError> {
        let parsed: i64 = raw.parse().map_err(|_| CoerceError::InvalidLiteral {
            raw: raw.to_string(),
            expected: "integer",
        })?;
        if parsed < self.lower || parsed > self.upper {
            return Err(CoerceError::OutOfBounds { raw: raw.to_string() });
        }
        Ok(Value::from(parsed))
    }
}

/// A real number within `[lower, upper]` (`§3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NumberSchema {
    lower: OrderedF64,
    upper: OrderedF64,
}

impl NumberSchema {
    /// A bounded number schema.
    ///
    /// # Panics
    ///
    /// Panics if `lower > upper`.
    pub fn new(lower: f64, upper: f64) -> Self {
        assert!(lower <= upper, "number schema bounds reversed: {lower} > {upper}");
        Self {
            lower: OrderedF64(lower),
            upper: OrderedF64(upper),
        }
    }

    /// Derives bounds from an OAS schema's raw `minimum`/`exclusiveMinimum`/
    /// `maximum`/`exclusiveMaximum` fields (`§4.A`), mirroring
    /// [`IntegerSchema::from_bounds`] for floating-point bounds.
    pub fn from_bounds(
        minimum: Option<f64>,
        exclusive_minimum: Option<f64>,
        maximum: Option<f64>,
        exclusive_maximum: Option<f64>,
    ) -> Self {
        let lower = minimum.or(exclusive_minimum).unwrap_or(f64::MIN);
        let upper = maximum.or(exclusive_maximum).unwrap_or(f64::MAX);
        Self::new(lower, upper)
    }

    /// A number schema spanning the full `f64` range, the default when an
    /// OAS `number` declares no `minimum`/`maximum`.
    pub fn unbounded() -> Self {
        Self::from_bounds(None, None, None, None)
    }

    pub(crate) fn generate(&self, rng: &mut Rng) -> Value {
        let value = rng.gen_range_inclusive_f64(self.lower.0, self.upper.0);
        serde_json::Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or(Value::from(self.lower.0))
    }

    pub(crate) fn validate(&self, value: &Value) -> bool {
        value
            .as_f64()
            .is_some_and(|n| n >= self.lower.0 && n <= self.upper.0)
    }

    pub(crate) fn coerce(&self, raw: &str) -> Result<Value, CoerceError> {
        let parsed: f64 = raw.parse().map_err(|_| CoerceError::InvalidLiteral {
            raw: raw.to_string(),
            expected: "number",
        })?;
        if parsed < self.lower.0 || parsed > self.upper.0 {
            return Err(CoerceError::OutOfBounds { raw: raw.to_string() });
        }
        serde_json::Number::from_f64(parsed)
            .map(Value::Number)
            .ok_or_else(|| CoerceError::InvalidLiteral {
                raw: raw.to_string(),
                expected: "finite number",
            })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Some(3), None, Some(5), None, 3, 5)]
    #[case(None, Some(2), Some(5), None, 3, 5)]
    #[case(Some(3), None, None, Some(6), 3, 5)]
    #[case(None, None, None, None, i64::MIN, i64::MAX)]
    fn integer_from_bounds_derives_lower_and_upper(
        #[case] minimum: Option<i64>,
        #[case] exclusive_minimum: Option<i64>,
        #[case] maximum: Option<i64>,
        #[case] exclusive_maximum: Option<i64>,
        #[case] lower: i64,
        #[case] upper: i64,
    ) {
        let schema = IntegerSchema::from_bounds(minimum, exclusive_minimum, maximum, exclusive_maximum);
        assert_eq!(schema, IntegerSchema::new(lower, upper));
    }

    #[rstest]
    #[case(Some(1.0), None, Some(2.0), None, 1.0, 2.0)]
    #[case(None, Some(0.5), Some(2.0), None, 0.5, 2.0)]
    #[case(None, None, None, None, f64::MIN, f64::MAX)]
    fn number_from_bounds_derives_lower_and_upper(
        #[case] minimum: Option<f64>,
        #[case] exclusive_minimum: Option<f64>,
        #[case] maximum: Option<f64>,
        #[case] exclusive_maximum: Option<f64>,
        #[case] lower: f64,
        #[case] upper: f64,
    ) {
        let schema = NumberSchema::from_bounds(minimum, exclusive_minimum, maximum, exclusive_maximum);
        assert_eq!(schema, NumberSchema::new(lower, upper));
    }

    #[test]
    fn integer_generate_respects_bounds() {
        let schema = IntegerSchema::new(3, 5);
        let mut rng = Rng::from_seed(11);
        for _ in 0..50 {
            let value = schema.generate(&mut rng);
            assert!(schema.validate(&value), "{value} out of bounds");
        }
    }

    #[test]
    fn integer_coerce_rejects_out_of_bounds() {
        let schema = IntegerSchema::new(0, 10);
        assert_eq!(schema.coerce("5"), Ok(Value::from(5)));
        assert!(schema.coerce("11").is_err());
        assert!(schema.coerce("abc").is_err());
    }

    #[test]
    fn number_generate_respects_bounds() {
        let schema = NumberSchema::new(1.0, 2.0);
        let mut rng = Rng::from_seed(3);
        for _ in 0..50 {
            let value = schema.generate(&mut rng);
            assert!(schema.validate(&value));
        }
    }

    #[test]
    fn ordered_f64_equality_is_bitwise() {
        assert_eq!(OrderedF64(1.5), OrderedF64(1.5));
        assert_ne!(OrderedF64(0.0), OrderedF64(-0.0));
    }
}
