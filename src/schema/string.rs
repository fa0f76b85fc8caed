use serde_json::Value;

use crate::error::CoerceError;
use crate::rng::Rng;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789 ";

/// A string whose length falls within `[min_length, max_length]` (`§3`),
/// generated from a fixed alphanumeric alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StringSchema {
    min_length: usize,
    max_length: usize,
}

impl StringSchema {
    /// A bounded string schema.
    ///
    /// # Panics
    ///
    /// Panics if `min_length > max_length`.
    pub fn new(min_length: usize, max_length: usize) -> Self {
        assert!(
            min_length <= max_length,
            "string schema bounds reversed: {min_length} > {max_length}"
        );
        Self { min_length, max_length }
    }

    /// Derives bounds from an OAS schema's raw `minLength`/`maxLength`
    /// fields (`§4.A`): `minLength` defaults to `1`, `maxLength` to `100`.
    pub fn from_bounds(min_length: Option<usize>, max_length: Option<usize>) -> Self {
        Self::new(min_length.unwrap_or(1), max_length.unwrap_or(100))
    }

    /// A string schema of length `[1, 100]`, the default when an OAS
    /// `string` declares no `minLength`/`maxLength`.
    pub fn unbounded() -> Self {
        Self::from_bounds(None, None)
    }

    pub(crate) fn generate(&self, rng: &mut Rng) -> Value {
        let length = rng.gen_range_inclusive_usize(self.min_length, self.max_length);
        let text: String = (0..length)
            .map(|_| {
                let index = rng.gen_index(ALPHABET.len());
                ALPHABET[index] as char
            })
            .collect();
        Value::String(text)
    }

    pub(crate) fn validate(&self, value: &Value) -> bool {
        value
            .as_str()
            .is_some_and(|s| s.len() >= self.min_length && s.len() <= self.max_length)
    }

    pub(crate) fn coerce(&self, raw: &str) -> Result<Value, CoerceError> {
        if raw.len() < self.min_length || raw.len() > self.max_length {
            return Err(CoerceError::OutOfBounds { raw: raw.to_string() });
        }
        Ok(Value::String(raw.to_string()))
    }
}
