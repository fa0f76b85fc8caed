//! Crate-wide error taxonomy.
//!
//! Only *registration-time* failures become a [`MockError`] — structural
//! misconfiguration that should fail fast rather than surface as a silent
//! "no match" at call time (see `§7` of the design notes). Per-call outcomes
//! never raise: they are represented as `Option<Response>` or a plain `bool`.

use std::fmt::Debug;

/// Errors that can occur while registering an OAS document with the mock engine.
///
/// These are programmer/configuration errors: they happen once, at
/// registration, and are meant to be fixed rather than handled at runtime.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum MockError {
    /// The ADVANCED caching level was requested but the parsed spec carries
    /// no named-schema table to resolve model identity against.
    #[display("ADVANCED caching requires a named-schema table, but spec '{spec_path}' has none")]
    #[from(skip)]
    NamedSchemasRequired {
        /// Path (or identifier) of the spec that was being registered.
        spec_path: String,
    },

    /// Every response variant of a matched operation declared a media type
    /// other than JSON, leaving nothing the response assembler can build.
    #[display("operation '{operation}' has no JSON response variant to mock")]
    #[from(skip)]
    NoJsonResponse {
        /// Identifier of the offending operation (method + path template).
        operation: String,
    },

    /// A path template used a placeholder segment (`{name}`) that is not a
    /// valid identifier.
    #[display("path template '{template}' has an invalid placeholder segment '{segment}'")]
    #[from(skip)]
    InvalidPathTemplate {
        /// The offending path template.
        template: String,
        /// The specific segment that failed to parse as `{identifier}`.
        segment: String,
    },

    /// URL parsing error encountered while registering server base URLs.
    UrlError(url::ParseError),
}

/// Errors returned while coercing a raw string into a typed schema value.
///
/// Coercion failures are *not* [`MockError`]s: per `§7`, they fold into the
/// ordinary validation-failure path (unmatched request, or default response).
#[derive(Debug, derive_more::Error, derive_more::Display, PartialEq, Eq)]
pub enum CoerceError {
    /// The raw string could not be parsed as the target primitive type.
    #[display("'{raw}' is not a valid {expected}")]
    InvalidLiteral {
        /// The input string that failed to parse.
        raw: String,
        /// Name of the schema variant it was being coerced into.
        expected: &'static str,
    },

    /// The value parsed, but fell outside the schema's declared bounds.
    #[display("'{raw}' does not satisfy the schema's constraints")]
    OutOfBounds {
        /// The input string that failed validation after parsing.
        raw: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<MockError>();
        assert_sync::<MockError>();
    }

    #[test]
    fn named_schemas_required_message() {
        let err = MockError::NamedSchemasRequired {
            spec_path: "petstore.yaml".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "ADVANCED caching requires a named-schema table, but spec 'petstore.yaml' has none"
        );
    }

    #[test]
    fn invalid_path_template_message() {
        let err = MockError::InvalidPathTemplate {
            template: "/pets/{1bad}".to_string(),
            segment: "{1bad}".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("/pets/{1bad}"));
        assert!(message.contains("{1bad}"));
    }

    #[test]
    fn coerce_error_messages() {
        let err = CoerceError::InvalidLiteral {
            raw: "abc".to_string(),
            expected: "integer",
        };
        assert_eq!(err.to_string(), "'abc' is not a valid integer");
    }
}
