//! The neutral response value produced for a matched request.

use std::collections::BTreeMap;

use serde_json::Value;

/// A synthesized HTTP response.
///
/// Mutable while the response assembler (`§4.D`) fills it in, then handed
/// back to the registry/façade as a finished value. Adapters turn this into
/// their native response type via `from_response`.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// HTTP status code, e.g. `200`.
    pub status_code: u16,
    /// MIME type of [`Self::content`]. Only JSON responses are synthesized,
    /// so this is always `Some("application/json")` for a non-empty body.
    pub content_type: Option<String>,
    /// Response headers, generated per the operation's declared header set.
    pub headers: BTreeMap<String, String>,
    /// Text encoding of the body. JSON responses are always UTF-8.
    pub encoding: Option<String>,
    /// The generated JSON body: a scalar, array, or object, per the
    /// operation's declared content schema.
    pub content: Value,
}

impl Response {
    /// Starts a JSON response with the given status and empty headers.
    pub fn json(status_code: u16, content: Value) -> Self {
        Self {
            status_code,
            content_type: Some("application/json".to_string()),
            headers: BTreeMap::new(),
            encoding: Some("utf-8".to_string()),
            content,
        }
    }
}
