//! The parsed-spec data model (`SPEC_FULL.md` §3): the shape an external
//! OAS parser is expected to hand this crate. Parsing YAML/JSON OAS
//! documents into this tree is out of scope (`§1` Non-goals) — callers
//! build a [`ParsedSpec`] however they like and register it.

use indexmap::IndexMap;

use crate::schema::SchemaNode;

/// Where a parameter is read from on an incoming request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamLocation {
    /// A named path segment, e.g. `{petId}`.
    Path,
    /// A query string key.
    Query,
}

/// A single declared parameter on an operation.
#[derive(Debug, Clone)]
pub struct OasParameter {
    /// The parameter's name, matching its path placeholder or query key.
    pub name: String,
    /// Where this parameter is read from.
    pub location: ParamLocation,
    /// Whether the operation can be dispatched without it.
    pub required: bool,
    /// The schema values for this parameter must conform to.
    pub schema: SchemaNode,
}

/// A response body's content negotiation entry. Only JSON bodies are
/// synthesized (`§4.C`); other media types are recorded but never
/// generated from, so a status code whose only declared content is e.g.
/// `text/plain` dispatches successfully but yields no body.
#[derive(Debug, Clone)]
pub enum OasContent {
    /// A JSON body conforming to `schema`.
    Json { schema: SchemaNode },
    /// A declared but unsupported media type, kept only for diagnostics.
    Other { media_type: String },
}

/// A declared response header.
#[derive(Debug, Clone)]
pub struct OasHeader {
    /// The header's wire name.
    pub name: String,
    /// Whether the header is always emitted (`required`) or only half the
    /// time (`§4.C`).
    pub required: bool,
    /// The schema the header value conforms to.
    pub schema: SchemaNode,
}

/// One declared response for an operation.
#[derive(Debug, Clone)]
pub struct OasResponse {
    /// The status code, or `None` for the operation's `default` response.
    pub status_code: Option<u16>,
    /// The response body, if any.
    pub content: Option<OasContent>,
    /// Declared response headers.
    pub headers: Vec<OasHeader>,
}

/// One HTTP method on a path.
#[derive(Debug, Clone)]
pub struct OasOperation {
    /// The HTTP method, lower-cased (`"get"`, `"post"`, ...).
    pub method: String,
    /// Declared path and query parameters.
    pub parameters: Vec<OasParameter>,
    /// Declared responses, in declaration order.
    pub responses: Vec<OasResponse>,
}

/// A path template (e.g. `/pets/{petId}`) and the operations declared on
/// it.
#[derive(Debug, Clone)]
pub struct OasPath {
    /// The path template, with `{name}` placeholders.
    pub template: String,
    /// The operations declared for this path.
    pub operations: Vec<OasOperation>,
}

/// The full parsed shape of one OpenAPI document (`§3`).
#[derive(Debug, Clone)]
pub struct ParsedSpec {
    /// Declared server base URLs; a request's URL must start with one of
    /// these prefixes to be in scope for this spec (`§4.D`).
    pub servers: Vec<String>,
    /// Declared paths.
    pub paths: Vec<OasPath>,
    /// Named component schemas, by name, in declaration order. Only
    /// schemas registered here participate in the `ADVANCED` cache's model
    /// identity (`§4.B`) — an `IndexMap` preserves the document's
    /// declaration order, matching the teacher crate's own convention for
    /// ordered component tables.
    pub schemas: IndexMap<String, SchemaNode>,
}

impl ParsedSpec {
    /// An empty spec with no servers, paths, or named schemas.
    pub fn empty() -> Self {
        Self {
            servers: Vec::new(),
            paths: Vec::new(),
            schemas: IndexMap::new(),
        }
    }
}
