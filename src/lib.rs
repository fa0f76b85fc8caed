#![cfg_attr(docsrs, feature(doc_cfg))]

//! # oasmock-core
//!
//! Synthesize mock HTTP responses from an already-parsed OpenAPI document.
//!
//! This crate does not parse OAS YAML/JSON itself — callers build a
//! [`ParsedSpec`] however they like (from `utoipa`, from `oas3`, from a
//! hand-written literal in a test) and hand it to a [`Registry`]. From
//! there, every matching [`Request`] gets a schema-conformant [`Response`]
//! back, with three interchangeable [`CachingLevel`]s controlling how much
//! the generated values stay coherent across calls.
//!
//! ## Quick start
//!
//! ```rust
//! use oasmock_core::{CachingLevel, ParsedSpec, Registry, RegistryConfig, Request};
//! use oasmock_core::spec_model::{OasContent, OasOperation, OasPath, OasResponse};
//! use oasmock_core::schema::{BooleanSchema, SchemaNode};
//!
//! let mut spec = ParsedSpec::empty();
//! spec.servers.push("http://example.test".to_string());
//! spec.paths.push(OasPath {
//!     template: "/ping".to_string(),
//!     operations: vec![OasOperation {
//!         method: "get".to_string(),
//!         parameters: Vec::new(),
//!         responses: vec![OasResponse {
//!             status_code: Some(200),
//!             content: Some(OasContent::Json { schema: SchemaNode::Boolean(BooleanSchema) }),
//!             headers: Vec::new(),
//!         }],
//!     }],
//! });
//!
//! let mut registry = Registry::new(RegistryConfig::new());
//! registry.register("demo", "ping.yaml", &spec, CachingLevel::Basic)?;
//!
//! let request = Request::new("http://example.test/ping", "get");
//! let response = registry.dispatch("demo", &request).expect("a spec matched")?;
//! assert_eq!(response.status_code, 200);
//! # Ok::<(), oasmock_core::MockError>(())
//! ```
//!
//! ## Caching levels
//!
//! - [`CachingLevel::None`]: every call regenerates from scratch.
//! - [`CachingLevel::Basic`]: one value per normalized request.
//! - [`CachingLevel::Advanced`]: values are keyed by model identity, so
//!   collection endpoints return a coherent, growing set of previously
//!   generated instances instead of unrelated random batches.

mod adapter;
mod assembler;
mod cache;
mod dispatch;
mod error;
mod registry;
mod request;
mod response;
mod rng;
pub mod schema;
pub mod spec_model;

pub use adapter::Adapter;
#[cfg(feature = "reqwest-adapter")]
pub use adapter::{ReqwestAdapter, to_http_response};
pub use cache::{Cache, CachingLevel};
pub use error::{CoerceError, MockError};
pub use registry::{RegistrationGuard, Registry, RegistryConfig};
pub use request::Request;
pub use response::Response;
pub use rng::Rng;
pub use spec_model::ParsedSpec;
