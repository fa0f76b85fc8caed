//! Dispatch (`§4.D`): matching an incoming [`Request`] against a parsed
//! spec's servers, path templates, and declared operations.

mod path;

use std::collections::BTreeMap;

use self::path::PathMatcher;
use crate::error::MockError;
use crate::request::Request;
use crate::rng::Rng;
use crate::schema::Generator;
use crate::spec_model::{OasOperation, OasParameter, ParamLocation, ParsedSpec};

/// One compiled path template plus the operations declared on it.
#[derive(Debug)]
struct CompiledPath {
    matcher: PathMatcher,
    operations: Vec<OasOperation>,
}

/// A fully compiled, dispatch-ready OpenAPI document.
///
/// Built once at registration time (`§4.D`/`§4.E`): compiling every path
/// template up front means a bad template fails registration instead of
/// silently never matching at call time.
#[derive(Debug)]
pub struct OapiSpec {
    servers: Vec<String>,
    paths: Vec<CompiledPath>,
}

/// A successfully dispatched request: the matched operation and its
/// captured path parameters.
pub struct Dispatched<'spec> {
    /// The operation that matched.
    pub operation: &'spec OasOperation,
    /// Path parameters captured from the request's URL.
    pub path_params: BTreeMap<String, String>,
}

impl OapiSpec {
    /// Compiles a [`ParsedSpec`] into a dispatch-ready document.
    ///
    /// # Errors
    ///
    /// Returns [`MockError::InvalidPathTemplate`] if any path template
    /// fails to compile, and [`MockError::UrlError`] if a declared server
    /// URL doesn't parse.
    pub fn compile(parsed: &ParsedSpec) -> Result<Self, MockError> {
        for server in &parsed.servers {
            url::Url::parse(server)?;
        }

        let mut paths = Vec::with_capacity(parsed.paths.len());
        for oas_path in &parsed.paths {
            let matcher = PathMatcher::compile(&oas_path.template)?;
            paths.push(CompiledPath {
                matcher,
                operations: oas_path.operations.clone(),
            });
        }

        Ok(Self {
            servers: parsed.servers.clone(),
            paths,
        })
    }

    /// Strips a matching server prefix from `request.url` and dispatches
    /// the remainder against the compiled path templates and method.
    ///
    /// Every structurally matching `(path template, operation)` pair is
    /// collected first, then one is chosen uniformly at random (`§4.C`) —
    /// dispatch makes no attempt to prefer a more specific template over a
    /// looser one.
    ///
    /// Returns `None` if no server prefix matches, no path template
    /// matches, or the path matches but declares no operation for the
    /// request's method — all of these collapse to the same "unmatched
    /// request" outcome at the caller (`§4.D`).
    pub fn dispatch(&self, request: &Request, rng: &mut Rng) -> Option<Dispatched<'_>> {
        let path = self.strip_server_prefix(&request.url)?;
        let method = request.method.to_ascii_lowercase();

        let candidates: Vec<Dispatched<'_>> = self
            .paths
            .iter()
            .filter_map(|compiled| {
                let path_params = compiled.matcher.matches(&path)?;
                let operation = compiled.operations.iter().find(|op| op.method == method)?;
                Some(Dispatched { operation, path_params })
            })
            .collect();

        if candidates.is_empty() {
            return None;
        }
        let index = rng.gen_index(candidates.len());
        candidates.into_iter().nth(index)
    }

    /// Reduces `url` to its `scheme://host[:port]/path` form (dropping the
    /// query string and fragment, which path templates never match
    /// against), then strips the longest server prefix that applies.
    fn strip_server_prefix(&self, url: &str) -> Option<String> {
        let parsed = url::Url::parse(url).ok()?;
        let mut origin_and_path = format!("{}://{}", parsed.scheme(), parsed.host_str()?);
        if let Some(port) = parsed.port() {
            origin_and_path.push_str(&format!(":{port}"));
        }
        origin_and_path.push_str(parsed.path());

        let mut best: Option<&str> = None;
        for server in &self.servers {
            if origin_and_path.starts_with(server.as_str())
                && best.is_none_or(|current| server.len() > current.len())
            {
                best = Some(server.as_str());
            }
        }
        let server = best?;
        let rest = &origin_and_path[server.len()..];
        Some(if rest.is_empty() { "/".to_string() } else { rest.to_string() })
    }
}

/// Validates that `request` supplies every required parameter for
/// `operation`, coercing path and query parameters against their declared
/// schemas (`§4.D`).
pub(crate) fn validate_parameters(
    operation: &OasOperation,
    request: &Request,
    path_params: &BTreeMap<String, String>,
) -> bool {
    operation.parameters.iter().all(|param| {
        let raw = raw_value(param, request, path_params);
        match (param.required, raw) {
            (_, Some(raw)) => Generator::anonymous(&param.schema).coerce(&raw).is_ok(),
            (true, None) => false,
            (false, None) => true,
        }
    })
}

/// Resolves a single parameter's raw string value, merging sources in
/// ascending priority (`§4.C`): the URL query string or path capture first,
/// then the adapter-supplied `request.parameters` overlaid last.
fn raw_value(
    param: &OasParameter,
    request: &Request,
    path_params: &BTreeMap<String, String>,
) -> Option<String> {
    let value = match param.location {
        ParamLocation::Path => path_params.get(&param.name).cloned(),
        ParamLocation::Query => request.url_query_pairs().get(&param.name).cloned(),
    };
    request.parameters.get(&param.name).cloned().or(value)
}

/// Coerces every declared path or query parameter present on the request
/// into its typed value, for [`Request::query_params`] (`§4.A`'s
/// parameter-echo source). Path parameters are folded in alongside the URL
/// query string — mirroring the merged parameter dict the original engine
/// built before running generators — so `/pets/{petId}` can echo `petId`
/// into the generated body the same way a `?name=` query parameter would.
/// Only called once [`validate_parameters`] has already confirmed every
/// required parameter coerces successfully.
pub(crate) fn coerce_query_params(
    operation: &OasOperation,
    request: &Request,
    path_params: &BTreeMap<String, String>,
) -> BTreeMap<String, serde_json::Value> {
    operation
        .parameters
        .iter()
        .filter_map(|param| {
            let raw = raw_value(param, request, path_params)?;
            let coerced = Generator::anonymous(&param.schema).coerce(&raw).ok()?;
            Some((param.name.clone(), coerced))
        })
        .collect()
}
