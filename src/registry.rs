//! The registry (`§4.E`): the façade the rest of the crate is used through.
//! Specs are registered under a `module` name (mirroring how the original
//! system grouped mocked APIs by the test suite that owned them) and a
//! `spec_path` identifying the document within that module.

use std::collections::BTreeMap;

use tracing::{debug, trace, warn};

use crate::assembler;
use crate::cache::{Cache, CachingLevel, CompositeCache, DummyCache, RequestCache};
use crate::dispatch::{OapiSpec, coerce_query_params, validate_parameters};
use crate::error::MockError;
use crate::request::Request;
use crate::response::Response;
use crate::rng::Rng;
use crate::spec_model::ParsedSpec;

/// Registry-wide defaults applied to every spec registered through it.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    seed: Option<u64>,
}

impl RegistryConfig {
    /// Starts with an entropy-seeded RNG.
    pub fn new() -> Self {
        Self { seed: None }
    }

    /// Pins the RNG seed, for reproducible test runs.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self::new()
    }
}

struct RegisteredSpec {
    oapi: OapiSpec,
    cache: Box<dyn Cache>,
    rng: Rng,
}

/// Holds every spec registered so far, grouped by module, and dispatches
/// incoming requests against them.
#[derive(Default)]
pub struct Registry {
    config: RegistryConfig,
    modules: BTreeMap<String, BTreeMap<String, RegisteredSpec>>,
}

impl Registry {
    /// A registry with the given registry-wide defaults.
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            modules: BTreeMap::new(),
        }
    }

    /// Compiles and registers `parsed` under `module`/`spec_path`, caching
    /// responses at `caching_level`.
    ///
    /// # Errors
    ///
    /// Propagates [`OapiSpec::compile`]'s errors, and returns
    /// [`MockError::NamedSchemasRequired`] if `caching_level` is `ADVANCED`
    /// but `parsed` carries no named schemas to resolve model identity
    /// against.
    pub fn register(
        &mut self,
        module: impl Into<String>,
        spec_path: impl Into<String>,
        parsed: &ParsedSpec,
        caching_level: CachingLevel,
    ) -> Result<(), MockError> {
        let module = module.into();
        let spec_path = spec_path.into();
        let oapi = OapiSpec::compile(parsed)?;

        let cache: Box<dyn Cache> = match caching_level {
            CachingLevel::None => Box::new(DummyCache),
            CachingLevel::Basic => Box::new(RequestCache::default()),
            CachingLevel::Advanced => {
                if parsed.schemas.is_empty() {
                    return Err(MockError::NamedSchemasRequired { spec_path });
                }
                Box::new(CompositeCache::new(&parsed.schemas))
            }
        };

        let rng = self.config.seed.map(Rng::from_seed).unwrap_or_else(Rng::from_entropy);

        debug!(%module, %spec_path, "registering OpenAPI spec");
        self.modules
            .entry(module)
            .or_default()
            .insert(spec_path, RegisteredSpec { oapi, cache, rng });
        Ok(())
    }

    /// Removes one spec. Returns whether anything was removed.
    pub fn unregister(&mut self, module: &str, spec_path: &str) -> bool {
        let Some(specs) = self.modules.get_mut(module) else {
            return false;
        };
        let removed = specs.remove(spec_path).is_some();
        if specs.is_empty() {
            self.modules.remove(module);
        }
        removed
    }

    /// Removes every spec registered under `module`. Returns whether the
    /// module had anything registered.
    pub fn stop_module(&mut self, module: &str) -> bool {
        self.modules.remove(module).is_some()
    }

    /// Tears down all interceptions: clears every module's registered
    /// specs (`§4.E`).
    pub fn stop(&mut self) {
        self.modules.clear();
    }

    /// Registers `parsed`, returning a guard that unregisters it again when
    /// dropped.
    ///
    /// Mirrors a scoped test-server lifecycle: callers that only need a
    /// mock for the duration of one test don't have to remember to call
    /// [`Self::unregister`] on every exit path.
    pub fn register_scoped<'a>(
        &'a mut self,
        module: impl Into<String>,
        spec_path: impl Into<String>,
        parsed: &ParsedSpec,
        caching_level: CachingLevel,
    ) -> Result<RegistrationGuard<'a>, MockError> {
        let module = module.into();
        let spec_path = spec_path.into();
        self.register(module.clone(), spec_path.clone(), parsed, caching_level)?;
        Ok(RegistrationGuard {
            registry: self,
            module,
            spec_path,
        })
    }

    /// Dispatches `request` against every spec registered under `module`,
    /// in registration order, returning the first match.
    ///
    /// `None` means no spec under this module had a matching path/method
    /// (or none of them validated the request's parameters) — the caller's
    /// real upstream should be called instead, per `§4.D`.
    pub fn dispatch(&mut self, module: &str, request: &Request) -> Option<Result<Response, MockError>> {
        let specs = self.modules.get_mut(module)?;
        for spec in specs.values_mut() {
            let Some(dispatched) = spec.oapi.dispatch(request, &mut spec.rng) else {
                continue;
            };
            if !validate_parameters(dispatched.operation, request, &dispatched.path_params) {
                trace!(url = %request.url, method = %request.method, "parameter validation failed");
                if let Some(result) =
                    assembler::assemble_default(dispatched.operation, request, spec.cache.as_mut(), &mut spec.rng)
                {
                    return Some(result);
                }
                continue;
            }

            let mut coerced_request = request.clone();
            coerced_request.path_params = dispatched.path_params.clone();
            coerced_request.query_params =
                coerce_query_params(dispatched.operation, request, &dispatched.path_params);

            return Some(assembler::assemble(
                dispatched.operation,
                &coerced_request,
                spec.cache.as_mut(),
                &mut spec.rng,
            ));
        }
        warn!(%module, url = %request.url, "no registered spec matched this request");
        None
    }
}

/// RAII handle returned by [`Registry::register_scoped`]. Unregisters its
/// spec on drop.
pub struct RegistrationGuard<'a> {
    registry: &'a mut Registry,
    module: String,
    spec_path: String,
}

impl Drop for RegistrationGuard<'_> {
    fn drop(&mut self) {
        self.registry.unregister(&self.module, &self.spec_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec_model::{OasOperation, OasPath, OasResponse};

    fn minimal_spec() -> ParsedSpec {
        let mut spec = ParsedSpec::empty();
        spec.servers.push("http://example.test".to_string());
        spec.paths.push(OasPath {
            template: "/ping".to_string(),
            operations: vec![OasOperation {
                method: "get".to_string(),
                parameters: Vec::new(),
                responses: vec![OasResponse {
                    status_code: Some(200),
                    content: Some(crate::spec_model::OasContent::Json {
                        schema: crate::schema::SchemaNode::Boolean(crate::schema::BooleanSchema),
                    }),
                    headers: Vec::new(),
                }],
            }],
        });
        spec
    }

    #[test]
    fn dispatch_returns_none_for_an_unregistered_module() {
        let mut registry = Registry::default();
        let request = Request::new("http://example.test/ping", "get");
        assert!(registry.dispatch("demo", &request).is_none());
    }

    #[test]
    fn register_then_dispatch_returns_a_response() {
        let mut registry = Registry::new(RegistryConfig::new().seed(1));
        registry
            .register("demo", "ping.yaml", &minimal_spec(), CachingLevel::None)
            .unwrap();

        let request = Request::new("http://example.test/ping", "get");
        let response = registry.dispatch("demo", &request).unwrap().unwrap();
        assert_eq!(response.status_code, 200);
    }

    #[test]
    fn advanced_caching_requires_named_schemas() {
        let mut registry = Registry::new(RegistryConfig::new());
        let result = registry.register("demo", "ping.yaml", &minimal_spec(), CachingLevel::Advanced);
        assert!(matches!(result, Err(MockError::NamedSchemasRequired { .. })));
    }

    #[test]
    fn unregister_removes_the_spec() {
        let mut registry = Registry::new(RegistryConfig::new().seed(1));
        registry
            .register("demo", "ping.yaml", &minimal_spec(), CachingLevel::None)
            .unwrap();
        assert!(registry.unregister("demo", "ping.yaml"));

        let request = Request::new("http://example.test/ping", "get");
        assert!(registry.dispatch("demo", &request).is_none());
    }

    #[test]
    fn stop_clears_every_module() {
        let mut registry = Registry::new(RegistryConfig::new().seed(1));
        registry
            .register("demo", "ping.yaml", &minimal_spec(), CachingLevel::None)
            .unwrap();
        registry
            .register("other", "ping.yaml", &minimal_spec(), CachingLevel::None)
            .unwrap();

        registry.stop();

        let request = Request::new("http://example.test/ping", "get");
        assert!(registry.dispatch("demo", &request).is_none());
        assert!(registry.dispatch("other", &request).is_none());
    }

    #[test]
    fn scoped_registration_unregisters_on_drop() {
        let mut registry = Registry::new(RegistryConfig::new().seed(1));
        {
            let _guard = registry
                .register_scoped("demo", "ping.yaml", &minimal_spec(), CachingLevel::None)
                .unwrap();
        }
        let request = Request::new("http://example.test/ping", "get");
        assert!(registry.dispatch("demo", &request).is_none());
    }
}
