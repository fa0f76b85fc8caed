//! Response assembly (`§4.C`): turning a matched operation into a concrete
//! [`Response`] by picking a status code and generating its body/headers.

use crate::cache::{Cache, DummyCache};
use crate::error::MockError;
use crate::request::Request;
use crate::response::Response;
use crate::rng::Rng;
use crate::schema::{GenContext, Generator};
use crate::spec_model::{OasContent, OasOperation, OasResponse};

/// Picks the response to mock and generates its body and headers.
///
/// Response selection (`§4.C`): a non-`default` status code is chosen
/// uniformly at random among the declared variants, and the `default`
/// variant (if present) only serves as a fallback when the operation
/// declares nothing else.
///
/// # Errors
///
/// Returns [`MockError::NoJsonResponse`] if every response variant this
/// operation declares uses a media type other than JSON, since there is
/// nothing this engine knows how to synthesize a body for.
pub(crate) fn assemble(
    operation: &OasOperation,
    request: &Request,
    cache: &mut dyn Cache,
    rng: &mut Rng,
) -> Result<Response, MockError> {
    let chosen = pick_response(operation, rng, false).ok_or_else(no_json_response(operation, request))?;
    build_response(operation, chosen, request, cache, rng)
}

/// Assembles only the operation's `default` response (`§7`, `§8` S6): used
/// when the request failed parameter validation but the operation still
/// declares a fallback. Returns `None` when there is no `default` variant,
/// so the caller can fall through to "no match" instead.
pub(crate) fn assemble_default(
    operation: &OasOperation,
    request: &Request,
    cache: &mut dyn Cache,
    rng: &mut Rng,
) -> Option<Result<Response, MockError>> {
    let chosen = pick_response(operation, rng, true)?;
    Some(build_response(operation, chosen, request, cache, rng))
}

fn no_json_response<'a>(operation: &'a OasOperation, request: &'a Request) -> impl FnOnce() -> MockError + 'a {
    move || MockError::NoJsonResponse {
        operation: format!("{} {}", operation.method, request.url),
    }
}

fn build_response(
    operation: &OasOperation,
    chosen: &OasResponse,
    request: &Request,
    cache: &mut dyn Cache,
    rng: &mut Rng,
) -> Result<Response, MockError> {
    let has_json_variant = operation
        .responses
        .iter()
        .any(|r| matches!(r.content, Some(OasContent::Json { .. })));
    if !has_json_variant {
        return Err(no_json_response(operation, request)());
    }

    let status_code = chosen.status_code.unwrap_or(200);
    let content = match &chosen.content {
        Some(OasContent::Json { schema }) => {
            let mut ctx = GenContext { request, cache, rng };
            Generator::anonymous(schema).generate(&mut ctx)
        }
        _ => serde_json::Value::Null,
    };

    let mut response = Response::json(status_code, content);
    let mut header_cache = DummyCache;
    for header in &chosen.headers {
        let include = header.required || rng.gen_bool_half();
        if !include {
            continue;
        }
        // Headers are transient, per-response: each is generated with
        // caching disabled, never consulting or polluting the operation's
        // real cache (`§4.D`).
        let mut ctx = GenContext {
            request,
            cache: &mut header_cache,
            rng,
        };
        let value = Generator::named(&header.schema, header.name.clone()).generate(&mut ctx);
        response.headers.insert(header.name.clone(), header_string(&value));
    }

    Ok(response)
}

fn pick_response<'a>(operation: &'a OasOperation, rng: &mut Rng, only_default: bool) -> Option<&'a OasResponse> {
    if only_default {
        return operation.responses.iter().find(|r| r.status_code.is_none());
    }

    let named: Vec<&OasResponse> = operation
        .responses
        .iter()
        .filter(|r| r.status_code.is_some())
        .collect();

    if !named.is_empty() {
        let index = rng.gen_index(named.len());
        return Some(named[index]);
    }

    operation.responses.iter().find(|r| r.status_code.is_none())
}

fn header_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::DummyCache;
    use crate::schema::{BooleanSchema, SchemaNode, StringSchema};
    use crate::spec_model::OasHeader;

    fn operation_with_single_response() -> OasOperation {
        OasOperation {
            method: "get".to_string(),
            parameters: Vec::new(),
            responses: vec![OasResponse {
                status_code: Some(200),
                content: Some(OasContent::Json {
                    schema: SchemaNode::String(StringSchema::unbounded()),
                }),
                headers: vec![OasHeader {
                    name: "X-Trace-Id".to_string(),
                    required: true,
                    schema: SchemaNode::String(StringSchema::unbounded()),
                }],
            }],
        }
    }

    #[test]
    fn assembles_a_json_body_and_required_header() {
        let operation = operation_with_single_response();
        let request = Request::new("http://example.test/pets", "get");
        let mut cache = DummyCache;
        let mut rng = Rng::from_seed(1);

        let response = assemble(&operation, &request, &mut cache, &mut rng).unwrap();
        assert_eq!(response.status_code, 200);
        assert!(response.content.is_string());
        assert!(response.headers.contains_key("X-Trace-Id"));
    }

    #[test]
    fn no_json_response_is_an_error() {
        let operation = OasOperation {
            method: "get".to_string(),
            parameters: Vec::new(),
            responses: vec![OasResponse {
                status_code: Some(200),
                content: Some(OasContent::Other {
                    media_type: "text/plain".to_string(),
                }),
                headers: Vec::new(),
            }],
        };
        let request = Request::new("http://example.test/pets", "get");
        let mut cache = DummyCache;
        let mut rng = Rng::from_seed(1);

        let result = assemble(&operation, &request, &mut cache, &mut rng);
        assert!(matches!(result, Err(MockError::NoJsonResponse { .. })));
    }

    #[test]
    fn falls_back_to_default_response_when_no_named_status_declared() {
        let operation = OasOperation {
            method: "get".to_string(),
            parameters: Vec::new(),
            responses: vec![OasResponse {
                status_code: None,
                content: Some(OasContent::Json {
                    schema: SchemaNode::Boolean(BooleanSchema),
                }),
                headers: Vec::new(),
            }],
        };
        let request = Request::new("http://example.test/pets", "get");
        let mut cache = DummyCache;
        let mut rng = Rng::from_seed(1);

        let response = assemble(&operation, &request, &mut cache, &mut rng).unwrap();
        assert_eq!(response.status_code, 200);
    }

    #[test]
    fn assemble_default_skips_named_variants() {
        let operation = OasOperation {
            method: "get".to_string(),
            parameters: Vec::new(),
            responses: vec![
                OasResponse {
                    status_code: Some(200),
                    content: Some(OasContent::Json {
                        schema: SchemaNode::Boolean(BooleanSchema),
                    }),
                    headers: Vec::new(),
                },
                OasResponse {
                    status_code: None,
                    content: Some(OasContent::Json {
                        schema: SchemaNode::String(StringSchema::unbounded()),
                    }),
                    headers: Vec::new(),
                },
            ],
        };
        let request = Request::new("http://example.test/pets", "get");
        let mut cache = DummyCache;
        let mut rng = Rng::from_seed(1);

        let response = assemble_default(&operation, &request, &mut cache, &mut rng).unwrap().unwrap();
        assert_eq!(response.status_code, 200);
        assert!(response.content.is_string());
    }

    #[test]
    fn assemble_default_is_none_without_a_default_variant() {
        let operation = operation_with_single_response();
        let request = Request::new("http://example.test/pets", "get");
        let mut cache = DummyCache;
        let mut rng = Rng::from_seed(1);

        assert!(assemble_default(&operation, &request, &mut cache, &mut rng).is_none());
    }
}
