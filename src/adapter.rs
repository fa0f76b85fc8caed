//! The adapter seam (`§4.F`, ambient/supplemental): turning this crate's
//! neutral [`Request`]/[`Response`] into and from a specific HTTP client's
//! types, so the mock engine can sit in front of real client code without
//! that code knowing it's talking to a mock.

use crate::request::Request;
use crate::response::Response;

/// Bridges a concrete HTTP client library to the mock engine's neutral
/// request/response shapes.
///
/// Implementors own the actual interception mechanism (a middleware hook,
/// a transport swap, ...); this trait only describes the conversion the
/// engine needs on the way in, mirroring `adapters/base.py` of the
/// original project.
pub trait Adapter {
    /// The client's outgoing request type.
    type Request;

    /// Converts a client request into the engine's neutral [`Request`].
    fn to_request(&self, request: &Self::Request) -> Request;
}

#[cfg(feature = "reqwest-adapter")]
pub use reqwest_adapter::{ReqwestAdapter, to_http_response};

#[cfg(feature = "reqwest-adapter")]
mod reqwest_adapter {
    use reqwest::{Request as ReqwestRequest, StatusCode};

    use super::Adapter;
    use crate::request::Request;
    use crate::response::Response;

    /// Reference adapter for `reqwest`, grounded in `adapters/requests.py`
    /// of the original project: enough of a real client binding to drive
    /// this crate's own integration tests, not a general-purpose transport.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct ReqwestAdapter;

    impl Adapter for ReqwestAdapter {
        type Request = ReqwestRequest;

        fn to_request(&self, request: &Self::Request) -> Request {
            let mut mocked = Request::new(request.url().as_str(), request.method().as_str());
            for (name, value) in request.url().query_pairs() {
                mocked
                    .query_params
                    .insert(name.into_owned(), serde_json::Value::String(value.into_owned()));
            }
            for (name, value) in request.headers() {
                if let Ok(value) = value.to_str() {
                    mocked.headers.insert(name.as_str().to_string(), value.to_string());
                }
            }
            mocked
        }
    }

    /// Builds a plain `http::Response` from a generated [`Response`],
    /// without requiring a live transport. Callers that need an actual
    /// `reqwest::Response` can wrap the result at the point where they
    /// control the connection (e.g. inside a test double transport).
    pub fn to_http_response(response: &Response) -> http::Response<Vec<u8>> {
        let mut builder = http::Response::builder().status(
            StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        );
        let headers = builder.headers_mut().expect("builder has no error yet");
        for (name, value) in &response.headers {
            if let (Ok(name), Ok(value)) = (
                http::HeaderName::try_from(name.as_str()),
                http::HeaderValue::try_from(value.as_str()),
            ) {
                headers.insert(name, value);
            }
        }
        if let Some(content_type) = &response.content_type
            && let Ok(value) = http::HeaderValue::try_from(content_type.as_str())
        {
            headers.insert(http::header::CONTENT_TYPE, value);
        }
        let body = serde_json::to_vec(&response.content).unwrap_or_default();
        builder.body(body).expect("well-formed header map")
    }
}

#[cfg(all(test, feature = "reqwest-adapter"))]
mod tests {
    use super::to_http_response;
    use crate::response::Response;

    #[test]
    fn http_response_carries_status_and_content_type() {
        let response = Response::json(201, serde_json::json!({"id": 1}));
        let built = to_http_response(&response);
        assert_eq!(built.status().as_u16(), 201);
        assert_eq!(
            built.headers().get(http::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }
}
