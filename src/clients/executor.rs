//! Executors: drive one endpoint to completion.
//!
//! Two interchangeable variants exist: [`run`] suspends cooperatively at
//! transport I/O so many endpoint executions can interleave on one runtime,
//! and [`run_blocking`](crate::clients::run_blocking) performs one request
//! at a time on the calling thread. Request preparation, response wrapping
//! and handler semantics are shared between them; only the transport call
//! differs.

use std::collections::HashMap;

use crate::clients::endpoint::{Endpoint, ErrorHandler, Step};
use crate::clients::errors::ApiError;
use crate::clients::http_request::{HttpMethod, RequestInfo};
use crate::clients::http_response::ResponseInfo;
use crate::clients::pool;
use crate::clients::session::SessionInfo;

/// Resolves a request path against the session base URL.
///
/// Absolute `http(s)://` paths pass through unchanged, which multi-host
/// flows (login) rely on.
pub(crate) fn resolve_url(session: &SessionInfo, request: &RequestInfo) -> String {
    if request.path.starts_with("http://") || request.path.starts_with("https://") {
        return request.path.clone();
    }
    format!(
        "{}/{}",
        session.base_url().trim_end_matches('/'),
        request.path.trim_start_matches('/')
    )
}

/// Lowercases and collects response headers, preserving repeated values.
pub(crate) fn collect_headers(headers: &reqwest::header::HeaderMap) -> HashMap<String, Vec<String>> {
    let mut result: HashMap<String, Vec<String>> = HashMap::new();
    for (name, value) in headers {
        let key = name.as_str().to_lowercase();
        let value = value.to_str().unwrap_or_default().to_string();
        result.entry(key).or_default().push(value);
    }
    result
}

/// Runs every registered handler in order; the first error aborts.
pub(crate) fn run_handlers(
    handlers: &[ErrorHandler],
    response: &ResponseInfo,
) -> Result<(), ApiError> {
    for handler in handlers {
        handler(response)?;
    }
    Ok(())
}

/// Drives an endpoint to completion, suspending at transport I/O.
///
/// Independent endpoint executions may be awaited concurrently; there is no
/// shared mutable state between them beyond the process-wide client pool.
///
/// # Errors
///
/// Returns the first error raised by a handler, by the endpoint itself, or
/// by the transport.
///
/// # Example
///
/// ```rust,ignore
/// use ikea_api::{run, Constants};
/// use ikea_api::endpoints::Search;
///
/// let search = Search::new(&Constants::default());
/// let results = run(search.search("billy", 10)).await?;
/// ```
pub async fn run<E: Endpoint>(mut endpoint: E) -> Result<E::Output, ApiError> {
    let mut step = endpoint.begin()?;
    loop {
        let request = match step {
            Step::Done(value) => return Ok(value),
            Step::Request(request) => request,
        };
        let response = send(endpoint.session_info(), &request).await?;
        run_handlers(endpoint.error_handlers(), &response)?;
        step = endpoint.resume(response)?;
    }
}

async fn send(session: &SessionInfo, request: &RequestInfo) -> Result<ResponseInfo, ApiError> {
    request.verify()?;

    let url = resolve_url(session, request);
    tracing::debug!(method = %request.method, %url, "dispatching request");

    let client = pool::async_client(session);
    let mut builder = match request.method {
        HttpMethod::Get => client.get(&url),
        HttpMethod::Post => client.post(&url),
    };

    if let Some(query) = &request.query {
        builder = builder.query(query);
    }
    if let Some(headers) = &request.headers {
        for (name, value) in headers {
            builder = builder.header(name, value);
        }
    }
    if let Some(json) = &request.json_body {
        builder = builder.json(json);
    } else if let Some(body) = &request.body {
        builder = builder.body(body.clone());
    }

    let response = builder.send().await?;
    let code = response.status().as_u16();
    let final_url = response.url().clone();
    let headers = collect_headers(response.headers());
    let text = response.text().await?;

    Ok(ResponseInfo::new(code, Some(final_url), headers, text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(base: &str) -> SessionInfo {
        SessionInfo::new(base, HashMap::new())
    }

    #[test]
    fn test_resolve_url_joins_relative_paths() {
        let s = session("https://example.test/api/");
        let request = RequestInfo::get("/items/123").build().unwrap();
        assert_eq!(resolve_url(&s, &request), "https://example.test/api/items/123");
    }

    #[test]
    fn test_resolve_url_passes_absolute_urls_through() {
        let s = session("https://example.test/api");
        let request = RequestInfo::get("https://other.test/oauth/token")
            .build()
            .unwrap();
        assert_eq!(resolve_url(&s, &request), "https://other.test/oauth/token");
    }

    #[test]
    fn test_run_handlers_stops_at_first_error() {
        fn fail(_: &ResponseInfo) -> Result<(), ApiError> {
            Err(crate::clients::errors::ParseError {
                reason: "boom".to_string(),
            }
            .into())
        }
        fn unreachable_handler(_: &ResponseInfo) -> Result<(), ApiError> {
            panic!("handler after a failure must not run");
        }

        let response = ResponseInfo::new(200, None, HashMap::new(), String::new());
        let result = run_handlers(&[fail, unreachable_handler], &response);
        assert!(matches!(result, Err(ApiError::Parse(_))));
    }
}
