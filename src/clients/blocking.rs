//! Blocking executor variant.
//!
//! Semantically identical to [`run`](crate::clients::run), with the same
//! request preparation, response wrapping and handler ordering, but the
//! calling thread blocks on transport I/O and only one request is in flight
//! at a time.

use crate::clients::endpoint::{Endpoint, Step};
use crate::clients::errors::ApiError;
use crate::clients::executor::{collect_headers, resolve_url, run_handlers};
use crate::clients::http_request::{HttpMethod, RequestInfo};
use crate::clients::http_response::ResponseInfo;
use crate::clients::pool;
use crate::clients::session::SessionInfo;

/// Drives an endpoint to completion, blocking the calling thread.
///
/// Must not be called from within an async runtime; use
/// [`run`](crate::clients::run) there instead.
///
/// # Errors
///
/// Returns the first error raised by a handler, by the endpoint itself, or
/// by the transport.
pub fn run_blocking<E: Endpoint>(mut endpoint: E) -> Result<E::Output, ApiError> {
    let mut step = endpoint.begin()?;
    loop {
        let request = match step {
            Step::Done(value) => return Ok(value),
            Step::Request(request) => request,
        };
        let response = send(endpoint.session_info(), &request)?;
        run_handlers(endpoint.error_handlers(), &response)?;
        step = endpoint.resume(response)?;
    }
}

fn send(session: &SessionInfo, request: &RequestInfo) -> Result<ResponseInfo, ApiError> {
    request.verify()?;

    let url = resolve_url(session, request);
    tracing::debug!(method = %request.method, %url, "dispatching request");

    let client = pool::blocking_client(session);
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

    let response = builder.send()?;
    let code = response.status().as_u16();
    let final_url = response.url().clone();
    let headers = collect_headers(response.headers());
    let text = response.text()?;

    Ok(ResponseInfo::new(code, Some(final_url), headers, text))
}
