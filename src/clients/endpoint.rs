//! The suspend/resume endpoint protocol.
//!
//! An endpoint is one declaratively defined remote operation: a state
//! machine that yields [`RequestInfo`]s one at a time and is resumed with
//! the matching [`ResponseInfo`] until it produces a final typed result.
//! This lets multi-step flows ("try the primary URL, fall back on 404") be
//! written as linear step logic instead of chained callbacks, and it
//! composes: a parent endpoint may forward the steps of an embedded child
//! endpoint and consume its final value as an intermediate result.
//!
//! Executors ([`run`](crate::clients::run) /
//! [`run_blocking`](crate::clients::run_blocking)) drive any [`Endpoint`] to
//! completion. Error handlers are a declared part of the endpoint: they run
//! in registration order after every response, and the first one that
//! returns an error aborts the execution.

use crate::clients::errors::ApiError;
use crate::clients::http_request::RequestInfo;
use crate::clients::http_response::ResponseInfo;
use crate::clients::session::SessionInfo;

/// What an endpoint produced at one step: another request, or completion.
#[derive(Debug)]
pub enum Step<T> {
    /// The endpoint wants this request performed and its response fed back.
    Request(RequestInfo),
    /// The endpoint completed with its final result.
    Done(T),
}

impl<T> Step<T> {
    /// Returns the contained request, if this step is a request.
    pub fn into_request(self) -> Option<RequestInfo> {
        match self {
            Self::Request(request) => Some(request),
            Self::Done(_) => None,
        }
    }

    /// Returns the final result, if this step is completion.
    pub fn into_done(self) -> Option<T> {
        match self {
            Self::Request(_) => None,
            Self::Done(value) => Some(value),
        }
    }
}

/// A check run against every received response before the endpoint resumes.
///
/// Handlers either do nothing or return a classified error. They run in
/// registration order; the first error stops subsequent handlers and aborts
/// the execution.
pub type ErrorHandler = fn(&ResponseInfo) -> Result<(), ApiError>;

/// One declaratively defined remote operation.
///
/// # Contract
///
/// - [`begin`](Self::begin) is called exactly once and yields the first
///   step.
/// - For every yielded [`Step::Request`], [`resume`](Self::resume) is called
///   exactly once with the matching response.
/// - After a [`Step::Done`] (or an error), the endpoint is spent and must
///   not be re-entered; endpoints are single-use values.
/// - Non-2xx statuses are not automatically fatal: the endpoint's `resume`
///   and its [`error_handlers`](Self::error_handlers) decide what is an
///   error.
pub trait Endpoint {
    /// The final typed result of a completed execution.
    type Output;

    /// Returns the session info requests of this endpoint resolve against.
    fn session_info(&self) -> &SessionInfo;

    /// Returns the error handlers, in registration order.
    fn error_handlers(&self) -> &[ErrorHandler] {
        &[]
    }

    /// Starts the endpoint, producing its first step.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the first request cannot be constructed.
    fn begin(&mut self) -> Result<Step<Self::Output>, ApiError>;

    /// Resumes the endpoint with the response to its last yielded request.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the response makes completion impossible.
    ///
    /// # Panics
    ///
    /// Implementations panic when resumed after completion; that is a
    /// programmer error in the driving code, not a runtime condition.
    fn resume(&mut self, response: ResponseInfo) -> Result<Step<Self::Output>, ApiError>;
}

/// The generic single-step endpoint: one prebuilt request, parsed JSON out.
///
/// Covers every one-shot operation (cart mutations, searches, availability
/// lookups). Multi-step flows get dedicated state machines.
///
/// # Example
///
/// ```rust
/// use ikea_api::clients::{handlers, JsonEndpoint, RequestInfo, SessionInfo};
/// use std::collections::HashMap;
///
/// let session = SessionInfo::new("https://example.test", HashMap::new());
/// let request = RequestInfo::get("status").build().unwrap();
/// let endpoint = JsonEndpoint::new(session, request, handlers::DEFAULT);
/// ```
#[derive(Debug)]
pub struct JsonEndpoint {
    session: SessionInfo,
    request: Option<RequestInfo>,
    handlers: &'static [ErrorHandler],
}

impl JsonEndpoint {
    /// Creates a single-step endpoint from a prebuilt request.
    #[must_use]
    pub const fn new(
        session: SessionInfo,
        request: RequestInfo,
        handlers: &'static [ErrorHandler],
    ) -> Self {
        Self {
            session,
            request: Some(request),
            handlers,
        }
    }
}

impl Endpoint for JsonEndpoint {
    type Output = serde_json::Value;

    fn session_info(&self) -> &SessionInfo {
        &self.session
    }

    fn error_handlers(&self) -> &[ErrorHandler] {
        self.handlers
    }

    fn begin(&mut self) -> Result<Step<Self::Output>, ApiError> {
        let request = self
            .request
            .take()
            .expect("endpoint started more than once");
        Ok(Step::Request(request))
    }

    fn resume(&mut self, response: ResponseInfo) -> Result<Step<Self::Output>, ApiError> {
        Ok(Step::Done(response.json()?.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::handlers;
    use std::collections::HashMap;

    fn test_endpoint() -> JsonEndpoint {
        let session = SessionInfo::new("https://example.test", HashMap::new());
        let request = RequestInfo::get("status").build().unwrap();
        JsonEndpoint::new(session, request, handlers::DEFAULT)
    }

    fn response(body: &str) -> ResponseInfo {
        ResponseInfo::new(200, None, HashMap::new(), body.to_string())
    }

    #[test]
    fn test_json_endpoint_yields_request_then_parsed_json() {
        let mut endpoint = test_endpoint();

        let step = endpoint.begin().unwrap();
        let request = step.into_request().expect("first step is a request");
        assert_eq!(request.path, "status");

        let step = endpoint.resume(response(r#"{"ok":true}"#)).unwrap();
        let value = step.into_done().expect("second step is completion");
        assert_eq!(value, serde_json::json!({"ok": true}));
    }

    #[test]
    fn test_json_endpoint_surfaces_parse_error() {
        let mut endpoint = test_endpoint();
        endpoint.begin().unwrap();

        let result = endpoint.resume(response("not json"));
        assert!(matches!(result, Err(ApiError::Parse(_))));
    }

    #[test]
    #[should_panic(expected = "started more than once")]
    fn test_json_endpoint_is_single_use() {
        let mut endpoint = test_endpoint();
        endpoint.begin().unwrap();
        let _ = endpoint.begin();
    }

    #[test]
    fn test_step_accessors() {
        let request = RequestInfo::get("x").build().unwrap();
        assert!(Step::<()>::Request(request).into_request().is_some());
        assert_eq!(Step::Done(7).into_done(), Some(7));
        assert!(Step::Done(7).into_request().is_none());
    }
}
