//! Outgoing-request envelope types.
//!
//! This module provides the [`RequestInfo`] type and its builder. A
//! `RequestInfo` describes one HTTP call an endpoint wants performed; it is
//! created fresh at each suspension point and is immutable once yielded.

use std::collections::HashMap;
use std::fmt;

use crate::clients::errors::InvalidRequestError;

/// HTTP methods the remote APIs are called with.
///
/// The website's own traffic only ever uses these two.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET method for lookups.
    Get,
    /// HTTP POST method for mutations and queries with bodies.
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Post => write!(f, "post"),
        }
    }
}

/// One HTTP call an endpoint wants performed.
///
/// The `path` is resolved against the originating
/// [`SessionInfo`](crate::clients::SessionInfo)'s base URL before transport;
/// an absolute `http(s)://` path is used as-is, which multi-host flows (the
/// login sequence) rely on.
///
/// # Example
///
/// ```rust
/// use ikea_api::clients::{HttpMethod, RequestInfo};
/// use serde_json::json;
///
/// let request = RequestInfo::builder(HttpMethod::Post, "checkouts")
///     .json_body(json!({"zipCode": "10001"}))
///     .header("X-Client-Id", "abc")
///     .build()
///     .unwrap();
///
/// assert_eq!(request.path, "checkouts");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct RequestInfo {
    /// The HTTP method for this request.
    pub method: HttpMethod,
    /// The path, relative to the session base URL (or absolute).
    pub path: String,
    /// Query parameters to append to the URL.
    pub query: Option<HashMap<String, String>>,
    /// Opaque text body (form posts); requires a Content-Type header.
    pub body: Option<String>,
    /// Structured JSON body, sent as `application/json`.
    pub json_body: Option<serde_json::Value>,
    /// Headers overriding/extending the session headers.
    pub headers: Option<HashMap<String, String>>,
}

impl RequestInfo {
    /// Creates a new builder for constructing a `RequestInfo`.
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> RequestInfoBuilder {
        RequestInfoBuilder::new(method, path)
    }

    /// Shorthand for a GET builder.
    #[must_use]
    pub fn get(path: impl Into<String>) -> RequestInfoBuilder {
        Self::builder(HttpMethod::Get, path)
    }

    /// Shorthand for a POST builder.
    #[must_use]
    pub fn post(path: impl Into<String>) -> RequestInfoBuilder {
        Self::builder(HttpMethod::Post, path)
    }

    /// Validates the request.
    ///
    /// # Errors
    ///
    /// - [`InvalidRequestError::ConflictingBodies`] if both `body` and
    ///   `json_body` are set
    /// - [`InvalidRequestError::MissingContentType`] if a raw `body` is set
    ///   without a `Content-Type` header
    pub fn verify(&self) -> Result<(), InvalidRequestError> {
        if self.body.is_some() && self.json_body.is_some() {
            return Err(InvalidRequestError::ConflictingBodies);
        }

        if self.body.is_some() {
            let has_content_type = self
                .headers
                .as_ref()
                .is_some_and(|headers| headers.keys().any(|k| k.eq_ignore_ascii_case("content-type")));
            if !has_content_type {
                return Err(InvalidRequestError::MissingContentType);
            }
        }

        Ok(())
    }
}

/// Builder for constructing [`RequestInfo`] instances.
#[derive(Debug)]
pub struct RequestInfoBuilder {
    method: HttpMethod,
    path: String,
    query: Option<HashMap<String, String>>,
    body: Option<String>,
    json_body: Option<serde_json::Value>,
    headers: Option<HashMap<String, String>>,
}

impl RequestInfoBuilder {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            body: None,
            json_body: None,
            headers: None,
        }
    }

    /// Adds a single query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Sets all query parameters at once.
    #[must_use]
    pub fn query(mut self, query: HashMap<String, String>) -> Self {
        self.query = Some(query);
        self
    }

    /// Sets an opaque text body (form posts).
    ///
    /// A raw body requires an explicit `Content-Type` header.
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets a structured JSON body.
    #[must_use]
    pub fn json_body(mut self, body: impl Into<serde_json::Value>) -> Self {
        self.json_body = Some(body.into());
        self
    }

    /// Adds a single header, overriding the session default of the same name.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Sets all extra headers at once.
    #[must_use]
    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Builds the [`RequestInfo`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRequestError`] if the request fails validation.
    pub fn build(self) -> Result<RequestInfo, InvalidRequestError> {
        let request = RequestInfo {
            method: self.method,
            path: self.path,
            query: self.query,
            body: self.body,
            json_body: self.json_body,
            headers: self.headers,
        };
        request.verify()?;
        Ok(request)
    }
}
