//! Error types for endpoint execution.
//!
//! The client distinguishes failures the way callers need to react to them:
//!
//! - [`ParseError`]: a response body was not valid JSON when JSON was
//!   expected; distinct from transport failures, never retried
//! - [`ResponseError`]: the server returned a recognized error envelope
//! - [`GraphQlError`]: a batched query response carried per-operation errors
//! - [`ItemLookupError`]: an item code could not be resolved after the
//!   bounded reconciliation retries
//! - [`InvalidRequestError`]: a request failed validation before sending
//! - [`ApiError`]: unified error type encompassing all of the above
//!
//! # Example
//!
//! ```rust,ignore
//! use ikea_api::{run, ApiError};
//!
//! match run(endpoint).await {
//!     Ok(value) => println!("{value}"),
//!     Err(ApiError::Api(e)) => println!("API error {}: {}", e.code, e.message),
//!     Err(ApiError::Parse(e)) => println!("bad body: {e}"),
//!     Err(other) => println!("{other}"),
//! }
//! ```

use thiserror::Error;

use crate::clients::http_response::ResponseInfo;

/// Error returned when a response body is not valid JSON.
///
/// JSON parsing is memoized on [`ResponseInfo`]; the same `ParseError` is
/// returned on every access after the first failed evaluation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("response body is not valid JSON: {reason}")]
pub struct ParseError {
    /// The underlying parser message.
    pub reason: String,
}

/// Error returned when the server answered with a recognized error envelope.
#[derive(Debug, Error)]
#[error("API error {code}: {message}")]
pub struct ResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// Human-readable message mined from the error envelope.
    pub message: String,
    /// The structured error list from the envelope, if any.
    pub errors: Option<serde_json::Value>,
}

impl ResponseError {
    /// Builds a `ResponseError` from a received response.
    ///
    /// Mines `message`, `error` and `error_description` fields from a JSON
    /// error envelope; falls back to the raw body text for non-JSON bodies.
    #[must_use]
    pub fn from_response(response: &ResponseInfo) -> Self {
        let (message, errors) = match response.json() {
            Ok(body) => {
                let message = body
                    .get("message")
                    .or_else(|| body.get("error"))
                    .or_else(|| body.get("error_description"))
                    .and_then(serde_json::Value::as_str)
                    .map_or_else(|| body.to_string(), ToString::to_string);
                (message, body.get("errors").cloned())
            }
            Err(_) => (response.text().trim().to_string(), None),
        };

        Self {
            code: response.status_code(),
            message,
            errors,
        }
    }
}

/// Error returned when a batched GraphQL response carried operation errors.
///
/// The `errors` list is flattened across every operation in the batch.
#[derive(Debug, Error)]
#[error("GraphQL response returned {} error(s)", errors.len())]
pub struct GraphQlError {
    /// The flattened per-operation error objects, verbatim.
    pub errors: Vec<serde_json::Value>,
}

/// Error returned when item codes could not be resolved.
///
/// Raised after the bounded reconciliation loop has exhausted its attempts
/// without classifying the offending codes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("could not resolve item code(s): {}", codes.join(", "))]
pub struct ItemLookupError {
    /// The codes that could not be resolved.
    pub codes: Vec<String>,
}

/// Error returned when a request fails validation before sending.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidRequestError {
    /// Both a JSON body and a raw body were provided.
    #[error("Cannot set both a JSON body and a raw body on one request.")]
    ConflictingBodies,

    /// A raw body was provided without a Content-Type header.
    #[error("Cannot set a raw body without a Content-Type header.")]
    MissingContentType,
}

/// Unified error type for all endpoint operations.
///
/// Error handlers and executors surface every failure through this enum,
/// making it possible to handle errors uniformly at API boundaries while
/// still pattern-matching on the specific failure class.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or connection failure. Not locally recoverable.
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body was not valid JSON when JSON was expected.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The server returned a recognized error envelope.
    #[error(transparent)]
    Api(#[from] ResponseError),

    /// A batched query response carried per-operation errors.
    #[error(transparent)]
    GraphQl(#[from] GraphQlError),

    /// Item codes could not be resolved after bounded retries.
    #[error(transparent)]
    ItemLookup(#[from] ItemLookupError),

    /// No valid item code could be extracted from the input.
    #[error(transparent)]
    ItemCode(#[from] crate::item_code::ItemCodeError),

    /// The login flow failed while scraping or exchanging tokens.
    #[error(transparent)]
    Auth(#[from] crate::auth::AuthError),

    /// Request validation failed before sending.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidRequestError),

    /// Token cache file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn response_with_body(code: u16, body: &str) -> ResponseInfo {
        ResponseInfo::new(code, None, HashMap::new(), body.to_string())
    }

    #[test]
    fn test_response_error_mines_message_field() {
        let response = response_with_body(400, r#"{"message":"bad zip code"}"#);
        let error = ResponseError::from_response(&response);
        assert_eq!(error.code, 400);
        assert_eq!(error.message, "bad zip code");
        assert!(error.errors.is_none());
    }

    #[test]
    fn test_response_error_falls_back_to_error_field() {
        let response = response_with_body(401, r#"{"error":"unauthorized"}"#);
        let error = ResponseError::from_response(&response);
        assert_eq!(error.message, "unauthorized");
    }

    #[test]
    fn test_response_error_keeps_structured_errors() {
        let response =
            response_with_body(404, r#"{"message":"not found","errors":[{"code":1101}]}"#);
        let error = ResponseError::from_response(&response);
        assert_eq!(error.errors, Some(serde_json::json!([{"code": 1101}])));
    }

    #[test]
    fn test_response_error_uses_raw_text_for_non_json() {
        let response = response_with_body(502, "Bad Gateway\n");
        let error = ResponseError::from_response(&response);
        assert_eq!(error.message, "Bad Gateway");
        assert_eq!(error.code, 502);
    }

    #[test]
    fn test_graphql_error_message_counts_errors() {
        let error = GraphQlError {
            errors: vec![serde_json::json!({"message": "a"}), serde_json::json!({"message": "b"})],
        };
        assert!(error.to_string().contains("2 error(s)"));
    }

    #[test]
    fn test_item_lookup_error_lists_codes() {
        let error = ItemLookupError {
            codes: vec!["11111111".to_string(), "22222222".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "could not resolve item code(s): 11111111, 22222222"
        );
    }

    #[test]
    fn test_error_types_implement_std_error() {
        let _: &dyn std::error::Error = &ParseError {
            reason: "eof".to_string(),
        };
        let _: &dyn std::error::Error = &InvalidRequestError::ConflictingBodies;
    }
}
