//! Built-in error handlers.
//!
//! Handlers run eagerly after every response, in registration order, before
//! control returns to the endpoint. They may convert an otherwise-successful
//! HTTP exchange into an error (a 401 on an authenticated endpoint is always
//! fatal); conversely, endpoints that consume specific statuses internally
//! (404 fallback chains) simply register fewer handlers.

use crate::clients::errors::{ApiError, GraphQlError, ResponseError};
use crate::clients::endpoint::ErrorHandler;
use crate::clients::http_response::ResponseInfo;

/// The handler set most JSON endpoints use: decode check plus 401 rejection.
pub const DEFAULT: &[ErrorHandler] = &[handle_json_decode_error, handle_401];

/// The handler set for GraphQL endpoints: decode, 401, then per-operation
/// error flattening.
pub const GRAPHQL: &[ErrorHandler] = &[handle_json_decode_error, handle_401, handle_graphql_error];

/// Fails the execution if the body is not valid JSON.
///
/// # Errors
///
/// Returns [`ApiError::Parse`] for non-JSON bodies.
pub fn handle_json_decode_error(response: &ResponseInfo) -> Result<(), ApiError> {
    response.json()?;
    Ok(())
}

/// Fails the execution on a 401 response.
///
/// # Errors
///
/// Returns [`ApiError::Api`] carrying the error envelope when the server
/// rejected the credentials.
pub fn handle_401(response: &ResponseInfo) -> Result<(), ApiError> {
    if response.status_code() == 401 {
        return Err(ResponseError::from_response(response).into());
    }
    Ok(())
}

/// Fails the execution if a (possibly batched) GraphQL response carries
/// operation errors.
///
/// Accepts both a single response object and an array of per-operation
/// response objects; the error lists are flattened in order.
///
/// # Errors
///
/// Returns [`ApiError::GraphQl`] with the flattened error list.
pub fn handle_graphql_error(response: &ResponseInfo) -> Result<(), ApiError> {
    let Ok(body) = response.json() else {
        // Decoding problems belong to handle_json_decode_error.
        return Ok(());
    };

    let mut errors: Vec<serde_json::Value> = Vec::new();
    match body {
        serde_json::Value::Array(operations) => {
            for operation in operations {
                collect_errors(operation, &mut errors);
            }
        }
        other => collect_errors(other, &mut errors),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(GraphQlError { errors }.into())
    }
}

fn collect_errors(operation: &serde_json::Value, out: &mut Vec<serde_json::Value>) {
    if let Some(errors) = operation.get("errors").and_then(serde_json::Value::as_array) {
        out.extend(errors.iter().cloned());
    }
}
