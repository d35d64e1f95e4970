//! Product-information-page lookup with a bounded 404 fallback.
//!
//! Product pages live under two URL shapes: combinations carry an `s`
//! prefix, single articles do not, and which one a code needs is not
//! knowable in advance. The endpoint tries the plain URL first and, on a
//! 404, issues exactly one fallback request with the prefixed shape; a
//! second failure is surfaced, never a third request.

use crate::clients::{
    base_headers, ApiError, Endpoint, ErrorHandler, RequestInfo, ResponseError, ResponseInfo,
    SessionInfo, Step,
};
use crate::config::Constants;

/// The product-page endpoint group.
#[derive(Debug)]
pub struct PipItem {
    session: SessionInfo,
}

impl PipItem {
    /// Creates the group for the given locale.
    #[must_use]
    pub fn new(constants: &Constants) -> Self {
        Self {
            session: SessionInfo::new(constants.local_base_url(), base_headers(constants)),
        }
    }

    /// Builds the lookup endpoint for one item code.
    #[must_use]
    pub fn get_item(&self, item_code: impl Into<String>) -> PipItemEndpoint {
        PipItemEndpoint {
            session: self.session.clone(),
            item_code: item_code.into(),
            state: PipState::Start,
        }
    }
}

#[derive(Debug)]
enum PipState {
    Start,
    AwaitPrimary,
    AwaitFallback,
    Finished,
}

/// Single-item page lookup with the 404 fallback.
#[derive(Debug)]
pub struct PipItemEndpoint {
    session: SessionInfo,
    item_code: String,
    state: PipState,
}

impl PipItemEndpoint {
    /// Pages are sharded by the last three digits of the code.
    fn shard(&self) -> &str {
        let digits = self.item_code.len();
        &self.item_code[digits.saturating_sub(3)..]
    }

    fn primary_request(&self) -> RequestInfo {
        RequestInfo::get(format!("products/{}/{}.json", self.shard(), self.item_code))
            .build()
            .expect("static product-page request is valid")
    }

    fn fallback_request(&self) -> RequestInfo {
        RequestInfo::get(format!("products/{}/s{}.json", self.shard(), self.item_code))
            .build()
            .expect("static product-page request is valid")
    }
}

impl Endpoint for PipItemEndpoint {
    type Output = serde_json::Value;

    fn session_info(&self) -> &SessionInfo {
        &self.session
    }

    // The 404 on the primary shape is expected and consumed internally.
    fn error_handlers(&self) -> &[ErrorHandler] {
        &[]
    }

    fn begin(&mut self) -> Result<Step<Self::Output>, ApiError> {
        assert!(
            matches!(self.state, PipState::Start),
            "endpoint started more than once"
        );
        self.state = PipState::AwaitPrimary;
        Ok(Step::Request(self.primary_request()))
    }

    fn resume(&mut self, response: ResponseInfo) -> Result<Step<Self::Output>, ApiError> {
        match self.state {
            PipState::AwaitPrimary => {
                if response.status_code() == 404 {
                    tracing::warn!(
                        item_code = %self.item_code,
                        "product page not found, trying combination shape"
                    );
                    self.state = PipState::AwaitFallback;
                    return Ok(Step::Request(self.fallback_request()));
                }
                if !response.is_ok() {
                    return Err(ResponseError::from_response(&response).into());
                }
                self.state = PipState::Finished;
                Ok(Step::Done(response.json()?.clone()))
            }
            PipState::AwaitFallback => {
                if !response.is_ok() {
                    return Err(ResponseError::from_response(&response).into());
                }
                self.state = PipState::Finished;
                Ok(Step::Done(response.json()?.clone()))
            }
            PipState::Start | PipState::Finished => panic!("endpoint resumed after completion"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn response(code: u16, body: &str) -> ResponseInfo {
        ResponseInfo::new(code, None, HashMap::new(), body.to_string())
    }

    fn endpoint() -> PipItemEndpoint {
        PipItem::new(&Constants::default()).get_item("00263850")
    }

    fn path_of<T>(step: &Step<T>) -> String {
        match step {
            Step::Request(request) => request.path.clone(),
            Step::Done(_) => panic!("expected a request step"),
        }
    }

    #[test]
    fn test_primary_url_shape() {
        let mut endpoint = endpoint();
        let step = endpoint.begin().unwrap();
        assert_eq!(path_of(&step), "products/850/00263850.json");
    }

    #[test]
    fn test_success_completes_without_fallback() {
        let mut endpoint = endpoint();
        endpoint.begin().unwrap();

        let body = json!({"name": "BILLY"});
        let step = endpoint.resume(response(200, &body.to_string())).unwrap();
        assert_eq!(step.into_done().unwrap(), body);
    }

    #[test]
    fn test_404_triggers_exactly_one_fallback_request() {
        let mut endpoint = endpoint();
        endpoint.begin().unwrap();

        let step = endpoint.resume(response(404, "")).unwrap();
        assert_eq!(path_of(&step), "products/850/s00263850.json");

        // The fallback response failing to parse surfaces an error, never
        // a third request.
        let result = endpoint.resume(response(200, "<html>not found</html>"));
        assert!(matches!(result, Err(ApiError::Parse(_))));
    }

    #[test]
    fn test_fallback_404_surfaces_api_error() {
        let mut endpoint = endpoint();
        endpoint.begin().unwrap();
        endpoint.resume(response(404, "")).unwrap();

        let result = endpoint.resume(response(404, r#"{"message":"gone"}"#));
        match result {
            Err(ApiError::Api(e)) => assert_eq!(e.code, 404),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_non_404_error_does_not_fall_back() {
        let mut endpoint = endpoint();
        endpoint.begin().unwrap();

        let result = endpoint.resume(response(500, r#"{"message":"oops"}"#));
        assert!(matches!(result, Err(ApiError::Api(_))));
    }

    #[test]
    #[should_panic(expected = "resumed after completion")]
    fn test_endpoint_is_single_use() {
        let mut endpoint = endpoint();
        endpoint.begin().unwrap();
        endpoint.resume(response(200, "{}")).unwrap();
        let _ = endpoint.resume(response(200, "{}"));
    }
}
