//! Integration tests for the executors, over a local mock server.
//!
//! Both executor variants are exercised against real transport: request
//! shaping (URL resolution, header merging, bodies, query params),
//! response wrapping, handler ordering, and multi-step endpoints.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ikea_api::clients::{
    handlers, run, run_blocking, ApiError, Endpoint, ErrorHandler, JsonEndpoint, ParseError,
    RequestInfo, ResponseInfo, SessionInfo, Step,
};

fn session_for(server: &MockServer) -> SessionInfo {
    SessionInfo::new(server.uri(), HashMap::new())
}

fn json_endpoint(session: SessionInfo, request: RequestInfo) -> JsonEndpoint {
    JsonEndpoint::new(session, request, handlers::DEFAULT)
}

#[tokio::test]
async fn test_run_returns_final_parsed_json_unchanged() {
    let server = MockServer::start().await;
    let body = json!({"data": {"items": [{"itemNo": "00263850", "price": 79.99}]}});
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let endpoint = json_endpoint(session_for(&server), RequestInfo::get("status").build().unwrap());
    let value = run(endpoint).await.unwrap();
    assert_eq!(value, body);
}

#[tokio::test]
async fn test_session_headers_sent_and_request_headers_override() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lookup"))
        .and(header("X-Client-Id", "group-id"))
        .and(header("X-Extra", "per-request"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let mut session_headers = HashMap::new();
    session_headers.insert("X-Client-Id".to_string(), "group-id".to_string());
    let session = SessionInfo::new(server.uri(), session_headers);

    let request = RequestInfo::get("lookup")
        .header("X-Extra", "per-request")
        .build()
        .unwrap();

    run(json_endpoint(session, request)).await.unwrap();
}

#[tokio::test]
async fn test_query_params_and_json_body_are_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(query_param("debug", "true"))
        .and(body_json(json!({"query": "query { cart }"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let request = RequestInfo::post("graphql")
        .query_param("debug", "true")
        .json_body(json!({"query": "query { cart }"}))
        .build()
        .unwrap();

    run(json_endpoint(session_for(&server), request)).await.unwrap();
}

#[tokio::test]
async fn test_non_json_body_with_default_handlers_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;

    let endpoint = json_endpoint(session_for(&server), RequestInfo::get("page").build().unwrap());
    let result = run(endpoint).await;
    assert!(matches!(result, Err(ApiError::Parse(_))));
}

#[tokio::test]
async fn test_graphql_errors_abort_with_flattened_list() {
    let server = MockServer::start().await;
    let body = json!({
        "data": null,
        "errors": [{"message": "first"}, {"message": "second"}]
    });
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let request = RequestInfo::post("graphql")
        .json_body(json!({"query": "{}"}))
        .build()
        .unwrap();
    let endpoint = JsonEndpoint::new(session_for(&server), request, handlers::GRAPHQL);

    match run(endpoint).await {
        Err(ApiError::GraphQl(e)) => {
            assert_eq!(e.errors.len(), 2);
            assert_eq!(e.errors[0]["message"], "first");
        }
        other => panic!("expected GraphQl error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_401_handler_rejects_before_endpoint_resumes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/private"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": "token expired"})),
        )
        .mount(&server)
        .await;

    let endpoint = json_endpoint(
        session_for(&server),
        RequestInfo::get("private").build().unwrap(),
    );
    match run(endpoint).await {
        Err(ApiError::Api(e)) => {
            assert_eq!(e.code, 401);
            assert_eq!(e.message, "token expired");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

// === Handler ordering over real execution ===

static FIRST_HANDLER_CALLS: AtomicUsize = AtomicUsize::new(0);

fn failing_first_handler(_: &ResponseInfo) -> Result<(), ApiError> {
    FIRST_HANDLER_CALLS.fetch_add(1, Ordering::SeqCst);
    Err(ParseError {
        reason: "rejected by the first handler".to_string(),
    }
    .into())
}

fn must_not_run_handler(_: &ResponseInfo) -> Result<(), ApiError> {
    panic!("a handler after a failing one must not run");
}

const ORDERED_HANDLERS: &[ErrorHandler] = &[failing_first_handler, must_not_run_handler];

#[tokio::test]
async fn test_handlers_run_in_registration_order_and_first_error_stops() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ordered"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let endpoint = JsonEndpoint::new(
        session_for(&server),
        RequestInfo::get("ordered").build().unwrap(),
        ORDERED_HANDLERS,
    );

    let result = run(endpoint).await;
    assert!(matches!(result, Err(ApiError::Parse(_))));
    assert_eq!(FIRST_HANDLER_CALLS.load(Ordering::SeqCst), 1);
}

// === Multi-step endpoint over real transport ===

/// A two-step lookup: try the primary path, fall back once on 404.
struct FallbackLookup {
    session: SessionInfo,
    fell_back: bool,
}

impl Endpoint for FallbackLookup {
    type Output = serde_json::Value;

    fn session_info(&self) -> &SessionInfo {
        &self.session
    }

    fn begin(&mut self) -> Result<Step<Self::Output>, ApiError> {
        Ok(Step::Request(RequestInfo::get("primary").build()?))
    }

    fn resume(&mut self, response: ResponseInfo) -> Result<Step<Self::Output>, ApiError> {
        if response.status_code() == 404 && !self.fell_back {
            self.fell_back = true;
            return Ok(Step::Request(RequestInfo::get("fallback").build()?));
        }
        Ok(Step::Done(response.json()?.clone()))
    }
}

#[tokio::test]
async fn test_multi_step_endpoint_drives_fallback_over_transport() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/primary"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/fallback"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"found": true})))
        .expect(1)
        .mount(&server)
        .await;

    let endpoint = FallbackLookup {
        session: session_for(&server),
        fell_back: false,
    };
    let value = run(endpoint).await.unwrap();
    assert_eq!(value, json!({"found": true}));
}

// === Blocking executor parity ===

#[tokio::test]
async fn test_blocking_executor_returns_identical_result() {
    let server = MockServer::start().await;
    let body = json!({"parity": "identical"});
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .expect(2)
        .mount(&server)
        .await;

    let session = session_for(&server);
    let async_value = run(json_endpoint(
        session.clone(),
        RequestInfo::get("status").build().unwrap(),
    ))
    .await
    .unwrap();

    // The blocking variant runs on its own thread; it must produce the
    // same value for the same exchange.
    let blocking_session = session.clone();
    let blocking_value = tokio::task::spawn_blocking(move || {
        run_blocking(json_endpoint(
            blocking_session,
            RequestInfo::get("status").build().unwrap(),
        ))
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(async_value, body);
    assert_eq!(blocking_value, body);
}

#[tokio::test]
async fn test_blocking_executor_surfaces_handler_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/private"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "nope"})))
        .mount(&server)
        .await;

    let session = session_for(&server);
    let result = tokio::task::spawn_blocking(move || {
        run_blocking(json_endpoint(
            session,
            RequestInfo::get("private").build().unwrap(),
        ))
    })
    .await
    .unwrap();

    match result {
        Err(ApiError::Api(e)) => assert_eq!(e.code, 401),
        other => panic!("expected Api error, got {other:?}"),
    }
}
