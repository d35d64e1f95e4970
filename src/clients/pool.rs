//! Process-wide transport client pool.
//!
//! Clients are expensive to construct (TLS state, connection pools), so one
//! client is lazily created per distinct frozen header set and reused across
//! calls. The cache never evicts: header sets are static per endpoint
//! group, so the pool can only grow to the number of distinct groups a
//! process constructs.

use std::collections::HashMap;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::clients::session::SessionInfo;

type HeaderKey = Vec<(String, String)>;

static ASYNC_POOL: Lazy<Mutex<HashMap<HeaderKey, reqwest::Client>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

static BLOCKING_POOL: Lazy<Mutex<HashMap<HeaderKey, reqwest::blocking::Client>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

fn key_of(session: &SessionInfo) -> HeaderKey {
    let mut key: HeaderKey = session
        .headers()
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    key.sort();
    key
}

fn header_map(session: &SessionInfo) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in session.headers() {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                map.insert(name, value);
            }
            _ => tracing::warn!("skipping invalid default header '{name}'"),
        }
    }
    map
}

/// Returns the shared async client for this session's header set.
///
/// # Panics
///
/// Panics if the underlying client cannot be created (TLS initialization
/// failure).
pub(crate) fn async_client(session: &SessionInfo) -> reqwest::Client {
    let mut pool = ASYNC_POOL.lock().expect("client pool mutex poisoned");
    pool.entry(key_of(session))
        .or_insert_with(|| {
            reqwest::Client::builder()
                .use_rustls_tls()
                .default_headers(header_map(session))
                .build()
                .expect("Failed to create HTTP client")
        })
        .clone()
}

/// Returns the shared blocking client for this session's header set.
///
/// # Panics
///
/// Panics if the underlying client cannot be created.
pub(crate) fn blocking_client(session: &SessionInfo) -> reqwest::blocking::Client {
    let mut pool = BLOCKING_POOL.lock().expect("client pool mutex poisoned");
    pool.entry(key_of(session))
        .or_insert_with(|| {
            reqwest::blocking::Client::builder()
                .use_rustls_tls()
                .default_headers(header_map(session))
                .build()
                .expect("Failed to create HTTP client")
        })
        .clone()
}
