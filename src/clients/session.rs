//! Session info shared by all requests of one endpoint group.

use std::collections::HashMap;

use crate::config::Constants;

/// Base URL and default headers shared by all requests of one endpoint
/// group.
///
/// A `SessionInfo` is constructed once when an endpoint-group object is
/// created from [`Constants`] and is immutable afterwards. Every
/// [`RequestInfo`](crate::clients::RequestInfo) the group yields is resolved
/// against its `base_url`, and the default headers are merged under the
/// request's own headers before transport.
///
/// The frozen header set also keys the process-wide connection pool: groups
/// with identical headers share one transport client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionInfo {
    base_url: String,
    headers: HashMap<String, String>,
}

impl SessionInfo {
    /// Creates a new session info from a base URL and default headers.
    #[must_use]
    pub fn new(base_url: impl Into<String>, headers: HashMap<String, String>) -> Self {
        Self {
            base_url: base_url.into(),
            headers,
        }
    }

    /// Returns the base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the default headers sent with every request.
    #[must_use]
    pub const fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }
}

/// Builds the browser-imitating headers every endpoint group starts from.
///
/// The remote service rejects requests that do not look like they came from
/// the official website, so the defaults carry the website origin and an
/// ordinary browser `Accept` set. Endpoint groups extend the map with their
/// own service-specific headers (client ids, tokens).
#[must_use]
pub fn base_headers(constants: &Constants) -> HashMap<String, String> {
    let mut headers = HashMap::new();
    headers.insert("Accept".to_string(), "*/*".to_string());
    headers.insert(
        "Accept-Language".to_string(),
        format!(
            "{}-{}",
            constants.language().as_ref(),
            constants.country().as_ref()
        ),
    );
    headers.insert("Connection".to_string(), "keep-alive".to_string());
    headers.insert("Origin".to_string(), constants.base_url().to_string());
    headers.insert(
        "Referer".to_string(),
        format!("{}/", constants.local_base_url()),
    );
    headers.insert("User-Agent".to_string(), constants.user_agent());
    headers
}
