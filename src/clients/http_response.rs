//! Incoming-response envelope types.
//!
//! This module provides the [`ResponseInfo`] type wrapping one underlying
//! transport response: status code, final URL, headers, body text, and a
//! memoized JSON view of the body.

use std::collections::HashMap;

use once_cell::sync::OnceCell;
use url::Url;

use crate::clients::errors::ParseError;

/// One received HTTP response.
///
/// Wraps exactly one transport response. The JSON view of the body is
/// computed on first access and memoized; repeated calls return the same
/// parsed value (or the same [`ParseError`]) without re-parsing, so the
/// accessor is pure and idempotent after first evaluation.
///
/// Header keys are lowercased; a header may carry multiple values.
///
/// # Example
///
/// ```rust
/// use ikea_api::clients::ResponseInfo;
/// use std::collections::HashMap;
///
/// let response = ResponseInfo::new(200, None, HashMap::new(), r#"{"ok":true}"#.to_string());
/// assert!(response.is_ok());
/// assert_eq!(response.json().unwrap()["ok"], true);
/// ```
#[derive(Debug)]
pub struct ResponseInfo {
    code: u16,
    url: Option<Url>,
    headers: HashMap<String, Vec<String>>,
    text: String,
    json: OnceCell<Result<serde_json::Value, ParseError>>,
}

// Verify ResponseInfo is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResponseInfo>();
};

impl ResponseInfo {
    /// Creates a new `ResponseInfo`.
    ///
    /// `url` is the final URL after any transport-followed redirects; the
    /// login flow reads its authorization code from it. Header keys are
    /// expected lowercased, as produced by the executors.
    #[must_use]
    pub fn new(
        code: u16,
        url: Option<Url>,
        headers: HashMap<String, Vec<String>>,
        text: String,
    ) -> Self {
        Self {
            code,
            url,
            headers,
            text,
            json: OnceCell::new(),
        }
    }

    /// Returns the HTTP status code.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.code
    }

    /// Returns `true` if the status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the final URL of the response, after redirects.
    #[must_use]
    pub const fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// Returns all response headers.
    #[must_use]
    pub const fn headers(&self) -> &HashMap<String, Vec<String>> {
        &self.headers
    }

    /// Returns the first value of the given header, if present.
    ///
    /// Lookup is case-insensitive.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns every value of the given header.
    #[must_use]
    pub fn header_values(&self, name: &str) -> &[String] {
        self.headers
            .get(&name.to_lowercase())
            .map_or(&[], Vec::as_slice)
    }

    /// Returns the response body text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the body parsed as JSON.
    ///
    /// Parsing happens once; subsequent calls return the memoized value or
    /// the memoized error.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the body is not valid JSON. This is
    /// surfaced distinctly from transport errors and is never retried.
    pub fn json(&self) -> Result<&serde_json::Value, ParseError> {
        self.json
            .get_or_init(|| {
                serde_json::from_str(&self.text).map_err(|e| ParseError {
                    reason: e.to_string(),
                })
            })
            .as_ref()
            .map_err(Clone::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(code: u16, body: &str) -> ResponseInfo {
        ResponseInfo::new(code, None, HashMap::new(), body.to_string())
    }

    #[test]
    fn test_is_ok_for_2xx_only() {
        assert!(response(200, "{}").is_ok());
        assert!(response(204, "").is_ok());
        assert!(!response(301, "").is_ok());
        assert!(!response(404, "").is_ok());
        assert!(!response(500, "").is_ok());
    }

    #[test]
    fn test_json_round_trips_parsed_body() {
        let body = json!({"data": {"cart": {"quantity": 3}}});
        let info = response(200, &body.to_string());
        assert_eq!(info.json().unwrap(), &body);
    }

    #[test]
    fn test_json_is_memoized_and_idempotent() {
        let info = response(200, r#"{"a":1}"#);
        let first = info.json().unwrap() as *const serde_json::Value;
        let second = info.json().unwrap() as *const serde_json::Value;
        // Same allocation on both accesses: parsed exactly once.
        assert_eq!(first, second);
    }

    #[test]
    fn test_json_failure_is_stable_parse_error() {
        let info = response(200, "<html></html>");
        let first = info.json().unwrap_err();
        let second = info.json().unwrap_err();
        assert_eq!(first, second);
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let mut headers = HashMap::new();
        headers.insert(
            "set-cookie".to_string(),
            vec!["a=1".to_string(), "b=2".to_string()],
        );

        let info = ResponseInfo::new(200, None, headers, String::new());
        assert_eq!(info.header("Set-Cookie"), Some("a=1"));
        assert_eq!(info.header_values("SET-COOKIE"), &["a=1", "b=2"]);
        assert!(info.header("link").is_none());
    }

    #[test]
    fn test_url_is_exposed() {
        let url = Url::parse("https://example.test/callback?code=abc").unwrap();
        let info = ResponseInfo::new(200, Some(url.clone()), HashMap::new(), String::new());
        assert_eq!(info.url(), Some(&url));
    }
}
