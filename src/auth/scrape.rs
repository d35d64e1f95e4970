//! HTML extraction seams for the login flow.
//!
//! The vendor embeds everything the flow needs in its HTML pages: a base64
//! JSON configuration blob on the login page, and two hidden form fields in
//! the credential response. Both extractors are deliberately narrow so the
//! brittle, vendor-specific parsing can be swapped or mocked independently
//! of the OAuth step sequence.

use base64::prelude::*;
use scraper::{Html, Selector};
use serde::Deserialize;

use crate::auth::AuthError;

/// Session configuration scraped from the login page.
///
/// Decoded from the base64-JSON blob the page embeds for its own login
/// script.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// OAuth client id the website itself uses.
    pub client_id: String,
    /// Host of the authentication service.
    pub auth_domain: String,
    /// Scope string the website requests.
    pub scope: String,
}

/// Hidden form fields scraped from the credential response page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HiddenFields {
    /// Opaque flow-context value, posted back verbatim.
    pub wctx: String,
    /// Signed credential result, posted back verbatim.
    pub wresult: String,
}

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

/// Extracts the session configuration blob from the login page.
///
/// # Errors
///
/// Returns [`AuthError::MissingSessionConfig`] when the element, its
/// attribute, the base64 layer or the JSON layer is missing or malformed,
/// all of which usually mean the vendor changed the page.
pub fn extract_session_config(html: &str) -> Result<SessionConfig, AuthError> {
    let document = Html::parse_document(html);

    let element = document
        .select(&selector("div#session-config"))
        .next()
        .ok_or(AuthError::MissingSessionConfig {
            reason: "no #session-config element".to_string(),
        })?;

    let encoded =
        element
            .value()
            .attr("data-config")
            .ok_or(AuthError::MissingSessionConfig {
                reason: "#session-config has no data-config attribute".to_string(),
            })?;

    let decoded =
        BASE64_STANDARD
            .decode(encoded.trim())
            .map_err(|e| AuthError::MissingSessionConfig {
                reason: format!("data-config is not base64: {e}"),
            })?;

    serde_json::from_slice(&decoded).map_err(|e| AuthError::MissingSessionConfig {
        reason: format!("decoded blob is not the expected JSON: {e}"),
    })
}

/// Extracts the `wctx`/`wresult` hidden form fields from the credential
/// response page.
///
/// # Errors
///
/// Returns [`AuthError::MissingHiddenField`] naming the first field that
/// could not be found.
pub fn extract_hidden_fields(html: &str) -> Result<HiddenFields, AuthError> {
    let document = Html::parse_document(html);

    let value_of = |name: &'static str, css: &'static str| {
        document
            .select(&selector(css))
            .next()
            .and_then(|input| input.value().attr("value"))
            .map(ToString::to_string)
            .ok_or(AuthError::MissingHiddenField { field: name })
    };

    Ok(HiddenFields {
        wctx: value_of("wctx", r#"input[name="wctx"]"#)?,
        wresult: value_of("wresult", r#"input[name="wresult"]"#)?,
    })
}
