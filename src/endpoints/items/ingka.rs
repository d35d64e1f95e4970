//! Item communications lookup.
//!
//! The primary item-data service: one GET per batch of up to 50 codes.
//! Unlike the legacy catalog it accepts bare codes, but it reports failures
//! inside a 200 response, so a dedicated handler rejects its error envelope.

use crate::clients::{
    base_headers, handlers, ApiError, ErrorHandler, JsonEndpoint, RequestInfo, ResponseError,
    ResponseInfo, SessionInfo,
};
use crate::config::Constants;

const INGKA_BASE_URL: &str = "https://api.ingka.ikea.com";

/// Client id the website presents to the item service.
const ITEMS_CLIENT_ID: &str = "c4faceb6-0598-44a2-bae4-2c02f4019d06";

/// Largest batch one request accepts.
pub const MAX_BATCH_SIZE: usize = 50;

/// Rejects the service's in-band error envelope.
///
/// # Errors
///
/// Returns [`ApiError::Api`] when the body carries an `error` object even
/// though the HTTP status may be 200.
pub fn handle_ingka_error(response: &ResponseInfo) -> Result<(), ApiError> {
    let Ok(body) = response.json() else {
        return Ok(());
    };
    if body.get("error").is_some() {
        return Err(ResponseError::from_response(response).into());
    }
    Ok(())
}

const INGKA_HANDLERS: &[ErrorHandler] = &[
    handlers::handle_json_decode_error,
    handlers::handle_401,
    handle_ingka_error,
];

/// The item communications endpoint group.
#[derive(Debug)]
pub struct IngkaItems {
    session: SessionInfo,
}

impl IngkaItems {
    /// Creates the group for the given locale.
    #[must_use]
    pub fn new(constants: &Constants) -> Self {
        let mut headers = base_headers(constants);
        headers.insert("X-Client-Id".to_string(), ITEMS_CLIENT_ID.to_string());
        let base = format!(
            "{INGKA_BASE_URL}/salesitem/communications/{}/{}",
            constants.country().as_ref(),
            constants.language().as_ref()
        );
        Self {
            session: SessionInfo::new(base, headers),
        }
    }

    /// Builds the batch lookup endpoint.
    ///
    /// Callers chunk larger code lists (the wrappers do this); one request
    /// carries at most [`MAX_BATCH_SIZE`] codes.
    ///
    /// # Panics
    ///
    /// Panics if more than [`MAX_BATCH_SIZE`] codes are passed.
    #[must_use]
    pub fn get_items<S: AsRef<str>>(&self, item_codes: &[S]) -> JsonEndpoint {
        assert!(
            item_codes.len() <= MAX_BATCH_SIZE,
            "at most {MAX_BATCH_SIZE} item codes per request"
        );
        let joined = item_codes
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(",");
        let request = RequestInfo::get("")
            .query_param("itemNos", joined)
            .build()
            .expect("static item request is valid");
        JsonEndpoint::new(self.session.clone(), request, INGKA_HANDLERS)
    }
}
