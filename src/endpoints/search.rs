//! Catalog search: free-text and image-based.

use base64::prelude::*;
use serde_json::json;

use crate::clients::{base_headers, handlers, JsonEndpoint, RequestInfo, SessionInfo};
use crate::config::Constants;

const SEARCH_BASE_URL: &str = "https://sik.search.blue.cdtapps.com";

/// The search endpoint group. Works without any token.
#[derive(Debug)]
pub struct Search {
    session: SessionInfo,
}

impl Search {
    /// Creates the group for the given locale.
    #[must_use]
    pub fn new(constants: &Constants) -> Self {
        let base = format!(
            "{SEARCH_BASE_URL}/{}/{}",
            constants.country().as_ref(),
            constants.language().as_ref()
        );
        Self {
            session: SessionInfo::new(base, base_headers(constants)),
        }
    }

    /// Free-text catalog search.
    ///
    /// Returns products and content planners mixed, up to `limit` results.
    #[must_use]
    pub fn search(&self, query: &str, limit: u32) -> JsonEndpoint {
        let request = RequestInfo::get("search-result-page")
            .query_param("q", query)
            .query_param("size", limit.to_string())
            .query_param("types", "PRODUCT,CONTENT,PLANNER,REFINED_SEARCHES")
            .query_param("autocorrect", "true")
            .build()
            .expect("static search request is valid");
        JsonEndpoint::new(self.session.clone(), request, handlers::DEFAULT)
    }

    /// Image-based visual search.
    ///
    /// Uploads the image (base64 in a JSON envelope, the way the website's
    /// camera search does) and returns visually similar products.
    #[must_use]
    pub fn vision_search(&self, image: &[u8]) -> JsonEndpoint {
        let request = RequestInfo::post("vision-search/image")
            .json_body(json!({
                "image": BASE64_STANDARD.encode(image),
                "maxResults": 16,
            }))
            .build()
            .expect("static vision-search request is valid");
        JsonEndpoint::new(self.session.clone(), request, handlers::DEFAULT)
    }
}
