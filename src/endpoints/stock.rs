//! Per-item stock availability.

use crate::clients::{base_headers, handlers, JsonEndpoint, RequestInfo, SessionInfo};
use crate::config::Constants;

const STOCK_BASE_URL: &str = "https://api.ingka.ikea.com/cia";

/// Client id the website presents to the availability service.
const STOCK_CLIENT_ID: &str = "b6c117e5-ae61-4ef5-b4cc-e0b1e37f0631";

/// The stock-availability endpoint group. Works without any token.
#[derive(Debug)]
pub struct Stock {
    session: SessionInfo,
}

impl Stock {
    /// Creates the group for the given locale.
    #[must_use]
    pub fn new(constants: &Constants) -> Self {
        let mut headers = base_headers(constants);
        headers.insert("X-Client-Id".to_string(), STOCK_CLIENT_ID.to_string());
        let base = format!(
            "{STOCK_BASE_URL}/availabilities/ru/{}",
            constants.country().as_ref()
        );
        Self {
            session: SessionInfo::new(base, headers),
        }
    }

    /// Queries store and online availability for the given codes.
    #[must_use]
    pub fn get_stock<S: AsRef<str>>(&self, item_codes: &[S]) -> JsonEndpoint {
        let joined = item_codes
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(",");
        let request = RequestInfo::get("")
            .query_param("itemNos", joined)
            .query_param("expand", "StoresList,Restocks,SalesLocations")
            .build()
            .expect("static stock request is valid");
        JsonEndpoint::new(self.session.clone(), request, handlers::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{Endpoint, Step};

    #[test]
    fn test_stock_request_shape() {
        let stock = Stock::new(&Constants::default());
        let mut endpoint = stock.get_stock(&["11111111", "22222222"]);

        let request = match endpoint.begin().unwrap() {
            Step::Request(request) => request,
            Step::Done(_) => panic!("expected a request step"),
        };
        let query = request.query.unwrap();
        assert_eq!(query.get("itemNos").unwrap(), "11111111,22222222");
        assert!(query.get("expand").unwrap().contains("StoresList"));
    }

    #[test]
    fn test_stock_base_is_country_scoped() {
        let stock = Stock::new(&Constants::default());
        assert_eq!(
            stock.session.base_url(),
            "https://api.ingka.ikea.com/cia/availabilities/ru/us"
        );
    }
}
