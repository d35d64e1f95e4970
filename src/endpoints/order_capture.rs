//! Order capture: checkouts, service areas and delivery services.
//!
//! Getting a delivery quote is a chain of calls against the order-capture
//! service: create a checkout from the cart items, resolve the service area
//! for a zip code, then query the delivery options for that checkout+area
//! pair. The [`get_delivery_services`](crate::wrappers::get_delivery_services)
//! wrapper composes the chain and fans the two option queries out
//! concurrently.

use serde::Serialize;
use serde_json::json;

use crate::clients::{base_headers, handlers, JsonEndpoint, RequestInfo, SessionInfo};
use crate::config::Constants;

const ORDER_CAPTURE_BASE_URL: &str = "https://ordercapture.ingka.ikea.com/ordercaptureapi";

/// Client id the website presents to the order-capture service.
const CHECKOUT_CLIENT_ID: &str = "af2525c3-1779-49be-8d7d-adf32cac1934";

/// One cart line passed into a checkout.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutItem {
    /// The 8-digit item code.
    pub item_no: String,
    /// Requested quantity.
    pub quantity: u32,
}

/// The order-capture endpoint group.
///
/// Requires a token (guest tokens work); every call carries it as a bearer.
#[derive(Debug)]
pub struct OrderCapture {
    session: SessionInfo,
    language: String,
}

impl OrderCapture {
    /// Creates the group for the given locale and token.
    #[must_use]
    pub fn new(constants: &Constants, token: &str) -> Self {
        let mut headers = base_headers(constants);
        headers.insert("Authorization".to_string(), format!("Bearer {token}"));
        headers.insert("X-Client-Id".to_string(), CHECKOUT_CLIENT_ID.to_string());
        let base = format!(
            "{ORDER_CAPTURE_BASE_URL}/{}",
            constants.country().as_ref()
        );
        Self {
            session: SessionInfo::new(base, headers),
            language: constants.language().as_ref().to_string(),
        }
    }

    /// Creates a checkout holding the given items.
    ///
    /// The response carries the checkout `resourceId` subsequent calls
    /// need.
    #[must_use]
    pub fn get_checkout(&self, items: &[CheckoutItem]) -> JsonEndpoint {
        let request = RequestInfo::post("checkouts")
            .json_body(json!({
                "channel": "WEBAPP",
                "checkoutType": "STANDARD",
                "shoppingType": "ONLINE",
                "deliveryArea": null,
                "languageCode": self.language,
                "items": items,
                "serviceArea": null,
            }))
            .build()
            .expect("static checkout request is valid");
        JsonEndpoint::new(self.session.clone(), request, handlers::DEFAULT)
    }

    /// Resolves the service area for a zip code within a checkout.
    #[must_use]
    pub fn get_service_area(&self, checkout_id: &str, zip_code: &str) -> JsonEndpoint {
        let request = RequestInfo::post(format!("checkouts/{checkout_id}/service-area"))
            .json_body(json!({ "zipCode": zip_code }))
            .build()
            .expect("static service-area request is valid");
        JsonEndpoint::new(self.session.clone(), request, handlers::DEFAULT)
    }

    /// Queries home-delivery options for a checkout+area pair.
    #[must_use]
    pub fn get_home_delivery_services(
        &self,
        checkout_id: &str,
        service_area_id: &str,
    ) -> JsonEndpoint {
        let request = RequestInfo::get(format!(
            "checkouts/{checkout_id}/service-area/{service_area_id}/home-delivery-services"
        ))
        .build()
        .expect("static delivery-services request is valid");
        JsonEndpoint::new(self.session.clone(), request, handlers::DEFAULT)
    }

    /// Queries collect/pickup options for a checkout+area pair.
    #[must_use]
    pub fn get_collect_delivery_services(
        &self,
        checkout_id: &str,
        service_area_id: &str,
    ) -> JsonEndpoint {
        let request = RequestInfo::get(format!(
            "checkouts/{checkout_id}/service-area/{service_area_id}/collect-delivery-services"
        ))
        .build()
        .expect("static delivery-services request is valid");
        JsonEndpoint::new(self.session.clone(), request, handlers::DEFAULT)
    }
}
