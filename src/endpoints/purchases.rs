//! Purchase history.
//!
//! The purchase-history service speaks GraphQL and accepts batched
//! operation lists: [`order_info`](Purchases::order_info) sends two
//! operations in one request, which is why the GraphQL error handler
//! flattens per-operation error lists.

use serde_json::json;

use crate::clients::{base_headers, handlers, JsonEndpoint, RequestInfo, SessionInfo};
use crate::config::Constants;

const PURCHASES_BASE_URL: &str = "https://purchase-history.ocp.ingka.ikea.com";

const HISTORY_QUERY: &str = r"
query History($take: Int!, $skip: Int!) {
  history(take: $take, skip: $skip) {
    id
    dateAndTime { time date formattedLocal formattedShortDate }
    status
    storeName
    totalCost { code value }
  }
}";

const STATUS_BANNER_QUERY: &str = r"
query StatusBannerOrder($orderNumber: String!, $liteId: String) {
  order(orderNumber: $orderNumber, liteId: $liteId) {
    id
    dateAndTime { time date formattedLongDateTime }
    services { ids status deliveryDate deliveryMethod }
  }
}";

const COSTS_QUERY: &str = r"
query CostsOrder($orderNumber: String!, $liteId: String) {
  order(orderNumber: $orderNumber, liteId: $liteId) {
    costs { total delivery serviceProviders discount tax subTotal currencyCode }
  }
}";

/// The purchase-history endpoint group.
///
/// [`history`](Purchases::history) requires an authorized token; looking up
/// a single order also works logged out when the purchaser's email is
/// supplied.
#[derive(Debug)]
pub struct Purchases {
    session: SessionInfo,
}

impl Purchases {
    /// Creates the group for the given locale and token.
    #[must_use]
    pub fn new(constants: &Constants, token: &str) -> Self {
        let mut headers = base_headers(constants);
        headers.insert("Authorization".to_string(), format!("Bearer {token}"));
        Self {
            session: SessionInfo::new(PURCHASES_BASE_URL, headers),
        }
    }

    fn graphql(&self, body: serde_json::Value) -> JsonEndpoint {
        let request = RequestInfo::post("graphql")
            .json_body(body)
            .build()
            .expect("static purchases request is valid");
        JsonEndpoint::new(self.session.clone(), request, handlers::GRAPHQL)
    }

    /// Fetches a page of the purchase history.
    #[must_use]
    pub fn history(&self, take: u32, skip: u32) -> JsonEndpoint {
        self.graphql(json!({
            "operationName": "History",
            "variables": { "take": take, "skip": skip },
            "query": HISTORY_QUERY,
        }))
    }

    /// Fetches status and costs for one order, batched in a single request.
    ///
    /// `email` is required for guest lookups (order placed without an
    /// account, or looked up while logged out).
    #[must_use]
    pub fn order_info(&self, order_number: &str, email: Option<&str>) -> JsonEndpoint {
        let variables = json!({ "orderNumber": order_number, "liteId": email });
        self.graphql(json!([
            {
                "operationName": "StatusBannerOrder",
                "variables": variables.clone(),
                "query": STATUS_BANNER_QUERY,
            },
            {
                "operationName": "CostsOrder",
                "variables": variables,
                "query": COSTS_QUERY,
            },
        ]))
    }
}
