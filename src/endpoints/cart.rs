//! Cart operations.
//!
//! The cart service speaks GraphQL; every operation here is a one-step
//! query or mutation sharing the same response fragments. Works with both
//! guest and authorized tokens; carts created under a guest token can
//! later be copied into an authorized session with
//! [`copy_items`](Cart::copy_items).

use std::collections::HashMap;

use serde_json::json;

use crate::clients::{base_headers, handlers, JsonEndpoint, RequestInfo, SessionInfo};
use crate::config::Constants;

const CART_BASE_URL: &str = "https://cart.oneweb.ingka.com";

const CART_PROPS: &str = r"
fragment CartProps on Cart {
  currency
  checksum
  context { userId isAnonymous retailId }
  coupon { code validFrom validTo description }
  items {
    itemNo
    quantity
    type
    isFamilyItem
    childItems { itemNo quantity }
    regularPrice { unit { ...PriceProps } subTotalExclDiscount { ...PriceProps } }
    familyPrice { unit { ...PriceProps } subTotalExclDiscount { ...PriceProps } }
    product { name description type validDesignText weight { value unit } }
  }
  regularTotalPrice {
    totalExclDiscount { ...PriceProps }
    totalInclDiscount { ...PriceProps }
    totalSavingsDetails { familyDiscounts }
  }
}
fragment PriceProps on Price { amount currency }
";

/// The cart endpoint group.
///
/// # Example
///
/// ```rust,ignore
/// use ikea_api::{run, Constants};
/// use ikea_api::endpoints::Cart;
/// use std::collections::HashMap;
///
/// let cart = Cart::new(&Constants::default(), "guest-token");
/// let added = run(cart.add_items(&HashMap::from([("30457903".to_string(), 1)]))).await?;
/// ```
#[derive(Debug)]
pub struct Cart {
    session: SessionInfo,
    language: String,
}

impl Cart {
    /// Creates the cart group for the given token (guest or authorized).
    #[must_use]
    pub fn new(constants: &Constants, token: &str) -> Self {
        let mut headers = base_headers(constants);
        headers.insert("Authorization".to_string(), format!("Bearer {token}"));
        Self {
            session: SessionInfo::new(CART_BASE_URL, headers),
            language: constants.language().as_ref().to_string(),
        }
    }

    fn graphql(&self, operation: &str, mut variables: serde_json::Value) -> JsonEndpoint {
        variables["languageCode"] = json!(self.language);
        let request = RequestInfo::post("graphql")
            .json_body(json!({
                "query": format!("{operation}\n{CART_PROPS}"),
                "variables": variables,
            }))
            .build()
            .expect("static cart request is valid");
        JsonEndpoint::new(self.session.clone(), request, handlers::GRAPHQL)
    }

    /// Fetches the current cart state.
    #[must_use]
    pub fn show(&self) -> JsonEndpoint {
        self.graphql(
            "query Cart($languageCode: String!) {
              cart(languageCode: $languageCode) { ...CartProps }
            }",
            json!({}),
        )
    }

    /// Removes every item from the cart.
    #[must_use]
    pub fn clear(&self) -> JsonEndpoint {
        self.graphql(
            "mutation ClearItems($languageCode: String!) {
              clearItems(languageCode: $languageCode) { ...CartProps }
            }",
            json!({}),
        )
    }

    /// Adds items to the cart, `item code -> quantity`.
    #[must_use]
    pub fn add_items(&self, items: &HashMap<String, u32>) -> JsonEndpoint {
        self.graphql(
            "mutation AddItems($items: [AddItemInput!]!, $languageCode: String!) {
              addItems(items: $items, languageCode: $languageCode) {
                quantity
                cart { ...CartProps }
              }
            }",
            json!({ "items": item_inputs(items) }),
        )
    }

    /// Sets new quantities for items already in the cart.
    #[must_use]
    pub fn update_items(&self, items: &HashMap<String, u32>) -> JsonEndpoint {
        self.graphql(
            "mutation UpdateItems($items: [UpdateItemInput!]!, $languageCode: String!) {
              updateItems(items: $items, languageCode: $languageCode) { cart { ...CartProps } }
            }",
            json!({ "items": item_inputs(items) }),
        )
    }

    /// Removes the given items from the cart.
    #[must_use]
    pub fn remove_items<S: AsRef<str>>(&self, item_codes: &[S]) -> JsonEndpoint {
        let codes: Vec<&str> = item_codes.iter().map(AsRef::as_ref).collect();
        self.graphql(
            "mutation RemoveItems($itemNos: [ID!]!, $languageCode: String!) {
              removeItems(itemNos: $itemNos, languageCode: $languageCode) { cart { ...CartProps } }
            }",
            json!({ "itemNos": codes }),
        )
    }

    /// Copies another user's cart into this one (used after login to adopt
    /// a guest cart).
    #[must_use]
    pub fn copy_items(&self, source_user_id: &str) -> JsonEndpoint {
        self.graphql(
            "mutation CopyItems($sourceUserId: ID!, $languageCode: String!) {
              copyItems(sourceUserId: $sourceUserId, languageCode: $languageCode) { cart { ...CartProps } }
            }",
            json!({ "sourceUserId": source_user_id }),
        )
    }

    /// Applies a coupon code to the cart.
    #[must_use]
    pub fn set_coupon(&self, code: &str) -> JsonEndpoint {
        self.graphql(
            "mutation SetCoupon($code: String!, $languageCode: String!) {
              setCoupon(code: $code, languageCode: $languageCode) { cart { ...CartProps } }
            }",
            json!({ "code": code }),
        )
    }

    /// Removes the applied coupon from the cart.
    #[must_use]
    pub fn clear_coupon(&self) -> JsonEndpoint {
        self.graphql(
            "mutation ClearCoupon($languageCode: String!) {
              clearCoupon(languageCode: $languageCode) { cart { ...CartProps } }
            }",
            json!({}),
        )
    }
}

fn item_inputs(items: &HashMap<String, u32>) -> Vec<serde_json::Value> {
    items
        .iter()
        .map(|(code, quantity)| json!({ "itemNo": code, "quantity": quantity }))
        .collect()
}
