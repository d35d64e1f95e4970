//! Higher-level operations composing multiple endpoints.
//!
//! Wrappers chain endpoint executions and distill the vendor JSON into the
//! typed models in [`types`]. Independent sub-fetches fan out concurrently
//! and join before proceeding, a simple fork-join and nothing more.

mod types;

pub use types::{
    DeliveryService, GetDeliveryServicesResponse, ParsedItem, PurchaseHistoryItem, PurchaseInfo,
    UnavailableItem,
};

use std::collections::HashMap;

use chrono::NaiveDate;
use futures::future::{join_all, try_join_all};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::clients::{run, ApiError, GraphQlError, ParseError};
use crate::config::Constants;
use crate::endpoints::{
    Cart, CheckoutItem, IngkaItems, OrderCapture, PipItem, Purchases, MAX_BATCH_SIZE,
};
use crate::item_code::parse_item_codes_list;

fn decode<T: DeserializeOwned>(value: serde_json::Value, what: &str) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| {
        ParseError {
            reason: format!("unexpected {what} shape: {e}"),
        }
        .into()
    })
}

fn required_str(value: &serde_json::Value, pointer: &str, what: &str) -> Result<String, ApiError> {
    value
        .pointer(pointer)
        .and_then(serde_json::Value::as_str)
        .map(ToString::to_string)
        .ok_or_else(|| {
            ParseError {
                reason: format!("{what} missing at '{pointer}'"),
            }
            .into()
        })
}

fn date_of(datetime: &str) -> Option<NaiveDate> {
    datetime
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

// --- delivery services -----------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDeliveryService {
    fulfillment_method_type: String,
    #[serde(default)]
    solution_price: Option<RawSolutionPrice>,
    #[serde(default)]
    service_provider: Option<String>,
    #[serde(default)]
    deliveries: Vec<RawDelivery>,
    #[serde(default)]
    unavailable_items: Vec<RawUnavailableItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSolutionPrice {
    incl_tax: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDelivery {
    #[serde(default)]
    time_windows: Option<RawTimeWindows>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTimeWindows {
    #[serde(default)]
    earliest_possible_slot: Option<RawSlot>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSlot {
    from_date_time: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawUnavailableItem {
    item_no: String,
    #[serde(default)]
    available_quantity: Option<u32>,
}

fn parse_delivery_services(response: &serde_json::Value) -> Result<Vec<DeliveryService>, ApiError> {
    let raw: Vec<RawDeliveryService> = decode(response.clone(), "delivery services")?;
    Ok(raw
        .into_iter()
        .map(|service| DeliveryService {
            delivery_type: service.fulfillment_method_type,
            date: service
                .deliveries
                .iter()
                .filter_map(|delivery| {
                    delivery
                        .time_windows
                        .as_ref()
                        .and_then(|windows| windows.earliest_possible_slot.as_ref())
                        .and_then(|slot| date_of(&slot.from_date_time))
                })
                .min(),
            price: service.solution_price.map_or(0.0, |price| price.incl_tax),
            service_provider: service.service_provider,
            unavailable_items: service
                .unavailable_items
                .into_iter()
                .map(|item| UnavailableItem {
                    item_code: item.item_no,
                    available_quantity: item.available_quantity,
                })
                .collect(),
        })
        .collect())
}

fn unaddable_codes(error: &GraphQlError) -> Vec<String> {
    let mut codes: Vec<String> = Vec::new();
    for err in &error.errors {
        let code = err
            .pointer("/extensions/code")
            .and_then(serde_json::Value::as_str);
        if code != Some("INVALID_ITEM_NUMBER") {
            continue;
        }
        if let Some(item_nos) = err
            .pointer("/extensions/data/itemNos")
            .and_then(serde_json::Value::as_array)
        {
            for item_no in item_nos {
                if let Some(item_no) = item_no.as_str() {
                    if !codes.contains(&item_no.to_string()) {
                        codes.push(item_no.to_string());
                    }
                }
            }
        }
    }
    codes
}

/// Fills the cart, dropping codes the service refuses to add.
///
/// At most one retry: the refused codes from the first attempt are removed
/// and the remainder resubmitted once.
async fn add_items_to_cart(
    cart: &Cart,
    items: &mut HashMap<String, u32>,
) -> Result<Vec<String>, ApiError> {
    run(cart.clear()).await?;
    match run(cart.add_items(items)).await {
        Ok(_) => Ok(Vec::new()),
        Err(ApiError::GraphQl(error)) => {
            let cannot_add = unaddable_codes(&error);
            if cannot_add.is_empty() {
                return Err(error.into());
            }
            tracing::warn!(codes = ?cannot_add, "cart refused items, retrying without them");
            for code in &cannot_add {
                items.remove(code);
            }
            if !items.is_empty() {
                run(cart.add_items(items)).await?;
            }
            Ok(cannot_add)
        }
        Err(other) => Err(other),
    }
}

/// Gets every delivery option for a set of items and a zip code.
///
/// Add-to-cart, checkout and service-area resolution run sequentially (each
/// needs the previous result); the home and collect option queries then fan
/// out concurrently and their results are merged.
///
/// # Errors
///
/// Returns [`ApiError`] if any step fails; items the cart refuses to accept
/// are reported in the result, not as errors.
pub async fn get_delivery_services(
    constants: &Constants,
    token: &str,
    items: &HashMap<String, u32>,
    zip_code: &str,
) -> Result<GetDeliveryServicesResponse, ApiError> {
    let cart = Cart::new(constants, token);
    let mut remaining = items.clone();
    let cannot_add = add_items_to_cart(&cart, &mut remaining).await?;
    if remaining.is_empty() {
        return Ok(GetDeliveryServicesResponse {
            delivery_options: Vec::new(),
            cannot_add,
        });
    }

    let order_capture = OrderCapture::new(constants, token);
    let checkout_items: Vec<CheckoutItem> = remaining
        .iter()
        .map(|(item_no, quantity)| CheckoutItem {
            item_no: item_no.clone(),
            quantity: *quantity,
        })
        .collect();

    let checkout = run(order_capture.get_checkout(&checkout_items)).await?;
    let checkout_id = required_str(&checkout, "/resourceId", "checkout id")?;

    let area = run(order_capture.get_service_area(&checkout_id, zip_code)).await?;
    let area_id = required_str(&area, "/id", "service area id")?;

    let (home, collect) = futures::try_join!(
        run(order_capture.get_home_delivery_services(&checkout_id, &area_id)),
        run(order_capture.get_collect_delivery_services(&checkout_id, &area_id)),
    )?;

    let mut delivery_options = parse_delivery_services(&home)?;
    delivery_options.extend(parse_delivery_services(&collect)?);

    Ok(GetDeliveryServicesResponse {
        delivery_options,
        cannot_add,
    })
}

// --- item lookup -----------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawIngkaItem {
    item_key: RawItemKey,
    product_name: String,
    #[serde(default)]
    product_type: Option<String>,
    #[serde(default)]
    price: Option<RawItemPrice>,
    #[serde(default)]
    weight_kg: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawItemKey {
    item_no: String,
    item_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawItemPrice {
    amount: f64,
    #[serde(default)]
    currency: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPipPage {
    #[serde(default)]
    pip_url: Option<String>,
}

fn parsed_item(item: RawIngkaItem, page: Option<RawPipPage>) -> ParsedItem {
    ParsedItem {
        item_code: item.item_key.item_no,
        is_combination: item.item_key.item_type == "SPR",
        name: item.product_name,
        category: item.product_type,
        price: item.price.as_ref().map_or(0.0, |price| price.amount),
        currency: item.price.and_then(|price| price.currency),
        url: page.and_then(|page| page.pip_url),
        weight_kg: item.weight_kg,
    }
}

/// Looks up full item data for free-form code inputs.
///
/// Codes are extracted from the inputs, chunked into maximum-size batches,
/// and the batches fetched concurrently; each item is then enriched with
/// its product page. A missing product page degrades the item (no URL), it
/// does not fail the call.
///
/// # Errors
///
/// Returns [`ApiError`] if no code can be extracted or a batch fetch fails.
pub async fn get_items<S: AsRef<str>>(
    constants: &Constants,
    item_codes: &[S],
) -> Result<Vec<ParsedItem>, ApiError> {
    let codes = parse_item_codes_list(item_codes)?;

    let ingka = IngkaItems::new(constants);
    let batches = codes.chunks(MAX_BATCH_SIZE);
    let responses = try_join_all(batches.map(|chunk| run(ingka.get_items(chunk)))).await?;

    let mut raw_items: Vec<RawIngkaItem> = Vec::new();
    for response in &responses {
        let data = response
            .get("data")
            .and_then(serde_json::Value::as_array)
            .ok_or_else(|| ParseError {
                reason: "item response carries no 'data' array".to_string(),
            })?;
        for entry in data {
            raw_items.push(decode(entry.clone(), "item communication")?);
        }
    }

    let pip = PipItem::new(constants);
    let pages = join_all(
        raw_items
            .iter()
            .map(|item| run(pip.get_item(item.item_key.item_no.clone()))),
    )
    .await;

    Ok(raw_items
        .into_iter()
        .zip(pages)
        .map(|(item, page)| {
            let page = page.ok().and_then(|value| decode(value, "product page").ok());
            parsed_item(item, page)
        })
        .collect())
}

// --- purchases -------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawHistoryItem {
    id: String,
    status: String,
    date_and_time: RawDateAndTime,
    #[serde(default)]
    store_name: Option<String>,
    #[serde(default)]
    total_cost: Option<RawTotalCost>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDateAndTime {
    formatted_local: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTotalCost {
    #[serde(default)]
    code: Option<String>,
    value: f64,
}

/// Fetches one page of the purchase history as typed models.
///
/// Requires an authorized token.
///
/// # Errors
///
/// Returns [`ApiError`] if the fetch fails or the response shape changed.
pub async fn get_purchase_history(
    constants: &Constants,
    token: &str,
    take: u32,
    skip: u32,
) -> Result<Vec<PurchaseHistoryItem>, ApiError> {
    let purchases = Purchases::new(constants, token);
    let response = run(purchases.history(take, skip)).await?;

    let history = response
        .pointer("/data/history")
        .cloned()
        .ok_or_else(|| ParseError {
            reason: "history response carries no 'data.history'".to_string(),
        })?;
    let raw: Vec<RawHistoryItem> = decode(history, "purchase history")?;

    Ok(raw
        .into_iter()
        .map(|item| PurchaseHistoryItem {
            id: item.id,
            status: item.status,
            datetime_formatted: item.date_and_time.formatted_local,
            store_name: item.store_name,
            price: item.total_cost.as_ref().map_or(0.0, |cost| cost.value),
            currency: item.total_cost.and_then(|cost| cost.code),
        })
        .collect())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOrderService {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    delivery_date: Option<String>,
    #[serde(default)]
    delivery_method: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOrderCosts {
    #[serde(default)]
    total: Option<f64>,
    #[serde(default)]
    delivery: Option<f64>,
    #[serde(default)]
    currency_code: Option<String>,
}

/// Fetches status and costs for one order as a typed model.
///
/// `email` is required when looking an order up while logged out.
///
/// # Errors
///
/// Returns [`ApiError`] if the fetch fails or the response shape changed.
pub async fn get_purchase_info(
    constants: &Constants,
    token: &str,
    order_number: &str,
    email: Option<&str>,
) -> Result<PurchaseInfo, ApiError> {
    let purchases = Purchases::new(constants, token);
    let response = run(purchases.order_info(order_number, email)).await?;

    // The batched request answers with one entry per operation, in order.
    let services: Vec<RawOrderService> = response
        .pointer("/0/data/order/services")
        .cloned()
        .map_or_else(|| Ok(Vec::new()), |value| decode(value, "order services"))?;
    let costs: Option<RawOrderCosts> = response
        .pointer("/1/data/order/costs")
        .cloned()
        .map(|value| decode(value, "order costs"))
        .transpose()?;

    Ok(PurchaseInfo {
        delivery_date: services
            .iter()
            .filter_map(|service| service.delivery_date.as_deref().and_then(date_of))
            .min(),
        delivery_methods: services
            .iter()
            .filter_map(|service| service.delivery_method.clone())
            .collect(),
        status: services.iter().find_map(|service| service.status.clone()),
        total: costs.as_ref().and_then(|costs| costs.total),
        delivery_cost: costs.as_ref().and_then(|costs| costs.delivery),
        currency: costs.and_then(|costs| costs.currency_code),
    })
}
