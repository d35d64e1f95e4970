//! Typed models returned by the wrapper layer.
//!
//! The raw endpoints return vendor JSON verbatim; the wrappers distill it
//! into these stable-ish models. Field coverage is intentionally
//! partial, only what downstream consumers have needed so far.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An item that could not be added or delivered in full.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct UnavailableItem {
    /// The 8-digit item code.
    pub item_code: String,
    /// How many units remain available, when the service reported it.
    pub available_quantity: Option<u32>,
}

/// One delivery option for a checkout.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct DeliveryService {
    /// Vendor delivery type (`HOME_DELIVERY`, `CLICK_COLLECT_STORE`, ...).
    pub delivery_type: String,
    /// Earliest possible delivery date, when offered.
    pub date: Option<NaiveDate>,
    /// Price including tax.
    pub price: f64,
    /// Carrier or pickup-point name, when reported.
    pub service_provider: Option<String>,
    /// Items this option cannot deliver in full.
    pub unavailable_items: Vec<UnavailableItem>,
}

/// Result of the delivery-services orchestration.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct GetDeliveryServicesResponse {
    /// The merged home + collect options.
    pub delivery_options: Vec<DeliveryService>,
    /// Item codes that could not be added to the cart at all.
    pub cannot_add: Vec<String>,
}

/// One item distilled from the item-lookup services.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ParsedItem {
    /// The 8-digit item code.
    pub item_code: String,
    /// `true` for combinations (`SPR`), `false` for single articles.
    pub is_combination: bool,
    /// Product name.
    pub name: String,
    /// Product type line ("bookcase").
    pub category: Option<String>,
    /// Price amount in the market currency.
    pub price: f64,
    /// ISO currency code.
    pub currency: Option<String>,
    /// Canonical product-page URL.
    pub url: Option<String>,
    /// Packaged weight in kilograms.
    pub weight_kg: Option<f64>,
}

/// One purchase in the history listing.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PurchaseHistoryItem {
    /// Order number.
    pub id: String,
    /// Vendor status string (`IN_PROGRESS`, `COMPLETED`, ...).
    pub status: String,
    /// Purchase date as the vendor formats it locally.
    pub datetime_formatted: String,
    /// Store name, or the online-shop marker.
    pub store_name: Option<String>,
    /// Order total.
    pub price: f64,
    /// ISO currency code.
    pub currency: Option<String>,
}

/// Cost breakdown and status for one order.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PurchaseInfo {
    /// Scheduled delivery date, when known.
    pub delivery_date: Option<NaiveDate>,
    /// Per-service delivery methods.
    pub delivery_methods: Vec<String>,
    /// Order status string.
    pub status: Option<String>,
    /// Order total.
    pub total: Option<f64>,
    /// Delivery cost share.
    pub delivery_cost: Option<f64>,
    /// ISO currency code.
    pub currency: Option<String>,
}
