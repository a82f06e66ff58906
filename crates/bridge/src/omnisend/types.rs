//! Omnisend API request types.
//!
//! These mirror the v3 API payloads. Optional fields are skipped when unset
//! so the serialized body only carries what a transformer filled in.

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

/// Tag and consent origin attached to every contact the bridge touches.
pub const SOURCE_TAG: &str = "source: surecart";

/// Subscription status value used when the buyer gave consent.
pub const STATUS_SUBSCRIBED: &str = "subscribed";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "categoryID")]
    pub category_id: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub title: String,
    pub status: String,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_image_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(rename = "categoryIDs", skip_serializing_if = "Vec::is_empty")]
    pub category_ids: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
    pub variants: Vec<ProductVariant>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub id: String,
    pub title: String,
    pub status: String,
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_consent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_consent: Option<String>,
}

impl Contact {
    /// A contact carrying only the source tag, ready for id or email.
    #[must_use]
    pub fn tagged() -> Self {
        Self {
            tags: vec![SOURCE_TAG.to_owned()],
            ..Self::default()
        }
    }
}

/// Customer event envelope sent to `POST /events`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub event_name: String,
    pub event_version: String,
    /// ISO-8601 time of the underlying action. Only backfilled events carry
    /// it; live events default to receipt time on the Omnisend side.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_time: Option<String>,
    pub origin: String,
    pub contact: Contact,
    pub properties: Value,
}

impl Event {
    /// Build an event envelope with the fixed `api` origin.
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if the properties fail to serialize.
    pub fn new<P: Serialize>(
        name: &str,
        version: &str,
        contact: Contact,
        properties: &P,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            event_name: name.to_owned(),
            event_version: version.to_owned(),
            event_time: None,
            origin: "api".to_owned(),
            contact,
            properties: serde_json::to_value(properties)?,
        })
    }

    #[must_use]
    pub fn with_event_time(mut self, time: String) -> Self {
        self.event_time = Some(time);
        self
    }
}

/// Shared order event properties.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBase {
    #[serde(rename = "orderID")]
    pub id: String,
    pub order_number: u64,
    pub currency: String,
    pub created_at: String,
    pub shipping_method: String,
    pub payment_method: String,
    pub fulfillment_status: String,
    pub payment_status: String,
    pub shipping_price: Decimal,
    pub subtotal_price: Decimal,
    pub subtotal_tax_included: bool,
    pub total_discount: Decimal,
    pub total_price: Decimal,
    pub total_tax: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    pub line_items: Vec<LineItem>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub discounts: Vec<Discount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking: Option<Tracking>,
}

/// Order lifecycle event properties. The serialized shape is the base with
/// the per-kind extras folded in, so the enum is untagged.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum OrderEvent {
    Standard(OrderBase),
    Canceled {
        #[serde(flatten)]
        base: OrderBase,
        #[serde(rename = "cancelReason")]
        cancel_reason: String,
    },
    Refunded {
        #[serde(flatten)]
        base: OrderBase,
        #[serde(rename = "totalRefundedAmount")]
        total_refunded_amount: Decimal,
        #[serde(rename = "totalRefundedTaxAmount")]
        total_refunded_tax_amount: Decimal,
        #[serde(rename = "refundedLineItems")]
        refunded_line_items: Vec<LineItem>,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: String,
    pub title: String,
    pub price: Decimal,
    pub quantity: i64,
    pub discount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strike_through_price: Option<Decimal>,
    #[serde(rename = "variantID", skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<ProductCategory>,
}

/// Category reference inside an event line item.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCategory {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address_1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address_2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_zip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address_1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address_2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_zip: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Discount {
    pub amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tracking {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub courier_title: Option<String>,
    #[serde(rename = "courierURL", skip_serializing_if = "Option::is_none")]
    pub courier_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Started-checkout event properties.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutEvent {
    pub abandoned_checkout_url: String,
    #[serde(rename = "cartID")]
    pub cart_id: String,
    pub currency: String,
    pub value: Decimal,
    pub line_items: Vec<LineItem>,
}

/// Added-product-to-cart event properties.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEvent {
    pub abandoned_checkout_url: String,
    #[serde(rename = "cartID")]
    pub cart_id: String,
    pub currency: String,
    pub value: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_item: Option<LineItem>,
    pub line_items: Vec<LineItem>,
}

/// Viewed-product event properties.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewedProductEvent {
    pub product: ViewedProduct,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewedProduct {
    pub id: String,
    pub title: String,
    pub status: String,
    pub currency: String,
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<ProductCategory>,
}

/// Bulk item upload request for `POST /batches`.
#[derive(Debug, Clone, Serialize)]
pub struct Batch {
    pub method: String,
    pub endpoint: String,
    pub items: Vec<Value>,
}

impl Batch {
    /// A POST batch against the given endpoint.
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if any item fails to serialize.
    pub fn post<T: Serialize>(endpoint: &str, items: &[T]) -> Result<Self, serde_json::Error> {
        let items = items
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            method: "POST".to_owned(),
            endpoint: endpoint.to_owned(),
            items,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> OrderBase {
        OrderBase {
            id: "ch_1".to_owned(),
            order_number: 1042,
            currency: "USD".to_owned(),
            created_at: "2024-05-01T10:00:00Z".to_owned(),
            shipping_method: "Standard".to_owned(),
            payment_method: "stripe".to_owned(),
            fulfillment_status: "unfulfilled".to_owned(),
            payment_status: "paid".to_owned(),
            shipping_price: Decimal::new(500, 2),
            subtotal_price: Decimal::new(1999, 2),
            subtotal_tax_included: false,
            total_discount: Decimal::ZERO,
            total_price: Decimal::new(2499, 2),
            total_tax: Decimal::ZERO,
            address: None,
            line_items: Vec::new(),
            discounts: Vec::new(),
            tracking: None,
        }
    }

    #[test]
    fn canceled_event_flattens_base_with_reason() {
        let event = OrderEvent::Canceled {
            base: base(),
            cancel_reason: "unknown".to_owned(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["orderID"], "ch_1");
        assert_eq!(json["cancelReason"], "unknown");
        assert!(json.get("base").is_none());
    }

    #[test]
    fn refunded_event_carries_refund_fields() {
        let event = OrderEvent::Refunded {
            base: base(),
            total_refunded_amount: Decimal::new(500, 2),
            total_refunded_tax_amount: Decimal::ZERO,
            refunded_line_items: Vec::new(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["totalRefundedAmount"], "5.00");
        assert_eq!(json["totalRefundedTaxAmount"], "0");
        assert_eq!(json["orderNumber"], 1042);
    }

    #[test]
    fn standard_event_has_no_conditional_fields() {
        let json = serde_json::to_value(OrderEvent::Standard(base())).unwrap();
        assert!(json.get("cancelReason").is_none());
        assert!(json.get("totalRefundedAmount").is_none());
    }

    #[test]
    fn event_envelope_skips_absent_event_time() {
        let event = Event::new("placed order", "v2", Contact::tagged(), &base()).unwrap();
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["origin"], "api");
        assert!(json.get("eventTime").is_none());

        let timed = event.with_event_time("2024-05-01T10:00:00Z".to_owned());
        let json = serde_json::to_value(&timed).unwrap();
        assert_eq!(json["eventTime"], "2024-05-01T10:00:00Z");
    }

    #[test]
    fn batch_serializes_items_as_values() {
        let batch = Batch::post(
            "/products",
            &[Category {
                category_id: "col_1".to_owned(),
                title: "Tees".to_owned(),
            }],
        )
        .unwrap();
        assert_eq!(batch.method, "POST");
        assert_eq!(batch.items.len(), 1);
        assert_eq!(batch.items[0]["categoryID"], "col_1");
    }
}
