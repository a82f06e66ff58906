//! SureCart REST API response types.
//!
//! Only the fields the transformers read are modeled. Nested resources come
//! back either inline (expanded) or as bare id strings, so references that
//! vary use [`VariantRef`] style untagged enums.

use serde::Deserialize;
use serde_json::Value;

use omnisend_bridge_core::{Cents, StockStatus};

/// Paginated collection wrapper used across SureCart list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Paginated<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

impl<T> Default for Paginated<T> {
    fn default() -> Self {
        Self { data: Vec::new() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Image {
    pub src: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Metrics {
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub min_price_amount: Cents,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub permalink: Option<String>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub stock_enabled: bool,
    #[serde(default)]
    pub available_stock: i64,
    pub weight: Option<f64>,
    #[serde(default)]
    pub metrics: Metrics,
    pub featured_image: Option<Image>,
    #[serde(default)]
    pub gallery: Vec<Image>,
    #[serde(default)]
    pub variants: Paginated<Variant>,
    #[serde(default)]
    pub product_collections: Paginated<Collection>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl Product {
    /// Stock is unlimited when the store does not track it for this product.
    #[must_use]
    pub const fn has_unlimited_stock(&self) -> bool {
        !self.stock_enabled
    }

    #[must_use]
    pub const fn stock_status(&self) -> StockStatus {
        StockStatus::for_product(self.archived, self.has_unlimited_stock(), self.available_stock)
    }

    /// Stock status of a single variant under this product. Archived and
    /// unlimited-stock checks come from the product, counts from the variant.
    #[must_use]
    pub const fn variant_stock_status(&self, variant: &Variant) -> StockStatus {
        StockStatus::for_product(self.archived, self.has_unlimited_stock(), variant.available_stock)
    }

    #[must_use]
    pub fn featured_image_url(&self) -> Option<&str> {
        self.featured_image.as_ref().and_then(|i| i.src.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Variant {
    pub id: String,
    #[serde(default)]
    pub amount: Cents,
    pub sku: Option<String>,
    pub option_1: Option<String>,
    #[serde(default)]
    pub available_stock: i64,
}

/// A product collection. Collections map to Omnisend categories.
#[derive(Debug, Clone, Deserialize)]
pub struct Collection {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Address {
    pub line_1: Option<String>,
    pub line_2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShippingMethod {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShippingChoice {
    pub shipping_method: Option<ShippingMethod>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentMethod {
    pub processor_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Checkout {
    pub id: String,
    pub number: Option<String>,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub created_at: i64,
    pub inherited_email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub billing_matches_shipping: bool,
    pub shipping_address: Option<Address>,
    pub billing_address: Option<Address>,
    #[serde(default)]
    pub line_items: Paginated<LineItem>,
    #[serde(default)]
    pub shipping_amount: Cents,
    #[serde(default)]
    pub subtotal_amount: Cents,
    #[serde(default)]
    pub discount_amount: Cents,
    #[serde(default)]
    pub total_amount: Cents,
    #[serde(default)]
    pub tax_amount: Cents,
    /// Applied discount id, expandable to a [`Discount`] via a separate fetch.
    pub discount: Option<String>,
    pub selected_shipping_choice: Option<ShippingChoice>,
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub metadata: Value,
    pub portal_url: Option<String>,
    pub status: Option<String>,
}

impl Checkout {
    /// Page the buyer was on when the checkout was created, stashed in
    /// metadata by the storefront snippet.
    #[must_use]
    pub fn page_url(&self) -> Option<&str> {
        self.metadata.get("page_url").and_then(Value::as_str)
    }
}

/// Nested resources arrive expanded or as bare ids depending on the request.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum VariantRef {
    Id(String),
    Object(Variant),
}

impl VariantRef {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Object(variant) => &variant.id,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Price {
    pub product: Product,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineItem {
    pub id: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub total_amount: Cents,
    #[serde(default)]
    pub full_amount: Cents,
    #[serde(default)]
    pub discount_amount: Cents,
    pub price: Price,
    pub variant: Option<VariantRef>,
    #[serde(default)]
    pub variant_options: Vec<String>,
    /// Present when the line item webhook payload embeds its checkout.
    pub checkout: Option<Box<Checkout>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tracking {
    pub courier_name: Option<String>,
    pub url: Option<String>,
    pub number: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Fulfillment {
    #[serde(default)]
    pub trackings: Paginated<Tracking>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub fulfillment_status: String,
    pub checkout: Checkout,
    #[serde(default)]
    pub fulfillments: Paginated<Fulfillment>,
}

impl Order {
    /// First tracking entry across all fulfillments, if any.
    #[must_use]
    pub fn first_tracking(&self) -> Option<&Tracking> {
        self.fulfillments
            .data
            .iter()
            .find_map(|f| f.trackings.data.first())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefundItem {
    pub line_item: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Charge {
    pub checkout: Option<ChargeCheckout>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChargeCheckout {
    pub order: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Refund {
    pub id: String,
    #[serde(default)]
    pub amount: Cents,
    #[serde(default)]
    pub refund_items: Paginated<RefundItem>,
    pub charge: Option<Charge>,
}

impl Refund {
    /// Id of the order this refund belongs to, reached through the charge.
    #[must_use]
    pub fn order_id(&self) -> Option<&str> {
        self.charge
            .as_ref()
            .and_then(|c| c.checkout.as_ref())
            .and_then(|c| c.order.as_deref())
    }

    /// Line item ids covered by this refund.
    #[must_use]
    pub fn refunded_line_item_ids(&self) -> Vec<&str> {
        self.refund_items
            .data
            .iter()
            .map(|item| item.line_item.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Promotion {
    pub code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Discount {
    pub id: String,
    #[serde(default)]
    pub discount_amount: Cents,
    pub promotion: Option<Promotion>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Customer {
    pub id: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub shipping_address: Option<Address>,
    pub billing_address: Option<Address>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_stock_status_prefers_archived() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "id": "prod_1",
            "name": "Mug",
            "archived": true,
            "stock_enabled": true,
            "available_stock": 10
        }))
        .unwrap();
        assert_eq!(product.stock_status(), StockStatus::NotAvailable);
    }

    #[test]
    fn untracked_stock_is_always_in_stock() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "id": "prod_1",
            "name": "Mug",
            "stock_enabled": false,
            "available_stock": 0
        }))
        .unwrap();
        assert_eq!(product.stock_status(), StockStatus::InStock);
    }

    #[test]
    fn variant_ref_deserializes_both_shapes() {
        let bare: VariantRef = serde_json::from_value(serde_json::json!("var_1")).unwrap();
        assert_eq!(bare.id(), "var_1");

        let expanded: VariantRef =
            serde_json::from_value(serde_json::json!({ "id": "var_2", "amount": 1500 })).unwrap();
        assert_eq!(expanded.id(), "var_2");
    }

    #[test]
    fn checkout_page_url_reads_metadata() {
        let checkout: Checkout = serde_json::from_value(serde_json::json!({
            "id": "ch_1",
            "currency": "usd",
            "metadata": { "page_url": "https://shop.example/tees" }
        }))
        .unwrap();
        assert_eq!(checkout.page_url(), Some("https://shop.example/tees"));
    }

    #[test]
    fn refund_reaches_order_through_charge() {
        let refund: Refund = serde_json::from_value(serde_json::json!({
            "id": "ref_1",
            "amount": 500,
            "refund_items": { "data": [ { "line_item": "li_1" } ] },
            "charge": { "checkout": { "order": "ord_1" } }
        }))
        .unwrap();
        assert_eq!(refund.order_id(), Some("ord_1"));
        assert_eq!(refund.refunded_line_item_ids(), vec!["li_1"]);
    }
}
