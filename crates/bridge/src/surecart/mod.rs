//! SureCart REST API client.
//!
//! Read-only access to store data. List endpoints are paged and normalize
//! any failure to an empty page, which the backfill orchestrator treats as
//! end-of-data. Single-entity fetches distinguish "not found" from transport
//! failures so webhook handlers can skip deleted entities quietly.

use std::sync::Arc;

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::SureCartConfig;

pub mod types;

pub use types::{
    Address, Checkout, Collection, Customer, Discount, Fulfillment, Image, LineItem, Order,
    Paginated, Product, Refund, Tracking, Variant, VariantRef,
};

/// Expansions applied when fetching products, matching what the product
/// transformer reads.
const PRODUCT_EXPAND: &[&str] = &["variants", "product_collections"];

/// Expansions applied when fetching orders so the whole entity graph the
/// order transformer needs arrives in one response.
const ORDER_EXPAND: &[&str] = &[
    "checkout",
    "checkout.line_items",
    "line_item.price",
    "price.product",
    "product.product_collections",
    "checkout.payment_method",
    "checkout.selected_shipping_choice",
    "shipping_choice.shipping_method",
    "checkout.shipping_address",
    "checkout.billing_address",
    "fulfillments",
    "fulfillments.trackings",
];

const CHECKOUT_EXPAND: &[&str] = &[
    "line_items",
    "line_item.price",
    "price.product",
    "product.product_collections",
    "shipping_address",
    "billing_address",
];

const CUSTOMER_EXPAND: &[&str] = &["shipping_address", "billing_address"];

const REFUND_EXPAND: &[&str] = &["refund_items", "charge", "charge.checkout"];

const DISCOUNT_EXPAND: &[&str] = &["promotion"];

/// SureCart API errors.
#[derive(Debug, Error)]
pub enum SureCartError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

struct SureCartClientInner {
    http: reqwest::Client,
    base_url: String,
}

/// SureCart API client, cheap to clone.
#[derive(Clone)]
pub struct SureCartClient {
    inner: Arc<SureCartClientInner>,
}

impl SureCartClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(config: &SureCartConfig) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut auth = HeaderValue::from_str(&format!(
            "Bearer {}",
            config.api_key.expose_secret()
        ))
        .unwrap_or_else(|_| HeaderValue::from_static(""));
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(SureCartClientInner {
                http,
                base_url: config.api_url.trim_end_matches('/').to_owned(),
            }),
        })
    }

    /// Fetch one page of products. Pages are 1-indexed; any failure reads as
    /// an empty page.
    pub async fn products_page(&self, page: u32) -> Vec<Product> {
        self.list_page("products", PRODUCT_EXPAND, page).await
    }

    /// Fetch one page of product collections.
    pub async fn collections_page(&self, page: u32) -> Vec<Collection> {
        self.list_page("product_collections", &[], page).await
    }

    /// Fetch one page of orders with the full checkout graph expanded.
    pub async fn orders_page(&self, page: u32) -> Vec<Order> {
        self.list_page("orders", ORDER_EXPAND, page).await
    }

    /// Fetch one page of customers.
    pub async fn customers_page(&self, page: u32) -> Vec<Customer> {
        self.list_page("customers", CUSTOMER_EXPAND, page).await
    }

    /// Fetch a single order with the full entity graph expanded.
    ///
    /// # Errors
    ///
    /// Returns [`SureCartError`] on transport or non-404 API failures.
    pub async fn get_order(&self, id: &str) -> Result<Option<Order>, SureCartError> {
        self.get_one("orders", id, ORDER_EXPAND).await
    }

    /// Fetch a single product.
    ///
    /// # Errors
    ///
    /// Returns [`SureCartError`] on transport or non-404 API failures.
    pub async fn get_product(&self, id: &str) -> Result<Option<Product>, SureCartError> {
        self.get_one("products", id, PRODUCT_EXPAND).await
    }

    /// Fetch a single checkout with line items and addresses expanded.
    ///
    /// # Errors
    ///
    /// Returns [`SureCartError`] on transport or non-404 API failures.
    pub async fn get_checkout(&self, id: &str) -> Result<Option<Checkout>, SureCartError> {
        self.get_one("checkouts", id, CHECKOUT_EXPAND).await
    }

    /// Fetch a single refund with its items and owning charge expanded.
    ///
    /// # Errors
    ///
    /// Returns [`SureCartError`] on transport or non-404 API failures.
    pub async fn get_refund(&self, id: &str) -> Result<Option<Refund>, SureCartError> {
        self.get_one("refunds", id, REFUND_EXPAND).await
    }

    /// Fetch a single discount with its promotion expanded.
    ///
    /// # Errors
    ///
    /// Returns [`SureCartError`] on transport or non-404 API failures.
    pub async fn get_discount(&self, id: &str) -> Result<Option<Discount>, SureCartError> {
        self.get_one("discounts", id, DISCOUNT_EXPAND).await
    }

    async fn list_page<T: DeserializeOwned>(
        &self,
        resource: &str,
        expand: &[&str],
        page: u32,
    ) -> Vec<T> {
        match self.fetch_page(resource, expand, page).await {
            Ok(items) => items,
            Err(err) => {
                tracing::warn!(resource, page, error = %err, "SureCart page fetch failed, treating as empty");
                Vec::new()
            }
        }
    }

    async fn fetch_page<T: DeserializeOwned>(
        &self,
        resource: &str,
        expand: &[&str],
        page: u32,
    ) -> Result<Vec<T>, SureCartError> {
        let url = format!("{}/{resource}", self.inner.base_url);
        let mut query: Vec<(&str, String)> = vec![("page", page.to_string())];
        for e in expand {
            query.push(("expand[]", (*e).to_owned()));
        }

        let response = self.inner.http.get(&url).query(&query).send().await?;
        let body: Paginated<T> = Self::handle_response(response).await?;
        Ok(body.data)
    }

    async fn get_one<T: DeserializeOwned>(
        &self,
        resource: &str,
        id: &str,
        expand: &[&str],
    ) -> Result<Option<T>, SureCartError> {
        let url = format!(
            "{}/{resource}/{}",
            self.inner.base_url,
            urlencoding::encode(id)
        );
        let query: Vec<(&str, String)> =
            expand.iter().map(|e| ("expand[]", (*e).to_owned())).collect();

        let response = self.inner.http.get(&url).query(&query).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        Self::handle_response(response).await.map(Some)
    }

    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, SureCartError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let message = response.text().await.unwrap_or_default();
        Err(SureCartError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
