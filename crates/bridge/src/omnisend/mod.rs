//! Omnisend API client.
//!
//! Thin wrapper over the v3 REST API. Webhook handlers treat every failure
//! here as non-fatal: the error is logged and the incoming webhook is still
//! acknowledged, since SureCart retries would replay the same failure.

use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use thiserror::Error;

use crate::config::OmnisendConfig;

pub mod types;

pub use types::{
    Address, Batch, CartEvent, Category, CheckoutEvent, Contact, Discount, Event, LineItem, OrderBase,
    OrderEvent, Product, ProductCategory, ProductVariant, Tracking, ViewedProduct,
    ViewedProductEvent,
};

const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-api-key");

/// Omnisend API errors.
#[derive(Debug, Error)]
pub enum OmnisendError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Resource not found")]
    NotFound,
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

struct OmnisendClientInner {
    http: reqwest::Client,
    base_url: String,
}

/// Omnisend API client, cheap to clone.
#[derive(Clone)]
pub struct OmnisendClient {
    inner: Arc<OmnisendClientInner>,
}

impl OmnisendClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(config: &OmnisendConfig) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut key = HeaderValue::from_str(config.api_key.expose_secret())
            .unwrap_or_else(|_| HeaderValue::from_static(""));
        key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(OmnisendClientInner {
                http,
                base_url: config.api_url.trim_end_matches('/').to_owned(),
            }),
        })
    }

    /// Register this store with Omnisend. Called exactly once per store.
    ///
    /// # Errors
    ///
    /// Returns [`OmnisendError`] on transport or API failure.
    pub async fn connect_store(&self, platform: &str) -> Result<(), OmnisendError> {
        self.post("/accounts", &serde_json::json!({ "platform": platform }))
            .await
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns [`OmnisendError`] on transport or API failure.
    pub async fn create_category(&self, category: &Category) -> Result<(), OmnisendError> {
        self.post("/product-categories", category).await
    }

    /// Update an existing category.
    ///
    /// # Errors
    ///
    /// Returns [`OmnisendError`] on transport or API failure.
    pub async fn update_category(&self, category: &Category) -> Result<(), OmnisendError> {
        let path = format!("/product-categories/{}", urlencoding::encode(&category.category_id));
        self.put(&path, category).await
    }

    /// Delete a category by id.
    ///
    /// # Errors
    ///
    /// Returns [`OmnisendError`] on transport or API failure.
    pub async fn delete_category(&self, id: &str) -> Result<(), OmnisendError> {
        self.delete(&format!("/product-categories/{}", urlencoding::encode(id)))
            .await
    }

    /// Whether a category already exists on the Omnisend side. Any failure
    /// reads as "not synced", which makes the caller fall back to create.
    pub async fn is_category_synced(&self, id: &str) -> bool {
        self.exists(&format!("/product-categories/{}", urlencoding::encode(id)))
            .await
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns [`OmnisendError`] on transport or API failure.
    pub async fn create_product(&self, product: &Product) -> Result<(), OmnisendError> {
        self.post("/products", product).await
    }

    /// Replace an existing product wholesale.
    ///
    /// # Errors
    ///
    /// Returns [`OmnisendError`] on transport or API failure.
    pub async fn replace_product(&self, product: &Product) -> Result<(), OmnisendError> {
        let path = format!("/products/{}", urlencoding::encode(&product.id));
        self.put(&path, product).await
    }

    /// Delete a product by id.
    ///
    /// # Errors
    ///
    /// Returns [`OmnisendError`] on transport or API failure.
    pub async fn delete_product(&self, id: &str) -> Result<(), OmnisendError> {
        self.delete(&format!("/products/{}", urlencoding::encode(id)))
            .await
    }

    /// Whether a product already exists on the Omnisend side.
    pub async fn is_product_synced(&self, id: &str) -> bool {
        self.exists(&format!("/products/{}", urlencoding::encode(id)))
            .await
    }

    /// Create or update a contact keyed by email.
    ///
    /// # Errors
    ///
    /// Returns [`OmnisendError`] on transport or API failure.
    pub async fn save_contact(&self, contact: &Contact) -> Result<(), OmnisendError> {
        self.post("/contacts", contact).await
    }

    /// Send a customer event.
    ///
    /// # Errors
    ///
    /// Returns [`OmnisendError`] on transport or API failure.
    pub async fn send_event(&self, event: &Event) -> Result<(), OmnisendError> {
        self.post("/events", event).await
    }

    /// Send a batch of items.
    ///
    /// # Errors
    ///
    /// Returns [`OmnisendError`] on transport or API failure.
    pub async fn send_batch(&self, batch: &Batch) -> Result<(), OmnisendError> {
        self.post("/batches", batch).await
    }

    async fn exists(&self, path: &str) -> bool {
        let url = format!("{}{path}", self.inner.base_url);

        match self.inner.http.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                tracing::warn!(path, error = %err, "Omnisend existence probe failed");
                false
            }
        }
    }

    async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<(), OmnisendError> {
        let url = format!("{}{path}", self.inner.base_url);
        let response = self.inner.http.post(&url).json(body).send().await?;
        Self::handle_response(response).await
    }

    async fn put<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<(), OmnisendError> {
        let url = format!("{}{path}", self.inner.base_url);
        let response = self.inner.http.put(&url).json(body).send().await?;
        Self::handle_response(response).await
    }

    async fn delete(&self, path: &str) -> Result<(), OmnisendError> {
        let url = format!("{}{path}", self.inner.base_url);
        let response = self.inner.http.delete(&url).send().await?;
        Self::handle_response(response).await
    }

    async fn handle_response(response: reqwest::Response) -> Result<(), OmnisendError> {
        let status = response.status();

        if status.is_success() {
            return Ok(());
        }

        if status == StatusCode::NOT_FOUND {
            return Err(OmnisendError::NotFound);
        }

        let message = response.text().await.unwrap_or_default();
        Err(OmnisendError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
