//! HTTP route definitions.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use serde_json::{Value, json};

use omnisend_bridge_core::SyncCategory;

use crate::error::ApiError;
use crate::events::{track, webhooks};
use crate::state::AppState;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/status", get(status))
        .route("/webhooks/surecart", post(webhooks::handle))
        .route("/track/checkout-view", get(track::checkout_view))
        .route("/track/checkout-started", post(track::checkout_started))
        .route("/track/product-viewed.js", get(track::product_viewed))
        .route("/track/login", post(track::login))
        .route("/track/identify.js", get(track::identify))
        .with_state(state)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

/// Backfill progress and store connection state.
async fn status(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let mut syncs = serde_json::Map::new();

    for category in SyncCategory::ALL {
        let status = state.settings().sync_status(category).await?;
        syncs.insert(category.label().to_owned(), json!(status.label()));
    }

    let connected = state.settings().is_store_connected().await?;

    Ok(Json(json!({
        "store_connected": connected,
        "syncs": syncs,
    })))
}
