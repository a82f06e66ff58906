//! SureCart webhook dispatch.
//!
//! Every handler acknowledges the webhook with 200 even when the Omnisend
//! call fails; SureCart retries would only replay the failure. Unknown
//! event types are acknowledged and ignored so new platform events never
//! break delivery.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use omnisend_bridge_core::OrderEventKind;

use crate::omnisend::Event;
use crate::state::AppState;
use crate::surecart::{Checkout, Collection, Customer, LineItem, Order};
use crate::transform::{RefundContext, cart, category, contact, order, product};

/// Webhook envelope: the event type plus the affected entity.
#[derive(Debug, Deserialize)]
pub struct WebhookEnvelope {
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

/// `POST /webhooks/surecart`
pub async fn handle(
    State(state): State<AppState>,
    Json(envelope): Json<WebhookEnvelope>,
) -> StatusCode {
    tracing::debug!(event = %envelope.event, "webhook received");

    match envelope.event.as_str() {
        "product_collection.created" => collection_created(&state, &envelope.data).await,
        "product_collection.updated" => collection_updated(&state, &envelope.data).await,
        "product_collection.deleted" => collection_deleted(&state, &envelope.data).await,
        "product.updated" => product_updated(&state, &envelope.data).await,
        "product.deleted" => product_deleted(&state, &envelope.data).await,
        "customer.created" => customer_created(&state, &envelope.data).await,
        "checkout.confirmed" => checkout_confirmed(&state, &envelope.data).await,
        "checkout.cancelled" => order_event_from_checkout(&state, &envelope.data, OrderEventKind::Canceled).await,
        "checkout.manually_paid" => order_event_from_checkout(&state, &envelope.data, OrderEventKind::Paid).await,
        "fulfillment.created" => fulfillment_created(&state, &envelope.data).await,
        "refund.created" => refund_created(&state, &envelope.data).await,
        "checkout.created" => cart_created(&state, &envelope.data).await,
        "line_item.created" => line_item_created(&state, &envelope.data).await,
        other => {
            tracing::debug!(event = other, "ignoring unhandled webhook event");
        }
    }

    StatusCode::OK
}

async fn collection_created(state: &AppState, data: &Value) {
    let Some(collection) = parse::<Collection>(data, "product collection") else {
        return;
    };

    let payload = category::transform_category(&collection);
    if let Err(err) = state.omnisend().create_category(&payload).await {
        tracing::warn!(collection_id = %collection.id, error = %err, "category create failed");
    }
}

async fn collection_updated(state: &AppState, data: &Value) {
    let Some(collection) = parse::<Collection>(data, "product collection") else {
        return;
    };

    let payload = category::transform_category(&collection);

    // An update for a category Omnisend never saw falls back to create.
    let result = if state.omnisend().is_category_synced(&collection.id).await {
        state.omnisend().update_category(&payload).await
    } else {
        state.omnisend().create_category(&payload).await
    };

    if let Err(err) = result {
        tracing::warn!(collection_id = %collection.id, error = %err, "category update failed");
    }
}

async fn collection_deleted(state: &AppState, data: &Value) {
    let Some(id) = entity_id(data) else {
        return;
    };

    if !state.omnisend().is_category_synced(id).await {
        return;
    }

    if let Err(err) = state.omnisend().delete_category(id).await {
        tracing::warn!(collection_id = id, error = %err, "category delete failed");
    }
}

async fn product_updated(state: &AppState, data: &Value) {
    let Some(id) = entity_id(data) else {
        return;
    };

    // Refetch so variants and collections arrive expanded.
    let fetched = match state.surecart().get_product(id).await {
        Ok(Some(fetched)) => fetched,
        Ok(None) => return,
        Err(err) => {
            tracing::warn!(product_id = id, error = %err, "product refetch failed");
            return;
        }
    };

    let payload = product::transform_product(&fetched);

    let result = if state.omnisend().is_product_synced(id).await {
        state.omnisend().replace_product(&payload).await
    } else {
        state.omnisend().create_product(&payload).await
    };

    if let Err(err) = result {
        tracing::warn!(product_id = id, error = %err, "product update failed");
    }
}

async fn product_deleted(state: &AppState, data: &Value) {
    let Some(id) = entity_id(data) else {
        return;
    };

    if !state.omnisend().is_product_synced(id).await {
        return;
    }

    if let Err(err) = state.omnisend().delete_product(id).await {
        tracing::warn!(product_id = id, error = %err, "product delete failed");
    }
}

async fn customer_created(state: &AppState, data: &Value) {
    let Some(customer) = parse::<Customer>(data, "customer") else {
        return;
    };

    let payload = contact::transform_contact(&customer);
    if let Err(err) = state.omnisend().save_contact(&payload).await {
        tracing::warn!(customer_id = %customer.id, error = %err, "contact create failed");
    }
}

/// Confirmed checkout: emit placed-order, add paid-for-order when the order
/// is already settled, then upsert the buyer with their consent choices.
async fn checkout_confirmed(state: &AppState, data: &Value) {
    let Some(fetched) = fetch_order_from_ref(state, data.get("order")).await else {
        return;
    };

    send_order_event(state, &fetched, OrderEventKind::Placed, None).await;

    if fetched.status == "paid" {
        send_order_event(state, &fetched, OrderEventKind::Paid, None).await;
    }

    let buyer = contact::contact_by_order(&fetched);
    if let Err(err) = state.omnisend().save_contact(&buyer).await {
        tracing::warn!(order_id = %fetched.id, error = %err, "contact save failed");
    }
}

async fn order_event_from_checkout(state: &AppState, data: &Value, kind: OrderEventKind) {
    let Some(fetched) = fetch_order_from_ref(state, data.get("order")).await else {
        return;
    };

    send_order_event(state, &fetched, kind, None).await;
}

async fn fulfillment_created(state: &AppState, data: &Value) {
    let Some(fetched) = fetch_order_from_ref(state, data.get("order")).await else {
        return;
    };

    send_order_event(state, &fetched, OrderEventKind::Fulfilled, None).await;
}

async fn refund_created(state: &AppState, data: &Value) {
    let Some(refund_id) = entity_id(data) else {
        return;
    };

    let refund = match state.surecart().get_refund(refund_id).await {
        Ok(Some(refund)) => refund,
        Ok(None) => return,
        Err(err) => {
            tracing::warn!(refund_id, error = %err, "refund fetch failed");
            return;
        }
    };

    let Some(order_id) = refund.order_id() else {
        tracing::warn!(refund_id, "refund has no reachable order");
        return;
    };

    let Some(fetched) = fetch_order(state, order_id).await else {
        return;
    };

    let context = RefundContext {
        amount: refund.amount,
        line_item_ids: refund
            .refunded_line_item_ids()
            .into_iter()
            .map(str::to_owned)
            .collect(),
    };

    send_order_event(state, &fetched, OrderEventKind::Refunded, Some(&context)).await;
}

async fn cart_created(state: &AppState, data: &Value) {
    let Some(parsed) = parse::<Checkout>(data, "checkout") else {
        return;
    };

    match cart::transform_cart(&parsed, None) {
        Ok(Some(event)) => send_event(state, &event, "added product to cart").await,
        Ok(None) => {}
        Err(err) => tracing::warn!(checkout_id = %parsed.id, error = %err, "cart transform failed"),
    }
}

async fn line_item_created(state: &AppState, data: &Value) {
    let Some(item) = parse::<LineItem>(data, "line item") else {
        return;
    };

    match cart::transform_added_item(&item, None) {
        Ok(Some(event)) => send_event(state, &event, "added product to cart").await,
        Ok(None) => {}
        Err(err) => tracing::warn!(item_id = %item.id, error = %err, "cart item transform failed"),
    }
}

/// Emit one order lifecycle event, pre-fetching the applied discount when
/// the checkout references one.
async fn send_order_event(
    state: &AppState,
    fetched: &Order,
    kind: OrderEventKind,
    refund: Option<&RefundContext>,
) {
    let applied_discount = match &fetched.checkout.discount {
        Some(discount_id) => match state.surecart().get_discount(discount_id).await {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!(discount_id = %discount_id, error = %err, "discount fetch failed");
                None
            }
        },
        None => None,
    };

    match order::transform_order(fetched, kind, applied_discount.as_ref(), refund) {
        Ok(event) => send_event(state, &event, kind.event_name()).await,
        Err(err) => {
            tracing::warn!(order_id = %fetched.id, error = %err, "order transform failed");
        }
    }
}

async fn send_event(state: &AppState, event: &Event, name: &str) {
    if let Err(err) = state.omnisend().send_event(event).await {
        tracing::warn!(event = name, error = %err, "event send failed");
    }
}

/// The `order` field arrives as a bare id or an embedded object depending
/// on the event type.
async fn fetch_order_from_ref(state: &AppState, order_ref: Option<&Value>) -> Option<Order> {
    let id = match order_ref {
        Some(Value::String(id)) => id.as_str(),
        Some(Value::Object(map)) => map.get("id").and_then(Value::as_str)?,
        _ => return None,
    };

    fetch_order(state, id).await
}

async fn fetch_order(state: &AppState, id: &str) -> Option<Order> {
    match state.surecart().get_order(id).await {
        Ok(found) => found,
        Err(err) => {
            tracing::warn!(order_id = id, error = %err, "order fetch failed");
            None
        }
    }
}

fn entity_id(data: &Value) -> Option<&str> {
    data.get("id").and_then(Value::as_str)
}

fn parse<T: serde::de::DeserializeOwned>(data: &Value, what: &str) -> Option<T> {
    match serde_json::from_value(data.clone()) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            tracing::warn!(entity = what, error = %err, "webhook payload did not parse");
            None
        }
    }
}
