//! Order to lifecycle event transformation.
//!
//! A single entry point serves all five event kinds; the kind decides the
//! event name, the conditional fields, and whether the tracking code is
//! attached. Expanded discounts and refund details are fetched by the
//! caller and passed in.

use omnisend_bridge_core::{
    Cents, OrderEventKind, PaymentStatus, epoch_to_iso8601, fulfillment_status,
};

use crate::omnisend::{Event, LineItem, OrderBase, OrderEvent};
use crate::surecart::{Checkout, Discount, Order};
use crate::transform::{address, contact, discount, line_item, tracking};

/// Refund details resolved from the refund entity before transformation.
#[derive(Debug, Clone)]
pub struct RefundContext {
    pub amount: Cents,
    pub line_item_ids: Vec<String>,
}

/// Transform an order into a lifecycle event.
///
/// # Errors
///
/// Returns `serde_json::Error` if the event properties fail to serialize.
pub fn transform_order(
    order: &Order,
    kind: OrderEventKind,
    applied_discount: Option<&Discount>,
    refund: Option<&RefundContext>,
) -> Result<Event, serde_json::Error> {
    let email = order.checkout.inherited_email.as_deref().unwrap_or_default();
    let event_contact = contact::contact_for_event(email, None);
    let properties = order_properties(order, kind, applied_discount, refund);

    Event::new(kind.event_name(), "v2", event_contact, &properties)
}

/// Transform a backfill page of orders as placed-order events.
///
/// Backfilled events always carry the original checkout time, otherwise
/// Omnisend would date years of history at import time.
#[must_use]
pub fn transform_orders(orders: &[Order], kind: OrderEventKind) -> Vec<Event> {
    orders
        .iter()
        .filter_map(|order| {
            transform_order(order, kind, None, None)
                .map(|event| event.with_event_time(epoch_to_iso8601(order.checkout.created_at)))
                .map_err(|err| {
                    tracing::warn!(order_id = %order.id, error = %err, "order transform failed");
                })
                .ok()
        })
        .collect()
}

fn order_properties(
    order: &Order,
    kind: OrderEventKind,
    applied_discount: Option<&Discount>,
    refund: Option<&RefundContext>,
) -> OrderEvent {
    let checkout = &order.checkout;

    let refunded_ids: &[String] = refund.map_or(&[], |r| r.line_item_ids.as_slice());
    let line_items: Vec<LineItem> = checkout
        .line_items
        .data
        .iter()
        .map(line_item::transform_order_item)
        .collect();
    let refunded_line_items: Vec<LineItem> = checkout
        .line_items
        .data
        .iter()
        .filter(|item| refunded_ids.contains(&item.id))
        .map(line_item::transform_order_item)
        .collect();

    let base = OrderBase {
        id: checkout.id.clone(),
        order_number: order_number(checkout.number.as_deref().unwrap_or_default()),
        currency: checkout.currency.to_uppercase(),
        created_at: epoch_to_iso8601(checkout.created_at),
        shipping_method: shipping_method(checkout),
        payment_method: payment_method(checkout),
        fulfillment_status: fulfillment_status(&order.fulfillment_status),
        payment_status: PaymentStatus::from_order_status(&order.status).as_str().to_owned(),
        shipping_price: checkout.shipping_amount.to_decimal(),
        subtotal_price: checkout.subtotal_amount.to_decimal(),
        subtotal_tax_included: false,
        total_discount: checkout.discount_amount.to_decimal_abs(),
        total_price: checkout.total_amount.to_decimal(),
        total_tax: checkout.tax_amount.to_decimal(),
        address: address::transform_address(checkout),
        line_items,
        discounts: applied_discount
            .map(discount::transform_discount)
            .into_iter()
            .collect(),
        tracking: order
            .first_tracking()
            .map(|t| tracking::transform_tracking(t, kind)),
    };

    match kind {
        OrderEventKind::Placed | OrderEventKind::Paid | OrderEventKind::Fulfilled => {
            OrderEvent::Standard(base)
        }
        OrderEventKind::Canceled => OrderEvent::Canceled {
            base,
            cancel_reason: "unknown".to_owned(),
        },
        OrderEventKind::Refunded => OrderEvent::Refunded {
            base,
            total_refunded_amount: refund
                .map(|r| r.amount.to_decimal())
                .unwrap_or_default(),
            total_refunded_tax_amount: rust_decimal::Decimal::ZERO,
            refunded_line_items,
        },
    }
}

/// Strip everything but digits from the display order number.
fn order_number(raw: &str) -> u64 {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

fn shipping_method(checkout: &Checkout) -> String {
    checkout.selected_shipping_choice.as_ref().map_or_else(
        || "None".to_owned(),
        |choice| {
            choice
                .shipping_method
                .as_ref()
                .map_or_else(|| "Unknown".to_owned(), |method| method.name.clone())
        },
    )
}

fn payment_method(checkout: &Checkout) -> String {
    checkout
        .payment_method
        .as_ref()
        .and_then(|p| p.processor_type.clone())
        .unwrap_or_else(|| "manual".to_owned())
}
