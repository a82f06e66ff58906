//! Added-product-to-cart event transformation.

use crate::omnisend::{CartEvent, Event, LineItem as EventLineItem};
use crate::surecart::{Checkout, LineItem};
use crate::transform::{contact, line_item};

/// Transform a fresh checkout into an added-to-cart event.
///
/// Fired when the very first item creates the checkout, so every non-free
/// line item is a candidate for the added-item slot.
///
/// # Errors
///
/// Returns `serde_json::Error` if the event properties fail to serialize.
pub fn transform_cart(
    checkout: &Checkout,
    contact_id: Option<&str>,
) -> Result<Option<Event>, serde_json::Error> {
    build_event(checkout, None, contact_id)
}

/// Transform a line item added to an existing checkout.
///
/// The webhook payload embeds the owning checkout; without it the cart
/// state cannot be reconstructed and the event is skipped.
///
/// # Errors
///
/// Returns `serde_json::Error` if the event properties fail to serialize.
pub fn transform_added_item(
    item: &LineItem,
    contact_id: Option<&str>,
) -> Result<Option<Event>, serde_json::Error> {
    let Some(checkout) = item.checkout.as_deref() else {
        return Ok(None);
    };

    build_event(checkout, Some(item.id.as_str()), contact_id)
}

fn build_event(
    checkout: &Checkout,
    added_item_id: Option<&str>,
    contact_id: Option<&str>,
) -> Result<Option<Event>, serde_json::Error> {
    let Some(email) = checkout.inherited_email.as_deref() else {
        return Ok(None);
    };

    // Free items carry no revenue signal and are dropped from cart events.
    let items: Vec<&LineItem> = checkout
        .line_items
        .data
        .iter()
        .filter(|item| item.total_amount.0 != 0)
        .collect();

    let mut added_item: Option<EventLineItem> = None;
    let mut event_items = Vec::with_capacity(items.len());

    for item in &items {
        let transformed = line_item::transform_cart_item(item);

        if added_item_id == Some(item.id.as_str()) || items.len() == 1 {
            added_item = Some(transformed.clone());
        }

        event_items.push(transformed);
    }

    let properties = CartEvent {
        abandoned_checkout_url: checkout
            .page_url()
            .or(checkout.portal_url.as_deref())
            .unwrap_or_default()
            .to_owned(),
        cart_id: checkout.id.clone(),
        currency: checkout.currency.to_uppercase(),
        value: checkout.total_amount.to_decimal(),
        added_item,
        line_items: event_items,
    };

    let event_contact = contact::contact_for_event(email, contact_id);
    Event::new("added product to cart", "", event_contact, &properties).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkout(json: serde_json::Value) -> Checkout {
        serde_json::from_value(json).unwrap()
    }

    fn item_json(id: &str, total: i64) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "quantity": 1,
            "total_amount": total,
            "full_amount": total,
            "discount_amount": 0,
            "price": { "product": { "id": "prod_1", "name": "Mug" } }
        })
    }

    fn base_json(items: Vec<serde_json::Value>) -> serde_json::Value {
        serde_json::json!({
            "id": "ch_1",
            "currency": "usd",
            "inherited_email": "a@example.com",
            "total_amount": 1999,
            "portal_url": "https://shop.example/cart",
            "line_items": { "data": items }
        })
    }

    #[test]
    fn single_item_cart_marks_added_item() {
        let event = transform_cart(&checkout(base_json(vec![item_json("li_1", 1999)])), None)
            .unwrap()
            .unwrap();
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["eventName"], "added product to cart");
        assert_eq!(json["properties"]["addedItem"]["id"], "li_1");
        assert_eq!(
            json["properties"]["abandonedCheckoutUrl"],
            "https://shop.example/cart"
        );
    }

    #[test]
    fn free_items_are_dropped() {
        let event = transform_cart(
            &checkout(base_json(vec![item_json("li_1", 0), item_json("li_2", 1999)])),
            None,
        )
        .unwrap()
        .unwrap();
        let json = serde_json::to_value(&event).unwrap();
        let line_items = json["properties"]["lineItems"].as_array().unwrap();
        assert_eq!(line_items.len(), 1);
        assert_eq!(line_items[0]["id"], "li_2");
        // The only priced item left counts as the added one.
        assert_eq!(json["properties"]["addedItem"]["id"], "li_2");
    }

    #[test]
    fn added_item_matched_by_id_in_multi_item_cart() {
        let mut line_item: LineItem = serde_json::from_value(item_json("li_2", 999)).unwrap();
        line_item.checkout = Some(Box::new(checkout(base_json(vec![
            item_json("li_1", 1999),
            item_json("li_2", 999),
        ]))));

        let event = transform_added_item(&line_item, None).unwrap().unwrap();
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["properties"]["addedItem"]["id"], "li_2");
        assert_eq!(json["properties"]["lineItems"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn item_without_embedded_checkout_is_skipped() {
        let line_item: LineItem = serde_json::from_value(item_json("li_1", 999)).unwrap();
        assert!(transform_added_item(&line_item, None).unwrap().is_none());
    }

    #[test]
    fn anonymous_cart_is_skipped() {
        let mut json = base_json(vec![item_json("li_1", 1999)]);
        json["inherited_email"] = serde_json::Value::Null;
        assert!(transform_cart(&checkout(json), None).unwrap().is_none());
    }
}
