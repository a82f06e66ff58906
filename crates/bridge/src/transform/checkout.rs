//! Started-checkout event transformation.

use crate::omnisend::{CheckoutEvent, Event};
use crate::surecart::Checkout;
use crate::transform::{contact, line_item};

/// Transform a checkout into a started-checkout event.
///
/// Returns `None` when the checkout has no email yet and no contact id is
/// known; an anonymous checkout cannot be attributed.
///
/// # Errors
///
/// Returns `serde_json::Error` if the event properties fail to serialize.
pub fn transform_checkout(
    checkout: &Checkout,
    contact_id: Option<&str>,
) -> Result<Option<Event>, serde_json::Error> {
    let Some(email) = checkout.inherited_email.as_deref() else {
        return Ok(None);
    };

    let properties = CheckoutEvent {
        abandoned_checkout_url: checkout.page_url().unwrap_or_default().to_owned(),
        cart_id: checkout.id.clone(),
        currency: checkout.currency.to_uppercase(),
        value: checkout.total_amount.to_decimal(),
        line_items: checkout
            .line_items
            .data
            .iter()
            .map(line_item::transform_cart_item)
            .collect(),
    };

    let event_contact = contact::contact_for_event(email, contact_id);
    Event::new("started checkout", "", event_contact, &properties).map(Some)
}
