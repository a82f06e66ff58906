//! Customer and checkout data to contact transformation.

use crate::omnisend::types::{SOURCE_TAG, STATUS_SUBSCRIBED};
use crate::omnisend::Contact;
use crate::surecart::{Address, Customer, Order};

/// Checkout metadata key set when the buyer ticked the email consent box.
pub const EMAIL_CONSENT_KEY: &str = "omnisend_email_consent";

/// Checkout metadata key set when the buyer ticked the SMS consent box.
pub const PHONE_CONSENT_KEY: &str = "omnisend_phone_consent";

/// Transform a SureCart customer into an Omnisend contact.
#[must_use]
pub fn transform_contact(customer: &Customer) -> Contact {
    let mut contact = Contact::tagged();
    contact.email = customer.email.clone();
    contact.first_name = customer.first_name.clone();
    contact.last_name = customer.last_name.clone();
    add_address(&mut contact, customer.shipping_address.as_ref());
    contact
}

/// Transform a page of customers.
#[must_use]
pub fn transform_contacts(customers: &[Customer]) -> Vec<Contact> {
    customers.iter().map(transform_contact).collect()
}

/// Minimal contact used to attribute an event.
///
/// A known Omnisend contact id wins over the email; the id comes from the
/// browser cookie and is only available on the tracking path.
#[must_use]
pub fn contact_for_event(email: &str, contact_id: Option<&str>) -> Contact {
    let mut contact = Contact::tagged();

    if let Some(id) = contact_id {
        contact.id = Some(id.to_owned());
        return contact;
    }

    contact.email = Some(email.to_owned());
    contact
}

/// Full contact assembled from a confirmed order, consent flags included.
///
/// Consent checkboxes land in the checkout metadata. A present key upgrades
/// the channel to subscribed; the consent origin is recorded either way.
#[must_use]
pub fn contact_by_order(order: &Order) -> Contact {
    let checkout = &order.checkout;
    let mut contact = Contact::tagged();

    contact.email = checkout.inherited_email.clone();
    contact.first_name = checkout.first_name.clone();
    contact.last_name = checkout.last_name.clone();
    contact.phone = checkout.phone.clone();

    if checkout.metadata.get(EMAIL_CONSENT_KEY).is_some() {
        contact.email_status = Some(STATUS_SUBSCRIBED.to_owned());
    }
    contact.email_consent = Some(SOURCE_TAG.to_owned());

    if checkout.metadata.get(PHONE_CONSENT_KEY).is_some() {
        contact.phone_status = Some(STATUS_SUBSCRIBED.to_owned());
    }
    contact.phone_consent = Some(SOURCE_TAG.to_owned());

    add_address(&mut contact, checkout.shipping_address.as_ref());
    contact
}

fn add_address(contact: &mut Contact, address: Option<&Address>) {
    let Some(address) = address else {
        return;
    };

    contact.address = address.line_1.clone();
    contact.city = address.city.clone();
    contact.country = address.country.clone();
    contact.postal_code = address.postal_code.clone();
    contact.state = address.state.clone();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_contact_carries_the_source_tag() {
        let customer: Customer = serde_json::from_value(serde_json::json!({
            "id": "cus_1",
            "email": "a@example.com"
        }))
        .unwrap();
        let contact = transform_contact(&customer);
        assert_eq!(contact.tags, vec![SOURCE_TAG]);
        assert_eq!(contact.email.as_deref(), Some("a@example.com"));
    }

    #[test]
    fn cookie_id_wins_over_email() {
        let contact = contact_for_event("a@example.com", Some("omni_123"));
        assert_eq!(contact.id.as_deref(), Some("omni_123"));
        assert!(contact.email.is_none());

        let contact = contact_for_event("a@example.com", None);
        assert!(contact.id.is_none());
        assert_eq!(contact.email.as_deref(), Some("a@example.com"));
    }

    fn order_with_metadata(metadata: serde_json::Value) -> Order {
        serde_json::from_value(serde_json::json!({
            "id": "ord_1",
            "status": "paid",
            "fulfillment_status": "unfulfilled",
            "checkout": {
                "id": "ch_1",
                "currency": "usd",
                "inherited_email": "b@example.com",
                "first_name": "Ana",
                "last_name": "Ruiz",
                "phone": "+37060000000",
                "metadata": metadata,
                "shipping_address": {
                    "line_1": "Main st 1",
                    "city": "Vilnius",
                    "country": "LT",
                    "postal_code": "01100",
                    "state": null,
                    "line_2": null
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn consent_keys_upgrade_subscription_status() {
        let order = order_with_metadata(serde_json::json!({
            "omnisend_email_consent": "consent"
        }));
        let contact = contact_by_order(&order);
        assert_eq!(contact.email_status.as_deref(), Some("subscribed"));
        assert!(contact.phone_status.is_none());
        assert_eq!(contact.email_consent.as_deref(), Some(SOURCE_TAG));
        assert_eq!(contact.phone_consent.as_deref(), Some(SOURCE_TAG));
    }

    #[test]
    fn order_contact_includes_shipping_address() {
        let order = order_with_metadata(serde_json::json!({}));
        let contact = contact_by_order(&order);
        assert_eq!(contact.city.as_deref(), Some("Vilnius"));
        assert_eq!(contact.postal_code.as_deref(), Some("01100"));
        assert_eq!(contact.phone.as_deref(), Some("+37060000000"));
    }
}
