//! Checkout address transformation for order events.

use crate::omnisend::Address;
use crate::surecart::Checkout;

/// Build the order event address block from a checkout.
///
/// When billing matches shipping the shipping address is used on both
/// sides. Missing either address yields no block at all; Omnisend rejects
/// partial ones.
#[must_use]
pub fn transform_address(checkout: &Checkout) -> Option<Address> {
    let shipping = checkout.shipping_address.as_ref()?;
    let billing = if checkout.billing_matches_shipping {
        shipping
    } else {
        checkout.billing_address.as_ref()?
    };

    Some(Address {
        billing_address_1: billing.line_1.clone(),
        billing_address_2: billing.line_2.clone(),
        billing_city: billing.city.clone(),
        billing_country: billing.country.clone(),
        billing_first_name: checkout.first_name.clone(),
        billing_last_name: checkout.last_name.clone(),
        billing_state: billing.state.clone(),
        billing_zip: billing.postal_code.clone(),
        shipping_address_1: shipping.line_1.clone(),
        shipping_address_2: shipping.line_2.clone(),
        shipping_city: shipping.city.clone(),
        shipping_country: shipping.country.clone(),
        shipping_first_name: checkout.first_name.clone(),
        shipping_last_name: checkout.last_name.clone(),
        shipping_state: shipping.state.clone(),
        shipping_zip: shipping.postal_code.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkout(json: serde_json::Value) -> Checkout {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn billing_falls_back_to_shipping_when_matching() {
        let checkout = checkout(serde_json::json!({
            "id": "ch_1",
            "currency": "usd",
            "first_name": "Ana",
            "last_name": "Ruiz",
            "billing_matches_shipping": true,
            "shipping_address": { "line_1": "Main st 1", "city": "Vilnius",
                "country": "LT", "postal_code": "01100", "state": null, "line_2": null }
        }));
        let address = transform_address(&checkout).unwrap();
        assert_eq!(address.billing_address_1.as_deref(), Some("Main st 1"));
        assert_eq!(address.shipping_address_1.as_deref(), Some("Main st 1"));
        assert_eq!(address.billing_first_name.as_deref(), Some("Ana"));
    }

    #[test]
    fn missing_billing_address_yields_none() {
        let checkout = checkout(serde_json::json!({
            "id": "ch_1",
            "currency": "usd",
            "billing_matches_shipping": false,
            "shipping_address": { "line_1": "Main st 1", "city": "Vilnius",
                "country": "LT", "postal_code": "01100", "state": null, "line_2": null }
        }));
        assert!(transform_address(&checkout).is_none());
    }

    #[test]
    fn missing_shipping_address_yields_none() {
        let checkout = checkout(serde_json::json!({
            "id": "ch_1",
            "currency": "usd",
            "billing_matches_shipping": true
        }));
        assert!(transform_address(&checkout).is_none());
    }
}
