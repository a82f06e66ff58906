//! Discount transformation for order events.

use crate::omnisend;
use crate::surecart::Discount;

/// Transform a SureCart discount into an order event discount.
///
/// SureCart reports the amount negative; Omnisend wants a positive value
/// with the subtraction expressed through the type marker.
#[must_use]
pub fn transform_discount(discount: &Discount) -> omnisend::Discount {
    omnisend::Discount {
        amount: discount.discount_amount.to_decimal_abs(),
        code: discount.promotion.as_ref().and_then(|p| p.code.clone()),
        kind: "-".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn amount_is_absolute_and_type_is_minus() {
        let discount: Discount = serde_json::from_value(serde_json::json!({
            "id": "dis_1",
            "discount_amount": -500,
            "promotion": { "code": "SAVE5" }
        }))
        .unwrap();
        let result = transform_discount(&discount);
        assert_eq!(result.amount, Decimal::new(500, 2));
        assert_eq!(result.code.as_deref(), Some("SAVE5"));
        assert_eq!(result.kind, "-");
    }
}
