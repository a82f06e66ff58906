//! Shipment tracking transformation for order events.

use omnisend_bridge_core::OrderEventKind;

use crate::omnisend;
use crate::surecart::Tracking;

/// Transform a SureCart tracking entry for an order event.
///
/// The tracking code is only attached for event kinds where Omnisend
/// accepts one; the courier name and URL always pass through.
#[must_use]
pub fn transform_tracking(tracking: &Tracking, kind: OrderEventKind) -> omnisend::Tracking {
    omnisend::Tracking {
        courier_title: tracking.courier_name.clone(),
        courier_url: tracking.url.clone(),
        code: if kind.supports_tracking_code() {
            tracking.number.clone()
        } else {
            None
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracking() -> Tracking {
        serde_json::from_value(serde_json::json!({
            "courier_name": "DHL",
            "url": "https://track.example/123",
            "number": "TRK123"
        }))
        .unwrap()
    }

    #[test]
    fn code_attached_only_for_supported_kinds() {
        let with_code = transform_tracking(&tracking(), OrderEventKind::Fulfilled);
        assert_eq!(with_code.code.as_deref(), Some("TRK123"));

        let without_code = transform_tracking(&tracking(), OrderEventKind::Placed);
        assert!(without_code.code.is_none());
        assert_eq!(without_code.courier_title.as_deref(), Some("DHL"));
    }
}
