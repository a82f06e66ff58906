//! Storefront JavaScript snippets.
//!
//! The Omnisend client library loads asynchronously on the storefront, so
//! both snippets poll for it: five attempts, 100ms apart, then give up
//! silently. Payloads are embedded as JSON at render time.

use serde_json::Value;

const EVENT_PUSHER_TEMPLATE: &str = r"var event_data = __PAYLOAD__;

send_event( 5 );

function send_event( attempts ) {
    if ( attempts <= 0 ) {
        return;
    }

    if ( event_data && window.omnisend ) {
        window.omnisend.push( event_data );

        return;
    }

    setTimeout( function() {
        send_event( attempts - 1 );
    }, 100 );
}
";

const IDENTIFY_TEMPLATE: &str = r"var omnisendIdentifiers = __PAYLOAD__;

identifyContact( 5 );

function identifyContact( attempts ) {
    if ( attempts <= 0 ) {
        return;
    }

    if ( omnisendIdentifiers && window.omnisend && window.omnisend.identifyContact ) {
        window.omnisend.identifyContact( omnisendIdentifiers );

        return;
    }

    setTimeout( function() {
        identifyContact( attempts - 1 );
    }, 100 );
}
";

/// Render the event pusher with the given payload embedded.
#[must_use]
pub fn render_event_pusher(payload: &Value) -> String {
    EVENT_PUSHER_TEMPLATE.replace("__PAYLOAD__", &payload.to_string())
}

/// Render the identify snippet with the given identifiers embedded.
#[must_use]
pub fn render_identify(identifiers: &Value) -> String {
    IDENTIFY_TEMPLATE.replace("__PAYLOAD__", &identifiers.to_string())
}
