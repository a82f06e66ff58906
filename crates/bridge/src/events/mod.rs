//! Inbound event handling.
//!
//! Two channels feed the bridge: SureCart webhooks ([`webhooks`]) for
//! server-side commerce events, and storefront tracking requests
//! ([`track`]) for the cookie-gated browser flows.

pub mod track;
pub mod webhooks;
