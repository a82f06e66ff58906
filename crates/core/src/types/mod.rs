//! Core types for the Omnisend bridge.
//!
//! This module provides the pure value conversions and status mappings that
//! every transformer relies on.

pub mod price;
pub mod status;
pub mod sync;
pub mod time;

pub use price::Cents;
pub use status::{OrderEventKind, PaymentStatus, StockStatus, fulfillment_status};
pub use sync::{SyncCategory, SyncStatus};
pub use time::epoch_to_iso8601;
