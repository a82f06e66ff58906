//! Status enums and mappings between SureCart and Omnisend vocabularies.

use serde::{Deserialize, Serialize};

/// Omnisend product availability status.
///
/// The precedence rules live with the callers ([`StockStatus::for_product`])
/// so every call site computes availability identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StockStatus {
    InStock,
    OutOfStock,
    NotAvailable,
}

impl StockStatus {
    /// Compute availability for a product.
    ///
    /// Archived wins over everything; unlimited stock implies in stock;
    /// otherwise the stock count decides.
    #[must_use]
    pub const fn for_product(archived: bool, unlimited_stock: bool, stock: i64) -> Self {
        if archived {
            return Self::NotAvailable;
        }

        if unlimited_stock || stock > 0 {
            return Self::InStock;
        }

        Self::OutOfStock
    }

    /// Omnisend wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InStock => "inStock",
            Self::OutOfStock => "outOfStock",
            Self::NotAvailable => "notAvailable",
        }
    }
}

/// Omnisend payment status derived from a SureCart order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentStatus {
    Paid,
    Voided,
    AwaitingPayment,
}

impl PaymentStatus {
    /// Map a raw SureCart order status onto the Omnisend payment status.
    #[must_use]
    pub fn from_order_status(status: &str) -> Self {
        match status {
            "processing" | "all" | "paid" => Self::Paid,
            "void" => Self::Voided,
            _ => Self::AwaitingPayment,
        }
    }

    /// Omnisend wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Voided => "voided",
            Self::AwaitingPayment => "awaitingPayment",
        }
    }
}

/// Map a SureCart fulfillment status onto Omnisend's vocabulary.
///
/// Only `partially_fulfilled` is renamed; every other value passes through
/// unchanged.
#[must_use]
pub fn fulfillment_status(status: &str) -> String {
    if status == "partially_fulfilled" {
        return "inProgress".to_owned();
    }

    status.to_owned()
}

/// The five order lifecycle events the bridge emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderEventKind {
    Placed,
    Paid,
    Canceled,
    Fulfilled,
    Refunded,
}

impl OrderEventKind {
    /// Omnisend event name.
    #[must_use]
    pub const fn event_name(self) -> &'static str {
        match self {
            Self::Placed => "placed order",
            Self::Paid => "paid for order",
            Self::Canceled => "order canceled",
            Self::Fulfilled => "order fulfilled",
            Self::Refunded => "order refunded",
        }
    }

    /// Whether the tracking code may be attached for this event kind.
    ///
    /// Omnisend only accepts tracking codes on events where a shipment can
    /// exist.
    #[must_use]
    pub const fn supports_tracking_code(self) -> bool {
        matches!(self, Self::Paid | Self::Fulfilled | Self::Refunded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archived_wins_over_stock_fields() {
        assert_eq!(
            StockStatus::for_product(true, true, 100),
            StockStatus::NotAvailable
        );
        assert_eq!(
            StockStatus::for_product(true, false, 0),
            StockStatus::NotAvailable
        );
    }

    #[test]
    fn unlimited_stock_implies_in_stock() {
        assert_eq!(
            StockStatus::for_product(false, true, 0),
            StockStatus::InStock
        );
        assert_eq!(
            StockStatus::for_product(false, true, -5),
            StockStatus::InStock
        );
    }

    #[test]
    fn stock_count_decides_otherwise() {
        assert_eq!(
            StockStatus::for_product(false, false, 5),
            StockStatus::InStock
        );
        assert_eq!(
            StockStatus::for_product(false, false, 0),
            StockStatus::OutOfStock
        );
    }

    #[test]
    fn payment_status_mapping() {
        assert_eq!(
            PaymentStatus::from_order_status("processing"),
            PaymentStatus::Paid
        );
        assert_eq!(PaymentStatus::from_order_status("all"), PaymentStatus::Paid);
        assert_eq!(
            PaymentStatus::from_order_status("paid"),
            PaymentStatus::Paid
        );
        assert_eq!(
            PaymentStatus::from_order_status("void"),
            PaymentStatus::Voided
        );
        assert_eq!(
            PaymentStatus::from_order_status("pending"),
            PaymentStatus::AwaitingPayment
        );
    }

    #[test]
    fn fulfillment_status_renames_partial_only() {
        assert_eq!(fulfillment_status("partially_fulfilled"), "inProgress");
        assert_eq!(fulfillment_status("fulfilled"), "fulfilled");
        assert_eq!(fulfillment_status("unfulfilled"), "unfulfilled");
    }

    #[test]
    fn tracking_code_allow_list() {
        assert!(OrderEventKind::Paid.supports_tracking_code());
        assert!(OrderEventKind::Fulfilled.supports_tracking_code());
        assert!(OrderEventKind::Refunded.supports_tracking_code());
        assert!(!OrderEventKind::Placed.supports_tracking_code());
        assert!(!OrderEventKind::Canceled.supports_tracking_code());
    }
}
