//! Backfill sync state.

use serde::{Deserialize, Serialize};

/// The four entity categories covered by the initial backfill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncCategory {
    Categories,
    Products,
    Orders,
    Customers,
}

impl SyncCategory {
    /// All categories, in the order the backfill drains them.
    pub const ALL: [Self; 4] = [
        Self::Categories,
        Self::Products,
        Self::Orders,
        Self::Customers,
    ];

    /// Key under which this category's status is persisted.
    #[must_use]
    pub const fn setting_key(self) -> &'static str {
        match self {
            Self::Categories => "omnisend_sc_category_sync",
            Self::Products => "omnisend_sc_product_sync",
            Self::Orders => "omnisend_sc_order_sync",
            Self::Customers => "omnisend_sc_customers_sync",
        }
    }

    /// Display label for status reporting.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Categories => "Categories",
            Self::Products => "Products",
            Self::Orders => "Orders",
            Self::Customers => "Customers",
        }
    }
}

/// Tri-state backfill progress marker, persisted per category.
///
/// Monotonic in practice: the orchestrator moves `NotStarted` ->
/// `InProgress` -> `Complete` and never resets a category. The wire integers
/// are part of the persisted format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    #[default]
    NotStarted,
    Complete,
    InProgress,
}

impl SyncStatus {
    /// Decode the persisted integer; anything unknown counts as not started.
    #[must_use]
    pub const fn from_i64(value: i64) -> Self {
        match value {
            1 => Self::Complete,
            2 => Self::InProgress,
            _ => Self::NotStarted,
        }
    }

    /// Persisted integer value.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        match self {
            Self::NotStarted => 0,
            Self::Complete => 1,
            Self::InProgress => 2,
        }
    }

    /// Whether a new backfill pass may claim this category.
    ///
    /// In-progress and complete categories are never re-entered; each
    /// category is backfilled at most once.
    #[must_use]
    pub const fn allows_sync(self) -> bool {
        matches!(self, Self::NotStarted)
    }

    /// Human-readable label for status reporting.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "Not started",
            Self::InProgress => "In progress",
            Self::Complete => "Finished",
        }
    }
}
