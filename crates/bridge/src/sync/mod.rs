//! Initial backfill orchestration.
//!
//! Each entity category drains page by page from SureCart, transforms, and
//! ships to Omnisend in batches of up to [`SYNC_BATCH_LIMIT`] items. A
//! persisted tri-state flag per category makes the backfill one-time-only:
//! once a category is in progress or complete it is never re-entered.

use serde_json::Value;

use omnisend_bridge_core::{OrderEventKind, SyncCategory, SyncStatus};

use crate::db::settings::{SettingsError, SettingsStore};
use crate::omnisend::{Batch, OmnisendClient, OmnisendError};
use crate::state::AppState;
use crate::surecart::SureCartClient;
use crate::transform::{category, contact, order, product};

/// Accumulated items are flushed once they reach this count.
pub const SYNC_BATCH_LIMIT: usize = 40;

/// One page of already-transformed items for a category.
pub(crate) trait ModelPages {
    /// Fetch and transform page `page` (1-indexed). An empty page ends the
    /// drain.
    async fn page(&self, category: SyncCategory, page: u32) -> Vec<Value>;
}

/// Destination for flushed batches.
pub(crate) trait BatchSink {
    async fn send(&self, endpoint: &str, items: Vec<Value>) -> Result<(), OmnisendError>;
}

/// Persisted per-category status flags.
pub(crate) trait SyncStateStore {
    async fn status(&self, category: SyncCategory) -> Result<SyncStatus, SettingsError>;
    async fn set_status(
        &self,
        category: SyncCategory,
        status: SyncStatus,
    ) -> Result<(), SettingsError>;
}

impl SyncStateStore for SettingsStore {
    async fn status(&self, category: SyncCategory) -> Result<SyncStatus, SettingsError> {
        self.sync_status(category).await
    }

    async fn set_status(
        &self,
        category: SyncCategory,
        status: SyncStatus,
    ) -> Result<(), SettingsError> {
        self.set_sync_status(category, status).await
    }
}

/// Batch endpoint for a category's items.
const fn batch_endpoint(category: SyncCategory) -> &'static str {
    match category {
        SyncCategory::Categories => "categories",
        SyncCategory::Products => "products",
        SyncCategory::Orders => "events",
        SyncCategory::Customers => "contacts",
    }
}

/// Run every pending category once.
///
/// # Errors
///
/// Returns [`SettingsError`] if the status flags cannot be read or written.
/// Upstream send failures inside a drain are logged and skipped so a flaky
/// batch does not wedge the whole category.
pub(crate) async fn run_pending<P, K, S>(
    pages: &P,
    sink: &K,
    store: &S,
) -> Result<(), SettingsError>
where
    P: ModelPages,
    K: BatchSink,
    S: SyncStateStore,
{
    for category in SyncCategory::ALL {
        if !store.status(category).await?.allows_sync() {
            continue;
        }

        store.set_status(category, SyncStatus::InProgress).await?;
        tracing::info!(category = category.label(), "backfill started");

        drain_category(pages, sink, category).await;

        store.set_status(category, SyncStatus::Complete).await?;
        tracing::info!(category = category.label(), "backfill finished");
    }

    Ok(())
}

async fn drain_category<P: ModelPages, K: BatchSink>(
    pages: &P,
    sink: &K,
    category: SyncCategory,
) {
    let endpoint = batch_endpoint(category);
    let mut pending: Vec<Value> = Vec::new();
    let mut page = 1u32;

    loop {
        let items = pages.page(category, page).await;
        page += 1;

        if items.is_empty() {
            break;
        }

        pending.extend(items);

        if pending.len() >= SYNC_BATCH_LIMIT {
            flush(sink, endpoint, std::mem::take(&mut pending)).await;
        }
    }

    if !pending.is_empty() {
        flush(sink, endpoint, pending).await;
    }
}

async fn flush<K: BatchSink>(sink: &K, endpoint: &str, items: Vec<Value>) {
    let count = items.len();

    if let Err(err) = sink.send(endpoint, items).await {
        tracing::warn!(endpoint, count, error = %err, "batch send failed");
    }
}

/// Live page source backed by the SureCart client and the transformers.
pub(crate) struct SureCartPages {
    client: SureCartClient,
}

impl SureCartPages {
    pub(crate) const fn new(client: SureCartClient) -> Self {
        Self { client }
    }
}

impl ModelPages for SureCartPages {
    async fn page(&self, category: SyncCategory, page: u32) -> Vec<Value> {
        match category {
            SyncCategory::Categories => {
                to_values(&category::transform_categories(&self.client.collections_page(page).await))
            }
            SyncCategory::Products => {
                to_values(&product::transform_products(&self.client.products_page(page).await))
            }
            SyncCategory::Orders => to_values(&order::transform_orders(
                &self.client.orders_page(page).await,
                OrderEventKind::Placed,
            )),
            SyncCategory::Customers => {
                to_values(&contact::transform_contacts(&self.client.customers_page(page).await))
            }
        }
    }
}

fn to_values<T: serde::Serialize>(items: &[T]) -> Vec<Value> {
    items
        .iter()
        .filter_map(|item| {
            serde_json::to_value(item)
                .map_err(|err| tracing::warn!(error = %err, "item serialization failed"))
                .ok()
        })
        .collect()
}

impl BatchSink for OmnisendClient {
    async fn send(&self, endpoint: &str, items: Vec<Value>) -> Result<(), OmnisendError> {
        let batch = Batch {
            method: "POST".to_owned(),
            endpoint: endpoint.to_owned(),
            items,
        };
        self.send_batch(&batch).await
    }
}

/// Scheduler loop: connect the store once, then run pending backfills on
/// every tick until all four categories are complete.
pub async fn run_scheduler(state: AppState) {
    let interval = std::time::Duration::from_secs(state.config().sync_interval_secs);
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    let pages = SureCartPages::new(state.surecart().clone());

    loop {
        ticker.tick().await;

        if let Err(err) = ensure_store_connected(&state).await {
            tracing::error!(error = %err, "store connect check failed");
            continue;
        }

        if let Err(err) = run_pending(&pages, state.omnisend(), state.settings()).await {
            tracing::error!(error = %err, "backfill pass failed");
        }
    }
}

/// Register the store with Omnisend exactly once. The persisted flag is
/// only set after a successful call so a failure retries next tick.
async fn ensure_store_connected(state: &AppState) -> Result<(), SettingsError> {
    if state.settings().is_store_connected().await? {
        return Ok(());
    }

    match state.omnisend().connect_store("sureCart").await {
        Ok(()) => {
            state.settings().mark_store_connected().await?;
            tracing::info!("store connected to Omnisend");
        }
        Err(err) => {
            tracing::warn!(error = %err, "store connect failed, will retry");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Yields `total` items split into pages of `page_size`, for one
    /// category only.
    struct FixedPages {
        category: SyncCategory,
        total: usize,
        page_size: usize,
    }

    impl ModelPages for FixedPages {
        async fn page(&self, category: SyncCategory, page: u32) -> Vec<Value> {
            if category != self.category {
                return Vec::new();
            }

            let start = (page as usize - 1) * self.page_size;
            let end = (start + self.page_size).min(self.total);

            (start..end).map(|i| serde_json::json!({ "n": i })).collect()
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        batches: Mutex<Vec<(String, usize)>>,
    }

    impl BatchSink for RecordingSink {
        async fn send(&self, endpoint: &str, items: Vec<Value>) -> Result<(), OmnisendError> {
            self.batches
                .lock()
                .unwrap()
                .push((endpoint.to_owned(), items.len()));
            Ok(())
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        statuses: Mutex<HashMap<SyncCategory, SyncStatus>>,
        writes: Mutex<Vec<(SyncCategory, SyncStatus)>>,
    }

    impl SyncStateStore for MemoryStore {
        async fn status(&self, category: SyncCategory) -> Result<SyncStatus, SettingsError> {
            Ok(self
                .statuses
                .lock()
                .unwrap()
                .get(&category)
                .copied()
                .unwrap_or_default())
        }

        async fn set_status(
            &self,
            category: SyncCategory,
            status: SyncStatus,
        ) -> Result<(), SettingsError> {
            self.statuses.lock().unwrap().insert(category, status);
            self.writes.lock().unwrap().push((category, status));
            Ok(())
        }
    }

    #[tokio::test]
    async fn flushes_at_threshold_with_remainder() {
        // 85 products in pages of 10: expect 40, 40, then the final 5.
        let pages = FixedPages {
            category: SyncCategory::Products,
            total: 85,
            page_size: 10,
        };
        let sink = RecordingSink::default();
        let store = MemoryStore::default();

        run_pending(&pages, &sink, &store).await.unwrap();

        let batches = sink.batches.lock().unwrap();
        let product_batches: Vec<_> = batches
            .iter()
            .filter(|(endpoint, _)| endpoint == "products")
            .collect();
        assert_eq!(
            product_batches
                .iter()
                .map(|(_, count)| *count)
                .collect::<Vec<_>>(),
            vec![40, 40, 5]
        );
    }

    #[tokio::test]
    async fn exact_multiple_has_no_trailing_batch() {
        let pages = FixedPages {
            category: SyncCategory::Categories,
            total: 80,
            page_size: 40,
        };
        let sink = RecordingSink::default();
        let store = MemoryStore::default();

        run_pending(&pages, &sink, &store).await.unwrap();

        let batches = sink.batches.lock().unwrap();
        let counts: Vec<_> = batches
            .iter()
            .filter(|(endpoint, _)| endpoint == "categories")
            .map(|(_, count)| *count)
            .collect();
        assert_eq!(counts, vec![40, 40]);
    }

    #[tokio::test]
    async fn completed_category_is_not_re_entered() {
        let pages = FixedPages {
            category: SyncCategory::Products,
            total: 10,
            page_size: 10,
        };
        let sink = RecordingSink::default();
        let store = MemoryStore::default();
        store
            .statuses
            .lock()
            .unwrap()
            .insert(SyncCategory::Products, SyncStatus::Complete);

        run_pending(&pages, &sink, &store).await.unwrap();

        assert!(
            sink.batches
                .lock()
                .unwrap()
                .iter()
                .all(|(endpoint, _)| endpoint != "products")
        );
    }

    #[tokio::test]
    async fn in_progress_category_is_skipped() {
        let pages = FixedPages {
            category: SyncCategory::Orders,
            total: 10,
            page_size: 10,
        };
        let sink = RecordingSink::default();
        let store = MemoryStore::default();
        store
            .statuses
            .lock()
            .unwrap()
            .insert(SyncCategory::Orders, SyncStatus::InProgress);

        run_pending(&pages, &sink, &store).await.unwrap();

        assert!(sink.batches.lock().unwrap().is_empty());
        // No writes either: the category was never claimed.
        assert!(
            store
                .writes
                .lock()
                .unwrap()
                .iter()
                .all(|(category, _)| *category != SyncCategory::Orders)
        );
    }

    #[tokio::test]
    async fn status_transitions_wrap_the_drain() {
        let pages = FixedPages {
            category: SyncCategory::Customers,
            total: 5,
            page_size: 5,
        };
        let sink = RecordingSink::default();
        let store = MemoryStore::default();

        run_pending(&pages, &sink, &store).await.unwrap();

        let writes = store.writes.lock().unwrap();
        let customer_writes: Vec<_> = writes
            .iter()
            .filter(|(category, _)| *category == SyncCategory::Customers)
            .map(|(_, status)| *status)
            .collect();
        assert_eq!(
            customer_writes,
            vec![SyncStatus::InProgress, SyncStatus::Complete]
        );
    }

    #[tokio::test]
    async fn empty_category_still_completes() {
        let pages = FixedPages {
            category: SyncCategory::Products,
            total: 0,
            page_size: 10,
        };
        let sink = RecordingSink::default();
        let store = MemoryStore::default();

        run_pending(&pages, &sink, &store).await.unwrap();

        assert_eq!(
            store.statuses.lock().unwrap().get(&SyncCategory::Products),
            Some(&SyncStatus::Complete)
        );
    }
}
