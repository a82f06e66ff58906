//! Application state shared across request handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::BridgeConfig;
use crate::db::SettingsStore;
use crate::omnisend::OmnisendClient;
use crate::surecart::SureCartClient;

/// Shared application state, cheap to clone.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: BridgeConfig,
    pool: PgPool,
    settings: SettingsStore,
    surecart: SureCartClient,
    omnisend: OmnisendClient,
}

impl AppState {
    #[must_use]
    pub fn new(
        config: BridgeConfig,
        pool: PgPool,
        surecart: SureCartClient,
        omnisend: OmnisendClient,
    ) -> Self {
        let settings = SettingsStore::new(pool.clone());
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                settings,
                surecart,
                omnisend,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &BridgeConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[must_use]
    pub fn settings(&self) -> &SettingsStore {
        &self.inner.settings
    }

    #[must_use]
    pub fn surecart(&self) -> &SureCartClient {
        &self.inner.surecart
    }

    #[must_use]
    pub fn omnisend(&self) -> &OmnisendClient {
        &self.inner.omnisend
    }
}
