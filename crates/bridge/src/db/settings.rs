//! Key-value settings persistence.
//!
//! Backfill status, the store-connected marker and per-user identify flags
//! all live in the `bridge_settings` table as plain text values.
//! Integer-typed helpers exist for the status values.

use sqlx::PgPool;
use thiserror::Error;

use omnisend_bridge_core::{SyncCategory, SyncStatus};

/// Marker row set once the store has been registered with Omnisend.
const STORE_CONNECTED_KEY: &str = "omnisend_sc_store_connected";

/// Prefix for per-user one-shot identify flags. The suffix is the user id;
/// the value is the user's email.
const IDENTIFY_FLAG_PREFIX: &str = "omnisend_sc_identify_on_next_page_load_";

/// Settings operation errors.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Setting {key} holds a non-integer value: {value}")]
    NotAnInteger { key: String, value: String },
}

/// Typed access to the `bridge_settings` table.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    pool: PgPool,
}

impl SettingsStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch a setting value, `None` when the key has never been written.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Database`] on query failure.
    pub async fn get(&self, key: &str) -> Result<Option<String>, SettingsError> {
        let value = sqlx::query_scalar::<_, String>(
            "SELECT value FROM bridge_settings WHERE key = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(value)
    }

    /// Insert or overwrite a setting value.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Database`] on query failure.
    pub async fn set(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        sqlx::query(
            "INSERT INTO bridge_settings (key, value, updated_at)
             VALUES ($1, $2, NOW())
             ON CONFLICT (key) DO UPDATE SET value = $2, updated_at = NOW()",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Delete a setting. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Database`] on query failure.
    pub async fn delete(&self, key: &str) -> Result<(), SettingsError> {
        sqlx::query("DELETE FROM bridge_settings WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Fetch an integer setting, `None` when unset.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NotAnInteger`] if the stored value does not
    /// parse, [`SettingsError::Database`] on query failure.
    pub async fn get_i64(&self, key: &str) -> Result<Option<i64>, SettingsError> {
        match self.get(key).await? {
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|_| SettingsError::NotAnInteger {
                    key: key.to_owned(),
                    value: raw,
                }),
            None => Ok(None),
        }
    }

    /// Store an integer setting.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Database`] on query failure.
    pub async fn set_i64(&self, key: &str, value: i64) -> Result<(), SettingsError> {
        self.set(key, &value.to_string()).await
    }

    /// Backfill status for a category. A never-written key reads as
    /// [`SyncStatus::NotStarted`].
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] on query or parse failure.
    pub async fn sync_status(&self, category: SyncCategory) -> Result<SyncStatus, SettingsError> {
        let raw = self.get_i64(category.setting_key()).await?;
        Ok(raw.map(SyncStatus::from_i64).unwrap_or_default())
    }

    /// Record the backfill status for a category.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Database`] on query failure.
    pub async fn set_sync_status(
        &self,
        category: SyncCategory,
        status: SyncStatus,
    ) -> Result<(), SettingsError> {
        self.set_i64(category.setting_key(), status.as_i64()).await
    }

    /// Whether `connect_store` has already been called for this store.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Database`] on query failure.
    pub async fn is_store_connected(&self) -> Result<bool, SettingsError> {
        Ok(self.get(STORE_CONNECTED_KEY).await?.is_some())
    }

    /// Mark the store as connected so `connect_store` is never repeated.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Database`] on query failure.
    pub async fn mark_store_connected(&self) -> Result<(), SettingsError> {
        self.set(STORE_CONNECTED_KEY, "1").await
    }

    /// Arm the one-shot identify flag for a user. The stored value is the
    /// email so the next page load can emit the identify payload without a
    /// second lookup.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Database`] on query failure.
    pub async fn set_identify_flag(&self, user_id: &str, email: &str) -> Result<(), SettingsError> {
        self.set(&identify_key(user_id), email).await
    }

    /// Read and clear the identify flag for a user, returning the stored
    /// email when the flag was armed.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Database`] on query failure.
    pub async fn take_identify_flag(&self, user_id: &str) -> Result<Option<String>, SettingsError> {
        let key = identify_key(user_id);
        let email = sqlx::query_scalar::<_, String>(
            "DELETE FROM bridge_settings WHERE key = $1 RETURNING value",
        )
        .bind(&key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(email)
    }
}

fn identify_key(user_id: &str) -> String {
    format!("{IDENTIFY_FLAG_PREFIX}{user_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identify_key_embeds_user_id() {
        assert_eq!(
            identify_key("42"),
            "omnisend_sc_identify_on_next_page_load_42"
        );
    }

    #[test]
    fn category_keys_are_distinct() {
        let keys: Vec<_> = SyncCategory::ALL
            .iter()
            .map(|c| c.setting_key())
            .collect();
        let mut deduped = keys.clone();
        deduped.dedup();
        assert_eq!(keys, deduped);
    }
}
