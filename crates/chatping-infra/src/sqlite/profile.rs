//! SQLite profile store implementation.
//!
//! Implements `ProfileStore` from `chatping-core` using sqlx with split
//! read/write pools, plus the management operations behind the profile and
//! token registration API (upsert, register, unregister).
//!
//! Token pruning is a single `DELETE ... WHERE user_id = ? AND token IN
//! (...)` -- an atomic set-difference, so concurrent prunes from overlapping
//! events cannot lose unrelated token registrations.

use chatping_core::profile::ProfileStore;
use chatping_types::error::ProfileStoreError;
use chatping_types::profile::UserProfile;
use chrono::Utc;
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ProfileStore`.
pub struct SqliteProfileStore {
    pool: DatabasePool,
}

impl SqliteProfileStore {
    /// Create a new store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Create or update a profile's mutable fields. Existing device tokens
    /// are untouched.
    pub async fn upsert_profile(
        &self,
        user_id: &str,
        full_name: Option<&str>,
        privileged: bool,
    ) -> Result<(), ProfileStoreError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            r#"INSERT INTO user_profiles (id, full_name, privileged, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?)
               ON CONFLICT(id) DO UPDATE SET full_name = excluded.full_name,
                                             privileged = excluded.privileged,
                                             updated_at = excluded.updated_at"#,
        )
        .bind(user_id)
        .bind(full_name)
        .bind(privileged as i64)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_err)?;

        Ok(())
    }

    /// Register a delivery token for a user. Idempotent: re-registering an
    /// existing token is a no-op. Returns `false` when the user does not
    /// exist.
    pub async fn register_token(
        &self,
        user_id: &str,
        token: &str,
    ) -> Result<bool, ProfileStoreError> {
        let exists: Option<(i64,)> =
            sqlx::query_as("SELECT 1 FROM user_profiles WHERE id = ?")
                .bind(user_id)
                .fetch_optional(&self.pool.reader)
                .await
                .map_err(map_sqlx_err)?;
        if exists.is_none() {
            return Ok(false);
        }

        sqlx::query(
            "INSERT OR IGNORE INTO device_tokens (user_id, token, registered_at) VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(token)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_err)?;

        Ok(true)
    }

    /// Deregister a single delivery token. Returns whether it was present.
    pub async fn unregister_token(
        &self,
        user_id: &str,
        token: &str,
    ) -> Result<bool, ProfileStoreError> {
        let result = sqlx::query("DELETE FROM device_tokens WHERE user_id = ? AND token = ?")
            .bind(user_id)
            .bind(token)
            .execute(&self.pool.writer)
            .await
            .map_err(map_sqlx_err)?;

        Ok(result.rows_affected() > 0)
    }
}

fn map_sqlx_err(e: sqlx::Error) -> ProfileStoreError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            ProfileStoreError::Connection
        }
        other => ProfileStoreError::Query(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// ProfileStore implementation
// ---------------------------------------------------------------------------

impl ProfileStore for SqliteProfileStore {
    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, ProfileStoreError> {
        let row = sqlx::query("SELECT id, full_name, privileged FROM user_profiles WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(map_sqlx_err)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let id: String = row.try_get("id").map_err(map_sqlx_err)?;
        let full_name: Option<String> = row.try_get("full_name").map_err(map_sqlx_err)?;
        let privileged: i64 = row.try_get("privileged").map_err(map_sqlx_err)?;

        let token_rows: Vec<(String,)> = sqlx::query_as(
            "SELECT token FROM device_tokens WHERE user_id = ? ORDER BY rowid",
        )
        .bind(user_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx_err)?;

        Ok(Some(UserProfile {
            id,
            full_name,
            privileged: privileged != 0,
            device_tokens: token_rows.into_iter().map(|(t,)| t).collect(),
        }))
    }

    async fn remove_device_tokens(
        &self,
        user_id: &str,
        tokens: &[String],
    ) -> Result<u64, ProfileStoreError> {
        if tokens.is_empty() {
            return Ok(0);
        }

        let placeholders = vec!["?"; tokens.len()].join(", ");
        let sql =
            format!("DELETE FROM device_tokens WHERE user_id = ? AND token IN ({placeholders})");

        let mut query = sqlx::query(&sql).bind(user_id);
        for token in tokens {
            query = query.bind(token);
        }

        let result = query
            .execute(&self.pool.writer)
            .await
            .map_err(map_sqlx_err)?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> (tempfile::TempDir, SqliteProfileStore) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());
        let pool = DatabasePool::new(&url).await.unwrap();
        (dir, SqliteProfileStore::new(pool))
    }

    #[tokio::test]
    async fn test_get_profile_missing_returns_none() {
        let (_dir, store) = store().await;
        assert!(store.get_profile("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_and_get_profile() {
        let (_dir, store) = store().await;
        store
            .upsert_profile("alice", Some("Alice A"), false)
            .await
            .unwrap();

        let profile = store.get_profile("alice").await.unwrap().unwrap();
        assert_eq!(profile.id, "alice");
        assert_eq!(profile.full_name.as_deref(), Some("Alice A"));
        assert!(!profile.privileged);
        assert!(profile.device_tokens.is_empty());
    }

    #[tokio::test]
    async fn test_upsert_updates_fields_keeps_tokens() {
        let (_dir, store) = store().await;
        store.upsert_profile("doc", None, false).await.unwrap();
        store.register_token("doc", "t1").await.unwrap();

        store
            .upsert_profile("doc", Some("Dr. Kamal"), true)
            .await
            .unwrap();

        let profile = store.get_profile("doc").await.unwrap().unwrap();
        assert_eq!(profile.full_name.as_deref(), Some("Dr. Kamal"));
        assert!(profile.privileged);
        assert_eq!(profile.device_tokens, vec!["t1"]);
    }

    #[tokio::test]
    async fn test_register_token_idempotent_and_ordered() {
        let (_dir, store) = store().await;
        store.upsert_profile("bob", None, false).await.unwrap();

        assert!(store.register_token("bob", "t1").await.unwrap());
        assert!(store.register_token("bob", "t2").await.unwrap());
        assert!(store.register_token("bob", "t1").await.unwrap());

        let profile = store.get_profile("bob").await.unwrap().unwrap();
        assert_eq!(profile.device_tokens, vec!["t1", "t2"]);
    }

    #[tokio::test]
    async fn test_register_token_unknown_user() {
        let (_dir, store) = store().await;
        assert!(!store.register_token("ghost", "t1").await.unwrap());
    }

    #[tokio::test]
    async fn test_unregister_token() {
        let (_dir, store) = store().await;
        store.upsert_profile("bob", None, false).await.unwrap();
        store.register_token("bob", "t1").await.unwrap();

        assert!(store.unregister_token("bob", "t1").await.unwrap());
        assert!(!store.unregister_token("bob", "t1").await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_device_tokens_subset() {
        let (_dir, store) = store().await;
        store.upsert_profile("bob", None, false).await.unwrap();
        for token in ["t1", "t2", "t3"] {
            store.register_token("bob", token).await.unwrap();
        }

        let removed = store
            .remove_device_tokens("bob", &["t1".to_string(), "t3".to_string()])
            .await
            .unwrap();
        assert_eq!(removed, 2);

        let profile = store.get_profile("bob").await.unwrap().unwrap();
        assert_eq!(profile.device_tokens, vec!["t2"]);
    }

    #[tokio::test]
    async fn test_remove_device_tokens_ignores_absent() {
        let (_dir, store) = store().await;
        store.upsert_profile("bob", None, false).await.unwrap();
        store.register_token("bob", "t1").await.unwrap();

        let removed = store
            .remove_device_tokens("bob", &["t1".to_string(), "unknown".to_string()])
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert!(store.get_profile("bob").await.unwrap().unwrap().device_tokens.is_empty());
    }

    #[tokio::test]
    async fn test_remove_device_tokens_empty_set_is_noop() {
        let (_dir, store) = store().await;
        store.upsert_profile("bob", None, false).await.unwrap();
        assert_eq!(store.remove_device_tokens("bob", &[]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_remove_device_tokens_scoped_to_user() {
        let (_dir, store) = store().await;
        store.upsert_profile("bob", None, false).await.unwrap();
        store.upsert_profile("carol", None, false).await.unwrap();
        store.register_token("bob", "shared").await.unwrap();
        store.register_token("carol", "shared").await.unwrap();

        store
            .remove_device_tokens("bob", &["shared".to_string()])
            .await
            .unwrap();

        assert!(store.get_profile("bob").await.unwrap().unwrap().device_tokens.is_empty());
        assert_eq!(
            store.get_profile("carol").await.unwrap().unwrap().device_tokens,
            vec!["shared"]
        );
    }
}
