//! # Snapshot Repository
//!
//! Stores the whole entity store as one JSON document per store name.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  command mutates Store (lock held)                                      │
//! │       │  snapshot() clone, lock released                                │
//! │       ▼                                                                 │
//! │  serde_json::to_string(&snapshot)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  INSERT ... ON CONFLICT(store_name) DO UPDATE                           │
//! │  (payload, schema_version, saved_at, revision)                          │
//! │  WHERE excluded.revision > store_snapshots.revision                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Snapshots are cloned under the session lock but written after it is
//! released, so two saves can reach the database out of order. The revision
//! guard makes the older one a no-op that reports `StaleSnapshot`.
//!
//! A row written by another schema version is refused on load rather than
//! half-read.

use bistro_core::StoreSnapshot;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};

/// Version stamped on every saved payload.
pub const SNAPSHOT_SCHEMA_VERSION: i64 = 1;

/// Metadata of a successful save.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedSnapshot {
    pub store_name: String,
    pub schema_version: i64,
    pub revision: i64,
    pub saved_at: DateTime<Utc>,
    pub payload_bytes: usize,
}

/// Repository for store snapshots.
#[derive(Debug, Clone)]
pub struct SnapshotRepository {
    pool: SqlitePool,
}

impl SnapshotRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SnapshotRepository { pool }
    }

    /// Writes `snapshot` under `store_name`, replacing a previous one only
    /// when `snapshot.revision` is higher than the stored revision.
    ///
    /// ## Returns
    /// * `Err(StaleSnapshot)` - A same-or-newer revision is already stored;
    ///   nothing was written
    pub async fn save(&self, store_name: &str, snapshot: &StoreSnapshot) -> DbResult<SavedSnapshot> {
        let revision = i64::try_from(snapshot.revision)
            .map_err(|_| DbError::Internal(format!("revision {} out of range", snapshot.revision)))?;
        let payload = serde_json::to_string(snapshot)?;
        let saved_at = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO store_snapshots (store_name, payload, schema_version, saved_at, revision)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(store_name) DO UPDATE SET
                payload = excluded.payload,
                schema_version = excluded.schema_version,
                saved_at = excluded.saved_at,
                revision = excluded.revision
            WHERE excluded.revision > store_snapshots.revision
            "#,
        )
        .bind(store_name)
        .bind(&payload)
        .bind(SNAPSHOT_SCHEMA_VERSION)
        .bind(saved_at)
        .bind(revision)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let stored = self.revision(store_name).await?.unwrap_or_default();
            return Err(DbError::StaleSnapshot { revision, stored });
        }

        debug!(
            store_name = %store_name,
            revision,
            bytes = payload.len(),
            orders = snapshot.orders.len(),
            "Snapshot saved"
        );

        Ok(SavedSnapshot {
            store_name: store_name.to_string(),
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            revision,
            saved_at,
            payload_bytes: payload.len(),
        })
    }

    /// Revision of the snapshot stored under `store_name`.
    pub async fn revision(&self, store_name: &str) -> DbResult<Option<i64>> {
        let revision: Option<i64> =
            sqlx::query_scalar("SELECT revision FROM store_snapshots WHERE store_name = ?1")
                .bind(store_name)
                .fetch_optional(&self.pool)
                .await?;
        Ok(revision)
    }

    /// Reads the snapshot stored under `store_name`.
    ///
    /// ## Returns
    /// * `Ok(None)` - Nothing saved yet
    /// * `Err(SchemaMismatch)` - Written by another schema version
    /// * `Err(CorruptSnapshot)` - Payload does not parse
    pub async fn load(&self, store_name: &str) -> DbResult<Option<StoreSnapshot>> {
        let row: Option<(String, i64)> = sqlx::query_as(
            "SELECT payload, schema_version FROM store_snapshots WHERE store_name = ?1",
        )
        .bind(store_name)
        .fetch_optional(&self.pool)
        .await?;

        let Some((payload, schema_version)) = row else {
            debug!(store_name = %store_name, "No snapshot stored");
            return Ok(None);
        };

        if schema_version != SNAPSHOT_SCHEMA_VERSION {
            warn!(
                store_name = %store_name,
                found = schema_version,
                expected = SNAPSHOT_SCHEMA_VERSION,
                "Snapshot schema mismatch"
            );
            return Err(DbError::SchemaMismatch {
                found: schema_version,
                expected: SNAPSHOT_SCHEMA_VERSION,
            });
        }

        let snapshot: StoreSnapshot = serde_json::from_str(&payload)?;
        debug!(store_name = %store_name, orders = snapshot.orders.len(), "Snapshot loaded");
        Ok(Some(snapshot))
    }

    /// When the snapshot under `store_name` was last written.
    pub async fn saved_at(&self, store_name: &str) -> DbResult<Option<DateTime<Utc>>> {
        let saved_at: Option<DateTime<Utc>> =
            sqlx::query_scalar("SELECT saved_at FROM store_snapshots WHERE store_name = ?1")
                .bind(store_name)
                .fetch_optional(&self.pool)
                .await?;
        Ok(saved_at)
    }

    pub async fn exists(&self, store_name: &str) -> DbResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM store_snapshots WHERE store_name = ?1")
                .bind(store_name)
                .fetch_one(&self.pool)
                .await?;
        Ok(count > 0)
    }

    /// Removes the snapshot. Returns whether one existed.
    pub async fn delete(&self, store_name: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM store_snapshots WHERE store_name = ?1")
            .bind(store_name)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
