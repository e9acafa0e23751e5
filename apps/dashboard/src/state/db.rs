//! # Database State
//!
//! Wraps the `Database` handle for commands.
//!
//! The pool inside `Database` is thread-safe, so commands share it
//! without a lock.

use bistro_core::{StoreSnapshot, STORE_NAME};
use bistro_db::{Database, DbError, DbResult, SavedSnapshot};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
}

impl DbState {
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    pub fn inner(&self) -> &Database {
        &self.db
    }

    /// Saves the session snapshot under the store name.
    pub async fn save(&self, snapshot: &StoreSnapshot) -> DbResult<SavedSnapshot> {
        self.db.snapshots().save(STORE_NAME, snapshot).await
    }

    /// Revision a store must carry for its first save to replace
    /// whatever is stored now.
    pub async fn next_revision(&self) -> DbResult<u64> {
        let stored = self.db.snapshots().revision(STORE_NAME).await?;
        Ok(stored.map_or(0, |r| u64::try_from(r.saturating_add(1)).unwrap_or(0)))
    }

    /// Mirrors a snapshot after a successful command.
    ///
    /// The in-memory store already holds the change, so a failed write is
    /// logged and the command still succeeds. Each snapshot carries the
    /// whole store, so a failed write stays missing on disk until the next
    /// successful mirror. A snapshot that arrives after a newer one has been
    /// stored is dropped.
    pub async fn mirror(&self, snapshot: &StoreSnapshot) {
        match self.save(snapshot).await {
            Ok(_) => {}
            Err(DbError::StaleSnapshot { revision, stored }) => {
                debug!(revision, stored, "Newer snapshot already mirrored; skipping");
            }
            Err(e) => warn!(error = %e, "Could not mirror session snapshot"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::tests::test_dashboard;
    use bistro_core::{OrderStatus, STORE_NAME};

    #[tokio::test]
    async fn test_late_mirror_of_older_snapshot_is_dropped() {
        let d = test_dashboard().await;

        let (_, confirmed) = d
            .session
            .mutate(|s| s.update_order_status("105", OrderStatus::Confirmed))
            .unwrap();
        let (_, cancelled) = d
            .session
            .mutate(|s| s.update_order_status("105", OrderStatus::Cancelled))
            .unwrap();

        // Second command's write lands first
        d.db.mirror(&cancelled).await;
        d.db.mirror(&confirmed).await;

        let saved = d.db.inner().snapshots().load(STORE_NAME).await.unwrap().unwrap();
        let order = saved.orders.iter().find(|o| o.id == "105").unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert_eq!(saved, d.session.snapshot());
    }

    #[tokio::test]
    async fn test_next_revision_follows_stored() {
        let d = test_dashboard().await;
        assert_eq!(d.db.next_revision().await.unwrap(), 1);

        let (_, snapshot) = d
            .session
            .mutate(|s| s.update_order_status("105", OrderStatus::Confirmed))
            .unwrap();
        d.db.mirror(&snapshot).await;
        assert_eq!(d.db.next_revision().await.unwrap(), 2);
    }
}
