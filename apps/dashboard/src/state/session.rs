//! # Session State
//!
//! The live store, shared by every command.
//!
//! ## Locking
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  command                                                                │
//! │    │                                                                    │
//! │    ├─► session.mutate(|store| store.create_order(draft))                │
//! │    │     lock ─► run operation ─► bump revision ─► clone ─► unlock      │
//! │    │                                                                    │
//! │    └─► db.mirror(&snapshot).await      ◄── no lock held here            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! The guard never escapes the closure, so it can't be held across an
//! `.await`. Mirrors can therefore land out of order; the revision stamped
//! under the lock lets the database keep the newest one.

use std::sync::{Arc, Mutex, MutexGuard};

use bistro_core::{CoreResult, Store, StoreSnapshot};

#[derive(Debug, Clone)]
pub struct SessionState {
    store: Arc<Mutex<Store>>,
}

impl SessionState {
    pub fn new(store: Store) -> Self {
        SessionState {
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// A panicked command can't leave the store half-written (operations
    /// validate before mutating), so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Runs `f` with read access to the store.
    pub fn with_store<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Store) -> R,
    {
        let store = self.lock();
        f(&store)
    }

    /// Runs `f` with write access to the store.
    ///
    /// The revision is bumped before `f` runs, so a snapshot taken inside
    /// `f` already carries it.
    pub fn with_store_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Store) -> R,
    {
        let mut store = self.lock();
        store.bump_revision();
        f(&mut store)
    }

    /// Runs a store operation and, if it succeeds, bumps the revision and
    /// returns the result with a snapshot taken under the same lock.
    pub fn mutate<F, T>(&self, f: F) -> CoreResult<(T, StoreSnapshot)>
    where
        F: FnOnce(&mut Store) -> CoreResult<T>,
    {
        let mut store = self.lock();
        let value = f(&mut store)?;
        store.bump_revision();
        Ok((value, store.snapshot()))
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.with_store(Store::snapshot)
    }

    /// Swaps in a different store, e.g. after a reset. The new store
    /// continues the old one's revision count.
    pub fn replace(&self, mut store: Store) -> StoreSnapshot {
        let mut guard = self.lock();
        store.set_revision(guard.revision().max(store.revision()));
        store.bump_revision();
        *guard = store;
        guard.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bistro_core::{CoreError, OrderStatus};

    #[test]
    fn test_mutate_returns_snapshot_on_success_only() {
        let session = SessionState::new(Store::with_system_clock());

        let (order, snapshot) = session
            .mutate(|s| s.update_order_status("105", OrderStatus::Confirmed))
            .unwrap();
        assert_eq!(order.status, OrderStatus::Confirmed);
        assert_eq!(snapshot, session.snapshot());

        let err = session.mutate(|s| s.update_order_status("999", OrderStatus::Confirmed));
        assert!(matches!(err, Err(CoreError::OrderNotFound(_))));
    }

    #[test]
    fn test_each_change_gets_a_later_revision() {
        let session = SessionState::new(Store::with_system_clock());

        let (_, first) = session
            .mutate(|s| s.update_order_status("105", OrderStatus::Confirmed))
            .unwrap();
        let (_, second) = session
            .mutate(|s| s.update_order_status("105", OrderStatus::Cancelled))
            .unwrap();
        assert_eq!(first.revision, 1);
        assert_eq!(second.revision, 2);

        let failed = session.mutate(|s| s.update_order_status("105", OrderStatus::Confirmed));
        assert!(failed.is_err());
        assert_eq!(session.snapshot().revision, 2);

        let cleared = session.with_store_mut(|s| {
            s.clear_notifications();
            s.snapshot()
        });
        assert_eq!(cleared.revision, 3);

        let reset = session.replace(Store::with_system_clock());
        assert_eq!(reset.revision, 4);
    }

    #[test]
    fn test_clones_share_the_store() {
        let session = SessionState::new(Store::with_system_clock());
        let other = session.clone();
        other.with_store_mut(|s| s.logout());
        other
            .with_store_mut(|s| s.login("admin@restaurant.com", ""))
            .unwrap();
        assert!(session.with_store(Store::is_authenticated));
    }
}
