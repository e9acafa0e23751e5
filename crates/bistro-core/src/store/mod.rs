//! # Entity Store
//!
//! The single in-memory home for every record a session works with.
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              Store                                      │
//! │                                                                         │
//! │   users ─ menu_items ─ tables ─ orders ─ inventory ─ reservations      │
//! │   notifications (newest first, max 50) ─ current_user                  │
//! │                                                                         │
//! │   ┌───────────────┐  ┌───────────────┐  ┌───────────────┐             │
//! │   │  catalog.rs   │  │   orders.rs   │  │    auth.rs    │             │
//! │   │ flat CRUD for │  │  lifecycle    │  │ login/logout  │             │
//! │   │ records with  │  │  engine: the  │  │ against the   │             │
//! │   │ no lifecycle  │  │  only writer  │  │ user list     │             │
//! │   │               │  │  of occupancy │  │               │             │
//! │   └───────────────┘  └───────────────┘  └───────────────┘             │
//! │                                                                         │
//! │   snapshot() ──► StoreSnapshot ──► bistro-db (serde_json)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules
//! - Every mutation takes `&mut self` and runs to completion.
//! - A failed operation leaves the store exactly as it was.
//! - Reads hand out shared borrows; callers clone what they keep.

mod auth;
mod catalog;
mod orders;

pub use orders::ItemUpdate;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::error::{CoreError, CoreResult};
use crate::fixtures;
use crate::types::{
    InventoryItem, MenuItem, Notification, NotificationKind, Order, Reservation, Table,
    TableStatus, TaxRate, User,
};
use crate::MAX_NOTIFICATIONS;

// =============================================================================
// Snapshot
// =============================================================================

/// Everything the store holds, as plain data.
///
/// This is what gets mirrored to disk and rehydrated on the next start.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StoreSnapshot {
    pub users: Vec<User>,
    pub menu_items: Vec<MenuItem>,
    pub tables: Vec<Table>,
    pub orders: Vec<Order>,
    pub inventory: Vec<InventoryItem>,
    pub reservations: Vec<Reservation>,
    pub notifications: Vec<Notification>,
    pub current_user: Option<User>,
    /// Write counter. A save only replaces a stored snapshot with a lower one.
    #[serde(default)]
    pub revision: u64,
}

impl StoreSnapshot {
    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }
}

// =============================================================================
// Store
// =============================================================================

#[derive(Debug, Clone)]
pub struct Store {
    data: StoreSnapshot,
    clock: Arc<dyn Clock>,
    tax_rate: TaxRate,
}

impl Store {
    /// Wraps an existing snapshot.
    pub fn from_snapshot(data: StoreSnapshot, clock: Arc<dyn Clock>) -> Self {
        Self {
            data,
            clock,
            tax_rate: TaxRate::default(),
        }
    }

    /// A fresh store seeded with the demo restaurant, timed relative to
    /// the clock's current instant.
    pub fn seeded(clock: Arc<dyn Clock>) -> Self {
        let data = fixtures::seed(clock.now());
        Self::from_snapshot(data, clock)
    }

    /// Seeded store on wall-clock time.
    pub fn with_system_clock() -> Self {
        Self::seeded(Arc::new(SystemClock))
    }

    /// Overrides the tax rate applied to orders created from now on.
    pub fn with_tax_rate(mut self, rate: TaxRate) -> Self {
        self.tax_rate = rate;
        self
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// A copy of the full contents, for persistence.
    pub fn snapshot(&self) -> StoreSnapshot {
        self.data.clone()
    }

    pub fn into_snapshot(self) -> StoreSnapshot {
        self.data
    }

    pub fn revision(&self) -> u64 {
        self.data.revision
    }

    /// Marks a new version of the contents. Called by whoever owns the
    /// store after each change, so snapshots can be ordered.
    pub fn bump_revision(&mut self) -> u64 {
        self.data.revision = self.data.revision.saturating_add(1);
        self.data.revision
    }

    pub fn set_revision(&mut self, revision: u64) {
        self.data.revision = revision;
    }

    // -------------------------------------------------------------------------
    // Collections
    // -------------------------------------------------------------------------

    pub fn users(&self) -> &[User] {
        &self.data.users
    }

    pub fn menu_items(&self) -> &[MenuItem] {
        &self.data.menu_items
    }

    pub fn tables(&self) -> &[Table] {
        &self.data.tables
    }

    pub fn orders(&self) -> &[Order] {
        &self.data.orders
    }

    pub fn inventory(&self) -> &[InventoryItem] {
        &self.data.inventory
    }

    pub fn reservations(&self) -> &[Reservation] {
        &self.data.reservations
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.data.notifications
    }

    pub fn current_user(&self) -> Option<&User> {
        self.data.current_user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.data.is_authenticated()
    }

    // -------------------------------------------------------------------------
    // Lookups
    // -------------------------------------------------------------------------

    pub fn order(&self, id: &str) -> CoreResult<&Order> {
        self.data
            .orders
            .iter()
            .find(|o| o.id == id)
            .ok_or_else(|| CoreError::OrderNotFound(id.to_string()))
    }

    pub fn table(&self, id: &str) -> CoreResult<&Table> {
        self.data
            .tables
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| CoreError::TableNotFound(id.to_string()))
    }

    pub fn table_by_number(&self, number: u32) -> Option<&Table> {
        self.data.tables.iter().find(|t| t.number == number)
    }

    pub fn menu_item(&self, id: &str) -> CoreResult<&MenuItem> {
        self.data
            .menu_items
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| CoreError::MenuItemNotFound(id.to_string()))
    }

    pub fn user(&self, id: &str) -> CoreResult<&User> {
        self.data
            .users
            .iter()
            .find(|u| u.id == id)
            .ok_or_else(|| CoreError::UserNotFound(id.to_string()))
    }

    /// Orders taken by one waiter, oldest first.
    pub fn orders_served_by<'a>(&'a self, user_id: &'a str) -> impl Iterator<Item = &'a Order> + 'a {
        self.data.orders.iter().filter(move |o| o.served_by == user_id)
    }

    // -------------------------------------------------------------------------
    // Consistency
    // -------------------------------------------------------------------------

    /// Describes every table whose occupancy disagrees with the orders.
    ///
    /// Checked after rehydrating a snapshot; an empty result means every
    /// occupied table points at a live order and nothing else does.
    pub fn occupancy_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        for table in &self.data.tables {
            match (&table.status, &table.current_order_id) {
                (TableStatus::Occupied, None) => {
                    issues.push(format!("table {} is occupied without an order", table.number));
                }
                (TableStatus::Occupied, Some(order_id)) => match self.order(order_id) {
                    Err(_) => issues.push(format!(
                        "table {} points at missing order {}",
                        table.number, order_id
                    )),
                    Ok(order) if order.status.is_terminal() => issues.push(format!(
                        "table {} is held by closed order {}",
                        table.number, order_id
                    )),
                    Ok(order) if order.table_id != table.id => issues.push(format!(
                        "table {} is held by order {} seated elsewhere",
                        table.number, order_id
                    )),
                    Ok(_) => {}
                },
                (status, Some(order_id)) => issues.push(format!(
                    "table {} is {:?} but still references order {}",
                    table.number, status, order_id
                )),
                (_, None) => {}
            }
        }

        issues
    }

    // -------------------------------------------------------------------------
    // Internals shared by the operation modules
    // -------------------------------------------------------------------------

    fn new_id() -> String {
        Uuid::new_v4().to_string()
    }

    fn order_mut(&mut self, id: &str) -> CoreResult<&mut Order> {
        self.data
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| CoreError::OrderNotFound(id.to_string()))
    }

    fn table_mut(&mut self, id: &str) -> CoreResult<&mut Table> {
        self.data
            .tables
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| CoreError::TableNotFound(id.to_string()))
    }

    /// Prepends a notification and trims the list to the cap.
    fn push_notification(
        &mut self,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        user_id: Option<String>,
    ) -> Notification {
        let notification = Notification {
            id: Self::new_id(),
            title: title.into(),
            message: message.into(),
            kind,
            read: false,
            created_at: self.clock.now(),
            user_id,
        };

        debug!(title = %notification.title, kind = ?kind, "Notification added");
        self.data.notifications.insert(0, notification.clone());
        self.data.notifications.truncate(MAX_NOTIFICATIONS);
        notification
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::with_system_clock()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{TimeZone, Utc};

    /// Seeded store on a pinned clock: 2024-06-01 18:00 UTC.
    pub(crate) fn seeded_store() -> (Store, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 6, 1, 18, 0, 0).unwrap(),
        ));
        (Store::seeded(clock.clone()), clock)
    }

    #[test]
    fn test_seeded_counts() {
        let (store, _) = seeded_store();
        assert_eq!(store.users().len(), 6);
        assert_eq!(store.menu_items().len(), 12);
        assert_eq!(store.tables().len(), 12);
        assert_eq!(store.orders().len(), 5);
        assert_eq!(store.inventory().len(), 10);
        assert_eq!(store.reservations().len(), 5);
        assert!(store.notifications().is_empty());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_revision_counts_up_and_defaults_to_zero() {
        let (mut store, _) = seeded_store();
        assert_eq!(store.revision(), 0);
        assert_eq!(store.bump_revision(), 1);
        assert_eq!(store.snapshot().revision, 1);

        store.set_revision(41);
        assert_eq!(store.bump_revision(), 42);

        // Saves written before the counter existed
        let mut json = serde_json::to_value(store.snapshot()).unwrap();
        json.as_object_mut().unwrap().remove("revision");
        let old: StoreSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(old.revision, 0);
    }

    #[test]
    fn test_lookups() {
        let (store, _) = seeded_store();
        assert_eq!(store.order("101").unwrap().table_id, "2");
        assert_eq!(store.table_by_number(9).unwrap().id, "9");
        assert!(matches!(store.order("999"), Err(CoreError::OrderNotFound(_))));
        assert!(matches!(store.table("x"), Err(CoreError::TableNotFound(_))));
        assert_eq!(store.orders_served_by("4").count(), 3);
    }

    #[test]
    fn test_seed_occupancy_is_consistent() {
        let (store, _) = seeded_store();
        assert!(store.occupancy_issues().is_empty(), "{:?}", store.occupancy_issues());
    }

    #[test]
    fn test_occupancy_issues_detects_dangling_reference() {
        let (store, _) = seeded_store();
        let mut snapshot = store.snapshot();
        snapshot.orders.retain(|o| o.id != "103");
        let broken = Store::from_snapshot(snapshot, store.clock().clone());

        let issues = broken.occupancy_issues();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("missing order 103"));
    }

    #[test]
    fn test_notifications_capped_newest_first() {
        let (mut store, _) = seeded_store();
        for i in 0..(MAX_NOTIFICATIONS + 5) {
            store.push_notification(NotificationKind::Info, format!("n{}", i), "", None);
        }
        assert_eq!(store.notifications().len(), MAX_NOTIFICATIONS);
        assert_eq!(store.notifications()[0].title, format!("n{}", MAX_NOTIFICATIONS + 4));
    }

    #[test]
    fn test_snapshot_round_trips_through_json() {
        let (store, _) = seeded_store();
        let json = serde_json::to_string(&store.snapshot()).unwrap();
        let back: StoreSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, store.snapshot());
    }
}
