//! # Catalog Commands
//!
//! Admin and manager upkeep: staff, menu, floor plan, stock, bookings and
//! the notification feed.
//!
//! Every mutation goes through [`apply`], which runs the store operation
//! under the session lock and mirrors the resulting snapshot.

use bistro_core::{
    CoreResult, InventoryItem, InventoryPatch, MenuCategory, MenuItem, MenuItemPatch, NewInventoryItem,
    NewMenuItem, NewNotification, NewReservation, NewUser, Notification, Reservation, ReservationPatch,
    Store, Table, TablePatch, User, UserPatch,
};
use bistro_core::validation::parse_stock_quantity;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::state::{DbState, SessionState};

/// The notification bell: the feed plus its unread badge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationFeed {
    pub notifications: Vec<Notification>,
    pub unread: usize,
}

async fn apply<T, F>(session: &SessionState, db: &DbState, op: F) -> Result<T, ApiError>
where
    F: FnOnce(&mut Store) -> CoreResult<T>,
{
    let (value, snapshot) = session.mutate(op)?;
    db.mirror(&snapshot).await;
    Ok(value)
}

// =============================================================================
// Staff
// =============================================================================

pub fn list_users(session: &SessionState) -> Vec<User> {
    session.with_store(|s| s.users().to_vec())
}

pub async fn add_user(session: &SessionState, db: &DbState, draft: NewUser) -> Result<User, ApiError> {
    debug!(email = %draft.email, role = ?draft.role, "add_user command");
    apply(session, db, |s| s.add_user(draft)).await
}

pub async fn update_user(
    session: &SessionState,
    db: &DbState,
    user_id: String,
    patch: UserPatch,
) -> Result<User, ApiError> {
    debug!(user_id = %user_id, "update_user command");
    apply(session, db, |s| s.update_user(&user_id, patch)).await
}

pub async fn delete_user(session: &SessionState, db: &DbState, user_id: String) -> Result<User, ApiError> {
    debug!(user_id = %user_id, "delete_user command");
    apply(session, db, |s| s.delete_user(&user_id)).await
}

// =============================================================================
// Menu
// =============================================================================

/// The menu, optionally narrowed to one category.
pub fn list_menu(session: &SessionState, category: Option<MenuCategory>) -> Vec<MenuItem> {
    session.with_store(|s| {
        s.menu_items()
            .iter()
            .filter(|m| category.map_or(true, |c| m.category == c))
            .cloned()
            .collect()
    })
}

pub async fn add_menu_item(
    session: &SessionState,
    db: &DbState,
    draft: NewMenuItem,
) -> Result<MenuItem, ApiError> {
    debug!(name = %draft.name, price = draft.price_cents, "add_menu_item command");
    apply(session, db, |s| s.add_menu_item(draft)).await
}

pub async fn update_menu_item(
    session: &SessionState,
    db: &DbState,
    item_id: String,
    patch: MenuItemPatch,
) -> Result<MenuItem, ApiError> {
    debug!(item_id = %item_id, "update_menu_item command");
    apply(session, db, |s| s.update_menu_item(&item_id, patch)).await
}

pub async fn delete_menu_item(
    session: &SessionState,
    db: &DbState,
    item_id: String,
) -> Result<MenuItem, ApiError> {
    debug!(item_id = %item_id, "delete_menu_item command");
    apply(session, db, |s| s.delete_menu_item(&item_id)).await
}

// =============================================================================
// Floor Plan
// =============================================================================

/// Manual table edits. Occupancy itself belongs to the order commands.
pub async fn update_table(
    session: &SessionState,
    db: &DbState,
    table_id: String,
    patch: TablePatch,
) -> Result<Table, ApiError> {
    debug!(table_id = %table_id, status = ?patch.status, "update_table command");
    apply(session, db, |s| s.update_table(&table_id, patch)).await
}

// =============================================================================
// Inventory
// =============================================================================

pub fn list_inventory(session: &SessionState) -> Vec<InventoryItem> {
    session.with_store(|s| s.inventory().to_vec())
}

pub async fn add_inventory_item(
    session: &SessionState,
    db: &DbState,
    draft: NewInventoryItem,
) -> Result<InventoryItem, ApiError> {
    debug!(name = %draft.name, "add_inventory_item command");
    apply(session, db, |s| s.add_inventory_item(draft)).await
}

pub async fn update_inventory_item(
    session: &SessionState,
    db: &DbState,
    item_id: String,
    patch: InventoryPatch,
) -> Result<InventoryItem, ApiError> {
    debug!(item_id = %item_id, "update_inventory_item command");
    apply(session, db, |s| s.update_inventory_item(&item_id, patch)).await
}

/// Stock count as typed on the inventory screen (`"12.5"`).
pub async fn set_stock_level(
    session: &SessionState,
    db: &DbState,
    item_id: String,
    quantity: String,
) -> Result<InventoryItem, ApiError> {
    debug!(item_id = %item_id, quantity = %quantity, "set_stock_level command");
    let quantity = parse_stock_quantity("quantity", &quantity)?;
    let patch = InventoryPatch {
        quantity: Some(quantity),
        ..Default::default()
    };
    apply(session, db, |s| s.update_inventory_item(&item_id, patch)).await
}

pub async fn delete_inventory_item(
    session: &SessionState,
    db: &DbState,
    item_id: String,
) -> Result<InventoryItem, ApiError> {
    debug!(item_id = %item_id, "delete_inventory_item command");
    apply(session, db, |s| s.delete_inventory_item(&item_id)).await
}

// =============================================================================
// Reservations
// =============================================================================

/// Bookings ordered by date and time, optionally for one day.
pub fn list_reservations(session: &SessionState, date: Option<NaiveDate>) -> Vec<Reservation> {
    session.with_store(|s| {
        let mut bookings: Vec<Reservation> = s
            .reservations()
            .iter()
            .filter(|r| date.map_or(true, |d| r.date == d))
            .cloned()
            .collect();
        bookings.sort_by(|a, b| (a.date, &a.time).cmp(&(b.date, &b.time)));
        bookings
    })
}

pub async fn add_reservation(
    session: &SessionState,
    db: &DbState,
    draft: NewReservation,
) -> Result<Reservation, ApiError> {
    debug!(date = %draft.date, time = %draft.time, party = draft.party_size, "add_reservation command");
    apply(session, db, |s| s.add_reservation(draft)).await
}

pub async fn update_reservation(
    session: &SessionState,
    db: &DbState,
    reservation_id: String,
    patch: ReservationPatch,
) -> Result<Reservation, ApiError> {
    debug!(reservation_id = %reservation_id, "update_reservation command");
    apply(session, db, |s| s.update_reservation(&reservation_id, patch)).await
}

pub async fn delete_reservation(
    session: &SessionState,
    db: &DbState,
    reservation_id: String,
) -> Result<Reservation, ApiError> {
    debug!(reservation_id = %reservation_id, "delete_reservation command");
    apply(session, db, |s| s.delete_reservation(&reservation_id)).await
}

// =============================================================================
// Notifications
// =============================================================================

pub fn notification_feed(session: &SessionState) -> NotificationFeed {
    session.with_store(|s| NotificationFeed {
        notifications: s.notifications().to_vec(),
        unread: s.unread_notification_count(),
    })
}

pub async fn add_notification(
    session: &SessionState,
    db: &DbState,
    draft: NewNotification,
) -> Result<Notification, ApiError> {
    apply(session, db, |s| s.add_notification(draft)).await
}

pub async fn mark_notification_read(
    session: &SessionState,
    db: &DbState,
    notification_id: String,
) -> Result<Notification, ApiError> {
    apply(session, db, |s| s.mark_notification_read(&notification_id)).await
}

pub async fn clear_notifications(session: &SessionState, db: &DbState) {
    let snapshot = session.with_store_mut(|s| {
        s.clear_notifications();
        s.snapshot()
    });
    db.mirror(&snapshot).await;
}
