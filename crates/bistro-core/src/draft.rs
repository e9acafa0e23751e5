//! Inputs for store operations.
//!
//! `New*` types carry everything needed to create a record except the id
//! and timestamps, which the store assigns. `*Patch` types are partial
//! updates: `None` leaves a field alone.
//!
//! Fields the store owns are deliberately absent. There is no way to patch
//! an order's totals, a table's `current_order_id`, or anybody's `id`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{
    MenuCategory, NotificationKind, PaymentMethod, ReservationStatus, TableStatus, UserRole,
};

// =============================================================================
// Orders
// =============================================================================

/// One requested line of a new order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderLine {
    pub menu_item_id: String,
    pub quantity: i64,
    #[serde(default)]
    pub special_instructions: Option<String>,
}

impl OrderLine {
    pub fn new(menu_item_id: impl Into<String>, quantity: i64) -> Self {
        Self {
            menu_item_id: menu_item_id.into(),
            quantity,
            special_instructions: None,
        }
    }
}

/// What a waiter submits to open a check on a table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewOrder {
    pub table_id: String,
    pub lines: Vec<OrderLine>,
    pub served_by: String,
    #[serde(default)]
    pub discount_cents: i64,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Cashier input for settling a served order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentRequest {
    pub method: PaymentMethod,
    #[serde(default)]
    pub tip_cents: i64,
    /// Cash handed over. Required for cash, ignored otherwise.
    #[serde(default)]
    pub tendered_cents: Option<i64>,
}

/// Result of a settled payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentReceipt {
    pub order_id: String,
    pub method: PaymentMethod,
    /// Order total plus tip.
    pub charged_cents: i64,
    pub tip_cents: i64,
    /// Change due back for cash, zero otherwise.
    pub change_cents: i64,
}

// =============================================================================
// Users
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<UserRole>,
    pub avatar: Option<String>,
    pub phone: Option<String>,
    pub is_active: Option<bool>,
}

// =============================================================================
// Menu
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewMenuItem {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price_cents: i64,
    pub category: MenuCategory,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub preparation_minutes: u32,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub calories: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MenuItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub category: Option<MenuCategory>,
    pub image: Option<String>,
    pub is_available: Option<bool>,
    pub preparation_minutes: Option<u32>,
    pub ingredients: Option<Vec<String>>,
    pub calories: Option<u32>,
}

// =============================================================================
// Tables
// =============================================================================

/// Manual table edits. `status` may not be set to `Occupied`, and the
/// order reference is not editable at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TablePatch {
    pub number: Option<u32>,
    pub capacity: Option<u32>,
    pub status: Option<TableStatus>,
    pub location: Option<String>,
}

// =============================================================================
// Inventory
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewInventoryItem {
    pub name: String,
    pub category: String,
    pub quantity: f64,
    pub unit: String,
    pub min_stock: f64,
    pub max_stock: f64,
    pub cost_per_unit_cents: i64,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub last_restocked: Option<NaiveDate>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub expiry_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InventoryPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub min_stock: Option<f64>,
    pub max_stock: Option<f64>,
    pub cost_per_unit_cents: Option<i64>,
    pub supplier: Option<String>,
    #[ts(as = "Option<String>")]
    pub last_restocked: Option<NaiveDate>,
    #[ts(as = "Option<String>")]
    pub expiry_date: Option<NaiveDate>,
}

// =============================================================================
// Reservations
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewReservation {
    pub customer_name: String,
    pub customer_phone: String,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub table_id: Option<String>,
    pub party_size: u32,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub time: String,
    #[serde(default)]
    pub special_requests: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReservationPatch {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub table_id: Option<String>,
    pub party_size: Option<u32>,
    #[ts(as = "Option<String>")]
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub status: Option<ReservationStatus>,
    pub special_requests: Option<String>,
}

// =============================================================================
// Notifications
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewNotification {
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    #[serde(default)]
    pub user_id: Option<String>,
}

fn default_true() -> bool {
    true
}
