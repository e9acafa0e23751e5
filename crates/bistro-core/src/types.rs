//! # Domain Types
//!
//! Entities and enums shared by the store, the engine, analytics and the
//! persistence mirror.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Table       │◄──│      Order      │──►│    OrderItem    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  number         │   │  status         │   │  menu_item_id   │       │
//! │  │  status         │   │  payment_status │   │  unit_price     │       │
//! │  │  current_order  │   │  total_cents    │   │  status         │       │
//! │  └─────────────────┘   └────────┬────────┘   └────────┬────────┘       │
//! │                                 │ served_by           │ snapshot of    │
//! │                        ┌────────▼────────┐   ┌────────▼────────┐       │
//! │                        │      User       │   │    MenuItem     │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Independent records: InventoryItem, Reservation, Notification         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Identifiers are opaque strings. Seed records keep their short ids
//! ("101", "oi3"); everything created at runtime gets a UUID v4.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 800 bps = 8% (the house rate applied to every new order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate(crate::DEFAULT_TAX_RATE_BPS)
    }
}

// =============================================================================
// Users
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Manager,
    Chef,
    Waiter,
    Cashier,
}

impl UserRole {
    /// The dashboard a role lands on after login.
    pub fn dashboard_route(&self) -> &'static str {
        match self {
            UserRole::Admin => "/admin",
            UserRole::Manager => "/manager",
            UserRole::Chef => "/kitchen",
            UserRole::Waiter => "/waiter",
            UserRole::Cashier => "/cashier",
        }
    }
}

/// A staff member who can sign in to the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    pub id: String,
    pub name: String,
    /// Unique across users, compared case-insensitively.
    pub email: String,
    pub role: UserRole,
    pub avatar: Option<String>,
    pub phone: Option<String>,
    /// Inactive users keep their history but cannot log in.
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Menu
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum MenuCategory {
    Appetizer,
    MainCourse,
    Dessert,
    Beverage,
    Salad,
    Soup,
}

/// A dish or drink on the menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Live price in cents. Orders copy it at creation time.
    pub price_cents: i64,
    pub category: MenuCategory,
    pub image: Option<String>,
    /// Unavailable items stay on the menu but cannot be ordered.
    pub is_available: bool,
    pub preparation_minutes: u32,
    pub ingredients: Vec<String>,
    pub calories: Option<u32>,
}

impl MenuItem {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Tables
// =============================================================================

/// Occupancy state of a table.
///
/// `Occupied` is owned by the order lifecycle: only order creation sets it,
/// and only completing, cancelling or deleting the order clears it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    Available,
    Occupied,
    Reserved,
    Cleaning,
}

impl Default for TableStatus {
    fn default() -> Self {
        TableStatus::Available
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Table {
    pub id: String,
    /// Number painted on the table, unique per floor plan.
    pub number: u32,
    pub capacity: u32,
    pub status: TableStatus,
    /// The live order seated here, set only while `status` is `Occupied`.
    pub current_order_id: Option<String>,
    pub location: String,
}

impl Table {
    /// Whether a new order may be seated here.
    pub fn can_seat(&self) -> bool {
        matches!(self.status, TableStatus::Available | TableStatus::Reserved)
    }

    /// Whether the engine may release this table on behalf of `order_id`.
    pub fn is_held_by(&self, order_id: &str) -> bool {
        match &self.current_order_id {
            None => true,
            Some(current) => current == order_id,
        }
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// Where an order is in its life.
///
/// ```text
/// pending → confirmed → preparing → ready → served → completed
///    │          │           │         │        │
///    └──────────┴───────────┴─────────┴────────┴──► cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Just placed by a waiter.
    Pending,
    /// Accepted by staff; the kitchen may start.
    Confirmed,
    /// Kitchen is working on the items.
    Preparing,
    /// Every item is ready for pickup.
    Ready,
    /// Delivered to the table; payment may still be pending.
    Served,
    /// Paid and closed. Terminal.
    Completed,
    /// Abandoned. Terminal.
    Cancelled,
}

impl OrderStatus {
    /// Completed and cancelled orders accept no further changes.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Orders still moving through the kitchen.
    pub const fn is_active(&self) -> bool {
        matches!(
            self,
            OrderStatus::Pending | OrderStatus::Confirmed | OrderStatus::Preparing | OrderStatus::Ready
        )
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    DigitalWallet,
}

/// Kitchen progress of a single order line.
///
/// Ordered so that `a < b` means `b` is further along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Pending,
    Preparing,
    Ready,
}

impl Default for ItemStatus {
    fn default() -> Self {
        ItemStatus::Pending
    }
}

// =============================================================================
// Order
// =============================================================================

/// A line in an order.
/// Uses the snapshot pattern: name and unit price are frozen when ordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderItem {
    pub id: String,
    pub menu_item_id: String,
    /// Menu item name at time of order (frozen).
    pub name: String,
    pub quantity: i64,
    /// Unit price in cents at time of order (frozen).
    pub unit_price_cents: i64,
    pub special_instructions: Option<String>,
    pub status: ItemStatus,
}

impl OrderItem {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// unit price × quantity
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

/// A table's check: what was ordered, where it is, and how it was paid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    pub id: String,
    pub table_id: String,
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<PaymentMethod>,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub discount_cents: i64,
    /// subtotal + tax - discount, fixed at creation.
    pub total_cents: i64,
    pub tip_cents: Option<i64>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
    /// Id of the waiter who took the order.
    pub served_by: String,
    pub notes: Option<String>,
}

impl Order {
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    #[inline]
    pub fn tax(&self) -> Money {
        Money::from_cents(self.tax_cents)
    }

    #[inline]
    pub fn discount(&self) -> Money {
        Money::from_cents(self.discount_cents)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    #[inline]
    pub fn tip(&self) -> Money {
        Money::from_cents(self.tip_cents.unwrap_or(0))
    }

    /// Whether the stored total still matches its components.
    pub fn totals_balance(&self) -> bool {
        self.subtotal() + self.tax() - self.discount() == self.total()
    }

    pub fn all_items_ready(&self) -> bool {
        !self.items.is_empty() && self.items.iter().all(|i| i.status == ItemStatus::Ready)
    }

    /// Served but not yet paid: the cashier's queue.
    pub fn awaiting_payment(&self) -> bool {
        self.status == OrderStatus::Served && self.payment_status == PaymentStatus::Pending
    }
}

// =============================================================================
// Inventory
// =============================================================================

/// A stocked ingredient or supply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub category: String,
    /// Current stock in `unit`s. Always finite and non-negative.
    pub quantity: f64,
    pub unit: String,
    pub min_stock: f64,
    pub max_stock: f64,
    pub cost_per_unit_cents: i64,
    pub supplier: Option<String>,
    #[ts(as = "Option<String>")]
    pub last_restocked: Option<NaiveDate>,
    #[ts(as = "Option<String>")]
    pub expiry_date: Option<NaiveDate>,
}

impl InventoryItem {
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.min_stock
    }

    /// Fill level as a percentage of `max_stock`, for stock bars.
    pub fn stock_percentage(&self) -> f64 {
        if self.max_stock <= 0.0 {
            return 0.0;
        }
        (self.quantity / self.max_stock * 100.0).min(100.0)
    }
}

// =============================================================================
// Reservations
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Confirmed,
    Cancelled,
    Completed,
    NoShow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Reservation {
    pub id: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub table_id: Option<String>,
    pub party_size: u32,
    #[ts(as = "String")]
    pub date: NaiveDate,
    /// Local time of day, `HH:MM`.
    pub time: String,
    pub status: ReservationStatus,
    pub special_requests: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Notifications
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Info,
    Warning,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub read: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub user_id: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(status: ItemStatus) -> OrderItem {
        OrderItem {
            id: "oi".to_string(),
            menu_item_id: "1".to_string(),
            name: "Caesar Salad".to_string(),
            quantity: 2,
            unit_price_cents: 1299,
            special_instructions: None,
            status,
        }
    }

    #[test]
    fn test_tax_rate_default_is_house_rate() {
        let rate = TaxRate::default();
        assert_eq!(rate.bps(), 800);
        assert!((rate.percentage() - 8.0).abs() < 0.001);
    }

    #[test]
    fn test_order_status_terminal() {
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Served.is_terminal());
        assert!(OrderStatus::Ready.is_active());
        assert!(!OrderStatus::Served.is_active());
    }

    #[test]
    fn test_item_status_ordering() {
        assert!(ItemStatus::Pending < ItemStatus::Preparing);
        assert!(ItemStatus::Preparing < ItemStatus::Ready);
    }

    #[test]
    fn test_line_total() {
        assert_eq!(item(ItemStatus::Pending).line_total().cents(), 2598);
    }

    #[test]
    fn test_table_hold() {
        let mut table = Table {
            id: "3".to_string(),
            number: 3,
            capacity: 4,
            status: TableStatus::Available,
            current_order_id: None,
            location: "Main Floor".to_string(),
        };
        assert!(table.can_seat());
        assert!(table.is_held_by("105"));

        table.status = TableStatus::Occupied;
        table.current_order_id = Some("101".to_string());
        assert!(!table.can_seat());
        assert!(table.is_held_by("101"));
        assert!(!table.is_held_by("105"));
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&MenuCategory::MainCourse).unwrap();
        assert_eq!(json, "\"main_course\"");
        let json = serde_json::to_string(&PaymentMethod::DigitalWallet).unwrap();
        assert_eq!(json, "\"digital_wallet\"");
        let status: ReservationStatus = serde_json::from_str("\"no_show\"").unwrap();
        assert_eq!(status, ReservationStatus::NoShow);
    }

    #[test]
    fn test_inventory_low_stock() {
        let mut tomatoes = InventoryItem {
            id: "5".to_string(),
            name: "Tomatoes".to_string(),
            category: "Vegetables".to_string(),
            quantity: 8.0,
            unit: "kg".to_string(),
            min_stock: 10.0,
            max_stock: 40.0,
            cost_per_unit_cents: 399,
            supplier: None,
            last_restocked: None,
            expiry_date: None,
        };
        assert!(tomatoes.is_low_stock());
        assert!((tomatoes.stock_percentage() - 20.0).abs() < 0.001);

        tomatoes.quantity = 10.0;
        assert!(tomatoes.is_low_stock());
        tomatoes.quantity = 10.5;
        assert!(!tomatoes.is_low_stock());
    }
}
