//! # Derived Analytics
//!
//! Read-only figures for the dashboards, recomputed from the store on
//! every call. Nothing here is cached or mutated.
//!
//! ## "Today"
//! Whether a timestamp is "today" depends on where the restaurant is.
//! Every day-bucketed query takes `now` in the caller's time zone and
//! compares calendar dates in that zone:
//!
//! ```text
//! order.created_at = 2024-06-01 23:30 UTC
//!   now in UTC    (2024-06-01 23:45)  → today
//!   now in UTC+02 (2024-06-02 01:45)  → yesterday (local date is 06-01)
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::store::Store;
use crate::types::{
    InventoryItem, ItemStatus, MenuCategory, MenuItem, Order, OrderStatus, PaymentStatus,
    Reservation, ReservationStatus, User,
};

// =============================================================================
// Report Types
// =============================================================================

/// Headline numbers for the admin and manager dashboards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardSummary {
    pub today_sales_cents: i64,
    pub today_order_count: usize,
    pub active_orders: usize,
    pub pending_orders: usize,
    pub ready_orders: usize,
    pub awaiting_payment: usize,
    pub low_stock_items: usize,
    pub todays_reservations: usize,
    pub revenue_cents: i64,
    pub average_order_value_cents: i64,
    pub active_staff: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategorySales {
    pub category: MenuCategory,
    pub sales_cents: i64,
    /// Units sold across all lines in this category.
    pub item_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ItemSales {
    pub menu_item_id: String,
    pub name: String,
    pub quantity: i64,
    pub sales_cents: i64,
    /// Number of orders containing this item.
    pub orders: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WaiterStats {
    pub user_id: String,
    pub name: String,
    pub order_count: usize,
    pub active_orders: usize,
    /// Paid totals, tips excluded.
    pub sales_cents: i64,
    pub tips_cents: i64,
}

/// One open order as the kitchen sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct KitchenTicket {
    pub order_id: String,
    pub table_id: String,
    pub status: OrderStatus,
    pub items_remaining: usize,
    /// Longest preparation time among unfinished items; they cook in
    /// parallel.
    pub estimated_minutes: u32,
}

// =============================================================================
// Day-Bucketed Queries
// =============================================================================

/// True when `at` falls on the same calendar date as `now`, in `now`'s zone.
pub fn is_same_day<Tz: TimeZone>(at: &DateTime<Utc>, now: &DateTime<Tz>) -> bool {
    at.with_timezone(&now.timezone()).date_naive() == now.date_naive()
}

/// Σ total of paid orders created today.
pub fn today_sales<Tz: TimeZone>(orders: &[Order], now: &DateTime<Tz>) -> Money {
    orders
        .iter()
        .filter(|o| o.payment_status == PaymentStatus::Paid && is_same_day(&o.created_at, now))
        .map(Order::total)
        .sum()
}

/// Orders created today, whatever their status.
pub fn today_order_count<Tz: TimeZone>(orders: &[Order], now: &DateTime<Tz>) -> usize {
    orders.iter().filter(|o| is_same_day(&o.created_at, now)).count()
}

/// Confirmed reservations for today's date, earliest first.
pub fn todays_reservations<'a, Tz: TimeZone>(
    reservations: &'a [Reservation],
    now: &DateTime<Tz>,
) -> Vec<&'a Reservation> {
    let today = now.date_naive();
    let mut found: Vec<&Reservation> = reservations
        .iter()
        .filter(|r| r.status == ReservationStatus::Confirmed && r.date == today)
        .collect();
    found.sort_by(|a, b| a.time.cmp(&b.time));
    found
}

// =============================================================================
// Order Queues
// =============================================================================

/// pending, confirmed, preparing or ready
pub fn active_orders(orders: &[Order]) -> Vec<&Order> {
    orders.iter().filter(|o| o.status.is_active()).collect()
}

pub fn orders_with_status(orders: &[Order], status: OrderStatus) -> Vec<&Order> {
    orders.iter().filter(|o| o.status == status).collect()
}

pub fn pending_orders(orders: &[Order]) -> Vec<&Order> {
    orders_with_status(orders, OrderStatus::Pending)
}

pub fn ready_orders(orders: &[Order]) -> Vec<&Order> {
    orders_with_status(orders, OrderStatus::Ready)
}

/// The cashier queue: served and unpaid.
pub fn awaiting_payment(orders: &[Order]) -> Vec<&Order> {
    orders.iter().filter(|o| o.awaiting_payment()).collect()
}

/// Open tickets for the kitchen display, oldest first.
pub fn kitchen_load(orders: &[Order], menu: &[MenuItem]) -> Vec<KitchenTicket> {
    let mut open: Vec<&Order> = orders
        .iter()
        .filter(|o| matches!(o.status, OrderStatus::Confirmed | OrderStatus::Preparing))
        .collect();
    open.sort_by_key(|o| o.created_at);

    open.into_iter()
        .map(|order| {
            let remaining: Vec<_> = order
                .items
                .iter()
                .filter(|i| i.status != ItemStatus::Ready)
                .collect();
            let estimated_minutes = remaining
                .iter()
                .filter_map(|i| menu.iter().find(|m| m.id == i.menu_item_id))
                .map(|m| m.preparation_minutes)
                .max()
                .unwrap_or(0);

            KitchenTicket {
                order_id: order.id.clone(),
                table_id: order.table_id.clone(),
                status: order.status,
                items_remaining: remaining.len(),
                estimated_minutes,
            }
        })
        .collect()
}

// =============================================================================
// Revenue
// =============================================================================

/// Σ total over every paid order.
pub fn total_revenue(orders: &[Order]) -> Money {
    orders
        .iter()
        .filter(|o| o.payment_status == PaymentStatus::Paid)
        .map(Order::total)
        .sum()
}

/// Paid revenue spread over every order on the books, rounded half up.
///
/// Zero when there are no orders.
pub fn average_order_value(orders: &[Order]) -> Money {
    if orders.is_empty() {
        return Money::zero();
    }
    let count = orders.len() as i64;
    let revenue = total_revenue(orders).cents();
    Money::from_cents((revenue + count / 2) / count)
}

/// Line sales (unit × qty) per menu category, skipping cancelled orders
/// and lines whose menu item no longer exists. Sorted by sales, highest
/// first.
pub fn sales_by_category(orders: &[Order], menu: &[MenuItem]) -> Vec<CategorySales> {
    let mut totals: BTreeMap<MenuCategory, (Money, i64)> = BTreeMap::new();

    for order in orders.iter().filter(|o| o.status != OrderStatus::Cancelled) {
        for item in &order.items {
            let Some(menu_item) = menu.iter().find(|m| m.id == item.menu_item_id) else {
                continue;
            };
            let entry = totals.entry(menu_item.category).or_insert((Money::zero(), 0));
            entry.0 += item.line_total();
            entry.1 += item.quantity;
        }
    }

    let mut result: Vec<CategorySales> = totals
        .into_iter()
        .map(|(category, (sales, count))| CategorySales {
            category,
            sales_cents: sales.cents(),
            item_count: count,
        })
        .collect();
    result.sort_by(|a, b| b.sales_cents.cmp(&a.sales_cents));
    result
}

/// Best sellers by line sales, at most `limit`. Cancelled orders excluded.
pub fn top_items(orders: &[Order], limit: usize) -> Vec<ItemSales> {
    let mut by_item: BTreeMap<&str, ItemSales> = BTreeMap::new();

    for order in orders.iter().filter(|o| o.status != OrderStatus::Cancelled) {
        let mut seen_in_order: Vec<&str> = Vec::new();
        for item in &order.items {
            let entry = by_item
                .entry(item.menu_item_id.as_str())
                .or_insert_with(|| ItemSales {
                    menu_item_id: item.menu_item_id.clone(),
                    name: item.name.clone(),
                    quantity: 0,
                    sales_cents: 0,
                    orders: 0,
                });
            entry.quantity += item.quantity;
            entry.sales_cents += item.line_total().cents();
            if !seen_in_order.contains(&item.menu_item_id.as_str()) {
                entry.orders += 1;
                seen_in_order.push(item.menu_item_id.as_str());
            }
        }
    }

    let mut result: Vec<ItemSales> = by_item.into_values().collect();
    result.sort_by(|a, b| {
        b.sales_cents
            .cmp(&a.sales_cents)
            .then_with(|| a.name.cmp(&b.name))
    });
    result.truncate(limit);
    result
}

// =============================================================================
// Staff & Stock
// =============================================================================

/// Per-waiter tallies, for every user who has taken at least one order.
pub fn orders_by_waiter(orders: &[Order], users: &[User]) -> Vec<WaiterStats> {
    let mut stats: BTreeMap<&str, WaiterStats> = BTreeMap::new();

    for order in orders {
        let entry = stats.entry(order.served_by.as_str()).or_insert_with(|| WaiterStats {
            user_id: order.served_by.clone(),
            name: users
                .iter()
                .find(|u| u.id == order.served_by)
                .map(|u| u.name.clone())
                .unwrap_or_else(|| order.served_by.clone()),
            order_count: 0,
            active_orders: 0,
            sales_cents: 0,
            tips_cents: 0,
        });

        entry.order_count += 1;
        if order.status.is_active() {
            entry.active_orders += 1;
        }
        if order.payment_status == PaymentStatus::Paid {
            entry.sales_cents += order.total_cents;
            entry.tips_cents += order.tip().cents();
        }
    }

    stats.into_values().collect()
}

/// Items at or below their minimum stock.
pub fn low_stock(inventory: &[InventoryItem]) -> Vec<&InventoryItem> {
    inventory.iter().filter(|i| i.is_low_stock()).collect()
}

pub fn active_staff(users: &[User]) -> usize {
    users.iter().filter(|u| u.is_active).count()
}

// =============================================================================
// Summary
// =============================================================================

/// All headline figures in one pass over the store.
pub fn summarize<Tz: TimeZone>(store: &Store, now: &DateTime<Tz>) -> DashboardSummary {
    let orders = store.orders();

    DashboardSummary {
        today_sales_cents: today_sales(orders, now).cents(),
        today_order_count: today_order_count(orders, now),
        active_orders: active_orders(orders).len(),
        pending_orders: pending_orders(orders).len(),
        ready_orders: ready_orders(orders).len(),
        awaiting_payment: awaiting_payment(orders).len(),
        low_stock_items: low_stock(store.inventory()).len(),
        todays_reservations: todays_reservations(store.reservations(), now).len(),
        revenue_cents: total_revenue(orders).cents(),
        average_order_value_cents: average_order_value(orders).cents(),
        active_staff: active_staff(store.users()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Clock;
    use crate::draft::PaymentRequest;
    use crate::store::tests::seeded_store;
    use crate::types::PaymentMethod;
    use chrono::{Duration, FixedOffset};

    #[test]
    fn test_seed_summary() {
        let (store, clock) = seeded_store();
        let summary = summarize(&store, &clock.now());

        assert_eq!(summary.today_sales_cents, 3021);
        assert_eq!(summary.today_order_count, 5);
        assert_eq!(summary.active_orders, 4);
        assert_eq!(summary.pending_orders, 1);
        assert_eq!(summary.ready_orders, 1);
        assert_eq!(summary.awaiting_payment, 0);
        assert_eq!(summary.low_stock_items, 1);
        assert_eq!(summary.todays_reservations, 2);
        assert_eq!(summary.revenue_cents, 3021);
        assert_eq!(summary.average_order_value_cents, 604);
        assert_eq!(summary.active_staff, 6);
    }

    #[test]
    fn test_paying_today_raises_sales_by_total() {
        let (mut store, clock) = seeded_store();
        let now = clock.now();
        let before = today_sales(store.orders(), &now);

        store.update_order_status("103", OrderStatus::Served).unwrap();
        assert_eq!(awaiting_payment(store.orders()).len(), 1);
        store
            .settle_payment(
                "103",
                PaymentRequest {
                    method: PaymentMethod::Card,
                    tip_cents: 700,
                    tendered_cents: None,
                },
            )
            .unwrap();

        let after = today_sales(store.orders(), &now);
        assert_eq!(after - before, Money::from_cents(4748));
    }

    #[test]
    fn test_refund_removes_from_sales() {
        let (mut store, clock) = seeded_store();
        store.refund_payment("104").unwrap();
        assert_eq!(today_sales(store.orders(), &clock.now()), Money::zero());
    }

    #[test]
    fn test_old_orders_are_not_today() {
        let (store, clock) = seeded_store();
        let tomorrow = clock.now() + Duration::days(1);
        assert_eq!(today_order_count(store.orders(), &tomorrow), 0);
        assert_eq!(today_sales(store.orders(), &tomorrow), Money::zero());
    }

    #[test]
    fn test_today_is_judged_in_callers_zone() {
        let (store, clock) = seeded_store();
        // 18:00 UTC is midnight of the next day at UTC+6
        let east = FixedOffset::east_opt(6 * 3600).unwrap();
        let local_now = clock.now().with_timezone(&east);
        assert_eq!(today_order_count(store.orders(), &local_now), 0);

        let local_earlier = local_now - Duration::hours(3);
        assert_eq!(today_order_count(store.orders(), &local_earlier), 5);
    }

    #[test]
    fn test_sales_by_category() {
        let (store, _) = seeded_store();
        let sales = sales_by_category(store.orders(), store.menu_items());

        let main = sales
            .iter()
            .find(|c| c.category == MenuCategory::MainCourse)
            .unwrap();
        // 2 × salmon + ribeye + alfredo
        assert_eq!(main.sales_cents, 5798 + 4299 + 2299);
        assert_eq!(main.item_count, 4);
        assert_eq!(sales[0].category, MenuCategory::MainCourse);

        let total: i64 = sales.iter().map(|c| c.sales_cents).sum();
        let subtotals: i64 = store.orders().iter().map(|o| o.subtotal_cents).sum();
        assert_eq!(total, subtotals);
    }

    #[test]
    fn test_top_items() {
        let (store, _) = seeded_store();
        let top = top_items(store.orders(), 3);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].name, "Grilled Salmon");
        assert_eq!(top[0].quantity, 2);
        assert_eq!(top[1].name, "Ribeye Steak");
    }

    #[test]
    fn test_orders_by_waiter() {
        let (store, _) = seeded_store();
        let stats = orders_by_waiter(store.orders(), store.users());
        assert_eq!(stats.len(), 2);

        let sarah = stats.iter().find(|s| s.user_id == "4").unwrap();
        assert_eq!(sarah.name, "Sarah Waiter");
        assert_eq!(sarah.order_count, 3);
        assert_eq!(sarah.sales_cents, 0);

        let lisa = stats.iter().find(|s| s.user_id == "6").unwrap();
        assert_eq!(lisa.sales_cents, 3021);
        assert_eq!(lisa.tips_cents, 500);
    }

    #[test]
    fn test_low_stock_and_reservations() {
        let (store, clock) = seeded_store();
        let low: Vec<_> = low_stock(store.inventory()).iter().map(|i| i.name.as_str()).collect();
        assert_eq!(low, vec!["Tomatoes"]);

        let today: Vec<_> = todays_reservations(store.reservations(), &clock.now())
            .iter()
            .map(|r| r.customer_name.as_str())
            .collect();
        assert_eq!(today, vec!["Robert Johnson", "Emily Davis"]);
    }

    #[test]
    fn test_kitchen_load() {
        let (store, _) = seeded_store();
        let tickets = kitchen_load(store.orders(), store.menu_items());

        // 102 is older than 101
        let ids: Vec<_> = tickets.iter().map(|t| t.order_id.as_str()).collect();
        assert_eq!(ids, vec!["102", "101"]);

        assert_eq!(tickets[0].items_remaining, 2);
        assert_eq!(tickets[0].estimated_minutes, 25);
        assert_eq!(tickets[1].items_remaining, 1);
        assert_eq!(tickets[1].estimated_minutes, 20);
    }

    #[test]
    fn test_average_order_value_empty() {
        assert_eq!(average_order_value(&[]), Money::zero());
    }
}
