//! # Analytics Commands
//!
//! Read-only figures for the admin and manager dashboards. Nothing here is
//! stored; every call derives from the live session.
//!
//! "Today" is the restaurant's day, taken from `utc_offset_minutes` in the
//! configuration.

use bistro_core::analytics::{self, CategorySales, DashboardSummary, ItemSales, KitchenTicket, WaiterStats};
use bistro_core::{InventoryItem, Reservation};
use serde::{Deserialize, Serialize};

use crate::state::{DashboardConfig, SessionState};

/// Everything the admin overview renders in one round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub restaurant_name: String,
    pub summary: DashboardSummary,
    pub today_sales_display: String,
    pub average_order_display: String,
    pub sales_by_category: Vec<CategorySales>,
    pub top_items: Vec<ItemSales>,
    pub waiters: Vec<WaiterStats>,
    pub kitchen: Vec<KitchenTicket>,
    pub low_stock: Vec<InventoryItem>,
    pub todays_reservations: Vec<Reservation>,
}

pub fn dashboard_summary(session: &SessionState, config: &DashboardConfig) -> DashboardSummary {
    session.with_store(|s| {
        let now = config.local_time(s.clock().now());
        analytics::summarize(s, &now)
    })
}

pub fn sales_by_category(session: &SessionState) -> Vec<CategorySales> {
    session.with_store(|s| analytics::sales_by_category(s.orders(), s.menu_items()))
}

/// Best sellers by quantity, capped at the configured limit.
pub fn top_items(session: &SessionState, config: &DashboardConfig) -> Vec<ItemSales> {
    session.with_store(|s| analytics::top_items(s.orders(), config.top_items_limit))
}

pub fn waiter_stats(session: &SessionState) -> Vec<WaiterStats> {
    session.with_store(|s| analytics::orders_by_waiter(s.orders(), s.users()))
}

pub fn low_stock(session: &SessionState) -> Vec<InventoryItem> {
    session.with_store(|s| analytics::low_stock(s.inventory()).into_iter().cloned().collect())
}

pub fn todays_reservations(session: &SessionState, config: &DashboardConfig) -> Vec<Reservation> {
    session.with_store(|s| {
        let now = config.local_time(s.clock().now());
        analytics::todays_reservations(s.reservations(), &now)
            .into_iter()
            .cloned()
            .collect()
    })
}

/// Full report under a single lock so the figures agree with each other.
pub fn analytics_report(session: &SessionState, config: &DashboardConfig) -> AnalyticsReport {
    session.with_store(|s| {
        let now = config.local_time(s.clock().now());
        let summary = analytics::summarize(s, &now);

        AnalyticsReport {
            restaurant_name: config.restaurant_name.clone(),
            today_sales_display: config.format_currency(summary.today_sales_cents),
            average_order_display: config.format_currency(summary.average_order_value_cents),
            sales_by_category: analytics::sales_by_category(s.orders(), s.menu_items()),
            top_items: analytics::top_items(s.orders(), config.top_items_limit),
            waiters: analytics::orders_by_waiter(s.orders(), s.users()),
            kitchen: analytics::kitchen_load(s.orders(), s.menu_items()),
            low_stock: analytics::low_stock(s.inventory()).into_iter().cloned().collect(),
            todays_reservations: analytics::todays_reservations(s.reservations(), &now)
                .into_iter()
                .cloned()
                .collect(),
            summary,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::test_dashboard;

    #[tokio::test]
    async fn test_summary_matches_seed() {
        let d = test_dashboard().await;
        let summary = dashboard_summary(&d.session, &d.config);
        assert_eq!(summary.today_sales_cents, 3021);
        assert_eq!(summary.today_order_count, 5);
        assert_eq!(summary.active_orders, 4);
        assert_eq!(summary.low_stock_items, 1);
        assert_eq!(summary.todays_reservations, 2);
    }

    #[tokio::test]
    async fn test_report_is_consistent() {
        let d = test_dashboard().await;
        let report = analytics_report(&d.session, &d.config);

        assert_eq!(report.today_sales_display, "$30.21");
        assert_eq!(report.low_stock.len(), report.summary.low_stock_items);
        assert_eq!(report.todays_reservations.len(), report.summary.todays_reservations);
        assert!(report.top_items.len() <= d.config.top_items_limit);
        assert_eq!(report.low_stock[0].name, "Tomatoes");
        assert_eq!(report.kitchen.len(), 2);
    }

    #[tokio::test]
    async fn test_restaurant_day_follows_offset() {
        let d = test_dashboard().await;
        let config = DashboardConfig {
            utc_offset_minutes: 6 * 60,
            ..Default::default()
        };
        // 18:00 UTC is midnight at UTC+6; every seed order fell on the day before.
        assert_eq!(dashboard_summary(&d.session, &config).today_order_count, 0);
    }

    #[tokio::test]
    async fn test_waiters_and_categories() {
        let d = test_dashboard().await;
        let waiters = waiter_stats(&d.session);
        let sarah = waiters.iter().find(|w| w.user_id == "4").unwrap();
        assert_eq!(sarah.order_count, 3);

        let categories = sales_by_category(&d.session);
        assert!(categories.windows(2).all(|w| w[0].sales_cents >= w[1].sales_cents));
        assert_eq!(top_items(&d.session, &d.config).len(), 5);
        assert_eq!(low_stock(&d.session).len(), 1);
        assert_eq!(todays_reservations(&d.session, &d.config).len(), 2);
    }
}
