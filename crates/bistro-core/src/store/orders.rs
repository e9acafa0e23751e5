//! # Order Lifecycle Engine
//!
//! Every change to an order's status, its items' statuses, its payment,
//! and the occupancy of the table it sits on goes through this file.
//!
//! ## Order ↔ Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create_order ──────────► table: occupied, current_order_id = order    │
//! │                                                                         │
//! │  status → completed ────► table: cleaning,  current_order_id = None    │
//! │  status → cancelled ────► table: available, current_order_id = None    │
//! │  delete_order ──────────► table: available, current_order_id = None    │
//! │                                                                         │
//! │  A release only touches a table that points at this order or at        │
//! │  nothing, so a stale order can never evict the table's current guest.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Kitchen Flow
//! ```text
//!   order confirmed ── first item starts ──► order preparing ("Order Started")
//!   order preparing ── last item ready ────► order ready     ("Order Ready")
//! ```

use tracing::{debug, info, warn};

use super::Store;
use crate::draft::{NewOrder, PaymentReceipt, PaymentRequest};
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::transition::{check_item_transition, check_order_transition};
use crate::types::{
    ItemStatus, NotificationKind, Order, OrderItem, OrderStatus, PaymentMethod, PaymentStatus,
    TableStatus,
};
use crate::validation::{validate_amount_cents, validate_line_count, validate_quantity};
use crate::MAX_AMOUNT_CENTS;

/// Outcome of an item status update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemUpdate {
    /// The item was updated. `order_status` is the order's status afterwards,
    /// which differs from before when the update advanced the order.
    Applied { order_status: OrderStatus },
    /// No item with that id; only the order's `updated_at` moved.
    UnknownItem,
}

impl Store {
    // =========================================================================
    // Create
    // =========================================================================

    /// Opens a new check on a table.
    ///
    /// Prices are frozen from the live menu. The table becomes `occupied`
    /// and points at the new order. Nothing changes if any check fails.
    pub fn create_order(&mut self, draft: NewOrder) -> CoreResult<Order> {
        validate_line_count(draft.lines.len())?;
        for line in &draft.lines {
            validate_quantity(line.quantity)?;
        }
        validate_amount_cents("discount", draft.discount_cents)?;

        self.user(&draft.served_by)?;

        let table = self.table(&draft.table_id)?;
        if !table.can_seat() {
            return Err(CoreError::TableUnavailable {
                number: table.number,
                status: table.status,
            });
        }

        let mut items = Vec::with_capacity(draft.lines.len());
        for line in &draft.lines {
            let menu_item = self.menu_item(&line.menu_item_id)?;
            if !menu_item.is_available {
                return Err(CoreError::MenuItemUnavailable {
                    name: menu_item.name.clone(),
                });
            }

            items.push(OrderItem {
                id: Self::new_id(),
                menu_item_id: menu_item.id.clone(),
                name: menu_item.name.clone(),
                quantity: line.quantity,
                unit_price_cents: menu_item.price_cents,
                special_instructions: non_blank(line.special_instructions.as_deref()),
                status: ItemStatus::Pending,
            });
        }

        let mut subtotal = Money::zero();
        for item in &items {
            subtotal = item
                .unit_price()
                .checked_mul(item.quantity)
                .and_then(|line| subtotal.checked_add(line))
                .ok_or_else(|| amount_overflow("subtotal"))?;
        }
        let tax = subtotal.calculate_tax(self.tax_rate);
        let gross = subtotal
            .checked_add(tax)
            .ok_or_else(|| amount_overflow("total"))?;
        validate_amount_cents("total", gross.cents())?;

        let discount = Money::from_cents(draft.discount_cents);
        if discount > gross {
            return Err(CoreError::InvalidDiscount {
                discount_cents: discount.cents(),
                max_cents: gross.cents(),
            });
        }
        let total = gross - discount;

        let now = self.clock.now();
        let order = Order {
            id: Self::new_id(),
            table_id: draft.table_id.clone(),
            items,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_method: None,
            subtotal_cents: subtotal.cents(),
            tax_cents: tax.cents(),
            discount_cents: discount.cents(),
            total_cents: total.cents(),
            tip_cents: None,
            created_at: now,
            updated_at: now,
            served_by: draft.served_by.clone(),
            notes: non_blank(draft.notes.as_deref()),
        };

        let table = self.table_mut(&draft.table_id)?;
        table.status = TableStatus::Occupied;
        table.current_order_id = Some(order.id.clone());
        let table_number = table.number;

        self.data.orders.push(order.clone());

        info!(
            order_id = %order.id,
            table = table_number,
            items = order.items.len(),
            total = %order.total(),
            "Order created"
        );
        Ok(order)
    }

    // =========================================================================
    // Order status
    // =========================================================================

    /// Moves an order to `to`, enforcing the transition table.
    ///
    /// ## Side Effects
    /// - `completed`: requires payment `paid`; table goes to `cleaning`
    /// - `cancelled`: table goes back to `available`
    /// - `preparing` / `ready`: kitchen notification
    pub fn update_order_status(&mut self, order_id: &str, to: OrderStatus) -> CoreResult<Order> {
        let order = self.order(order_id)?;
        check_order_transition(order_id, order.status, to)?;

        if to == OrderStatus::Completed && order.payment_status != PaymentStatus::Paid {
            return Err(CoreError::PaymentOutstanding {
                order_id: order_id.to_string(),
                status: order.payment_status,
            });
        }

        self.apply_status(order_id, to)
    }

    /// Writes a status that has already been checked, then runs its side
    /// effects.
    fn apply_status(&mut self, order_id: &str, to: OrderStatus) -> CoreResult<Order> {
        let now = self.clock.now();
        let order = self.order_mut(order_id)?;
        let from = order.status;
        order.status = to;
        order.updated_at = now;
        let order = order.clone();

        debug!(order_id = %order_id, from = ?from, to = ?to, "Order status changed");

        match to {
            OrderStatus::Completed => {
                self.release_table(&order.table_id, order_id, TableStatus::Cleaning);
            }
            OrderStatus::Cancelled => {
                self.release_table(&order.table_id, order_id, TableStatus::Available);
            }
            OrderStatus::Preparing => {
                self.push_notification(
                    NotificationKind::Info,
                    "Order Started",
                    format!("Order #{} is now being prepared", order_id),
                    None,
                );
                // Nothing left to cook
                if order.all_items_ready() {
                    return self.apply_status(order_id, OrderStatus::Ready);
                }
            }
            OrderStatus::Ready => {
                self.push_notification(
                    NotificationKind::Success,
                    "Order Ready",
                    format!("Order #{} is ready for pickup", order_id),
                    None,
                );
            }
            _ => {}
        }

        Ok(order)
    }

    // =========================================================================
    // Item status
    // =========================================================================

    /// Moves one item forward in the kitchen.
    ///
    /// ## Behavior
    /// - Unknown `item_id`: items untouched, `updated_at` refreshed,
    ///   returns [`ItemUpdate::UnknownItem`]
    /// - Same status again: accepted, nothing moves but `updated_at`
    /// - Backwards: `InvalidItemTransition`
    /// - Completed or cancelled order: `OrderClosed`
    /// - Pending order: `OrderNotStarted`
    ///
    /// Progress on a `confirmed` order starts it (`preparing`). When every
    /// item of a `preparing` order is ready, the order becomes `ready`.
    pub fn update_order_item_status(
        &mut self,
        order_id: &str,
        item_id: &str,
        to: ItemStatus,
    ) -> CoreResult<ItemUpdate> {
        let order = self.order(order_id)?;
        if order.status.is_terminal() {
            return Err(CoreError::OrderClosed {
                order_id: order_id.to_string(),
                status: order.status,
            });
        }
        if order.status == OrderStatus::Pending {
            return Err(CoreError::OrderNotStarted {
                order_id: order_id.to_string(),
            });
        }

        let item_index = order.items.iter().position(|i| i.id == item_id);
        if let Some(index) = item_index {
            check_item_transition(item_id, order.items[index].status, to)?;
        }

        let now = self.clock.now();
        let order = self.order_mut(order_id)?;
        order.updated_at = now;

        let Some(index) = item_index else {
            warn!(order_id = %order_id, item_id = %item_id, "Item not on order; only touched updated_at");
            return Ok(ItemUpdate::UnknownItem);
        };

        order.items[index].status = to;
        debug!(order_id = %order_id, item_id = %item_id, to = ?to, "Item status changed");

        if to > ItemStatus::Pending && order.status == OrderStatus::Confirmed {
            self.apply_status(order_id, OrderStatus::Preparing)?;
        }

        let order = self.order(order_id)?;
        if order.status == OrderStatus::Preparing && order.all_items_ready() {
            self.apply_status(order_id, OrderStatus::Ready)?;
        }

        let order_status = self.order(order_id)?.status;
        Ok(ItemUpdate::Applied { order_status })
    }

    // =========================================================================
    // Delete
    // =========================================================================

    /// Removes an order outright and frees its table.
    pub fn delete_order(&mut self, order_id: &str) -> CoreResult<Order> {
        let index = self
            .data
            .orders
            .iter()
            .position(|o| o.id == order_id)
            .ok_or_else(|| CoreError::OrderNotFound(order_id.to_string()))?;

        let order = self.data.orders.remove(index);
        self.release_table(&order.table_id, order_id, TableStatus::Available);

        info!(order_id = %order_id, status = ?order.status, "Order deleted");
        Ok(order)
    }

    // =========================================================================
    // Payment
    // =========================================================================

    /// Takes payment for a served order.
    ///
    /// ## Cash Flow
    /// ```text
    /// total $73.41 + tip $5.00 = charged $78.41
    /// tendered $80.00 ──► change $1.59
    /// tendered $75.00 ──► InsufficientTender, nothing recorded
    /// ```
    pub fn settle_payment(&mut self, order_id: &str, payment: PaymentRequest) -> CoreResult<PaymentReceipt> {
        let order = self.order(order_id)?;
        if order.status != OrderStatus::Served {
            return Err(CoreError::NotServed {
                order_id: order_id.to_string(),
                status: order.status,
            });
        }
        if order.payment_status != PaymentStatus::Pending {
            return Err(CoreError::PaymentAlreadySettled {
                order_id: order_id.to_string(),
                status: order.payment_status,
            });
        }

        validate_amount_cents("tip", payment.tip_cents)?;
        let charged = order
            .total()
            .checked_add(Money::from_cents(payment.tip_cents))
            .ok_or_else(|| amount_overflow("charge"))?;

        let change = match payment.method {
            PaymentMethod::Cash => {
                let tendered = payment.tendered_cents.ok_or_else(|| ValidationError::Required {
                    field: "amount tendered".to_string(),
                })?;
                validate_amount_cents("amount tendered", tendered)?;
                if tendered < charged.cents() {
                    return Err(CoreError::InsufficientTender {
                        due_cents: charged.cents(),
                        tendered_cents: tendered,
                    });
                }
                Money::from_cents(tendered)
                    .checked_sub(charged)
                    .ok_or_else(|| amount_overflow("change"))?
            }
            PaymentMethod::Card | PaymentMethod::DigitalWallet => Money::zero(),
        };

        let now = self.clock.now();
        let order = self.order_mut(order_id)?;
        order.payment_status = PaymentStatus::Paid;
        order.payment_method = Some(payment.method);
        order.tip_cents = Some(payment.tip_cents);
        order.updated_at = now;

        info!(
            order_id = %order_id,
            method = ?payment.method,
            charged = %charged,
            change = %change,
            "Payment settled"
        );

        Ok(PaymentReceipt {
            order_id: order_id.to_string(),
            method: payment.method,
            charged_cents: charged.cents(),
            tip_cents: payment.tip_cents,
            change_cents: change.cents(),
        })
    }

    /// Reverses a settled payment.
    pub fn refund_payment(&mut self, order_id: &str) -> CoreResult<Order> {
        let order = self.order(order_id)?;
        match order.payment_status {
            PaymentStatus::Paid => {}
            PaymentStatus::Pending => {
                return Err(CoreError::PaymentOutstanding {
                    order_id: order_id.to_string(),
                    status: PaymentStatus::Pending,
                });
            }
            PaymentStatus::Refunded => {
                return Err(CoreError::PaymentAlreadySettled {
                    order_id: order_id.to_string(),
                    status: PaymentStatus::Refunded,
                });
            }
        }

        let now = self.clock.now();
        let order = self.order_mut(order_id)?;
        order.payment_status = PaymentStatus::Refunded;
        order.updated_at = now;

        info!(order_id = %order_id, total = %order.total(), "Payment refunded");
        Ok(order.clone())
    }

    // =========================================================================
    // Table release
    // =========================================================================

    fn release_table(&mut self, table_id: &str, order_id: &str, status: TableStatus) {
        let table = match self.table_mut(table_id) {
            Ok(table) => table,
            Err(_) => {
                warn!(table_id = %table_id, order_id = %order_id, "Order references a missing table");
                return;
            }
        };

        if !table.is_held_by(order_id) {
            warn!(
                table = table.number,
                order_id = %order_id,
                holder = ?table.current_order_id,
                "Table is held by another order; leaving it alone"
            );
            return;
        }

        table.status = status;
        table.current_order_id = None;
        debug!(table = table.number, status = ?status, "Table released");
    }
}

fn amount_overflow(field: &str) -> ValidationError {
    ValidationError::OutOfRange {
        field: field.to_string(),
        min: 0,
        max: MAX_AMOUNT_CENTS,
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{MenuItemPatch, OrderLine};
    use crate::store::tests::seeded_store;
    use chrono::Duration;

    fn order_on(table_id: &str, lines: Vec<OrderLine>) -> NewOrder {
        NewOrder {
            table_id: table_id.to_string(),
            lines,
            served_by: "4".to_string(),
            discount_cents: 0,
            notes: None,
        }
    }

    /// Walks an order forward through the given statuses.
    fn advance(store: &mut Store, order_id: &str, steps: &[OrderStatus]) {
        for step in steps {
            store.update_order_status(order_id, *step).unwrap();
        }
    }

    fn table_three_order(store: &mut Store) -> Order {
        store
            .update_menu_item(
                "11",
                MenuItemPatch {
                    price_cents: Some(1000),
                    ..Default::default()
                },
            )
            .unwrap();
        store
            .create_order(order_on("3", vec![OrderLine::new("11", 2)]))
            .unwrap()
    }

    #[test]
    fn test_create_order_on_table_three() {
        let (mut store, _) = seeded_store();
        let order = table_three_order(&mut store);

        assert_eq!(order.subtotal_cents, 2000);
        assert_eq!(order.tax_cents, 160);
        assert_eq!(order.total_cents, 2160);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert!(order.totals_balance());

        let table = store.table("3").unwrap();
        assert_eq!(table.status, TableStatus::Occupied);
        assert_eq!(table.current_order_id.as_deref(), Some(order.id.as_str()));
        assert!(store.occupancy_issues().is_empty());
    }

    #[test]
    fn test_create_order_freezes_price() {
        let (mut store, _) = seeded_store();
        let order = store
            .create_order(order_on("6", vec![OrderLine::new("3", 1)]))
            .unwrap();

        store
            .update_menu_item(
                "3",
                MenuItemPatch {
                    price_cents: Some(3599),
                    ..Default::default()
                },
            )
            .unwrap();

        let stored = store.order(&order.id).unwrap();
        assert_eq!(stored.items[0].unit_price_cents, 2899);
        assert_eq!(stored.items[0].name, "Grilled Salmon");
    }

    #[test]
    fn test_create_order_with_discount() {
        let (mut store, _) = seeded_store();
        let mut draft = order_on("8", vec![OrderLine::new("1", 1), OrderLine::new("4", 1)]);
        draft.discount_cents = 500;

        let order = store.create_order(draft).unwrap();
        assert_eq!(order.subtotal_cents, 5598);
        assert_eq!(order.tax_cents, 448);
        assert_eq!(order.total_cents, 5598 + 448 - 500);
        assert!(order.totals_balance());
    }

    #[test]
    fn test_create_order_rejections_leave_store_untouched() {
        let (mut store, _) = seeded_store();
        let before = store.snapshot();

        let occupied = store.create_order(order_on("2", vec![OrderLine::new("1", 1)]));
        assert!(matches!(
            occupied,
            Err(CoreError::TableUnavailable { number: 2, status: TableStatus::Occupied })
        ));

        let cleaning = store.create_order(order_on("7", vec![OrderLine::new("1", 1)]));
        assert!(matches!(cleaning, Err(CoreError::TableUnavailable { .. })));

        let empty = store.create_order(order_on("3", vec![]));
        assert!(matches!(empty, Err(CoreError::Validation(_))));

        let zero_qty = store.create_order(order_on("3", vec![OrderLine::new("1", 0)]));
        assert!(matches!(zero_qty, Err(CoreError::Validation(_))));

        let unknown_item = store.create_order(order_on("3", vec![OrderLine::new("999", 1)]));
        assert!(matches!(unknown_item, Err(CoreError::MenuItemNotFound(_))));

        let unknown_table = store.create_order(order_on("99", vec![OrderLine::new("1", 1)]));
        assert!(matches!(unknown_table, Err(CoreError::TableNotFound(_))));

        let mut stranger = order_on("3", vec![OrderLine::new("1", 1)]);
        stranger.served_by = "nobody".to_string();
        assert!(matches!(store.create_order(stranger), Err(CoreError::UserNotFound(_))));

        let mut too_generous = order_on("3", vec![OrderLine::new("1", 1)]);
        too_generous.discount_cents = 10_000;
        assert!(matches!(
            store.create_order(too_generous),
            Err(CoreError::InvalidDiscount { .. })
        ));

        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_create_order_rejects_unavailable_menu_item() {
        let (mut store, _) = seeded_store();
        store
            .update_menu_item(
                "9",
                MenuItemPatch {
                    is_available: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();

        let result = store.create_order(order_on("3", vec![OrderLine::new("9", 1)]));
        assert!(matches!(result, Err(CoreError::MenuItemUnavailable { .. })));
        assert_eq!(store.table("3").unwrap().status, TableStatus::Available);
    }

    #[test]
    fn test_reserved_table_can_be_seated() {
        let (mut store, _) = seeded_store();
        let order = store
            .create_order(order_on("5", vec![OrderLine::new("8", 2)]))
            .unwrap();
        assert_eq!(store.table("5").unwrap().status, TableStatus::Occupied);
        assert_eq!(
            store.table("5").unwrap().current_order_id.as_deref(),
            Some(order.id.as_str())
        );
    }

    #[test]
    fn test_illegal_transition_leaves_order_untouched() {
        let (mut store, clock) = seeded_store();
        let order = table_three_order(&mut store);
        clock.advance(Duration::minutes(1));

        let result = store.update_order_status(&order.id, OrderStatus::Ready);
        assert!(matches!(result, Err(CoreError::InvalidOrderTransition { .. })));
        assert_eq!(store.order(&order.id).unwrap(), &order);

        let same = store.update_order_status(&order.id, OrderStatus::Pending);
        assert!(matches!(same, Err(CoreError::InvalidOrderTransition { .. })));
    }

    #[test]
    fn test_update_status_refreshes_updated_at() {
        let (mut store, clock) = seeded_store();
        let order = table_three_order(&mut store);
        clock.advance(Duration::minutes(3));

        let confirmed = store
            .update_order_status(&order.id, OrderStatus::Confirmed)
            .unwrap();
        assert_eq!(confirmed.updated_at, order.updated_at + Duration::minutes(3));
        assert_eq!(confirmed.created_at, order.created_at);
    }

    #[test]
    fn test_complete_requires_payment_and_cleans_table() {
        let (mut store, _) = seeded_store();
        let order = table_three_order(&mut store);
        advance(
            &mut store,
            &order.id,
            &[OrderStatus::Confirmed, OrderStatus::Preparing, OrderStatus::Ready, OrderStatus::Served],
        );

        let unpaid = store.update_order_status(&order.id, OrderStatus::Completed);
        assert!(matches!(unpaid, Err(CoreError::PaymentOutstanding { .. })));

        store
            .settle_payment(
                &order.id,
                PaymentRequest {
                    method: PaymentMethod::Card,
                    tip_cents: 0,
                    tendered_cents: None,
                },
            )
            .unwrap();
        store
            .update_order_status(&order.id, OrderStatus::Completed)
            .unwrap();

        let table = store.table("3").unwrap();
        assert_eq!(table.status, TableStatus::Cleaning);
        assert_eq!(table.current_order_id, None);
    }

    #[test]
    fn test_cancel_frees_table() {
        let (mut store, _) = seeded_store();
        store.update_order_status("101", OrderStatus::Cancelled).unwrap();

        let table = store.table("2").unwrap();
        assert_eq!(table.status, TableStatus::Available);
        assert_eq!(table.current_order_id, None);

        let again = store.update_order_status("101", OrderStatus::Cancelled);
        assert!(matches!(again, Err(CoreError::InvalidOrderTransition { .. })));
    }

    #[test]
    fn test_unknown_order_is_not_found() {
        let (mut store, _) = seeded_store();
        assert!(matches!(
            store.update_order_status("nope", OrderStatus::Confirmed),
            Err(CoreError::OrderNotFound(_))
        ));
        assert!(matches!(
            store.update_order_item_status("nope", "oi1", ItemStatus::Ready),
            Err(CoreError::OrderNotFound(_))
        ));
        assert!(matches!(store.delete_order("nope"), Err(CoreError::OrderNotFound(_))));
    }

    #[test]
    fn test_all_items_ready_makes_order_ready() {
        let (mut store, _) = seeded_store();
        let order = store
            .create_order(order_on("10", vec![OrderLine::new("2", 1), OrderLine::new("7", 1)]))
            .unwrap();
        advance(&mut store, &order.id, &[OrderStatus::Confirmed, OrderStatus::Preparing]);

        let first = store
            .update_order_item_status(&order.id, &order.items[0].id, ItemStatus::Ready)
            .unwrap();
        assert_eq!(first, ItemUpdate::Applied { order_status: OrderStatus::Preparing });

        let second = store
            .update_order_item_status(&order.id, &order.items[1].id, ItemStatus::Ready)
            .unwrap();
        assert_eq!(second, ItemUpdate::Applied { order_status: OrderStatus::Ready });
        assert_eq!(store.order(&order.id).unwrap().status, OrderStatus::Ready);

        let latest = &store.notifications()[0];
        assert_eq!(latest.title, "Order Ready");
        assert_eq!(latest.kind, NotificationKind::Success);
    }

    #[test]
    fn test_fixture_order_ready_after_last_item() {
        let (mut store, _) = seeded_store();
        let update = store
            .update_order_item_status("101", "oi2", ItemStatus::Ready)
            .unwrap();
        assert_eq!(update, ItemUpdate::Applied { order_status: OrderStatus::Ready });
    }

    #[test]
    fn test_unknown_item_only_touches_updated_at() {
        let (mut store, clock) = seeded_store();
        let before = store.order("102").unwrap().clone();
        clock.advance(Duration::seconds(10));

        let update = store
            .update_order_item_status("102", "does-not-exist", ItemStatus::Ready)
            .unwrap();
        assert_eq!(update, ItemUpdate::UnknownItem);

        let after = store.order("102").unwrap();
        assert_eq!(after.items, before.items);
        assert_eq!(after.status, before.status);
        assert!(after.updated_at > before.updated_at);
    }

    #[test]
    fn test_item_cannot_move_backwards() {
        let (mut store, _) = seeded_store();
        let result = store.update_order_item_status("101", "oi1", ItemStatus::Pending);
        assert!(matches!(result, Err(CoreError::InvalidItemTransition { .. })));

        let same = store
            .update_order_item_status("101", "oi1", ItemStatus::Ready)
            .unwrap();
        assert_eq!(same, ItemUpdate::Applied { order_status: OrderStatus::Preparing });
    }

    #[test]
    fn test_item_progress_starts_confirmed_order() {
        let (mut store, _) = seeded_store();
        store.update_order_status("105", OrderStatus::Confirmed).unwrap();

        let update = store
            .update_order_item_status("105", "oi11", ItemStatus::Preparing)
            .unwrap();
        assert_eq!(update, ItemUpdate::Applied { order_status: OrderStatus::Preparing });
        assert_eq!(store.notifications()[0].title, "Order Started");
    }

    #[test]
    fn test_closed_order_rejects_item_updates() {
        let (mut store, _) = seeded_store();
        let result = store.update_order_item_status("104", "oi9", ItemStatus::Ready);
        assert!(matches!(result, Err(CoreError::OrderClosed { .. })));
    }

    #[test]
    fn test_pending_order_rejects_item_progress() {
        let (mut store, _) = seeded_store();
        let order = store
            .create_order(order_on("10", vec![OrderLine::new("2", 1)]))
            .unwrap();
        let before = store.snapshot();

        let early = store.update_order_item_status(&order.id, &order.items[0].id, ItemStatus::Ready);
        assert!(matches!(early, Err(CoreError::OrderNotStarted { .. })));
        assert_eq!(store.snapshot(), before);

        advance(&mut store, &order.id, &[OrderStatus::Confirmed, OrderStatus::Preparing]);
        let order = store.order(&order.id).unwrap();
        assert_eq!(order.status, OrderStatus::Preparing);
        assert_eq!(order.items[0].status, ItemStatus::Pending);
    }

    #[test]
    fn test_preparing_with_every_item_ready_becomes_ready() {
        let (store, clock) = seeded_store();
        let mut data = store.into_snapshot();
        let order = data.orders.iter_mut().find(|o| o.id == "105").unwrap();
        order.status = OrderStatus::Confirmed;
        for item in &mut order.items {
            item.status = ItemStatus::Ready;
        }
        let mut store = Store::from_snapshot(data, clock);

        let order = store.update_order_status("105", OrderStatus::Preparing).unwrap();
        assert_eq!(order.status, OrderStatus::Ready);
        assert_eq!(store.order("105").unwrap().status, OrderStatus::Ready);

        let titles: Vec<&str> = store.notifications().iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Order Ready", "Order Started"]);
    }

    #[test]
    fn test_delete_order_frees_table() {
        let (mut store, _) = seeded_store();
        let removed = store.delete_order("103").unwrap();
        assert_eq!(removed.id, "103");
        assert!(store.order("103").is_err());

        let table = store.table("9").unwrap();
        assert_eq!(table.status, TableStatus::Available);
        assert_eq!(table.current_order_id, None);
    }

    #[test]
    fn test_stale_order_does_not_evict_current_guest() {
        let (mut store, _) = seeded_store();
        let fresh = table_three_order(&mut store);

        // Fixture order 105 also names table 3 but does not hold it
        store.delete_order("105").unwrap();

        let table = store.table("3").unwrap();
        assert_eq!(table.status, TableStatus::Occupied);
        assert_eq!(table.current_order_id.as_deref(), Some(fresh.id.as_str()));
    }

    #[test]
    fn test_cash_payment_returns_change() {
        let (mut store, _) = seeded_store();
        store.update_order_status("103", OrderStatus::Served).unwrap();

        let short = store.settle_payment(
            "103",
            PaymentRequest {
                method: PaymentMethod::Cash,
                tip_cents: 500,
                tendered_cents: Some(5000),
            },
        );
        assert!(matches!(
            short,
            Err(CoreError::InsufficientTender { due_cents: 5248, tendered_cents: 5000 })
        ));
        assert_eq!(store.order("103").unwrap().payment_status, PaymentStatus::Pending);

        let receipt = store
            .settle_payment(
                "103",
                PaymentRequest {
                    method: PaymentMethod::Cash,
                    tip_cents: 500,
                    tendered_cents: Some(6000),
                },
            )
            .unwrap();
        assert_eq!(receipt.charged_cents, 5248);
        assert_eq!(receipt.change_cents, 752);

        let order = store.order("103").unwrap();
        assert_eq!(order.payment_status, PaymentStatus::Paid);
        assert_eq!(order.payment_method, Some(PaymentMethod::Cash));
        assert_eq!(order.tip_cents, Some(500));
    }

    #[test]
    fn test_oversized_tip_is_rejected_not_overflowed() {
        let (mut store, _) = seeded_store();
        store.update_order_status("103", OrderStatus::Served).unwrap();

        let card = store.settle_payment(
            "103",
            PaymentRequest {
                method: PaymentMethod::Card,
                tip_cents: i64::MAX,
                tendered_cents: None,
            },
        );
        assert!(matches!(
            card,
            Err(CoreError::Validation(ValidationError::OutOfRange { max: MAX_AMOUNT_CENTS, .. }))
        ));

        let cash = store.settle_payment(
            "103",
            PaymentRequest {
                method: PaymentMethod::Cash,
                tip_cents: 0,
                tendered_cents: Some(i64::MAX),
            },
        );
        assert!(matches!(cash, Err(CoreError::Validation(_))));

        let order = store.order("103").unwrap();
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert_eq!(order.tip_cents, None);
    }

    #[test]
    fn test_line_total_overflow_is_rejected() {
        let (store, clock) = seeded_store();
        // A price no validator would accept, as if loaded from an old save
        let mut data = store.into_snapshot();
        data.menu_items
            .iter_mut()
            .find(|m| m.id == "3")
            .unwrap()
            .price_cents = i64::MAX;
        let mut store = Store::from_snapshot(data, clock);
        let before = store.snapshot();

        let result = store.create_order(order_on("10", vec![OrderLine::new("3", 2)]));
        assert!(matches!(result, Err(CoreError::Validation(_))));
        assert_eq!(store.snapshot(), before);

        let capped = store.create_order(order_on("10", vec![OrderLine::new("3", 1)]));
        assert!(matches!(capped, Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_payment_guards() {
        let (mut store, _) = seeded_store();
        let card = PaymentRequest {
            method: PaymentMethod::Card,
            tip_cents: 0,
            tendered_cents: None,
        };

        assert!(matches!(
            store.settle_payment("101", card.clone()),
            Err(CoreError::NotServed { .. })
        ));
        assert!(matches!(
            store.refund_payment("101"),
            Err(CoreError::PaymentOutstanding { .. })
        ));

        let refunded = store.refund_payment("104").unwrap();
        assert_eq!(refunded.payment_status, PaymentStatus::Refunded);
        assert!(matches!(
            store.refund_payment("104"),
            Err(CoreError::PaymentAlreadySettled { .. })
        ));

        store.update_order_status("103", OrderStatus::Served).unwrap();
        let cash_without_tender = store.settle_payment(
            "103",
            PaymentRequest {
                method: PaymentMethod::Cash,
                tip_cents: 0,
                tendered_cents: None,
            },
        );
        assert!(matches!(cash_without_tender, Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_notifications_from_kitchen_flow() {
        let (mut store, _) = seeded_store();
        store.update_order_status("105", OrderStatus::Confirmed).unwrap();
        store.update_order_status("105", OrderStatus::Preparing).unwrap();

        assert_eq!(store.notifications().len(), 1);
        let note = &store.notifications()[0];
        assert_eq!(note.title, "Order Started");
        assert_eq!(note.message, "Order #105 is now being prepared");
        assert_eq!(note.kind, NotificationKind::Info);
        assert!(!note.read);
    }
}
