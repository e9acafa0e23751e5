//! # Order Commands
//!
//! Waiter and kitchen actions on orders, plus the floor plan.
//!
//! ## Who Calls What
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  waiter   create_order ─────────────► pending                           │
//! │  waiter   update_order_status ──────► confirmed                         │
//! │  kitchen  update_order_item_status ─► preparing ─► ready (all items)    │
//! │  waiter   update_order_status ──────► served                            │
//! │  cashier  settle_payment, then update_order_status ─► completed         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use bistro_core::analytics::{self, KitchenTicket};
use bistro_core::validation::parse_quantity;
use bistro_core::{ItemStatus, ItemUpdate, Money, NewOrder, Order, OrderLine, OrderStatus, Table, ValidationError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{DbState, SessionState};

/// Result of a kitchen item update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStatusResponse {
    pub order: Order,
    /// False when the item id was not on the order.
    pub item_found: bool,
    /// The update moved the order to a new status.
    pub order_advanced: bool,
}

/// One line of the order pad as typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineForm {
    pub menu_item_id: String,
    pub quantity: String,
    #[serde(default)]
    pub special_instructions: Option<String>,
}

/// The waiter's order pad as typed. `discount` is a decimal string.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderForm {
    pub table_id: String,
    pub lines: Vec<OrderLineForm>,
    #[serde(default)]
    pub served_by: String,
    #[serde(default)]
    pub discount: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl OrderForm {
    pub fn parse(self) -> Result<NewOrder, ValidationError> {
        let lines = self
            .lines
            .into_iter()
            .map(|line| {
                Ok(OrderLine {
                    menu_item_id: line.menu_item_id,
                    quantity: parse_quantity(&line.quantity)?,
                    special_instructions: line.special_instructions,
                })
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;
        let discount_cents = match self.discount.trim() {
            "" => 0,
            discount => Money::parse(discount)?.cents(),
        };

        Ok(NewOrder {
            table_id: self.table_id,
            lines,
            served_by: self.served_by,
            discount_cents,
            notes: self.notes,
        })
    }
}

// =============================================================================
// Reads
// =============================================================================

/// Orders, newest first, optionally filtered by status.
pub fn list_orders(session: &SessionState, status: Option<OrderStatus>) -> Vec<Order> {
    debug!(status = ?status, "list_orders command");
    session.with_store(|s| {
        let mut orders: Vec<Order> = s
            .orders()
            .iter()
            .filter(|o| status.map_or(true, |st| o.status == st))
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders
    })
}

pub fn get_order(session: &SessionState, order_id: &str) -> Result<Order, ApiError> {
    Ok(session.with_store(|s| s.order(order_id).cloned())?)
}

/// Orders taken by one waiter that are still open.
pub fn my_active_orders(session: &SessionState, user_id: &str) -> Vec<Order> {
    session.with_store(|s| {
        s.orders_served_by(user_id)
            .filter(|o| o.status.is_active() || o.awaiting_payment())
            .cloned()
            .collect()
    })
}

pub fn list_tables(session: &SessionState) -> Vec<Table> {
    session.with_store(|s| s.tables().to_vec())
}

/// Open tickets for the kitchen display, oldest first.
pub fn kitchen_queue(session: &SessionState) -> Vec<KitchenTicket> {
    session.with_store(|s| analytics::kitchen_load(s.orders(), s.menu_items()))
}

// =============================================================================
// Mutations
// =============================================================================

/// Opens a check. An empty `served_by` is filled with the signed-in user.
pub async fn create_order(
    session: &SessionState,
    db: &DbState,
    mut draft: NewOrder,
) -> Result<Order, ApiError> {
    debug!(table_id = %draft.table_id, lines = draft.lines.len(), "create_order command");

    let (order, snapshot) = session.mutate(|s| {
        if draft.served_by.trim().is_empty() {
            if let Some(user) = s.current_user() {
                draft.served_by = user.id.clone();
            }
        }
        s.create_order(draft)
    })?;
    db.mirror(&snapshot).await;

    info!(order_id = %order.id, total = order.total_cents, "Order placed");
    Ok(order)
}

/// Opens a check from the order pad. Nothing is touched if a quantity or
/// the discount does not parse.
pub async fn create_order_form(
    session: &SessionState,
    db: &DbState,
    form: OrderForm,
) -> Result<Order, ApiError> {
    let draft = form.parse()?;
    create_order(session, db, draft).await
}

pub async fn update_order_status(
    session: &SessionState,
    db: &DbState,
    order_id: String,
    status: OrderStatus,
) -> Result<Order, ApiError> {
    debug!(order_id = %order_id, status = ?status, "update_order_status command");
    let (order, snapshot) = session.mutate(|s| s.update_order_status(&order_id, status))?;
    db.mirror(&snapshot).await;
    Ok(order)
}

pub async fn update_order_item_status(
    session: &SessionState,
    db: &DbState,
    order_id: String,
    item_id: String,
    status: ItemStatus,
) -> Result<ItemStatusResponse, ApiError> {
    debug!(order_id = %order_id, item_id = %item_id, status = ?status, "update_order_item_status command");

    let ((before, update, order), snapshot) = session.mutate(|s| {
        let before = s.order(&order_id)?.status;
        let update = s.update_order_item_status(&order_id, &item_id, status)?;
        let order = s.order(&order_id)?.clone();
        Ok((before, update, order))
    })?;
    db.mirror(&snapshot).await;

    let (item_found, order_advanced) = match update {
        ItemUpdate::Applied { order_status } => (true, order_status != before),
        ItemUpdate::UnknownItem => (false, false),
    };
    Ok(ItemStatusResponse {
        order,
        item_found,
        order_advanced,
    })
}

pub async fn delete_order(
    session: &SessionState,
    db: &DbState,
    order_id: String,
) -> Result<Order, ApiError> {
    debug!(order_id = %order_id, "delete_order command");
    let (order, snapshot) = session.mutate(|s| s.delete_order(&order_id))?;
    db.mirror(&snapshot).await;
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::tests::test_dashboard;
    use bistro_core::{TableStatus, STORE_NAME};

    fn pad(table_id: &str, quantity: &str) -> OrderForm {
        OrderForm {
            table_id: table_id.into(),
            lines: vec![OrderLineForm {
                menu_item_id: "3".into(),
                quantity: quantity.into(),
                special_instructions: Some("no dill".into()),
            }],
            served_by: "4".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_order_fills_waiter_and_persists() {
        let d = test_dashboard().await;
        crate::commands::auth::login(&d.session, &d.db, "waiter@restaurant.com".into(), String::new())
            .await
            .unwrap();

        let order = create_order(
            &d.session,
            &d.db,
            NewOrder {
                table_id: "6".into(),
                lines: vec![OrderLine::new("3", 1)],
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(order.served_by, "4");
        assert_eq!(order.total_cents, 2899 + 232);

        let saved = d.db.inner().snapshots().load(STORE_NAME).await.unwrap().unwrap();
        let table = saved.tables.iter().find(|t| t.id == "6").unwrap();
        assert_eq!(table.status, TableStatus::Occupied);
        assert_eq!(table.current_order_id.as_deref(), Some(order.id.as_str()));
    }

    #[tokio::test]
    async fn test_busy_table_is_rejected_without_saving() {
        let d = test_dashboard().await;
        let err = create_order(
            &d.session,
            &d.db,
            NewOrder {
                table_id: "7".into(),
                lines: vec![OrderLine::new("3", 1)],
                served_by: "4".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
        assert_eq!(list_orders(&d.session, None).len(), 5);
    }

    #[tokio::test]
    async fn test_kitchen_flow_through_commands() {
        let d = test_dashboard().await;

        let response = update_order_item_status(
            &d.session,
            &d.db,
            "101".into(),
            "oi2".into(),
            ItemStatus::Ready,
        )
        .await
        .unwrap();
        assert!(response.item_found);
        assert!(response.order_advanced);
        assert_eq!(response.order.status, OrderStatus::Ready);
        assert!(kitchen_queue(&d.session).iter().all(|t| t.order_id != "101"));

        let missing = update_order_item_status(
            &d.session,
            &d.db,
            "102".into(),
            "nope".into(),
            ItemStatus::Ready,
        )
        .await
        .unwrap();
        assert!(!missing.item_found);
        assert_eq!(missing.order.status, OrderStatus::Preparing);
    }

    #[tokio::test]
    async fn test_order_pad_quantities_are_parsed() {
        let d = test_dashboard().await;

        for bad in ["two", "0", "1000", ""] {
            let err = create_order_form(&d.session, &d.db, pad("6", bad)).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationError, "quantity {:?}", bad);
        }
        assert_eq!(list_orders(&d.session, None).len(), 5);

        let order = create_order_form(&d.session, &d.db, pad("6", " 2 ")).await.unwrap();
        assert_eq!(order.items[0].quantity, 2);
        assert_eq!(order.subtotal_cents, 5798);
        assert_eq!(order.items[0].special_instructions.as_deref(), Some("no dill"));
    }

    #[tokio::test]
    async fn test_pending_order_is_not_started_by_kitchen() {
        let d = test_dashboard().await;
        let order = create_order(
            &d.session,
            &d.db,
            NewOrder {
                table_id: "10".into(),
                lines: vec![OrderLine::new("11", 1)],
                served_by: "4".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let err = update_order_item_status(
            &d.session,
            &d.db,
            order.id.clone(),
            order.items[0].id.clone(),
            ItemStatus::Ready,
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);

        update_order_status(&d.session, &d.db, order.id.clone(), OrderStatus::Confirmed)
            .await
            .unwrap();
        let preparing = update_order_status(&d.session, &d.db, order.id, OrderStatus::Preparing)
            .await
            .unwrap();
        assert_eq!(preparing.status, OrderStatus::Preparing);
        assert_eq!(preparing.items[0].status, ItemStatus::Pending);
    }

    #[tokio::test]
    async fn test_list_and_filter() {
        let d = test_dashboard().await;
        let all = list_orders(&d.session, None);
        assert_eq!(all[0].id, "105");

        let preparing = list_orders(&d.session, Some(OrderStatus::Preparing));
        assert_eq!(preparing.len(), 2);

        assert_eq!(my_active_orders(&d.session, "4").len(), 3);
        assert_eq!(get_order(&d.session, "999").unwrap_err().code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_delete_frees_table() {
        let d = test_dashboard().await;
        delete_order(&d.session, &d.db, "103".into()).await.unwrap();
        let table = list_tables(&d.session).into_iter().find(|t| t.id == "9").unwrap();
        assert_eq!(table.status, TableStatus::Available);
        assert!(table.current_order_id.is_none());
    }
}
