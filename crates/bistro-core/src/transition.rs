//! # Lifecycle Transition Table
//!
//! Which status changes are legal, for orders and for their items.
//!
//! ## Order Statuses
//! ```text
//! ┌──────────────┬────────────────────────────────────────────────┐
//! │ target       │ allowed from                                   │
//! ├──────────────┼────────────────────────────────────────────────┤
//! │ confirmed    │ pending                                        │
//! │ preparing    │ confirmed                                      │
//! │ ready        │ preparing                                      │
//! │ served       │ ready                                          │
//! │ completed    │ served                                         │
//! │ cancelled    │ pending, confirmed, preparing, ready, served   │
//! │ pending      │ (never, only by creation)                      │
//! └──────────────┴────────────────────────────────────────────────┘
//! ```
//!
//! Re-applying the current status is not a transition and is rejected.
//!
//! ## Item Statuses
//! Items only move forward, `pending → preparing → ready`, and may skip
//! `preparing`. Re-applying the current status is accepted as a no-op so
//! a double-tapped "ready" button does not error.

use crate::error::{CoreError, CoreResult};
use crate::types::{ItemStatus, OrderStatus};

/// The states an order may be in immediately before entering `target`.
pub fn allowed_predecessors(target: OrderStatus) -> &'static [OrderStatus] {
    use OrderStatus::*;

    match target {
        Pending => &[],
        Confirmed => &[Pending],
        Preparing => &[Confirmed],
        Ready => &[Preparing],
        Served => &[Ready],
        Completed => &[Served],
        Cancelled => &[Pending, Confirmed, Preparing, Ready, Served],
    }
}

pub fn can_transition(from: OrderStatus, to: OrderStatus) -> bool {
    allowed_predecessors(to).contains(&from)
}

/// The next step on the happy path, if any. Views use it for the single
/// "advance" button on an order card.
pub fn next_status(current: OrderStatus) -> Option<OrderStatus> {
    use OrderStatus::*;

    match current {
        Pending => Some(Confirmed),
        Confirmed => Some(Preparing),
        Preparing => Some(Ready),
        Ready => Some(Served),
        Served => Some(Completed),
        Completed | Cancelled => None,
    }
}

/// Fails with `InvalidOrderTransition` unless `from → to` is in the table.
pub fn check_order_transition(order_id: &str, from: OrderStatus, to: OrderStatus) -> CoreResult<()> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(CoreError::InvalidOrderTransition {
            order_id: order_id.to_string(),
            from,
            to,
        })
    }
}

/// Fails with `InvalidItemTransition` if `to` is behind `from`.
pub fn check_item_transition(item_id: &str, from: ItemStatus, to: ItemStatus) -> CoreResult<()> {
    if to >= from {
        Ok(())
    } else {
        Err(CoreError::InvalidItemTransition {
            item_id: item_id.to_string(),
            from,
            to,
        })
    }
}
