//! # Error Types
//!
//! Domain-specific error types for bistro-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bistro-core errors (this file)                                        │
//! │  ├── CoreError        - Lookup failures and lifecycle rule violations  │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  bistro-db errors (separate crate)                                     │
//! │  └── DbError          - Snapshot persistence failures                  │
//! │                                                                         │
//! │  Dashboard API errors (in app)                                         │
//! │  └── ApiError         - What the views see (serialized)                │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Views        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every failed store operation leaves the store untouched: operations
//! validate everything first and only then mutate.

use thiserror::Error;

use crate::types::{ItemStatus, OrderStatus, PaymentStatus, TableStatus};

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent unknown identifiers or violations of the order
/// lifecycle. They are translated to user-facing messages by the app layer.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Menu item not found: {0}")]
    MenuItemNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Inventory item not found: {0}")]
    InventoryItemNotFound(String),

    #[error("Reservation not found: {0}")]
    ReservationNotFound(String),

    #[error("Notification not found: {0}")]
    NotificationNotFound(String),

    /// No active staff member signs in with this email.
    #[error("No active account for {email}")]
    LoginRejected { email: String },

    /// The requested order status is not reachable from the current one.
    ///
    /// ## When This Occurs
    /// - Skipping a step (`pending` straight to `ready`)
    /// - Moving backwards (`served` to `preparing`)
    /// - Touching a terminal order (`completed`, `cancelled`)
    /// - Re-applying the current status
    #[error("Order {order_id} cannot move from {from:?} to {to:?}")]
    InvalidOrderTransition {
        order_id: String,
        from: OrderStatus,
        to: OrderStatus,
    },

    /// Item statuses only move forward: pending → preparing → ready.
    #[error("Item {item_id} cannot move from {from:?} to {to:?}")]
    InvalidItemTransition {
        item_id: String,
        from: ItemStatus,
        to: ItemStatus,
    },

    /// The order is completed or cancelled and accepts no further changes.
    #[error("Order {order_id} is {status:?} and can no longer change")]
    OrderClosed { order_id: String, status: OrderStatus },

    /// The kitchen tried to work an order the waiter has not confirmed yet.
    #[error("Order {order_id} has not been confirmed; the kitchen cannot start it yet")]
    OrderNotStarted { order_id: String },

    /// A new order was placed on a table that cannot seat it.
    ///
    /// ## User Workflow
    /// ```text
    /// Waiter picks table #7
    ///      │
    ///      ▼
    /// Table status: cleaning
    ///      │
    ///      ▼
    /// TableUnavailable { number: 7, status: Cleaning }
    ///      │
    ///      ▼
    /// View shows: "Table 7 is cleaning"
    /// ```
    #[error("Table {number} is {status:?} and cannot take a new order")]
    TableUnavailable { number: u32, status: TableStatus },

    /// Manual table edits may not claim or release occupancy.
    #[error("Table {number} occupancy is managed by its order")]
    TableOccupancyProtected { number: u32 },

    #[error("Menu item {name} is not available")]
    MenuItemUnavailable { name: String },

    /// Completing an order requires settled payment.
    #[error("Order {order_id} has payment {status:?}; settle it before completing")]
    PaymentOutstanding {
        order_id: String,
        status: PaymentStatus,
    },

    /// The cashier can only take payment once the order has been served.
    #[error("Order {order_id} is {status:?}; payment is taken after serving")]
    NotServed { order_id: String, status: OrderStatus },

    /// Payment was already taken (or refunded) for this order.
    #[error("Order {order_id} payment is already {status:?}")]
    PaymentAlreadySettled {
        order_id: String,
        status: PaymentStatus,
    },

    /// Cash tendered does not cover total plus tip.
    #[error("Insufficient cash: due {due_cents} cents, tendered {tendered_cents} cents")]
    InsufficientTender { due_cents: i64, tendered_cents: i64 },

    /// Discount would make the order total negative.
    #[error("Discount of {discount_cents} cents exceeds order amount of {max_cents} cents")]
    InvalidDiscount { discount_cents: i64, max_cents: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any store mutation happens.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (non-numeric amount, NaN quantity, bad time of day).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., a second user with the same email).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::TableUnavailable {
            number: 7,
            status: TableStatus::Cleaning,
        };
        assert_eq!(err.to_string(), "Table 7 is Cleaning and cannot take a new order");

        let err = CoreError::InsufficientTender {
            due_cents: 7841,
            tendered_cents: 5000,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient cash: due 7841 cents, tendered 5000 cents"
        );
    }

    #[test]
    fn test_transition_error_message() {
        let err = CoreError::InvalidOrderTransition {
            order_id: "101".to_string(),
            from: OrderStatus::Served,
            to: OrderStatus::Preparing,
        };
        assert_eq!(err.to_string(), "Order 101 cannot move from Served to Preparing");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "email".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
