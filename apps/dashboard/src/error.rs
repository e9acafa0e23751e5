//! # API Error Type
//!
//! Unified error type for dashboard commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Bistro                                 │
//! │                                                                         │
//! │  View                        Rust Backend                               │
//! │  ────                        ────────────                               │
//! │                                                                         │
//! │  create_order(...)                                                      │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function  →  Result<T, ApiError>                        │  │
//! │  │                                                                  │  │
//! │  │  CoreError::TableUnavailable ──────────┐                         │  │
//! │  │  CoreError::Validation(..) ────────────┼──► ApiError { code, .. }│  │
//! │  │  DbError::ConnectionFailed ────────────┘                         │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  { "code": "BUSINESS_LOGIC",                                            │
//! │    "message": "Table 7 is Cleaning and cannot take a new order" }       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use bistro_core::{CoreError, ValidationError};
use bistro_db::DbError;
use serde::Serialize;

/// API error returned from commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Order not found: 999"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Sign-in rejected (401)
    Unauthorized,

    /// Lifecycle rule violated (422)
    BusinessLogic,

    /// Payment could not be taken or refunded
    PaymentError,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::CorruptSnapshot(e) => {
                tracing::error!("Stored snapshot unreadable: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Saved session could not be read")
            }
            DbError::SchemaMismatch { found, expected } => ApiError::new(
                ErrorCode::DatabaseError,
                format!("Saved session uses schema {} (expected {})", found, expected),
            ),
            DbError::StaleSnapshot { revision, stored } => ApiError::new(
                ErrorCode::DatabaseError,
                format!("Session revision {} is older than the saved revision {}", revision, stored),
            ),
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::OrderNotFound(_)
            | CoreError::TableNotFound(_)
            | CoreError::MenuItemNotFound(_)
            | CoreError::UserNotFound(_)
            | CoreError::InventoryItemNotFound(_)
            | CoreError::ReservationNotFound(_)
            | CoreError::NotificationNotFound(_) => ErrorCode::NotFound,

            CoreError::LoginRejected { .. } => ErrorCode::Unauthorized,

            CoreError::InvalidOrderTransition { .. }
            | CoreError::InvalidItemTransition { .. }
            | CoreError::OrderClosed { .. }
            | CoreError::OrderNotStarted { .. }
            | CoreError::TableUnavailable { .. }
            | CoreError::TableOccupancyProtected { .. }
            | CoreError::MenuItemUnavailable { .. }
            | CoreError::NotServed { .. } => ErrorCode::BusinessLogic,

            CoreError::PaymentOutstanding { .. }
            | CoreError::PaymentAlreadySettled { .. }
            | CoreError::InsufficientTender { .. } => ErrorCode::PaymentError,

            CoreError::InvalidDiscount { .. } | CoreError::Validation(_) => {
                ErrorCode::ValidationError
            }
        };

        ApiError::new(code, err.to_string())
    }
}

/// Form parsing happens before the store is touched.
impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        CoreError::from(err).into()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
