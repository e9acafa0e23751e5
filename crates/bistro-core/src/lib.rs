//! # bistro-core: Restaurant Operations Logic
//!
//! The entity store, the order lifecycle engine and the dashboard figures
//! for a single restaurant. No database, no network, no files.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bistro Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Role dashboards (admin, kitchen, waiter, ...)      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ commands                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  apps/dashboard (session)                       │   │
//! │  │    login, create_order, settle_payment, dashboard_summary ...   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bistro-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   store   │  │transition │  │ analytics │  │   │
//! │  │   │  Order    │  │  engine   │  │  table    │  │  figures  │  │   │
//! │  │   │  Table    │  │  catalog  │  │           │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   money • validation • clock • draft • fixtures                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │ StoreSnapshot                          │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 bistro-db (snapshot mirror)                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities (User, MenuItem, Table, Order, ...)
//! - [`money`] - Integer-cent amounts
//! - [`store`] - The entity store and every mutation
//! - [`transition`] - Which order status may follow which
//! - [`analytics`] - Derived dashboard figures
//! - [`fixtures`] - The demo restaurant a fresh session starts from
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use bistro_core::{FixedClock, NewOrder, OrderLine, OrderStatus, Store};
//! use chrono::{TimeZone, Utc};
//!
//! let clock = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 18, 0, 0).unwrap()));
//! let mut store = Store::seeded(clock);
//!
//! let order = store
//!     .create_order(NewOrder {
//!         table_id: "6".to_string(),
//!         lines: vec![OrderLine::new("11", 2)],
//!         served_by: "4".to_string(),
//!         ..Default::default()
//!     })
//!     .unwrap();
//!
//! // $6.99 × 2 = $13.98, 8% tax = $1.12
//! assert_eq!(order.total_cents, 1510);
//! assert_eq!(order.status, OrderStatus::Pending);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod analytics;
pub mod clock;
pub mod draft;
pub mod error;
pub mod fixtures;
pub mod money;
pub mod store;
pub mod transition;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use clock::{Clock, FixedClock, SystemClock};
pub use draft::*;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use store::{ItemUpdate, Store, StoreSnapshot};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Key under which the session snapshot is persisted.
pub const STORE_NAME: &str = "restaurant-store";

/// 8% sales tax.
pub const DEFAULT_TAX_RATE_BPS: u32 = 800;

/// Oldest notifications are dropped past this many.
pub const MAX_NOTIFICATIONS: usize = 50;

/// Maximum quantity on a single order line.
///
/// Catches a slipped finger (1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum lines on one order.
pub const MAX_ORDER_LINES: usize = 100;

/// Largest single amount accepted from input ($100,000,000.00).
///
/// Keeps every check total, tip and tender far away from `i64` overflow.
pub const MAX_AMOUNT_CENTS: i64 = 10_000_000_000;
