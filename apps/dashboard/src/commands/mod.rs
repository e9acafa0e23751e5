//! # Commands Module
//!
//! Everything the role dashboards call.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── auth.rs      ◄─── login, logout, current session
//! ├── orders.rs    ◄─── order lifecycle, floor plan, kitchen queue
//! ├── payments.rs  ◄─── cashier queue, settle, refund
//! ├── catalog.rs   ◄─── staff, menu, tables, stock, bookings, notifications
//! └── analytics.rs ◄─── dashboard figures
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  async fn create_order(                                                 │
//! │      session: &SessionState,   ◄── the live store                      │
//! │      db: &DbState,             ◄── snapshot mirror                     │
//! │      draft: NewOrder,          ◄── from the view                       │
//! │  ) -> Result<Order, ApiError>                                           │
//! │                                                                         │
//! │  1. session.mutate(..)   lock, run, snapshot, unlock                    │
//! │  2. db.mirror(..).await  persist the snapshot                           │
//! │  3. return the entity    serialized for the view                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reads are synchronous: they lock, copy out and unlock.

pub mod analytics;
pub mod auth;
pub mod catalog;
pub mod orders;
pub mod payments;
