//! # State Module
//!
//! One state type per concern; each command takes only the ones it needs.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐              │
//! │  │ SessionState │  │   DbState    │  │ DashboardConfig  │              │
//! │  │              │  │              │  │                  │              │
//! │  │  Arc<Mutex<  │  │  Database    │  │  tax rate        │              │
//! │  │    Store     │  │  (SQLite     │  │  currency        │              │
//! │  │  >>          │  │   pool)      │  │  utc offset      │              │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘              │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • SessionState: Mutex, never held across .await                       │
//! │  • DbState: pool is internally synchronized                            │
//! │  • DashboardConfig: read-only after load                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;
mod session;

pub use config::{ConfigError, DashboardConfig};
pub use db::DbState;
pub use session::SessionState;

/// Everything a running dashboard holds.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub session: SessionState,
    pub db: DbState,
    pub config: DashboardConfig,
}
