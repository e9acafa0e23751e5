//! # Bistro Dashboard Library
//!
//! Session bootstrap and role commands for the restaurant dashboards.
//!
//! ## Module Organization
//! ```text
//! bistro_dashboard/
//! ├── lib.rs          ◄─── You are here (logging & bootstrap)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports, Dashboard bundle
//! │   ├── session.rs  ◄─── Mutex-guarded store
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   └── config.rs   ◄─── Layered configuration
//! ├── commands/
//! │   ├── auth.rs     ◄─── login / logout
//! │   ├── orders.rs   ◄─── order lifecycle, tables, kitchen
//! │   ├── payments.rs ◄─── settle / refund
//! │   ├── catalog.rs  ◄─── staff, menu, stock, bookings, notifications
//! │   └── analytics.rs◄─── dashboard figures
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod error;
pub mod state;

use std::sync::Arc;

use bistro_core::{Clock, Store, SystemClock};
use bistro_db::{Database, DbConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::ApiError;
use crate::state::{Dashboard, DashboardConfig, DbState, SessionState};

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=bistro_core=trace` - Trace the order engine only
/// - Default: `info,bistro=debug,sqlx=warn`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,bistro=debug,sqlx=warn"));

    // A second call (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Opens the configured database and restores the session.
pub async fn bootstrap(config: DashboardConfig) -> Result<Dashboard, ApiError> {
    if let Some(parent) = config.database_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ApiError::internal(format!("Could not create {}: {}", parent.display(), e))
            })?;
        }
    }
    let db_config = DbConfig::new(&config.database_path);
    bootstrap_with(config, db_config, Arc::new(SystemClock)).await
}

/// Startup with an explicit database and clock.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Connect to Database ─── SQLite, migrations applied                  │
/// │                                                                         │
/// │  2. Restore Session                                                     │
/// │     • snapshot found    → rehydrate                                     │
/// │     • nothing saved     → seed fixtures, save                           │
/// │     • unreadable        → warn, seed fixtures, save over it             │
/// │                                                                         │
/// │  3. Apply configured tax rate, check table occupancy                    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn bootstrap_with(
    config: DashboardConfig,
    db_config: DbConfig,
    clock: Arc<dyn Clock>,
) -> Result<Dashboard, ApiError> {
    let db = DbState::new(Database::new(db_config).await?);
    info!("Database connected and migrations applied");

    let restored = match db.inner().snapshots().load(bistro_core::STORE_NAME).await {
        Ok(Some(snapshot)) => {
            info!(orders = snapshot.orders.len(), "Session restored from snapshot");
            Some(Store::from_snapshot(snapshot, clock.clone()))
        }
        Ok(None) => {
            info!("No saved session; seeding demo restaurant");
            None
        }
        Err(e) => {
            warn!(error = %e, "Saved session unreadable; seeding demo restaurant");
            None
        }
    };

    let fresh = restored.is_none();
    let mut store = restored
        .unwrap_or_else(|| Store::seeded(clock))
        .with_tax_rate(config.tax_rate());

    for issue in store.occupancy_issues() {
        warn!(issue = %issue, "Table occupancy inconsistent");
    }

    if fresh {
        // An unreadable row may still carry a revision
        store.set_revision(db.next_revision().await?);
        db.save(&store.snapshot()).await?;
    }

    info!(restaurant = %config.restaurant_name, "Dashboard ready");
    Ok(Dashboard {
        session: SessionState::new(store),
        db,
        config,
    })
}
