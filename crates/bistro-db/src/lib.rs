//! # bistro-db: Persistence Mirror for Bistro
//!
//! Keeps a copy of the in-memory store in SQLite so the next session can
//! pick up where the last one stopped.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bistro Data Flow                                 │
//! │                                                                         │
//! │  Dashboard command (create_order)                                      │
//! │       │ mutates Store, clones StoreSnapshot                             │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     bistro-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐  ┌─────────────┐ │   │
//! │  │   │   Database    │    │ SnapshotRepository │  │ Migrations  │ │   │
//! │  │   │   (pool.rs)   │◄───│  save / load       │  │ (embedded)  │ │   │
//! │  │   └───────────────┘    └────────────────────┘  └─────────────┘ │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  store_snapshots table: "restaurant-store" → JSON payload               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The mirror is a cache. The live store is the source of truth while the
//! session runs; a snapshot that cannot be read is reported, not repaired.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bistro_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("bistro.db")).await?;
//! db.snapshots().save(STORE_NAME, &store.snapshot()).await?;
//! let restored = db.snapshots().load(STORE_NAME).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::snapshot::{SavedSnapshot, SnapshotRepository, SNAPSHOT_SCHEMA_VERSION};
