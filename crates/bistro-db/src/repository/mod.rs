//! # Repository Module
//!
//! Database access behind a small typed API.
//!
//! ```text
//! Dashboard command
//!      │  db.snapshots().save("restaurant-store", &snapshot)
//!      ▼
//! SnapshotRepository
//! ├── save(&self, name, snapshot)
//! ├── load(&self, name)
//! ├── exists(&self, name)
//! └── delete(&self, name)
//!      │  SQL
//!      ▼
//! store_snapshots
//! ```
//!
//! ## Available Repositories
//!
//! - [`snapshot::SnapshotRepository`] - Whole-store snapshots keyed by name

pub mod snapshot;
