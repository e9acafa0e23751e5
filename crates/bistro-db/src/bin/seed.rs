//! # Seed Data Writer
//!
//! Writes the demo restaurant into a database file so the dashboard opens
//! on a populated store.
//!
//! ## Usage
//! ```bash
//! cargo run -p bistro-db --bin seed
//!
//! # Specify database path
//! cargo run -p bistro-db --bin seed -- --db ./data/bistro.db
//!
//! # Replace an existing snapshot
//! cargo run -p bistro-db --bin seed -- --force
//! ```

use std::env;

use bistro_core::{Store, STORE_NAME};
use bistro_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./bistro_dev.db");
    let mut force = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--force" | "-f" => force = true,
            "--help" | "-h" => {
                println!("Bistro Seed Data Writer");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./bistro_dev.db)");
                println!("  -f, --force        Overwrite an existing snapshot");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Bistro Seed Data Writer");
    println!("=======================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let repo = db.snapshots();
    if repo.exists(STORE_NAME).await? && !force {
        println!("⚠ A '{}' snapshot already exists", STORE_NAME);
        println!("  Skipping seed to keep the current session.");
        println!("  Pass --force to replace it.");
        return Ok(());
    }

    let mut store = Store::with_system_clock();
    if let Some(stored) = repo.revision(STORE_NAME).await? {
        store.set_revision(u64::try_from(stored.saturating_add(1)).unwrap_or(0));
    }
    let snapshot = store.snapshot();
    let saved = repo.save(STORE_NAME, &snapshot).await?;

    println!();
    println!("✓ Wrote {} bytes", saved.payload_bytes);
    println!(
        "  {} users, {} menu items, {} tables, {} orders, {} inventory items, {} reservations",
        snapshot.users.len(),
        snapshot.menu_items.len(),
        snapshot.tables.len(),
        snapshot.orders.len(),
        snapshot.inventory.len(),
        snapshot.reservations.len(),
    );
    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}
