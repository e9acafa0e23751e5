//! # Bistro Dashboard Entry Point
//!
//! Opens the configured store and prints one view as JSON.
//!
//! ## Usage
//! ```bash
//! cargo run -p bistro-dashboard                 # admin overview
//! cargo run -p bistro-dashboard -- orders       # every order, newest first
//! cargo run -p bistro-dashboard -- kitchen      # open kitchen tickets
//! cargo run -p bistro-dashboard -- payments     # cashier queue
//! cargo run -p bistro-dashboard -- reset        # back to the demo restaurant
//! ```
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Load configuration (file, then `BISTRO_*` environment)
//! 3. Connect to database & run migrations
//! 4. Restore or seed the session
//! 5. Run the requested view

use std::env;
use std::sync::Arc;

use bistro_core::{Store, SystemClock};
use bistro_dashboard::commands::{analytics, orders, payments};
use bistro_dashboard::state::DashboardConfig;
use bistro_dashboard::{bootstrap, init_tracing};
use serde::Serialize;

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let view = env::args().nth(1).unwrap_or_else(|| "summary".to_string());
    if view == "--help" || view == "-h" {
        println!("Bistro Dashboard");
        println!();
        println!("Usage: bistro-dashboard [VIEW]");
        println!();
        println!("Views:");
        println!("  summary    Admin overview (default)");
        println!("  orders     All orders, newest first");
        println!("  kitchen    Open kitchen tickets");
        println!("  payments   Orders awaiting payment");
        println!("  reset      Replace the session with the demo restaurant");
        return Ok(());
    }

    let config = DashboardConfig::load()?;
    let dashboard = bootstrap(config).await?;

    match view.as_str() {
        "summary" => print_json(&analytics::analytics_report(&dashboard.session, &dashboard.config))?,
        "orders" => print_json(&orders::list_orders(&dashboard.session, None))?,
        "kitchen" => print_json(&orders::kitchen_queue(&dashboard.session))?,
        "payments" => print_json(&payments::payment_queue(&dashboard.session))?,
        "reset" => {
            let store = Store::seeded(Arc::new(SystemClock)).with_tax_rate(dashboard.config.tax_rate());
            let snapshot = dashboard.session.replace(store);
            let saved = dashboard.db.save(&snapshot).await?;
            println!("✓ Session reset ({} bytes saved)", saved.payload_bytes);
        }
        other => {
            eprintln!("Unknown view '{}'. Try --help.", other);
            std::process::exit(2);
        }
    }

    dashboard.db.inner().close().await;
    Ok(())
}
