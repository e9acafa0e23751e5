//! # Seed Data
//!
//! The demo restaurant every fresh session starts from: 6 staff, 12 menu
//! items, 12 tables, 5 orders in various states, 10 inventory lines and
//! 5 reservations.
//!
//! Order and reservation times are relative to `now` so the dashboards
//! always open on a lively evening. Staff and stock dates are fixed.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::store::StoreSnapshot;
use crate::types::{
    InventoryItem, ItemStatus, MenuCategory, MenuItem, Order, OrderItem, OrderStatus,
    PaymentMethod, PaymentStatus, Reservation, ReservationStatus, Table, TableStatus, User,
    UserRole,
};

/// Builds the seed snapshot as of `now`.
pub fn seed(now: DateTime<Utc>) -> StoreSnapshot {
    let menu_items = menu();
    let orders = orders(&menu_items, now);

    StoreSnapshot {
        users: users(),
        menu_items,
        tables: tables(),
        orders,
        inventory: inventory(),
        reservations: reservations(now),
        notifications: Vec::new(),
        current_user: None,
        revision: 0,
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

fn midnight(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date(y, m, d).and_time(NaiveTime::default()))
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

// =============================================================================
// Staff
// =============================================================================

fn users() -> Vec<User> {
    let user = |id: &str, name: &str, email: &str, role: UserRole, joined: DateTime<Utc>, phone: &str| User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        role,
        avatar: None,
        phone: Some(phone.to_string()),
        is_active: true,
        created_at: joined,
    };

    vec![
        user("1", "Admin User", "admin@restaurant.com", UserRole::Admin, midnight(2024, 1, 1), "+1 555-0101"),
        user("2", "John Manager", "manager@restaurant.com", UserRole::Manager, midnight(2024, 1, 15), "+1 555-0102"),
        user("3", "Chef Mario", "chef@restaurant.com", UserRole::Chef, midnight(2024, 2, 1), "+1 555-0103"),
        user("4", "Sarah Waiter", "waiter@restaurant.com", UserRole::Waiter, midnight(2024, 2, 15), "+1 555-0104"),
        user("5", "Mike Cashier", "cashier@restaurant.com", UserRole::Cashier, midnight(2024, 3, 1), "+1 555-0105"),
        user("6", "Lisa Waiter", "lisa@restaurant.com", UserRole::Waiter, midnight(2024, 3, 15), "+1 555-0106"),
    ]
}

// =============================================================================
// Menu
// =============================================================================

fn menu() -> Vec<MenuItem> {
    let item = |id: &str,
                name: &str,
                description: &str,
                price_cents: i64,
                category: MenuCategory,
                preparation_minutes: u32,
                ingredients: &[&str],
                calories: u32| MenuItem {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        price_cents,
        category,
        image: None,
        is_available: true,
        preparation_minutes,
        ingredients: strings(ingredients),
        calories: Some(calories),
    };

    use MenuCategory::*;
    vec![
        item("1", "Caesar Salad", "Fresh romaine lettuce with parmesan, croutons, and Caesar dressing", 1299, Salad, 10, &["romaine", "parmesan", "croutons", "caesar dressing"], 350),
        item("2", "Bruschetta", "Grilled bread topped with tomatoes, garlic, and fresh basil", 999, Appetizer, 8, &["bread", "tomatoes", "garlic", "basil", "olive oil"], 280),
        item("3", "Grilled Salmon", "Fresh Atlantic salmon with lemon butter sauce and seasonal vegetables", 2899, MainCourse, 20, &["salmon", "butter", "lemon", "vegetables"], 520),
        item("4", "Ribeye Steak", "12oz prime ribeye with mashed potatoes and asparagus", 4299, MainCourse, 25, &["ribeye", "potatoes", "asparagus", "butter"], 850),
        item("5", "Chicken Alfredo", "Fettuccine pasta with creamy Alfredo sauce and grilled chicken", 2299, MainCourse, 18, &["pasta", "chicken", "cream", "parmesan", "butter"], 720),
        item("6", "Chocolate Lava Cake", "Warm chocolate cake with molten center and vanilla ice cream", 1099, Dessert, 12, &["chocolate", "flour", "eggs", "butter", "ice cream"], 450),
        item("7", "Tiramisu", "Classic Italian dessert with espresso-soaked ladyfingers", 999, Dessert, 5, &["mascarpone", "espresso", "ladyfingers", "cocoa"], 380),
        item("8", "Fresh Orange Juice", "Freshly squeezed orange juice", 699, Beverage, 3, &["oranges"], 120),
        item("9", "House Red Wine", "Premium Cabernet Sauvignon", 1299, Beverage, 1, &["wine"], 125),
        item("10", "Tomato Soup", "Creamy tomato soup with fresh basil", 899, Soup, 10, &["tomatoes", "cream", "basil", "onions"], 220),
        item("11", "Garlic Bread", "Toasted bread with garlic butter and herbs", 699, Appetizer, 7, &["bread", "garlic", "butter", "herbs"], 320),
        item("12", "Greek Salad", "Fresh cucumbers, tomatoes, olives, and feta cheese", 1399, Salad, 8, &["cucumbers", "tomatoes", "olives", "feta", "onions"], 290),
    ]
}

// =============================================================================
// Floor Plan
// =============================================================================

fn tables() -> Vec<Table> {
    let table = |number: u32, capacity: u32, status: TableStatus, order: Option<&str>, location: &str| Table {
        id: number.to_string(),
        number,
        capacity,
        status,
        current_order_id: order.map(str::to_string),
        location: location.to_string(),
    };

    use TableStatus::*;
    vec![
        table(1, 2, Available, None, "Main Floor"),
        table(2, 2, Occupied, Some("101"), "Main Floor"),
        table(3, 4, Available, None, "Main Floor"),
        table(4, 4, Occupied, Some("102"), "Main Floor"),
        table(5, 6, Reserved, None, "Main Floor"),
        table(6, 6, Available, None, "Patio"),
        table(7, 4, Cleaning, None, "Patio"),
        table(8, 8, Available, None, "Private Room"),
        table(9, 2, Occupied, Some("103"), "Bar Area"),
        table(10, 4, Available, None, "Bar Area"),
        table(11, 4, Available, None, "Main Floor"),
        table(12, 2, Reserved, None, "Patio"),
    ]
}

// =============================================================================
// Orders
// =============================================================================

struct SeedOrder<'a> {
    id: &'a str,
    table_id: &'a str,
    lines: &'a [(&'a str, &'a str, i64, ItemStatus)],
    status: OrderStatus,
    tax_cents: i64,
    discount_cents: i64,
    created_minutes_ago: i64,
    updated_minutes_ago: i64,
    served_by: &'a str,
}

fn build_order(menu: &[MenuItem], now: DateTime<Utc>, seed: SeedOrder<'_>) -> Order {
    let items: Vec<OrderItem> = seed
        .lines
        .iter()
        .map(|(item_id, menu_id, quantity, status)| {
            let (name, price) = menu
                .iter()
                .find(|m| m.id == *menu_id)
                .map(|m| (m.name.clone(), m.price_cents))
                .unwrap_or_default();
            OrderItem {
                id: item_id.to_string(),
                menu_item_id: menu_id.to_string(),
                name,
                quantity: *quantity,
                unit_price_cents: price,
                special_instructions: None,
                status: *status,
            }
        })
        .collect();

    let subtotal_cents: i64 = items.iter().map(|i| i.line_total().cents()).sum();

    Order {
        id: seed.id.to_string(),
        table_id: seed.table_id.to_string(),
        items,
        status: seed.status,
        payment_status: PaymentStatus::Pending,
        payment_method: None,
        subtotal_cents,
        tax_cents: seed.tax_cents,
        discount_cents: seed.discount_cents,
        total_cents: subtotal_cents + seed.tax_cents - seed.discount_cents,
        tip_cents: None,
        created_at: now - Duration::minutes(seed.created_minutes_ago),
        updated_at: now - Duration::minutes(seed.updated_minutes_ago),
        served_by: seed.served_by.to_string(),
        notes: None,
    }
}

fn orders(menu: &[MenuItem], now: DateTime<Utc>) -> Vec<Order> {
    use ItemStatus::{Pending, Preparing, Ready};

    let mut settled = build_order(menu, now, SeedOrder {
        id: "104",
        table_id: "1",
        lines: &[("oi9", "10", 2, Ready), ("oi10", "7", 1, Ready)],
        status: OrderStatus::Completed,
        tax_cents: 224,
        discount_cents: 0,
        created_minutes_ago: 120,
        updated_minutes_ago: 90,
        served_by: "6",
    });
    settled.payment_status = PaymentStatus::Paid;
    settled.payment_method = Some(PaymentMethod::Card);
    settled.tip_cents = Some(500);

    vec![
        build_order(menu, now, SeedOrder {
            id: "101",
            table_id: "2",
            lines: &[("oi1", "2", 1, Ready), ("oi2", "3", 2, Preparing)],
            status: OrderStatus::Preparing,
            tax_cents: 544,
            discount_cents: 0,
            created_minutes_ago: 30,
            updated_minutes_ago: 15,
            served_by: "4",
        }),
        build_order(menu, now, SeedOrder {
            id: "102",
            table_id: "4",
            lines: &[("oi3", "1", 1, Ready), ("oi4", "4", 1, Preparing), ("oi5", "6", 2, Pending)],
            status: OrderStatus::Preparing,
            tax_cents: 624,
            discount_cents: 500,
            created_minutes_ago: 45,
            updated_minutes_ago: 20,
            served_by: "6",
        }),
        build_order(menu, now, SeedOrder {
            id: "103",
            table_id: "9",
            lines: &[("oi6", "11", 1, Ready), ("oi7", "5", 1, Ready), ("oi8", "8", 2, Ready)],
            status: OrderStatus::Ready,
            tax_cents: 352,
            discount_cents: 0,
            created_minutes_ago: 25,
            updated_minutes_ago: 5,
            served_by: "4",
        }),
        settled,
        build_order(menu, now, SeedOrder {
            id: "105",
            table_id: "3",
            lines: &[("oi11", "12", 1, Pending), ("oi12", "9", 1, Pending)],
            status: OrderStatus::Pending,
            tax_cents: 216,
            discount_cents: 0,
            created_minutes_ago: 5,
            updated_minutes_ago: 5,
            served_by: "4",
        }),
    ]
}

// =============================================================================
// Inventory
// =============================================================================

fn inventory() -> Vec<InventoryItem> {
    let stock = |id: &str,
                 name: &str,
                 category: &str,
                 quantity: f64,
                 unit: &str,
                 (min_stock, max_stock): (f64, f64),
                 cost_per_unit_cents: i64,
                 supplier: &str,
                 restocked: NaiveDate,
                 expiry: Option<NaiveDate>| InventoryItem {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        quantity,
        unit: unit.to_string(),
        min_stock,
        max_stock,
        cost_per_unit_cents,
        supplier: Some(supplier.to_string()),
        last_restocked: Some(restocked),
        expiry_date: expiry,
    };

    vec![
        stock("1", "Chicken Breast", "Meat", 25.0, "kg", (10.0, 50.0), 850, "Premium Meats Co.", date(2024, 1, 15), None),
        stock("2", "Salmon Fillet", "Seafood", 12.0, "kg", (8.0, 30.0), 1899, "Ocean Fresh", date(2024, 1, 14), None),
        stock("3", "Ribeye Steak", "Meat", 18.0, "kg", (10.0, 40.0), 2450, "Premium Meats Co.", date(2024, 1, 15), None),
        stock("4", "Romaine Lettuce", "Vegetables", 15.0, "heads", (10.0, 50.0), 250, "Green Farms", date(2024, 1, 16), None),
        stock("5", "Tomatoes", "Vegetables", 8.0, "kg", (10.0, 40.0), 399, "Green Farms", date(2024, 1, 14), None),
        stock("6", "Heavy Cream", "Dairy", 20.0, "L", (10.0, 50.0), 450, "Dairy Best", date(2024, 1, 15), Some(date(2024, 2, 15))),
        stock("7", "Parmesan Cheese", "Dairy", 5.0, "kg", (3.0, 20.0), 2299, "Dairy Best", date(2024, 1, 10), Some(date(2024, 3, 10))),
        stock("8", "Pasta", "Dry Goods", 30.0, "kg", (15.0, 60.0), 299, "Italian Imports", date(2024, 1, 12), None),
        stock("9", "Olive Oil", "Oils", 12.0, "L", (10.0, 40.0), 1250, "Mediterranean Goods", date(2024, 1, 8), None),
        stock("10", "Chocolate", "Baking", 6.0, "kg", (5.0, 25.0), 1599, "Sweet Supplies", date(2024, 1, 13), Some(date(2024, 6, 13))),
    ]
}

// =============================================================================
// Reservations
// =============================================================================

fn reservations(now: DateTime<Utc>) -> Vec<Reservation> {
    let today = now.date_naive();
    let tomorrow = today + Duration::days(1);
    let yesterday = today - Duration::days(1);

    let booking = |id: &str,
                   name: &str,
                   phone: &str,
                   party_size: u32,
                   date: NaiveDate,
                   time: &str,
                   status: ReservationStatus,
                   requests: Option<&str>,
                   table_id: Option<&str>| Reservation {
        id: id.to_string(),
        customer_name: name.to_string(),
        customer_phone: phone.to_string(),
        customer_email: None,
        table_id: table_id.map(str::to_string),
        party_size,
        date,
        time: time.to_string(),
        status,
        special_requests: requests.map(str::to_string),
        created_at: now,
    };

    use ReservationStatus::{Completed, Confirmed};
    vec![
        booking("1", "Robert Johnson", "+1 555-0201", 4, today, "19:00", Confirmed, Some("Window table preferred"), None),
        booking("2", "Emily Davis", "+1 555-0202", 2, today, "20:00", Confirmed, None, None),
        booking("3", "Michael Brown", "+1 555-0203", 6, tomorrow, "18:30", Confirmed, Some("Birthday celebration"), None),
        booking("4", "Sarah Wilson", "+1 555-0204", 8, tomorrow, "19:30", Confirmed, None, Some("8")),
        booking("5", "David Lee", "+1 555-0205", 3, yesterday, "19:00", Completed, None, None),
    ]
}

// =============================================================================
// Unit Tests
// =============================================================================
