//! Create/update/delete for the records that have no lifecycle of their own:
//! staff, menu, tables, inventory, reservations and notifications.
//!
//! Table edits are the one place this file meets the order engine: a manual
//! edit can never claim or release occupancy.

use tracing::{debug, info};

use super::Store;
use crate::draft::{
    InventoryPatch, MenuItemPatch, NewInventoryItem, NewMenuItem, NewNotification,
    NewReservation, NewUser, ReservationPatch, TablePatch, UserPatch,
};
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{
    InventoryItem, MenuItem, Notification, Reservation, ReservationStatus, Table, TableStatus, User,
};
use crate::validation::{
    validate_amount_cents, validate_email, validate_positive_count, validate_stock_quantity,
    validate_text, validate_time_of_day,
};

const NAME_MAX: usize = 100;
const TEXT_MAX: usize = 500;

impl Store {
    // =========================================================================
    // Users
    // =========================================================================

    pub fn add_user(&mut self, draft: NewUser) -> CoreResult<User> {
        validate_text("name", &draft.name, NAME_MAX)?;
        validate_email(&draft.email)?;
        self.ensure_email_free(&draft.email, None)?;

        let user = User {
            id: Self::new_id(),
            name: draft.name.trim().to_string(),
            email: draft.email.trim().to_string(),
            role: draft.role,
            avatar: draft.avatar,
            phone: draft.phone,
            is_active: draft.is_active,
            created_at: self.clock.now(),
        };

        info!(user_id = %user.id, role = ?user.role, "User added");
        self.data.users.push(user.clone());
        Ok(user)
    }

    pub fn update_user(&mut self, id: &str, patch: UserPatch) -> CoreResult<User> {
        self.user(id)?;
        if let Some(name) = &patch.name {
            validate_text("name", name, NAME_MAX)?;
        }
        if let Some(email) = &patch.email {
            validate_email(email)?;
            self.ensure_email_free(email, Some(id))?;
        }

        let user = self
            .data
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| CoreError::UserNotFound(id.to_string()))?;

        if let Some(name) = patch.name {
            user.name = name.trim().to_string();
        }
        if let Some(email) = patch.email {
            user.email = email.trim().to_string();
        }
        if let Some(role) = patch.role {
            user.role = role;
        }
        if let Some(avatar) = patch.avatar {
            user.avatar = Some(avatar);
        }
        if let Some(phone) = patch.phone {
            user.phone = Some(phone);
        }
        if let Some(is_active) = patch.is_active {
            user.is_active = is_active;
        }
        let user = user.clone();

        // Keep the signed-in copy in step with the record
        if let Some(current) = &mut self.data.current_user {
            if current.id == user.id {
                *current = user.clone();
            }
        }

        debug!(user_id = %id, "User updated");
        Ok(user)
    }

    /// Removes a staff member. Orders they served keep the id.
    pub fn delete_user(&mut self, id: &str) -> CoreResult<User> {
        let index = self
            .data
            .users
            .iter()
            .position(|u| u.id == id)
            .ok_or_else(|| CoreError::UserNotFound(id.to_string()))?;
        let user = self.data.users.remove(index);

        if self.data.current_user.as_ref().map(|u| u.id.as_str()) == Some(id) {
            self.data.current_user = None;
        }

        info!(user_id = %id, "User deleted");
        Ok(user)
    }

    fn ensure_email_free(&self, email: &str, except_id: Option<&str>) -> CoreResult<()> {
        let email = email.trim();
        let taken = self
            .data
            .users
            .iter()
            .any(|u| Some(u.id.as_str()) != except_id && u.email.eq_ignore_ascii_case(email));

        if taken {
            return Err(ValidationError::Duplicate {
                field: "email".to_string(),
                value: email.to_string(),
            }
            .into());
        }
        Ok(())
    }

    // =========================================================================
    // Menu
    // =========================================================================

    pub fn add_menu_item(&mut self, draft: NewMenuItem) -> CoreResult<MenuItem> {
        validate_text("name", &draft.name, NAME_MAX)?;
        validate_amount_cents("price", draft.price_cents)?;

        let item = MenuItem {
            id: Self::new_id(),
            name: draft.name.trim().to_string(),
            description: draft.description,
            price_cents: draft.price_cents,
            category: draft.category,
            image: draft.image,
            is_available: draft.is_available,
            preparation_minutes: draft.preparation_minutes,
            ingredients: draft.ingredients,
            calories: draft.calories,
        };

        info!(menu_item_id = %item.id, name = %item.name, price = %item.price(), "Menu item added");
        self.data.menu_items.push(item.clone());
        Ok(item)
    }

    /// Edits a menu item. Existing orders keep the price they were taken at.
    pub fn update_menu_item(&mut self, id: &str, patch: MenuItemPatch) -> CoreResult<MenuItem> {
        if let Some(name) = &patch.name {
            validate_text("name", name, NAME_MAX)?;
        }
        if let Some(price) = patch.price_cents {
            validate_amount_cents("price", price)?;
        }

        let item = self
            .data
            .menu_items
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| CoreError::MenuItemNotFound(id.to_string()))?;

        if let Some(name) = patch.name {
            item.name = name.trim().to_string();
        }
        if let Some(description) = patch.description {
            item.description = description;
        }
        if let Some(price) = patch.price_cents {
            item.price_cents = price;
        }
        if let Some(category) = patch.category {
            item.category = category;
        }
        if let Some(image) = patch.image {
            item.image = Some(image);
        }
        if let Some(is_available) = patch.is_available {
            item.is_available = is_available;
        }
        if let Some(minutes) = patch.preparation_minutes {
            item.preparation_minutes = minutes;
        }
        if let Some(ingredients) = patch.ingredients {
            item.ingredients = ingredients;
        }
        if let Some(calories) = patch.calories {
            item.calories = Some(calories);
        }

        debug!(menu_item_id = %id, "Menu item updated");
        Ok(item.clone())
    }

    pub fn delete_menu_item(&mut self, id: &str) -> CoreResult<MenuItem> {
        let index = self
            .data
            .menu_items
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| CoreError::MenuItemNotFound(id.to_string()))?;

        info!(menu_item_id = %id, "Menu item deleted");
        Ok(self.data.menu_items.remove(index))
    }

    // =========================================================================
    // Tables
    // =========================================================================

    /// Manual table edit (floor plan changes, marking a table clean or
    /// reserved).
    ///
    /// ## Occupancy Guard
    /// ```text
    /// patch.status = occupied           ──► TableOccupancyProtected
    /// table occupied, patch.status = *  ──► TableOccupancyProtected
    /// table occupied, capacity/location ──► allowed
    /// ```
    pub fn update_table(&mut self, id: &str, patch: TablePatch) -> CoreResult<Table> {
        let table = self.table(id)?;

        if let Some(status) = patch.status {
            if status == TableStatus::Occupied || table.status == TableStatus::Occupied {
                return Err(CoreError::TableOccupancyProtected { number: table.number });
            }
        }
        if let Some(capacity) = patch.capacity {
            validate_positive_count("capacity", capacity)?;
        }
        if let Some(number) = patch.number {
            validate_positive_count("number", number)?;
            if self.data.tables.iter().any(|t| t.id != id && t.number == number) {
                return Err(ValidationError::Duplicate {
                    field: "table number".to_string(),
                    value: number.to_string(),
                }
                .into());
            }
        }
        if let Some(location) = &patch.location {
            validate_text("location", location, NAME_MAX)?;
        }

        let table = self.table_mut(id)?;
        if let Some(number) = patch.number {
            table.number = number;
        }
        if let Some(capacity) = patch.capacity {
            table.capacity = capacity;
        }
        if let Some(status) = patch.status {
            table.status = status;
        }
        if let Some(location) = patch.location {
            table.location = location.trim().to_string();
        }

        debug!(table = table.number, status = ?table.status, "Table updated");
        Ok(table.clone())
    }

    // =========================================================================
    // Inventory
    // =========================================================================

    pub fn add_inventory_item(&mut self, draft: NewInventoryItem) -> CoreResult<InventoryItem> {
        validate_text("name", &draft.name, NAME_MAX)?;
        validate_text("unit", &draft.unit, NAME_MAX)?;
        validate_stock_quantity("quantity", draft.quantity)?;
        validate_stock_quantity("min_stock", draft.min_stock)?;
        validate_stock_quantity("max_stock", draft.max_stock)?;
        validate_amount_cents("cost_per_unit", draft.cost_per_unit_cents)?;

        let item = InventoryItem {
            id: Self::new_id(),
            name: draft.name.trim().to_string(),
            category: draft.category.trim().to_string(),
            quantity: draft.quantity,
            unit: draft.unit.trim().to_string(),
            min_stock: draft.min_stock,
            max_stock: draft.max_stock,
            cost_per_unit_cents: draft.cost_per_unit_cents,
            supplier: draft.supplier,
            last_restocked: draft.last_restocked,
            expiry_date: draft.expiry_date,
        };

        info!(inventory_id = %item.id, name = %item.name, "Inventory item added");
        self.data.inventory.push(item.clone());
        Ok(item)
    }

    pub fn update_inventory_item(&mut self, id: &str, patch: InventoryPatch) -> CoreResult<InventoryItem> {
        if let Some(name) = &patch.name {
            validate_text("name", name, NAME_MAX)?;
        }
        if let Some(unit) = &patch.unit {
            validate_text("unit", unit, NAME_MAX)?;
        }
        for (field, value) in [
            ("quantity", patch.quantity),
            ("min_stock", patch.min_stock),
            ("max_stock", patch.max_stock),
        ] {
            if let Some(value) = value {
                validate_stock_quantity(field, value)?;
            }
        }
        if let Some(cost) = patch.cost_per_unit_cents {
            validate_amount_cents("cost_per_unit", cost)?;
        }

        let item = self
            .data
            .inventory
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| CoreError::InventoryItemNotFound(id.to_string()))?;

        if let Some(name) = patch.name {
            item.name = name.trim().to_string();
        }
        if let Some(category) = patch.category {
            item.category = category.trim().to_string();
        }
        if let Some(quantity) = patch.quantity {
            item.quantity = quantity;
        }
        if let Some(unit) = patch.unit {
            item.unit = unit.trim().to_string();
        }
        if let Some(min) = patch.min_stock {
            item.min_stock = min;
        }
        if let Some(max) = patch.max_stock {
            item.max_stock = max;
        }
        if let Some(cost) = patch.cost_per_unit_cents {
            item.cost_per_unit_cents = cost;
        }
        if let Some(supplier) = patch.supplier {
            item.supplier = Some(supplier);
        }
        if let Some(date) = patch.last_restocked {
            item.last_restocked = Some(date);
        }
        if let Some(date) = patch.expiry_date {
            item.expiry_date = Some(date);
        }

        debug!(inventory_id = %id, quantity = item.quantity, "Inventory item updated");
        Ok(item.clone())
    }

    pub fn delete_inventory_item(&mut self, id: &str) -> CoreResult<InventoryItem> {
        let index = self
            .data
            .inventory
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| CoreError::InventoryItemNotFound(id.to_string()))?;

        info!(inventory_id = %id, "Inventory item deleted");
        Ok(self.data.inventory.remove(index))
    }

    // =========================================================================
    // Reservations
    // =========================================================================

    /// Books a table. New reservations start `confirmed`.
    pub fn add_reservation(&mut self, draft: NewReservation) -> CoreResult<Reservation> {
        validate_text("customer_name", &draft.customer_name, NAME_MAX)?;
        validate_text("customer_phone", &draft.customer_phone, NAME_MAX)?;
        validate_positive_count("party_size", draft.party_size)?;
        let time = validate_time_of_day(&draft.time)?;
        if let Some(email) = &draft.customer_email {
            validate_email(email)?;
        }
        if let Some(table_id) = &draft.table_id {
            self.table(table_id)?;
        }

        let reservation = Reservation {
            id: Self::new_id(),
            customer_name: draft.customer_name.trim().to_string(),
            customer_phone: draft.customer_phone.trim().to_string(),
            customer_email: draft.customer_email,
            table_id: draft.table_id,
            party_size: draft.party_size,
            date: draft.date,
            time,
            status: ReservationStatus::Confirmed,
            special_requests: draft.special_requests,
            created_at: self.clock.now(),
        };

        info!(
            reservation_id = %reservation.id,
            date = %reservation.date,
            time = %reservation.time,
            party = reservation.party_size,
            "Reservation added"
        );
        self.data.reservations.push(reservation.clone());
        Ok(reservation)
    }

    pub fn update_reservation(&mut self, id: &str, patch: ReservationPatch) -> CoreResult<Reservation> {
        if let Some(name) = &patch.customer_name {
            validate_text("customer_name", name, NAME_MAX)?;
        }
        if let Some(phone) = &patch.customer_phone {
            validate_text("customer_phone", phone, NAME_MAX)?;
        }
        if let Some(email) = &patch.customer_email {
            validate_email(email)?;
        }
        if let Some(size) = patch.party_size {
            validate_positive_count("party_size", size)?;
        }
        let time = patch.time.as_deref().map(validate_time_of_day).transpose()?;
        if let Some(table_id) = &patch.table_id {
            self.table(table_id)?;
        }
        if let Some(requests) = &patch.special_requests {
            if requests.chars().count() > TEXT_MAX {
                return Err(ValidationError::TooLong {
                    field: "special_requests".to_string(),
                    max: TEXT_MAX,
                }
                .into());
            }
        }

        let reservation = self
            .data
            .reservations
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| CoreError::ReservationNotFound(id.to_string()))?;

        if let Some(name) = patch.customer_name {
            reservation.customer_name = name.trim().to_string();
        }
        if let Some(phone) = patch.customer_phone {
            reservation.customer_phone = phone.trim().to_string();
        }
        if let Some(email) = patch.customer_email {
            reservation.customer_email = Some(email);
        }
        if let Some(table_id) = patch.table_id {
            reservation.table_id = Some(table_id);
        }
        if let Some(size) = patch.party_size {
            reservation.party_size = size;
        }
        if let Some(date) = patch.date {
            reservation.date = date;
        }
        if let Some(time) = time {
            reservation.time = time;
        }
        if let Some(status) = patch.status {
            reservation.status = status;
        }
        if let Some(requests) = patch.special_requests {
            reservation.special_requests = Some(requests);
        }

        debug!(reservation_id = %id, status = ?reservation.status, "Reservation updated");
        Ok(reservation.clone())
    }

    pub fn delete_reservation(&mut self, id: &str) -> CoreResult<Reservation> {
        let index = self
            .data
            .reservations
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| CoreError::ReservationNotFound(id.to_string()))?;

        info!(reservation_id = %id, "Reservation deleted");
        Ok(self.data.reservations.remove(index))
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    pub fn add_notification(&mut self, draft: NewNotification) -> CoreResult<Notification> {
        validate_text("title", &draft.title, NAME_MAX)?;
        if draft.message.chars().count() > TEXT_MAX {
            return Err(ValidationError::TooLong {
                field: "message".to_string(),
                max: TEXT_MAX,
            }
            .into());
        }

        Ok(self.push_notification(draft.kind, draft.title, draft.message, draft.user_id))
    }

    pub fn mark_notification_read(&mut self, id: &str) -> CoreResult<Notification> {
        let notification = self
            .data
            .notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| CoreError::NotificationNotFound(id.to_string()))?;

        notification.read = true;
        Ok(notification.clone())
    }

    pub fn unread_notification_count(&self) -> usize {
        self.data.notifications.iter().filter(|n| !n.read).count()
    }

    pub fn clear_notifications(&mut self) {
        debug!(count = self.data.notifications.len(), "Notifications cleared");
        self.data.notifications.clear();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
