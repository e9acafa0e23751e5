//! # Validation Module
//!
//! Input validation for everything that reaches the store.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Views                                                        │
//! │  ├── Form-level hints (empty, length)                                  │
//! │  └── Raw text: "12.99", "2", "7:30"                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Dashboard command                                            │
//! │  └── THIS MODULE: parse text into cents / integers / dates             │
//! │           │        reject NaN, negatives, garbage                       │
//! │           ▼                                                             │
//! │  Layer 3: Store operation                                              │
//! │  ├── THIS MODULE again on typed drafts                                 │
//! │  └── Cross-entity rules (table free, menu item available)              │
//! │                                                                         │
//! │  Nothing unvalidated ever lands in a total.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bistro_core::validation::{parse_quantity, validate_quantity};
//!
//! assert_eq!(parse_quantity("2").unwrap(), 2);
//! assert!(parse_quantity("two").is_err());
//! assert!(validate_quantity(1000).is_err());
//! ```

use chrono::NaiveTime;

use crate::error::ValidationError;
use crate::{MAX_AMOUNT_CENTS, MAX_ITEM_QUANTITY, MAX_ORDER_LINES};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required free-text field (names, locations, categories).
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most `max` characters
pub fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates an email address well enough to tell typos from addresses.
///
/// ```rust
/// use bistro_core::validation::validate_email;
///
/// assert!(validate_email("chef@restaurant.com").is_ok());
/// assert!(validate_email("chef.restaurant.com").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    validate_text("email", email, 254)?;

    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@domain.tld".to_string(),
        });
    }

    Ok(())
}

/// Validates a reservation time of day and returns it normalized to `HH:MM`.
///
/// ```rust
/// use bistro_core::validation::validate_time_of_day;
///
/// assert_eq!(validate_time_of_day("7:30").unwrap(), "07:30");
/// assert!(validate_time_of_day("25:00").is_err());
/// ```
pub fn validate_time_of_day(time: &str) -> ValidationResult<String> {
    let parsed = NaiveTime::parse_from_str(time.trim(), "%H:%M").map_err(|_| {
        ValidationError::InvalidFormat {
            field: "time".to_string(),
            reason: "must be HH:MM".to_string(),
        }
    })?;

    Ok(parsed.format("%H:%M").to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an order line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Waiter: Add Line                                                       │
/// │                                                                         │
/// │  Waiter enters quantity: 2                                             │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(2) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "quantity must be positive"               │
/// │       │                                                                 │
/// │       ├── qty > 999? → Error: "quantity must be between 1 and 999"     │
/// │       │                                                                 │
/// │       └── OK → line goes into the new order                            │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Parses a typed quantity and validates it.
pub fn parse_quantity(input: &str) -> ValidationResult<i64> {
    let qty = input
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidFormat {
            field: "quantity".to_string(),
            reason: format!("'{}' is not a whole number", input.trim()),
        })?;

    validate_quantity(qty)?;
    Ok(qty)
}

/// Validates an amount in cents (prices, discounts, tips, cash tendered).
///
/// ## Rules
/// - Must be non-negative
/// - At most [`MAX_AMOUNT_CENTS`]
///
/// ```rust
/// use bistro_core::validation::validate_amount_cents;
///
/// assert!(validate_amount_cents("price", 1299).is_ok());
/// assert!(validate_amount_cents("price", 0).is_ok());
/// assert!(validate_amount_cents("price", -100).is_err());
/// assert!(validate_amount_cents("tip", i64::MAX).is_err());
/// ```
pub fn validate_amount_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_AMOUNT_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_AMOUNT_CENTS,
        });
    }

    Ok(())
}

/// Validates a stock level or threshold.
///
/// ## Rules
/// - Must be a finite number (`NaN` and infinities are rejected)
/// - Must be non-negative
pub fn validate_stock_quantity(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a finite number".to_string(),
        });
    }

    if value < 0.0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Parses a typed stock level ("12.5") and validates it.
pub fn parse_stock_quantity(field: &str, input: &str) -> ValidationResult<f64> {
    let value = input
        .trim()
        .parse::<f64>()
        .map_err(|_| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("'{}' is not a number", input.trim()),
        })?;

    validate_stock_quantity(field, value)?;
    Ok(value)
}

/// Validates a positive count such as party size or table capacity.
pub fn validate_positive_count(field: &str, value: u32) -> ValidationResult<()> {
    if value == 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points (0% to 100%).
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates the number of lines on a new order.
///
/// ## Rules
/// - At least one line
/// - At most MAX_ORDER_LINES (100)
pub fn validate_line_count(lines: usize) -> ValidationResult<()> {
    if lines == 0 {
        return Err(ValidationError::Required {
            field: "order lines".to_string(),
        });
    }

    if lines > MAX_ORDER_LINES {
        return Err(ValidationError::OutOfRange {
            field: "order lines".to_string(),
            min: 1,
            max: MAX_ORDER_LINES as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
