//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Summing a check in floating point:                                     │
//! │    12.99 + 9.99 + 28.99 = 51.970000000000006                            │
//! │                                                                         │
//! │  Parsing a form field in floating point:                                │
//! │    parseFloat("abc") = NaN  → silently poisons every total              │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents + Checked Parsing                          │
//! │    1299 + 999 + 2899 = 5197 cents, exactly                              │
//! │    Money::parse("abc") = Err(InvalidFormat)                             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bistro_core::money::Money;
//!
//! let salmon = Money::from_cents(2899); // $28.99
//! let line = salmon * 2_i64;            // $57.98
//! let check = line + Money::from_cents(999);
//! assert_eq!(check.cents(), 6797);
//!
//! // User input goes through parse, never through f64
//! assert_eq!(Money::parse("12.50").unwrap().cents(), 1250);
//! assert!(Money::parse("twelve").is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents for USD).
///
/// ## Where Money Flows
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  MenuItem.price_cents ──► OrderItem.unit_price_cents (frozen)           │
/// │                                  │                                      │
/// │                                  ▼                                      │
/// │  Order.subtotal ──► tax (8%) ──► - discount ──► Order.total             │
/// │                                                     │                   │
/// │                                                     ▼                   │
/// │                              Cashier: total + tip ──► change due        │
/// │                                                     │                   │
/// │                                                     ▼                   │
/// │                                   Analytics: today's sales              │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use bistro_core::money::Money;
    ///
    /// let price = Money::from_cents(1299);
    /// assert_eq!(price.cents(), 1299);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from dollars and cents.
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -$5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Parses a decimal amount typed by staff (`"12"`, `"12.5"`, `"12.99"`).
    ///
    /// ## Rules
    /// - Optional leading `-`
    /// - Digits with at most one `.` and at most two fractional digits
    /// - Anything else (letters, exponents, `NaN`, empty input) is rejected
    ///
    /// ```rust
    /// use bistro_core::money::Money;
    ///
    /// assert_eq!(Money::parse("42.99").unwrap().cents(), 4299);
    /// assert_eq!(Money::parse(" 7.5 ").unwrap().cents(), 750);
    /// assert!(Money::parse("NaN").is_err());
    /// assert!(Money::parse("1.999").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Money, ValidationError> {
        let raw = input.trim();
        let invalid = || ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: format!("'{}' is not a valid amount", raw),
        };

        let (negative, digits) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));

        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        if frac.len() > 2
            || !whole.chars().all(|c| c.is_ascii_digit())
            || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let whole_cents = if whole.is_empty() {
            0
        } else {
            whole
                .parse::<i64>()
                .ok()
                .and_then(|w| w.checked_mul(100))
                .ok_or_else(invalid)?
        };
        let frac_cents = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => frac.parse::<i64>().map_err(|_| invalid())?,
        };

        let cents = whole_cents.checked_add(frac_cents).ok_or_else(invalid)?;
        Ok(Money(if negative { -cents } else { cents }))
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-dollar portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Calculates tax on this amount, rounding half up to the cent.
    ///
    /// Integer formula: `(amount * bps + 5000) / 10000`.
    ///
    /// ```rust
    /// use bistro_core::money::Money;
    /// use bistro_core::types::TaxRate;
    ///
    /// // $67.97 at 8% = $5.4376 → $5.44
    /// let tax = Money::from_cents(6797).calculate_tax(TaxRate::from_bps(800));
    /// assert_eq!(tax.cents(), 544);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 keeps large checks from overflowing
        let tax_cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(tax_cents as i64)
    }

    /// Multiplies a unit price by a line quantity.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Addition that returns `None` instead of wrapping or panicking.
    ///
    /// ```rust
    /// use bistro_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(5).checked_add(Money::from_cents(7)), Some(Money::from_cents(12)));
    /// assert_eq!(Money::from_cents(i64::MAX).checked_add(Money::from_cents(1)), None);
    /// ```
    #[inline]
    pub const fn checked_add(self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    #[inline]
    pub const fn checked_sub(self, other: Money) -> Option<Money> {
        match self.0.checked_sub(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Line total that returns `None` on overflow.
    #[inline]
    pub const fn checked_mul(self, qty: i64) -> Option<Money> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Returns `self * 100 / divisor` as a percentage share, for reports.
    ///
    /// Returns 0 when `divisor` is zero.
    pub fn share_of(&self, divisor: Money) -> f64 {
        if divisor.is_zero() {
            return 0.0;
        }
        self.0 as f64 * 100.0 / divisor.0 as f64
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-style display (`$12.99`). Views localize their own formatting.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        Money(self.0 * qty as i64)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents_parts() {
        let money = Money::from_cents(4299);
        assert_eq!(money.dollars(), 42);
        assert_eq!(money.cents_part(), 99);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(7341).to_string(), "$73.41");
        assert_eq!(Money::from_cents(500).to_string(), "$5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-$5.50");
    }

    #[test]
    fn test_fixture_order_tax_rounding() {
        let rate = TaxRate::from_bps(800);
        assert_eq!(Money::from_cents(6797).calculate_tax(rate).cents(), 544);
        assert_eq!(Money::from_cents(7796).calculate_tax(rate).cents(), 624);
        assert_eq!(Money::from_cents(4396).calculate_tax(rate).cents(), 352);
        assert_eq!(Money::from_cents(2797).calculate_tax(rate).cents(), 224);
        assert_eq!(Money::from_cents(2698).calculate_tax(rate).cents(), 216);
    }

    #[test]
    fn test_sum() {
        let lines = [Money::from_cents(999), Money::from_cents(5798)];
        let total: Money = lines.iter().sum();
        assert_eq!(total.cents(), 6797);
    }

    #[test]
    fn test_parse_accepts_decimal_forms() {
        assert_eq!(Money::parse("12").unwrap().cents(), 1200);
        assert_eq!(Money::parse("12.").unwrap().cents(), 1200);
        assert_eq!(Money::parse("12.5").unwrap().cents(), 1250);
        assert_eq!(Money::parse("0.07").unwrap().cents(), 7);
        assert_eq!(Money::parse(".5").unwrap().cents(), 50);
        assert_eq!(Money::parse("-3.25").unwrap().cents(), -325);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "  ", ".", "-", "abc", "NaN", "1e3", "1.234", "1,50", "--1", "9999999999999999999"] {
            assert!(Money::parse(bad).is_err(), "expected {:?} to be rejected", bad);
        }
    }

    #[test]
    fn test_checked_ops_stop_at_i64_bounds() {
        let most = Money::from_cents(i64::MAX);
        assert_eq!(most.checked_add(Money::from_cents(1)), None);
        assert_eq!(Money::from_cents(i64::MIN).checked_sub(Money::from_cents(1)), None);
        assert_eq!(most.checked_mul(2), None);
        assert_eq!(Money::from_cents(2899).checked_mul(2), Some(Money::from_cents(5798)));
    }

    #[test]
    fn test_share_of() {
        let part = Money::from_cents(2500);
        assert!((part.share_of(Money::from_cents(10000)) - 25.0).abs() < f64::EPSILON);
        assert_eq!(part.share_of(Money::zero()), 0.0);
    }
}
