//! # Money Module
//!
//! Fixed-point types for everything that carries a currency amount.
//!
//! ## Two Scales
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  UnitPrice  ── ten-thousandths (4 dp) ── what the catalog stores        │
//! │      │                                                                  │
//! │      │  × quantity, round half away from zero to cents                  │
//! │      ▼                                                                  │
//! │  Money      ── cents (2 dp) ─────────── line totals and order totals    │
//! │                                                                         │
//! │  Catalog prices arrive as JSON numbers or typed-in strings, so they     │
//! │  keep a little more precision than the invoice shows. Every line total  │
//! │  is rounded to the cent on its own; the order total sums those rounded  │
//! │  cents.                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tilly_core::money::{IntoPrice, Money, UnitPrice};
//!
//! let water = 10.0_f64.into_price().unwrap();
//! let line = water.line_total(3).unwrap();
//! assert_eq!(line, Money::from_cents(3000));
//! assert_eq!(line.to_string(), "30.00");
//!
//! assert!("-1".into_price().is_err());
//! assert!("abc".into_price().is_err());
//! ```

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::validation::ValidationResult;

/// Ten-thousandths per currency unit.
pub const PRICE_SCALE: i64 = 10_000;

/// Ten-thousandths per cent.
const PRICE_UNITS_PER_CENT: i64 = PRICE_SCALE / 100;

/// Largest accepted unit price.
///
/// Together with [`crate::validation::MAX_QUANTITY`] this bounds a line total
/// to 10^15 cents.
pub const MAX_UNIT_PRICE: f64 = 1_000_000_000.0;

/// Integer division rounding half away from zero.
fn div_round_half_away(numerator: i128, denominator: i128) -> i128 {
    let half = denominator / 2;
    if numerator >= 0 {
        (numerator + half) / denominator
    } else {
        (numerator - half) / denominator
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents.
///
/// Line totals and order totals are always `Money`, so they are rounded to
/// the cent by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
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

    /// Value as a float, for display formatting only.
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Sum of two amounts, or `None` if it does not fit in `i64` cents.
    #[inline]
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Formats with an arbitrary number of decimals.
    ///
    /// Used for `{total:.Nf}` in invoice templates. Extra decimals are zeros;
    /// fewer than two round half away from zero, like line totals do.
    pub fn format_decimals(&self, decimals: usize) -> String {
        if decimals >= 2 {
            return format!("{}{}", self, "0".repeat(decimals - 2));
        }

        // 10 or 100 cents per output step
        let step: i128 = if decimals == 1 { 10 } else { 100 };
        let steps = div_round_half_away(self.0 as i128, step);
        let sign = if steps < 0 { "-" } else { "" };
        let steps = steps.unsigned_abs();

        if decimals == 0 {
            format!("{}{}", sign, steps)
        } else {
            format!("{}{}.{}", sign, steps / 10, steps % 10)
        }
    }
}

/// Plain amount with exactly two decimals, no currency symbol.
///
/// The symbol is configurable and added by the invoice renderer.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.cents_part())
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
// Unit Price
// =============================================================================

/// A catalog unit price in ten-thousandths of the currency unit.
///
/// ## Invariants
/// - Never negative
/// - Only constructed through [`UnitPrice::from_f64`], [`UnitPrice::parse`]
///   or [`UnitPrice::from_cents`], all of which validate
///
/// Serialized as a plain JSON number (`10.0`, `2.5`) so catalog files stay
/// hand-editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct UnitPrice(i64);

impl UnitPrice {
    /// Builds a price from a number, rounding to four decimals.
    ///
    /// ## Rules
    /// - Must be finite
    /// - Must be >= 0 (zero is a free item)
    /// - Must not exceed [`MAX_UNIT_PRICE`]
    pub fn from_f64(value: f64) -> ValidationResult<Self> {
        if !value.is_finite() || value > MAX_UNIT_PRICE {
            return Err(ValidationError::InvalidNumber {
                field: "price".to_string(),
                input: value.to_string(),
            });
        }
        if value < 0.0 {
            return Err(ValidationError::Negative {
                field: "price".to_string(),
            });
        }

        Ok(UnitPrice((value * PRICE_SCALE as f64).round() as i64))
    }

    /// Parses a typed-in price such as `"12"`, `" 4.50 "`.
    pub fn parse(input: &str) -> ValidationResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Required {
                field: "price".to_string(),
            });
        }

        let value: f64 = trimmed
            .parse()
            .map_err(|_| ValidationError::InvalidNumber {
                field: "price".to_string(),
                input: trimmed.to_string(),
            })?;

        Self::from_f64(value)
    }

    /// Exact price from whole cents.
    pub fn from_cents(cents: i64) -> ValidationResult<Self> {
        if cents < 0 {
            return Err(ValidationError::Negative {
                field: "price".to_string(),
            });
        }
        Ok(UnitPrice(cents * PRICE_UNITS_PER_CENT))
    }

    /// Raw value in ten-thousandths.
    #[inline]
    pub const fn ten_thousandths(&self) -> i64 {
        self.0
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / PRICE_SCALE as f64
    }

    /// The price rounded to the cent, for display.
    pub fn to_money(&self) -> Money {
        Money::from_cents(div_round_half_away(self.0 as i128, PRICE_UNITS_PER_CENT as i128) as i64)
    }

    /// `quantity × price`, rounded half away from zero to the cent.
    ///
    /// `None` when the result does not fit in `i64` cents.
    ///
    /// ```rust
    /// use tilly_core::money::UnitPrice;
    ///
    /// // 3 × 0.335 = 1.005 → 1.01
    /// let price = UnitPrice::parse("0.335").unwrap();
    /// assert_eq!(price.line_total(3).unwrap().cents(), 101);
    ///
    /// let dear = UnitPrice::from_f64(1e9).unwrap();
    /// assert!(dear.line_total(1_000_000_000).is_none());
    /// ```
    pub fn line_total(&self, quantity: i64) -> Option<Money> {
        let raw = self.0 as i128 * quantity as i128;
        let cents = div_round_half_away(raw, PRICE_UNITS_PER_CENT as i128);
        i64::try_from(cents).ok().map(Money::from_cents)
    }
}

/// Shows the price at two decimals, like the invoice does.
impl fmt::Display for UnitPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_money(), f)
    }
}

impl Serialize for UnitPrice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for UnitPrice {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        UnitPrice::from_f64(value).map_err(de::Error::custom)
    }
}

// =============================================================================
// Price Parsing Boundary
// =============================================================================

/// Anything a caller may hand in as a price.
///
/// UI text boxes give strings, seed data gives numbers. Every catalog and
/// order mutation funnels its price argument through this trait, so bad
/// input becomes a [`ValidationError`] instead of a panic.
pub trait IntoPrice {
    fn into_price(self) -> ValidationResult<UnitPrice>;
}

impl IntoPrice for UnitPrice {
    fn into_price(self) -> ValidationResult<UnitPrice> {
        Ok(self)
    }
}

impl IntoPrice for f64 {
    fn into_price(self) -> ValidationResult<UnitPrice> {
        UnitPrice::from_f64(self)
    }
}

impl IntoPrice for i32 {
    fn into_price(self) -> ValidationResult<UnitPrice> {
        UnitPrice::from_f64(self as f64)
    }
}

impl IntoPrice for i64 {
    fn into_price(self) -> ValidationResult<UnitPrice> {
        UnitPrice::from_f64(self as f64)
    }
}

impl IntoPrice for &str {
    fn into_price(self) -> ValidationResult<UnitPrice> {
        UnitPrice::parse(self)
    }
}

impl IntoPrice for String {
    fn into_price(self) -> ValidationResult<UnitPrice> {
        UnitPrice::parse(&self)
    }
}

impl IntoPrice for &String {
    fn into_price(self) -> ValidationResult<UnitPrice> {
        UnitPrice::parse(self)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
