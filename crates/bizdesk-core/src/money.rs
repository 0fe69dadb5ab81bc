//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Invoices compute the same total in the form, the print view and the   │
//! │  email export. With floats each path can round differently.            │
//! │                                                                         │
//! │  OUR SOLUTION: base-10 decimals                                        │
//! │    Quantities can be fractional (2.5 kg), so integer cents alone do    │
//! │    not fit. Decimal arithmetic keeps every intermediate exact and      │
//! │    rounding happens once, at display time.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bizdesk_core::money::Money;
//!
//! let price = Money::from_cents(1099); // 10.99
//! let total = price + Money::from_cents(500);
//! assert_eq!(total, Money::from_cents(1599));
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::types::Quantity;
use crate::MAX_AMOUNT;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the document's single currency.
///
/// ## Design Decisions
/// - **Decimal (signed)**: negative values are legal results (a discount
///   larger than its base), never legal inputs
/// - **Unrounded**: arithmetic keeps full precision; call [`Money::round_to`]
///   only when rendering
/// - **Serialized as a string**: `"1180.00"` survives JSON and SQLite TEXT
///   without precision loss
///
/// ## Where Money is Used
/// ```text
/// LineItem.unit_price ──► LineBreakdown.base_amount ──► DocumentTotals.subtotal
///                                  │
///                                  └──► tax / discount ──► grand_total
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(#[ts(type = "string")] Decimal);

impl Money {
    /// Zero money value.
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Wraps a decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a Money value from minor units (cents, paise).
    ///
    /// ## Example
    /// ```rust
    /// use bizdesk_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.amount(), Decimal::new(1099, 2));
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    /// Returns the underlying decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Floors the value at zero.
    ///
    /// Used where a negative input must be treated as zero rather than
    /// rejected.
    #[inline]
    pub fn max_zero(self) -> Self {
        if self.is_negative() {
            Money::ZERO
        } else {
            self
        }
    }

    /// Clamps an input amount (unit price, fixed discount) into
    /// `0..=MAX_AMOUNT`.
    ///
    /// Keeps every product the aggregator forms inside `Decimal`'s range.
    #[inline]
    pub fn clamp_input(self) -> Self {
        Money(self.0.clamp(Decimal::ZERO, Decimal::from(MAX_AMOUNT)))
    }

    /// Multiplies a unit price by a (possibly fractional) quantity.
    ///
    /// ## Example
    /// ```rust
    /// use bizdesk_core::money::Money;
    /// use bizdesk_core::types::Quantity;
    /// use rust_decimal::Decimal;
    ///
    /// let per_kg = Money::from_cents(400);
    /// let line = per_kg.multiply_quantity(Quantity::new(Decimal::new(25, 1)));
    /// assert_eq!(line, Money::from_cents(1000));
    /// ```
    #[inline]
    pub fn multiply_quantity(&self, qty: Quantity) -> Self {
        Money(self.0 * qty.value())
    }

    /// Rounds to `dp` decimal places, half away from zero.
    ///
    /// ## Note
    /// Only for display and export. Totals are computed on unrounded values.
    pub fn round_to(&self, dp: u32) -> Self {
        Money(
            self.0
                .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero),
        )
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the amount rounded to two places, without a currency symbol.
///
/// ## Note
/// Use `BillingConfig::format_amount` for user-facing output.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.round_to(2).0)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::ZERO
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
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

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, m| acc + *m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
