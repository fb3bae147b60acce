//! Non-negative currency amounts using decimal arithmetic.
//!
//! Amounts travel over the wire as plain JSON numbers (`19.99`) because that is
//! what the record store holds. Internally they are `Decimal`, so subtotals and
//! tax never pick up binary floating point error. Rounding happens only when an
//! amount is displayed.
//!
//! Arithmetic saturates at `Decimal::MAX` rather than overflowing, so an absurd
//! record from the store cannot bring down a page that totals it.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Errors constructing a [`Money`] value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    #[error("amount must not be negative (got {0})")]
    Negative(Decimal),
}

/// A non-negative amount of the store currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    /// Zero dollars.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new amount.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::Negative` for amounts below zero.
    pub fn new(amount: Decimal) -> Result<Self, MoneyError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(MoneyError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create an amount from whole dollars.
    #[must_use]
    pub const fn from_dollars(dollars: u32) -> Self {
        Self(Decimal::from_parts(dollars, 0, 0, false, 0))
    }

    /// Create an amount from a whole number of cents.
    #[must_use]
    pub const fn from_cents(cents: u32) -> Self {
        Self(Decimal::from_parts(cents, 0, 0, false, 2))
    }

    /// Get the underlying decimal amount (unrounded).
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply by a unit count (price × quantity).
    #[must_use]
    pub fn times(self, count: u32) -> Self {
        Self(
            self.0
                .checked_mul(Decimal::from(count))
                .unwrap_or(Decimal::MAX),
        )
    }

    /// Multiply by a non-negative fractional rate (amount × 0.13).
    #[must_use]
    pub fn scale(self, rate: Decimal) -> Self {
        Self(
            self.0
                .checked_mul(rate)
                .unwrap_or(Decimal::MAX)
                .max(Decimal::ZERO),
        )
    }

    /// Amount rounded to cents, half away from zero.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        self.0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("${:.2}", self.rounded())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.checked_add(rhs.0).unwrap_or(Decimal::MAX))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = MoneyError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}
