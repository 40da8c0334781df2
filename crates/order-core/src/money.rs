//! # Money Module
//!
//! Provides the `Money` type for unit prices and line totals.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Stored as REAL:                                                        │
//! │    3 × 9.99 = 29.969999999999995   ❌ WRONG!                            │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units (cents / öre)                        │
//! │    3 × 999 = 2997 → displayed as "29.97"                               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use order_core::money::Money;
//!
//! let price: Money = "9,99".parse().unwrap();
//! assert_eq!(price.cents(), 999);
//!
//! let total = price * 3;
//! assert_eq!(total.to_string(), "29.97");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};
use std::str::FromStr;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// The currency itself is a display concern; the console appends the
/// configured suffix (e.g. `kr`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ```rust
    /// use order_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole major units (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor part (0-99), always positive.
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Line total for `quantity` units, or `None` on overflow.
    pub fn checked_times(&self, quantity: i64) -> Option<Money> {
        self.0.checked_mul(quantity).map(Money)
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Why a string could not be read as money.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseMoneyError {
    Empty,
    InvalidCharacter,
    TooManyDecimals,
    Overflow,
}

impl fmt::Display for ParseMoneyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ParseMoneyError::Empty => "no amount given",
            ParseMoneyError::InvalidCharacter => "only digits and one decimal separator are allowed",
            ParseMoneyError::TooManyDecimals => "at most two decimals are allowed",
            ParseMoneyError::Overflow => "amount is too large",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for ParseMoneyError {}

/// Parses operator input such as `9.99`, `9,99`, `10` or `.5`.
///
/// Both `.` and `,` are accepted as the decimal separator.
impl FromStr for Money {
    type Err = ParseMoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        if digits.is_empty() {
            return Err(ParseMoneyError::Empty);
        }

        let (whole, fraction) = match digits.find(['.', ',']) {
            Some(idx) => (&digits[..idx], &digits[idx + 1..]),
            None => (digits, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(ParseMoneyError::Empty);
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
            return Err(ParseMoneyError::InvalidCharacter);
        }
        if fraction.len() > 2 {
            return Err(ParseMoneyError::TooManyDecimals);
        }

        let major: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| ParseMoneyError::Overflow)?
        };
        let minor: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| ParseMoneyError::InvalidCharacter)? * 10,
            _ => fraction.parse().map_err(|_| ParseMoneyError::InvalidCharacter)?,
        };

        let cents = major
            .checked_mul(100)
            .and_then(|c| c.checked_add(minor))
            .ok_or(ParseMoneyError::Overflow)?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Two decimals, no currency symbol: `29.97`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
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
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

/// Multiplication by a quantity. Saturates at the `i64` bounds; use
/// [`Money::checked_times`] where an overflow must be refused.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor_part(), 99);
        assert_eq!(Money::from_cents(-550).minor_part(), 50);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_parse_accepts_both_separators() {
        assert_eq!("9.99".parse::<Money>().unwrap().cents(), 999);
        assert_eq!("9,99".parse::<Money>().unwrap().cents(), 999);
        assert_eq!("10".parse::<Money>().unwrap().cents(), 1000);
        assert_eq!("2.5".parse::<Money>().unwrap().cents(), 250);
        assert_eq!(".5".parse::<Money>().unwrap().cents(), 50);
        assert_eq!(" 7 ".parse::<Money>().unwrap().cents(), 700);
        assert_eq!("-1.25".parse::<Money>().unwrap().cents(), -125);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!("".parse::<Money>(), Err(ParseMoneyError::Empty));
        assert_eq!(".".parse::<Money>(), Err(ParseMoneyError::Empty));
        assert_eq!("abc".parse::<Money>(), Err(ParseMoneyError::InvalidCharacter));
        assert_eq!("1.2.3".parse::<Money>(), Err(ParseMoneyError::InvalidCharacter));
        assert_eq!("1 000".parse::<Money>(), Err(ParseMoneyError::InvalidCharacter));
        assert_eq!("1.999".parse::<Money>(), Err(ParseMoneyError::TooManyDecimals));
        assert_eq!(
            "99999999999999999999".parse::<Money>(),
            Err(ParseMoneyError::Overflow)
        );
    }

    #[test]
    fn test_line_total() {
        let unit_price = Money::from_cents(999);
        assert_eq!((unit_price * 3).cents(), 2997);
        assert_eq!(unit_price.checked_times(3), Some(Money::from_cents(2997)));
        assert_eq!(Money::from_cents(i64::MAX).checked_times(2), None);
        assert_eq!(Money::from_cents(i64::MAX / 2) * 3, Money::from_cents(i64::MAX));
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 250, 49].into_iter().map(Money::from_cents).sum();
        assert_eq!(total.cents(), 399);

        let capped: Money = [Money::from_cents(i64::MAX), Money::from_cents(1)].into_iter().sum();
        assert_eq!(capped, Money::from_cents(i64::MAX));
    }
}
