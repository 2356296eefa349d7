//! Credit amounts with checked integer arithmetic
//!
//! Credits are the platform's internal unit of prepaid service consumption.
//! They are whole numbers: a signed 64-bit count wrapped in a newtype so
//! credit amounts cannot be mixed up with other integers, and so every
//! arithmetic step is overflow-checked.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Neg;
use thiserror::Error;

/// Errors that can occur during credit arithmetic
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CreditError {
    #[error("Overflow during credit calculation")]
    Overflow,

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

/// A signed amount of credits
///
/// Positive values grant credits, negative values consume them. Wallet
/// balances are kept non-negative by the billing domain; the type itself
/// allows both signs so ledger entries can carry debits.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Credits(i64);

impl Credits {
    pub const ZERO: Credits = Credits(0);

    /// Creates a credit amount from a raw count
    pub fn new(amount: i64) -> Self {
        Self(amount)
    }

    /// Returns the raw count
    pub fn amount(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Checked addition
    pub fn checked_add(&self, other: Credits) -> Result<Credits, CreditError> {
        self.0
            .checked_add(other.0)
            .map(Credits)
            .ok_or(CreditError::Overflow)
    }

    /// Checked subtraction
    pub fn checked_sub(&self, other: Credits) -> Result<Credits, CreditError> {
        self.0
            .checked_sub(other.0)
            .map(Credits)
            .ok_or(CreditError::Overflow)
    }

    /// Validates that the amount is strictly positive
    pub fn require_positive(&self) -> Result<Credits, CreditError> {
        if self.is_positive() {
            Ok(*self)
        } else {
            Err(CreditError::InvalidAmount(format!(
                "expected a positive amount, got {}",
                self.0
            )))
        }
    }
}

impl Neg for Credits {
    type Output = Credits;

    fn neg(self) -> Credits {
        Credits(-self.0)
    }
}

impl From<i64> for Credits {
    fn from(amount: i64) -> Self {
        Credits(amount)
    }
}

impl From<Credits> for i64 {
    fn from(credits: Credits) -> i64 {
        credits.0
    }
}

impl Sum for Credits {
    fn sum<I: Iterator<Item = Credits>>(iter: I) -> Credits {
        Credits(iter.map(|c| c.0).sum())
    }
}

impl fmt::Display for Credits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} credits", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_add() {
        let a = Credits::new(60);
        let b = Credits::new(40);
        assert_eq!(a.checked_add(b).unwrap(), Credits::new(100));
    }

    #[test]
    fn test_checked_add_overflow() {
        let a = Credits::new(i64::MAX);
        assert_eq!(a.checked_add(Credits::new(1)), Err(CreditError::Overflow));
    }

    #[test]
    fn test_negation() {
        assert_eq!(-Credits::new(60), Credits::new(-60));
    }

    #[test]
    fn test_require_positive() {
        assert!(Credits::new(1).require_positive().is_ok());
        assert!(Credits::new(0).require_positive().is_err());
        assert!(Credits::new(-1).require_positive().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Credits::new(42).to_string(), "42 credits");
    }
}
