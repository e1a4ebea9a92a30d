//! Safe financial arithmetic using fixed-point decimal
//!
//! Payment amounts are decimal strings with at most 2 fractional digits,
//! backed by `rust_decimal`. **Never use f64 for financial calculations!**
//!
//! Amounts are canonicalized to 2 decimal places on construction, so
//! `"10"` and `"10.00"` are the same amount and display identically.
//!
//! # Examples
//!
//! ```
//! use aliaspay_core::Amount;
//!
//! let amount = Amount::parse("12.34").unwrap();
//! assert_eq!(amount.to_string(), "12.34");
//!
//! assert!(Amount::parse("12.345").is_err()); // 3 decimal places
//! assert!(Amount::parse("-5").is_err());     // negative
//! assert!(Amount::parse("1000000").is_err()); // above the cap
//! ```

use crate::AliasPayError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest accepted payment amount
const MAX_AMOUNT: Decimal = Decimal::from_parts(999_999, 0, 0, false, 0);

/// A payment amount in currency minor units (2 decimal places)
///
/// Serializes as a string to preserve precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount {
    // Decimal automatically serializes as string with the serde feature
    value: Decimal,
}

impl Amount {
    /// Parse and validate a user-supplied amount string.
    ///
    /// Accepts strictly positive decimals up to 999999 with at most 2
    /// fractional digits. Signs, exponents, and grouping are rejected.
    pub fn parse(s: &str) -> Result<Self, AliasPayError> {
        let (int_part, frac_part) = match s.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (s, None),
        };
        let digits_ok = !int_part.is_empty()
            && int_part.bytes().all(|b| b.is_ascii_digit())
            && frac_part.map_or(true, |f| !f.is_empty() && f.bytes().all(|b| b.is_ascii_digit()));
        if !digits_ok {
            return Err(AliasPayError::InvalidAmount(format!(
                "must be a positive decimal number: {s:?}"
            )));
        }
        if frac_part.is_some_and(|f| f.len() > 2) {
            return Err(AliasPayError::InvalidAmount(format!(
                "at most 2 decimal places: {s:?}"
            )));
        }
        let mut value = Decimal::from_str(s)
            .map_err(|e| AliasPayError::InvalidAmount(format!("{s:?}: {e}")))?;
        if value <= Decimal::ZERO {
            return Err(AliasPayError::InvalidAmount(format!(
                "must be greater than zero: {s:?}"
            )));
        }
        if value > MAX_AMOUNT {
            return Err(AliasPayError::InvalidAmount(format!(
                "exceeds the {MAX_AMOUNT} maximum: {s:?}"
            )));
        }
        value.rescale(2);
        Ok(Self { value })
    }

    /// Zero amount
    pub fn zero() -> Self {
        Self {
            value: Decimal::new(0, 2),
        }
    }

    /// Check if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Get the internal Decimal value
    pub fn as_decimal(&self) -> Decimal {
        self.value
    }

    /// Checked addition (returns None on overflow)
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        self.value
            .checked_add(other.value)
            .map(|value| Self { value })
    }

    /// Saturating addition (clamps on overflow)
    pub fn saturating_add(&self, other: &Self) -> Self {
        self.checked_add(other).unwrap_or(Self {
            value: Decimal::MAX,
        })
    }

    /// Divide this amount among integer percentage shares.
    ///
    /// Each part is `amount * share / 100` rounded half-up to the minor
    /// unit. Rounding can leave a residual of at most `shares.len() - 1`
    /// minor units; the residual is allocated to the first share in list
    /// order so the parts always sum back to the original amount exactly.
    ///
    /// # Examples
    ///
    /// ```
    /// use aliaspay_core::Amount;
    ///
    /// let total = Amount::parse("100.00").unwrap();
    /// let parts = total.split_by_shares(&[33, 33, 34]);
    /// assert_eq!(parts[0].to_string(), "33.00");
    /// assert_eq!(parts[1].to_string(), "33.00");
    /// assert_eq!(parts[2].to_string(), "34.00");
    /// ```
    pub fn split_by_shares(&self, shares: &[u8]) -> Vec<Amount> {
        debug_assert!(!shares.is_empty());
        let mut parts: Vec<Decimal> = shares
            .iter()
            .map(|share| {
                let raw = self
                    .value
                    .checked_mul(Decimal::from(*share))
                    .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
                    .unwrap_or(Decimal::ZERO);
                let mut part =
                    raw.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
                part.rescale(2);
                part
            })
            .collect();
        let allocated = parts.iter().fold(Decimal::ZERO, |acc, p| acc + p);
        let residual = self.value - allocated;
        if !residual.is_zero() {
            if let Some(first) = parts.first_mut() {
                *first += residual;
                first.rescale(2);
            }
        }
        parts.into_iter().map(|value| Self { value }).collect()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl FromStr for Amount {
    type Err = AliasPayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
