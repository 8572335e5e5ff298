//! Amount type for monetary values entered by users or read from datasets.
//!
//! This module provides the `Amount` type which wraps `Decimal` and handles
//! loose currency text such as `-$3,000,000` or partially-typed entry text.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub};

/// Represents a dollar amount or a signed adjustment delta.
///
/// Wraps `Decimal` so that repeated entry and aggregation never accumulate
/// floating-point drift. Parsing is deliberately forgiving: user entry text is
/// reduced to digits, `.` and `-`, and anything that still fails to parse is
/// treated as zero rather than an error.
///
/// # Examples
///
/// ```
/// # use budget_lens::Amount;
/// let delta = Amount::parse_loose("-$3,000,000");
/// assert_eq!(delta.to_string(), "-3,000,000");
///
/// // Partially-typed or junk entry text is zero, never an error.
/// assert!(Amount::parse_loose("abc").is_zero());
/// assert!(Amount::parse_loose("").is_zero());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    value: Decimal,
}

impl Amount {
    pub const ZERO: Amount = Amount {
        value: Decimal::ZERO,
    };

    /// Creates a new Amount from a Decimal value.
    pub const fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Creates an Amount from a whole number of currency units.
    pub fn from_units(units: i64) -> Self {
        Self {
            value: Decimal::from(units),
        }
    }

    /// Creates an Amount from a value expressed in millions of currency units.
    /// Source datasets often carry `amountM` columns; the engine works in
    /// whole currency units throughout.
    pub fn from_millions(millions: Decimal) -> Self {
        Self {
            value: millions * Decimal::from(1_000_000),
        }
    }

    /// Parses loose currency text: every character other than digits, `.` and
    /// `-` is stripped before parsing, and text that still does not reduce to
    /// a finite number yields zero. This is the only parsing path for user
    /// entry text, so a half-typed value can never surface an error.
    pub fn parse_loose(s: &str) -> Self {
        let cleaned: String = s
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
            .collect();
        let value = cleaned.parse::<Decimal>().unwrap_or_default();
        Self { value }
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Returns the value scaled down to millions, for display datasets whose
    /// source data was expressed in millions.
    pub fn in_millions(&self) -> Decimal {
        self.value / Decimal::from(1_000_000)
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.value.is_sign_negative() && !self.value.is_zero()
    }

    /// Floors the amount at zero. Adjusted line-item values are clamped with
    /// this everywhere they are read so a large negative delta can never
    /// produce a negative budget amount.
    pub fn clamp_non_negative(self) -> Self {
        if self.is_negative() {
            Self::ZERO
        } else {
            self
        }
    }
}

impl fmt::Display for Amount {
    /// Renders with thousands separators, no currency symbol, rounded to the
    /// nearest whole currency unit. This is the format used when regenerating
    /// draft entry text from a restored scenario.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.value.round();
        write!(
            f,
            "{}",
            format_num::format_num!(",.0", rounded.to_f64().unwrap_or_default())
        )
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount::new(self.value + rhs.value)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        self.value += rhs.value;
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Amount) -> Amount {
        Amount::new(self.value - rhs.value)
    }
}

impl Neg for Amount {
    type Output = Amount;

    fn neg(self) -> Amount {
        Amount::new(-self.value)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Amount {
        iter.fold(Amount::ZERO, |acc, a| acc + a)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Plain decimal string, no grouping, so round-trips are exact.
        serializer.serialize_str(&self.value.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(f64),
            Text(String),
        }

        // Unparseable amounts coerce to zero at this boundary.
        Ok(match Repr::deserialize(deserializer)? {
            Repr::Number(n) => Amount::new(Decimal::from_f64(n).unwrap_or_default()),
            Repr::Text(s) => Amount::parse_loose(&s),
        })
    }
}
