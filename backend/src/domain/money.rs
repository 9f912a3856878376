//! Monetary amounts in settlement-currency minor units.
//!
//! Every ledger amount is denominated in the platform settlement currency
//! (US dollars) and stored as integer minor units (cents). Fractional
//! arithmetic only happens at the display/conversion boundary; fee
//! computation stays in integer space with half-up rounding so repeated
//! bookkeeping never drifts.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Basis-point denominator: 10_000 bps = 100%.
const BPS_SCALE: i128 = 10_000;

/// Amount of money in integer minor units (cents) of the settlement currency.
///
/// ## Invariants
/// - Arithmetic helpers are checked; overflow surfaces as `None` instead of
///   wrapping.
///
/// # Examples
/// ```
/// use backend::domain::Money;
///
/// let amount = Money::from_major(100);
/// assert_eq!(amount.minor_units(), 10_000);
/// assert_eq!(amount.fee(500), Money::from_major(5));
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[serde(transparent)]
#[schema(value_type = i64, example = 10_000)]
pub struct Money(i64);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Build an amount from minor units (cents).
    #[must_use]
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Build an amount from whole major units (dollars).
    #[must_use]
    pub const fn from_major(major: i64) -> Self {
        Self(major * 100)
    }

    /// The amount in minor units.
    #[must_use]
    pub const fn minor_units(&self) -> i64 {
        self.0
    }

    /// True for amounts strictly greater than zero.
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checked addition.
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(minor) => Some(Self(minor)),
            None => None,
        }
    }

    /// Checked subtraction.
    #[must_use]
    pub const fn checked_sub(self, other: Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(minor) => Some(Self(minor)),
            None => None,
        }
    }

    /// Saturating addition, pinned at `i64::MAX` minor units.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Saturating subtraction, pinned at `i64::MIN` minor units.
    #[must_use]
    pub const fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Percentage of this amount expressed in basis points, rounded half-up.
    ///
    /// 500 bps is the 5% client deposit commission; 200 bps the 2%
    /// withdrawal fee.
    #[must_use]
    pub fn fee(&self, basis_points: u32) -> Self {
        let scaled = i128::from(self.0) * i128::from(basis_points);
        let rounded = (scaled + BPS_SCALE / 2).div_euclid(BPS_SCALE);
        Self(i64::try_from(rounded).unwrap_or(i64::MAX))
    }

    /// The amount as fractional major units, for display and rate conversion
    /// only.
    #[must_use]
    pub fn to_major_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Round fractional major units to the nearest minor unit.
    #[must_use]
    pub fn from_major_f64(value: f64) -> Self {
        Self((value * 100.0).round() as i64)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", magnitude / 100, magnitude % 100)
    }
}
