use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// Whole-rupee amount. Displays as `Rs.<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Rupees(pub i64);

impl Rupees {
    pub fn zero() -> Self {
        Rupees(0)
    }

    pub fn value(self) -> i64 {
        self.0
    }

    pub fn abs(self) -> Self {
        Rupees(self.0.saturating_abs())
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Rupees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rs.{}", self.0)
    }
}

impl Add for Rupees {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Rupees(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Rupees {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Rupees(self.0.saturating_sub(rhs.0))
    }
}

/// `total / days`, rounded to 2 decimal places. `days` of zero is treated as one.
pub fn per_day(total: i64, days: usize) -> Decimal {
    let days = Decimal::from(days.max(1) as u64);
    (Decimal::from(total) / days).round_dp(2)
}

/// Share of `part` in `total` as a percentage with one decimal place.
/// Zero when `total` is not positive.
pub fn share_percent(part: i64, total: i64) -> Decimal {
    if total <= 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(part) * Decimal::from(100) / Decimal::from(total)).round_dp(1)
}
