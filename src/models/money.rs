use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Whole-baht amount. The domain has no sub-unit currency, so every price
/// that leaves the pricing engine is an integer number of baht.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn baht(amount: i64) -> Self {
        Money(amount)
    }

    pub fn amount(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Round a fractional computation result to the nearest baht.
    /// All rounding in the pricing engine funnels through here.
    pub fn round(value: f64) -> Self {
        Money(value.round() as i64)
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
