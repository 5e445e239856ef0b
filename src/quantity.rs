pub mod energy;
pub mod power;

use serde::{Deserialize, Serialize};

/// Physical quantity over `f64`, tagged with the exponents of its power and time dimensions.
#[derive(
    Clone,
    Copy,
    Default,
    Deserialize,
    PartialEq,
    PartialOrd,
    Serialize,
    derive_more::Add,
    derive_more::AddAssign,
    derive_more::From,
    derive_more::Neg,
    derive_more::Sub,
    derive_more::SubAssign,
    derive_more::Sum,
)]
#[serde(transparent)]
pub struct Quantity<const POWER: isize, const TIME: isize>(pub f64);

impl<const POWER: isize, const TIME: isize> Quantity<POWER, TIME> {
    pub const ZERO: Self = Self(0.0);

    #[must_use]
    pub const fn abs(self) -> Self {
        Self(self.0.abs())
    }

    #[must_use]
    pub const fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    #[must_use]
    pub fn is_sign_negative(self) -> bool {
        self.0 < 0.0
    }

    #[must_use]
    pub fn is_sign_positive(self) -> bool {
        self.0 > 0.0
    }

    #[must_use]
    pub fn round_to(self, decimals: u8) -> Self {
        Self(round_to(self.0, decimals))
    }
}

/// Round half away from zero to the specified number of decimal places.
#[must_use]
pub fn round_to(value: f64, decimals: u8) -> f64 {
    let factor = 10.0_f64.powi(i32::from(decimals));
    (value * factor).round() / factor
}
