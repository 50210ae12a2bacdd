use crate::errors::DomainError;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// A tolerance expressed in basis points (1 bps = 0.01%).
///
/// Slippage settings are held as integer basis points so that the
/// minimum-amount math stays in the integer domain; `Decimal` is only
/// involved when translating a user-facing percent string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BasisPoints(pub u32);

impl BasisPoints {
    pub const ZERO: Self = Self(0);

    /// One hundred percent.
    pub const MAX: Self = Self(10_000);

    /// Converts a percentage (possibly fractional, e.g. `0.5`) to basis
    /// points, truncating anything below 0.01%.
    pub fn from_percent(pct: Decimal) -> Result<Self, DomainError> {
        if pct.is_sign_negative() {
            return Err(DomainError::InvalidAmount(format!("negative percent: {pct}")));
        }
        let bps = (pct * Decimal::from(100))
            .floor()
            .to_u32()
            .ok_or_else(|| DomainError::InvalidAmount(format!("percent out of range: {pct}")))?;
        if bps > Self::MAX.0 {
            return Err(DomainError::InvalidAmount(format!("percent out of range: {pct}")));
        }
        Ok(Self(bps))
    }

    pub fn as_percent(&self) -> Decimal {
        Decimal::from(self.0) / Decimal::from(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn percent_to_bps() {
        assert_eq!(BasisPoints::from_percent(dec!(0.5)).unwrap(), BasisPoints(50));
        assert_eq!(BasisPoints::from_percent(dec!(1)).unwrap(), BasisPoints(100));
        assert_eq!(BasisPoints::from_percent(dec!(100)).unwrap(), BasisPoints::MAX);
        // Sub-bps precision truncates rather than rounding up.
        assert_eq!(BasisPoints::from_percent(dec!(0.019)).unwrap(), BasisPoints(1));
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(BasisPoints::from_percent(dec!(-1)).is_err());
        assert!(BasisPoints::from_percent(dec!(100.01)).is_err());
    }

    #[test]
    fn back_to_percent() {
        assert_eq!(BasisPoints(50).as_percent(), dec!(0.5));
    }
}
