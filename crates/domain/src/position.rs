use crate::errors::DomainError;
use crate::token::TokenAmount;
use primitive_types::{U256, U512};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A user's stake in a pool: LP balance against the pool totals.
///
/// Reserves are expected in the caller's A/B order (see
/// [`crate::pool::ReserveSnapshot::oriented`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityPosition {
    pub lp_balance: TokenAmount,
    pub total_supply: TokenAmount,
    pub reserve_a: TokenAmount,
    pub reserve_b: TokenAmount,
}

impl LiquidityPosition {
    /// The underlying amounts this position can claim, `balance/supply`
    /// applied to each reserve independently. `None` when the pool is
    /// uninitialized (zero supply) - no share exists.
    pub fn share_amounts(&self) -> Option<(TokenAmount, TokenAmount)> {
        if self.total_supply.is_zero() {
            return None;
        }
        let share = |reserve: TokenAmount| {
            U256::try_from(self.lp_balance.0.full_mul(reserve.0) / U512::from(self.total_supply.0))
                .map(TokenAmount)
                .map_err(|_| DomainError::AmountOverflow)
        };
        // Numerator <= reserve * supply, so the quotient fits in 256 bits.
        share(self.reserve_a).ok().zip(share(self.reserve_b).ok())
    }

    /// Pool ownership as a display percentage.
    pub fn share_percent(&self) -> Option<Decimal> {
        use rust_decimal::prelude::FromStr;

        if self.total_supply.is_zero() {
            return None;
        }
        let balance = Decimal::from_str(&self.lp_balance.0.to_string()).ok()?;
        let supply = Decimal::from_str(&self.total_supply.0.to_string()).ok()?;
        Some(balance / supply * Decimal::from(100))
    }
}
