//! Proportional deposit and withdrawal math for pair liquidity.

use crate::errors::DomainError;
use crate::token::TokenAmount;
use primitive_types::{U256, U512};

fn mul_div(a: U256, b: U256, divisor: U256) -> Result<U256, DomainError> {
    if divisor.is_zero() {
        return Err(DomainError::NoLiquidity);
    }
    U256::try_from(a.full_mul(b) / U512::from(divisor)).map_err(|_| DomainError::AmountOverflow)
}

/// Add-liquidity auto-balance: given the amount typed on one side of an
/// existing pool, the amount the other side must contribute to preserve
/// the current reserve ratio.
///
/// ```text
/// amount_other = amount_edited * reserve_other / reserve_edited
/// ```
/// Applies in either direction (edit A to recompute B and vice versa).
/// Not defined for an uninitialized pool: the first provider sets both
/// sides freely, so callers skip auto-balance when the pair is absent.
pub fn matching_deposit(
    amount_edited: TokenAmount,
    reserve_edited: TokenAmount,
    reserve_other: TokenAmount,
) -> Result<TokenAmount, DomainError> {
    if reserve_edited.is_zero() || reserve_other.is_zero() {
        return Err(DomainError::NoLiquidity);
    }
    Ok(TokenAmount(mul_div(
        amount_edited.0,
        reserve_other.0,
        reserve_edited.0,
    )?))
}

/// The LP tokens burned and underlying amounts returned by a withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovalAmounts {
    /// LP tokens to burn.
    pub liquidity: TokenAmount,
    pub amount_a: TokenAmount,
    pub amount_b: TokenAmount,
}

/// Computes a proportional withdrawal for `percent` (0–100 inclusive) of
/// the user's LP balance.
///
/// `reserve_a`/`reserve_b` must already be in the caller's A/B token
/// order. Fails with [`DomainError::NoLiquidity`] when the pool supply is
/// zero (removal is undefined and must stay disabled).
pub fn removal_amounts(
    lp_balance: TokenAmount,
    percent: u8,
    total_supply: TokenAmount,
    reserve_a: TokenAmount,
    reserve_b: TokenAmount,
) -> Result<RemovalAmounts, DomainError> {
    if percent > 100 {
        return Err(DomainError::InvalidAmount(format!(
            "remove percent out of range: {percent}"
        )));
    }
    if total_supply.is_zero() {
        return Err(DomainError::NoLiquidity);
    }

    let liquidity = mul_div(lp_balance.0, U256::from(percent), U256::from(100u8))?;
    Ok(RemovalAmounts {
        liquidity: TokenAmount(liquidity),
        amount_a: TokenAmount(mul_div(liquidity, reserve_a.0, total_supply.0)?),
        amount_b: TokenAmount(mul_div(liquidity, reserve_b.0, total_supply.0)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_balance_preserves_ratio() {
        // 1:4 pool, typing 10 on the A side demands 40 of B.
        let other = matching_deposit(
            TokenAmount::from(10u64),
            TokenAmount::from(100u64),
            TokenAmount::from(400u64),
        )
        .unwrap();
        assert_eq!(other, TokenAmount::from(40u64));

        // And editing the B side back recomputes A.
        let back = matching_deposit(
            TokenAmount::from(40u64),
            TokenAmount::from(400u64),
            TokenAmount::from(100u64),
        )
        .unwrap();
        assert_eq!(back, TokenAmount::from(10u64));
    }

    #[test]
    fn auto_balance_needs_reserves() {
        assert_eq!(
            matching_deposit(
                TokenAmount::from(10u64),
                TokenAmount::zero(),
                TokenAmount::from(400u64),
            )
            .unwrap_err(),
            DomainError::NoLiquidity
        );
    }

    #[test]
    fn withdrawal_is_proportional() {
        // 500 LP of 1000 supply at 50% burns 250 and returns the pro-rata
        // share of 200/800 reserves.
        let amounts = removal_amounts(
            TokenAmount::from(500u64),
            50,
            TokenAmount::from(1000u64),
            TokenAmount::from(200u64),
            TokenAmount::from(800u64),
        )
        .unwrap();
        assert_eq!(amounts.liquidity, TokenAmount::from(250u64));
        assert_eq!(amounts.amount_a, TokenAmount::from(50u64));
        assert_eq!(amounts.amount_b, TokenAmount::from(200u64));
    }

    #[test]
    fn withdrawal_bounds() {
        assert!(
            removal_amounts(
                TokenAmount::from(500u64),
                101,
                TokenAmount::from(1000u64),
                TokenAmount::from(200u64),
                TokenAmount::from(800u64),
            )
            .is_err()
        );
        assert_eq!(
            removal_amounts(
                TokenAmount::from(500u64),
                50,
                TokenAmount::zero(),
                TokenAmount::from(200u64),
                TokenAmount::from(800u64),
            )
            .unwrap_err(),
            DomainError::NoLiquidity
        );
    }

    #[test]
    fn hundred_percent_drains_share() {
        let amounts = removal_amounts(
            TokenAmount::from(1000u64),
            100,
            TokenAmount::from(1000u64),
            TokenAmount::from(333u64),
            TokenAmount::from(777u64),
        )
        .unwrap();
        assert_eq!(amounts.liquidity, TokenAmount::from(1000u64));
        assert_eq!(amounts.amount_a, TokenAmount::from(333u64));
        assert_eq!(amounts.amount_b, TokenAmount::from(777u64));
    }
}
