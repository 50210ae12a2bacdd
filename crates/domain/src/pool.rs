use crate::token::TokenAmount;
use crate::value_objects::address::Address;
use serde::{Deserialize, Serialize};

/// A point-in-time read of a pair's on-chain state.
///
/// Reserves come back in the contract's fixed token0/token1 order, which
/// is independent of which token the user put on which side of the form.
/// Snapshots are never mutated locally; the poller replaces them wholesale
/// on every tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveSnapshot {
    pub pair: Address,
    /// Canonical first token of the pair.
    pub token0: Address,
    pub reserve0: TokenAmount,
    pub reserve1: TokenAmount,
    pub total_supply: TokenAmount,
    /// Unix seconds when this snapshot was fetched.
    pub fetched_at: u64,
}

impl ReserveSnapshot {
    /// Whether the pool currently holds liquidity on both sides.
    pub fn has_liquidity(&self) -> bool {
        !self.reserve0.is_zero() && !self.reserve1.is_zero()
    }

    /// Re-maps `(reserve0, reserve1)` into the caller's A/B order, where
    /// `token_a` is the caller's first token. Address comparison is
    /// case-insensitive.
    pub fn oriented(&self, token_a: &Address) -> (TokenAmount, TokenAmount) {
        if &self.token0 == token_a {
            (self.reserve0, self.reserve1)
        } else {
            (self.reserve1, self.reserve0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitive_types::U256;

    fn snapshot(token0: &str) -> ReserveSnapshot {
        ReserveSnapshot {
            pair: "0x33d3c9DC1D84613FCc9356353435c35C3c08ea63".parse().unwrap(),
            token0: token0.parse().unwrap(),
            reserve0: TokenAmount(U256::from(100u64)),
            reserve1: TokenAmount(U256::from(400u64)),
            total_supply: TokenAmount(U256::from(200u64)),
            fetched_at: 0,
        }
    }

    #[test]
    fn orientation_follows_token0() {
        let snap = snapshot("0x3600000000000000000000000000000000000000");
        let usdc: Address = "0x3600000000000000000000000000000000000000".parse().unwrap();
        let eurc: Address = "0x89B50855Aa3bE2F677cD6303Cec089B5F319D72a".parse().unwrap();

        assert_eq!(
            snap.oriented(&usdc),
            (TokenAmount::from(100u64), TokenAmount::from(400u64))
        );
        // Caller has the pair the other way round: reserves must swap.
        assert_eq!(
            snap.oriented(&eurc),
            (TokenAmount::from(400u64), TokenAmount::from(100u64))
        );
    }

    #[test]
    fn orientation_is_case_insensitive() {
        let snap = snapshot("0x89B50855Aa3bE2F677cD6303Cec089B5F319D72a");
        let lower: Address = "0x89b50855aa3be2f677cd6303cec089b5f319d72a".parse().unwrap();
        assert_eq!(
            snap.oriented(&lower),
            (TokenAmount::from(100u64), TokenAmount::from(400u64))
        );
    }
}
