use crate::errors::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sentinel for the chain's native currency. Not a contract address: the
/// native token has no allowance and cannot be a pair leg on its own.
const NATIVE_SENTINEL: &str = "NATIVE";

const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// An on-chain address, normalized to lowercase hex at construction so
/// that equality and hashing are case-insensitive (checksummed and
/// lowercased renderings of the same address compare equal).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// The native-currency sentinel.
    pub fn native() -> Self {
        Self(NATIVE_SENTINEL.to_string())
    }

    /// The zero address, used by the factory to signal "pair absent".
    pub fn zero() -> Self {
        Self(ZERO_ADDRESS.to_string())
    }

    pub fn is_native(&self) -> bool {
        self.0 == NATIVE_SENTINEL
    }

    pub fn is_zero(&self) -> bool {
        self.0 == ZERO_ADDRESS
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Address {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == NATIVE_SENTINEL {
            return Ok(Self::native());
        }
        let hex = s
            .strip_prefix("0x")
            .ok_or_else(|| DomainError::InvalidAmount(format!("not an address: {s}")))?;
        if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(DomainError::InvalidAmount(format!("not an address: {s}")));
        }
        Ok(Self(format!("0x{}", hex.to_ascii_lowercase())))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparison_ignores_case() {
        let checksummed: Address = "0x89B50855Aa3bE2F677cD6303Cec089B5F319D72a"
            .parse()
            .unwrap();
        let lower: Address = "0x89b50855aa3be2f677cd6303cec089b5f319d72a"
            .parse()
            .unwrap();
        assert_eq!(checksummed, lower);
    }

    #[test]
    fn rejects_malformed() {
        assert!("0x1234".parse::<Address>().is_err());
        assert!("89b50855aa3be2f677cd6303cec089b5f319d72a"
            .parse::<Address>()
            .is_err());
        assert!("0xZZZ50855aa3be2f677cd6303cec089b5f319d72a"
            .parse::<Address>()
            .is_err());
    }

    #[test]
    fn sentinels() {
        assert!(Address::native().is_native());
        assert!(Address::zero().is_zero());
        assert!(!Address::zero().is_native());
        let zero: Address = "0x0000000000000000000000000000000000000000".parse().unwrap();
        assert!(zero.is_zero());
    }
}
