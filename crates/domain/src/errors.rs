use thiserror::Error;

/// Errors produced by domain math and parsing.
///
/// None of these are fatal: `InvalidAmount` rejects user input locally,
/// `NoLiquidity` means a quote or withdrawal is simply unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// User input is not a valid non-negative decimal amount for the
    /// token's precision.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Pair is absent or a reserve is zero; there is nothing to quote
    /// against. Callers render an empty state, not an error banner.
    #[error("no liquidity available")]
    NoLiquidity,

    /// A 256-bit result would overflow.
    #[error("amount overflows 256 bits")]
    AmountOverflow,
}
