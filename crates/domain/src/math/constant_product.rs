//! Constant product (x * y = k) swap quoting.
//!
//! Mirrors the router's fixed-point arithmetic exactly, including the
//! 0.3% input-side fee and truncating division. A quote that disagrees
//! with the contract by even one base unit produces reverts or surprise
//! execution prices, so every operation here is integer-domain with
//! 512-bit intermediates.

use crate::errors::DomainError;
use crate::token::TokenAmount;
use primitive_types::{U256, U512};
use rust_decimal::Decimal;

/// Fee-adjusted input multiplier: the pair credits 99.7% of the input.
pub const SWAP_FEE_NUMERATOR: u64 = 997;
/// Fee denominator.
pub const SWAP_FEE_DENOMINATOR: u64 = 1000;

/// Impact above which submission is hard-blocked.
pub const BLOCK_IMPACT_BPS: u32 = 1_500;
/// Impact above which the UI shows a severe warning.
pub const SEVERE_IMPACT_BPS: u32 = 500;
/// Impact above which the trade is flagged as impermanent-loss relevant
/// for liquidity providers of the pair.
pub const IL_ADVISORY_BPS: u32 = 200;
/// Impact above which an informational warning is shown.
pub const WARN_IMPACT_BPS: u32 = 100;

/// UI policy band derived from the price impact of a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactSeverity {
    /// Below every threshold.
    Negligible,
    /// Above [`WARN_IMPACT_BPS`].
    Info,
    /// Above [`SEVERE_IMPACT_BPS`].
    Severe,
    /// Above [`BLOCK_IMPACT_BPS`]; submission must be disabled.
    Blocked,
}

/// A derived swap estimate. Recomputed on every input change, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapQuote {
    pub amount_in: TokenAmount,
    pub amount_out: TokenAmount,
    /// Simplified impact proxy in basis points:
    /// `amount_in * 10_000 / (reserve_in + amount_in)`. This measures
    /// trade size against the input reserve, not the spot-vs-execution
    /// price divergence.
    pub impact_bps: u32,
}

impl SwapQuote {
    pub fn impact_percent(&self) -> Decimal {
        Decimal::from(self.impact_bps) / Decimal::from(100)
    }

    pub fn severity(&self) -> ImpactSeverity {
        if self.impact_bps > BLOCK_IMPACT_BPS {
            ImpactSeverity::Blocked
        } else if self.impact_bps > SEVERE_IMPACT_BPS {
            ImpactSeverity::Severe
        } else if self.impact_bps > WARN_IMPACT_BPS {
            ImpactSeverity::Info
        } else {
            ImpactSeverity::Negligible
        }
    }

    /// Whether the trade is large enough to matter to LPs of the pair.
    pub fn il_advisory(&self) -> bool {
        self.impact_bps > IL_ADVISORY_BPS
    }
}

/// Quotes an exact-input swap against the given reserves.
///
/// ```text
/// amount_in_with_fee = amount_in * 997
/// amount_out = amount_in_with_fee * reserve_out
///            / (reserve_in * 1000 + amount_in_with_fee)
/// ```
/// A zero reserve on either side means "no liquidity" and yields
/// [`DomainError::NoLiquidity`]; a zero input yields a zero quote.
pub fn quote_exact_in(
    amount_in: TokenAmount,
    reserve_in: TokenAmount,
    reserve_out: TokenAmount,
) -> Result<SwapQuote, DomainError> {
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(DomainError::NoLiquidity);
    }
    if amount_in.is_zero() {
        return Ok(SwapQuote {
            amount_in,
            amount_out: TokenAmount::zero(),
            impact_bps: 0,
        });
    }

    let amount_in_with_fee = amount_in.0.full_mul(U256::from(SWAP_FEE_NUMERATOR));
    let numerator = amount_in_with_fee
        .checked_mul(U512::from(reserve_out.0))
        .ok_or(DomainError::AmountOverflow)?;
    let denominator = U512::from(reserve_in.0)
        .checked_mul(U512::from(SWAP_FEE_DENOMINATOR))
        .and_then(|scaled| scaled.checked_add(amount_in_with_fee))
        .ok_or(DomainError::AmountOverflow)?;
    let amount_out =
        U256::try_from(numerator / denominator).map_err(|_| DomainError::AmountOverflow)?;

    // Impact denominator cannot overflow 512 bits and is non-zero here.
    let impact = amount_in.0.full_mul(U256::from(10_000u64))
        / (U512::from(reserve_in.0) + U512::from(amount_in.0));

    Ok(SwapQuote {
        amount_in,
        amount_out: TokenAmount(amount_out),
        impact_bps: impact.as_u32(),
    })
}

/// Spot price of the input token in terms of the output token
/// (`reserve_out / reserve_in`). Display only; never feeds a transaction.
pub fn spot_price(
    reserve_in: TokenAmount,
    reserve_out: TokenAmount,
) -> Result<Decimal, DomainError> {
    use rust_decimal::prelude::FromStr;

    if reserve_in.is_zero() {
        return Err(DomainError::NoLiquidity);
    }
    let r_in = Decimal::from_str(&reserve_in.0.to_string())
        .map_err(|_| DomainError::AmountOverflow)?;
    let r_out = Decimal::from_str(&reserve_out.0.to_string())
        .map_err(|_| DomainError::AmountOverflow)?;
    Ok(r_out / r_in)
}
