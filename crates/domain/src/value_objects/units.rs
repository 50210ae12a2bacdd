//! Exact conversion between human decimal strings and base-unit integers.
//!
//! Everything stays in the integer domain: a typed amount is parsed
//! digit-for-digit into `U256`, never through a float or `Decimal`, so a
//! submitted amount is bit-identical to what the contract will see.

use crate::errors::DomainError;
use primitive_types::U256;

fn pow10(decimals: u8) -> Result<U256, DomainError> {
    U256::from(10)
        .checked_pow(U256::from(decimals))
        .ok_or(DomainError::AmountOverflow)
}

/// Parses a non-negative decimal string into base units for a token with
/// the given precision.
///
/// Fails with [`DomainError::InvalidAmount`] on empty input, signs,
/// exponents, multiple decimal points, non-digit characters, or more
/// fractional digits than the token supports.
pub fn to_base_units(input: &str, decimals: u8) -> Result<U256, DomainError> {
    let input = input.trim();
    let reject = || DomainError::InvalidAmount(input.to_string());

    let (int_part, frac_part) = match input.split_once('.') {
        Some((i, f)) => (i, f),
        None => (input, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(reject());
    }
    let digits_only = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !digits_only(int_part) || !digits_only(frac_part) {
        return Err(reject());
    }
    if frac_part.len() > decimals as usize {
        return Err(DomainError::InvalidAmount(format!(
            "{input} exceeds {decimals} decimal places"
        )));
    }

    let int_value = if int_part.is_empty() {
        U256::zero()
    } else {
        U256::from_dec_str(int_part).map_err(|_| DomainError::AmountOverflow)?
    };
    let frac_value = if frac_part.is_empty() {
        U256::zero()
    } else {
        let raw = U256::from_dec_str(frac_part).map_err(|_| DomainError::AmountOverflow)?;
        raw.checked_mul(pow10(decimals - frac_part.len() as u8)?)
            .ok_or(DomainError::AmountOverflow)?
    };

    int_value
        .checked_mul(pow10(decimals)?)
        .and_then(|scaled| scaled.checked_add(frac_value))
        .ok_or(DomainError::AmountOverflow)
}

/// Formats base units as a decimal string with trailing zeros trimmed.
///
/// Purely presentational in the sense that it never rounds: the full
/// precision of `value` is preserved, so the round trip through
/// [`to_base_units`] is lossless.
pub fn to_decimal_string(value: U256, decimals: u8) -> String {
    let raw = value.to_string();
    let d = decimals as usize;
    if d == 0 {
        return raw;
    }

    let (int_part, frac_part) = if raw.len() > d {
        let (i, f) = raw.split_at(raw.len() - d);
        (i.to_string(), f.to_string())
    } else {
        ("0".to_string(), format!("{raw:0>d$}"))
    };

    let frac_trimmed = frac_part.trim_end_matches('0');
    if frac_trimmed.is_empty() {
        int_part
    } else {
        format!("{int_part}.{frac_trimmed}")
    }
}
