//! Decimal token amounts.

use alloy::primitives::utils::parse_units;
use alloy::primitives::U256;

use crate::error::AppError;

/// Decimals of the native currency.
pub const NATIVE_DECIMALS: u8 = 18;

/// Parses a non-negative decimal amount into base units. An empty string is zero.
pub fn parse_amount(input: &str, decimals: u8) -> Result<U256, AppError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(U256::ZERO);
    }
    if trimmed.starts_with('-') {
        return Err(AppError::Validation(format!(
            "amount must not be negative: {trimmed}"
        )));
    }
    parse_units(trimmed, decimals)
        .map(|parsed| parsed.get_absolute())
        .map_err(|e| AppError::Validation(format!("invalid amount '{trimmed}': {e}")))
}

/// Formats base units with exactly `decimals` fractional digits.
pub fn format_fixed(amount: U256, decimals: u8) -> String {
    let digits = amount.to_string();
    let width = decimals as usize;
    if width == 0 {
        return digits;
    }
    let padded = format!("{digits:0>w$}", w = width + 1);
    let (int_part, frac_part) = padded.split_at(padded.len() - width);
    format!("{int_part}.{frac_part}")
}

/// Formats base units for display, dropping trailing fractional zeros.
pub fn format_display(amount: U256, decimals: u8) -> String {
    let fixed = format_fixed(amount, decimals);
    if !fixed.contains('.') {
        return fixed;
    }
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_owned()
}

/// Converts a cost in native base units into the token denomination, given
/// the price of one token in native units, rounded half-up to the token's
/// decimal precision.
pub fn native_cost_to_token(
    cost_in_native: U256,
    token_price_in_native: &str,
    token_decimals: u8,
) -> Result<String, AppError> {
    let price = parse_amount(token_price_in_native, NATIVE_DECIMALS)?;
    if price.is_zero() {
        return Err(AppError::Validation(
            "token price must be greater than zero".to_owned(),
        ));
    }
    let scale = U256::from(10u8)
        .checked_pow(U256::from(token_decimals))
        .ok_or_else(|| {
            AppError::Validation(format!("token decimals out of range: {token_decimals}"))
        })?;
    let numerator = cost_in_native
        .checked_mul(scale)
        .ok_or_else(|| AppError::Validation("fee conversion overflow".to_owned()))?;
    let quotient = numerator / price;
    let remainder = numerator % price;
    // remainder >= price / 2, without doubling the remainder
    let rounded = if remainder >= price - remainder {
        quotient + U256::from(1u8)
    } else {
        quotient
    };
    Ok(format_fixed(rounded, token_decimals))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_amount_accepts_fractions_and_empty() {
        assert_eq!(parse_amount("", 18).unwrap(), U256::ZERO);
        assert_eq!(parse_amount("1.5", 2).unwrap(), U256::from(150u64));
        assert!(parse_amount("-1", 18).is_err());
        assert!(parse_amount("abc", 18).is_err());
    }

    #[test]
    fn format_fixed_pads_small_values() {
        assert_eq!(format_fixed(U256::from(5u64), 3), "0.005");
        assert_eq!(format_fixed(U256::from(12345u64), 2), "123.45");
        assert_eq!(format_fixed(U256::from(7u64), 0), "7");
    }

    #[test]
    fn format_display_trims_zeros() {
        assert_eq!(format_display(U256::from(1_500_000u64), 6), "1.5");
        assert_eq!(format_display(U256::from(2_000_000u64), 6), "2");
    }

    #[test]
    fn native_cost_is_divided_by_price_and_rounded() {
        // 0.001 native at 0.5 native per token is 0.002 tokens.
        let cost = U256::from(1_000_000_000_000_000u64);
        assert_eq!(native_cost_to_token(cost, "0.5", 4).unwrap(), "0.0020");
        // 1 wei at price 3 rounds 0.333.. down, 2 wei rounds 0.666.. up.
        assert_eq!(
            native_cost_to_token(U256::from(1u8), "0.000000000000000003", 0).unwrap(),
            "0"
        );
        assert_eq!(
            native_cost_to_token(U256::from(2u8), "0.000000000000000003", 0).unwrap(),
            "1"
        );
    }

    #[test]
    fn decimals_beyond_the_word_size_are_rejected() {
        let err = native_cost_to_token(U256::from(1u8), "1", 78).unwrap_err();
        assert!(matches!(err, AppError::Validation(m) if m.contains("out of range")));
        assert!(native_cost_to_token(U256::ZERO, "1", 77).is_ok());
    }

    #[test]
    fn zero_price_is_rejected() {
        assert!(native_cost_to_token(U256::from(1u8), "0", 18).is_err());
    }
}
