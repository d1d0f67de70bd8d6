// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Conversion from a token's smallest unit to display units.

use alloy::primitives::U256;

/// Decimal places of the `mwei` unit (10^6 smallest units per display unit).
///
/// Balances are always rendered on this scale regardless of the token's own
/// `decimals()`. Correct for 6-decimal stablecoins such as USDC and USDT only.
pub const MWEI_DECIMALS: u8 = 6;

/// Render a smallest-unit amount on the fixed `mwei` scale.
pub fn from_mwei(value: U256) -> String {
    format_units(value, MWEI_DECIMALS)
}

/// Format an amount with the given number of decimals.
///
/// Exact: the fractional part keeps every significant digit and drops
/// trailing zeros. Zero renders as `"0"`.
pub fn format_units(value: U256, decimals: u8) -> String {
    if value.is_zero() {
        return "0".to_string();
    }
    if decimals == 0 {
        return value.to_string();
    }

    let divisor = U256::from(10u64).pow(U256::from(decimals));
    let whole = value / divisor;
    let remainder = value % divisor;

    if remainder.is_zero() {
        return whole.to_string();
    }

    let fraction = format!("{:0>width$}", remainder, width = decimals as usize);
    format!("{}.{}", whole, fraction.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_mwei() {
        assert_eq!(from_mwei(U256::from(1_500_000u64)), "1.5");
        assert_eq!(from_mwei(U256::from(1_000_000u64)), "1");
        assert_eq!(from_mwei(U256::from(1u64)), "0.000001");
        assert_eq!(from_mwei(U256::from(123_456_789u64)), "123.456789");
        assert_eq!(from_mwei(U256::ZERO), "0");
    }

    #[test]
    fn test_format_units_keeps_full_precision() {
        // 1.23456789 with 18 decimals is not truncated
        let value = U256::from(1_234_567_890_000_000_000u64);
        assert_eq!(format_units(value, 18), "1.23456789");

        assert_eq!(format_units(U256::from(42u64), 0), "42");
    }

    #[test]
    fn test_format_units_large_values() {
        assert_eq!(
            from_mwei(U256::MAX),
            "115792089237316195423570985008687907853269984665640564039457584007913129.639935"
        );
    }
}
