//! Price conversion utilities for Uniswap V4.
//!
//! Converts sqrtPriceX96 values to decimal-adjusted prices.

use alloy::primitives::U256;
use bigdecimal::BigDecimal;
use num_bigint::{BigInt, Sign};
use num_traits::ToPrimitive;
use once_cell::sync::Lazy;

use super::conversion::big_pow10;

// ============================================
// Constants
// ============================================

/// 2^96 (Q64.96 fixed point scaling factor) as an exact BigDecimal.
static Q96: Lazy<BigDecimal> = Lazy::new(|| BigDecimal::from(BigInt::from(1u8) << 96));

/// Maximum decimals accepted for either side of a pool.
const MAX_DECIMALS: u8 = 24;

// ============================================
// sqrtPriceX96 to Price Conversion
// ============================================

/// Convert sqrtPriceX96 to the decimal-adjusted price of token0 in token1.
///
/// # Arguments
/// * `sqrt_price_x96` - The pool's current sqrtPriceX96
/// * `token0_decimals` - Decimal places of token0
/// * `token1_decimals` - Decimal places of token1
///
/// # Returns
/// * `Some(price)` (token1 per token0) if finite and positive, `None` otherwise
pub fn sqrt_price_x96_to_adjusted_price(
    sqrt_price_x96: U256,
    token0_decimals: u8,
    token1_decimals: u8,
) -> Option<f64> {
    if token0_decimals > MAX_DECIMALS || token1_decimals > MAX_DECIMALS {
        return None;
    }
    if sqrt_price_x96.is_zero() {
        return None;
    }

    let sqrt_price = BigDecimal::from(BigInt::from_bytes_le(
        Sign::Plus,
        &sqrt_price_x96.to_le_bytes::<32>(),
    ));

    // raw_price = (sqrtPriceX96 / Q96)^2
    let normalized = &sqrt_price / &*Q96;
    let raw_price = &normalized * &normalized;

    // decimal adjustment: 10^(decimals0 - decimals1)
    let decimal_diff = token0_decimals as i32 - token1_decimals as i32;
    let adjusted = if decimal_diff >= 0 {
        raw_price * big_pow10(decimal_diff as u8)
    } else {
        raw_price / big_pow10((-decimal_diff) as u8)
    };

    let adjusted_f64 = adjusted.to_f64()?;
    if adjusted_f64.is_finite() && adjusted_f64 > 0.0 {
        Some(adjusted_f64)
    } else {
        None
    }
}
