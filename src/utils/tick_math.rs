//! Tick math for Uniswap V4 pool validation.
//!
//! Exact integer port of TickMath.sol's `getSqrtRatioAtTick`, used to check
//! that a pool's reported sqrtPriceX96 agrees with its reported tick.

use alloy::primitives::{uint, U256};

// ============================================
// Tick and Price Bounds
// ============================================

/// Minimum tick supported by V3/V4 pools.
pub const MIN_TICK: i32 = -887272;

/// Maximum tick supported by V3/V4 pools.
pub const MAX_TICK: i32 = 887272;

/// sqrtPriceX96 at `MIN_TICK`.
pub const MIN_SQRT_RATIO: U256 = uint!(4295128739_U256);

/// sqrtPriceX96 at `MAX_TICK`. Valid prices are strictly below this.
pub const MAX_SQRT_RATIO: U256 = uint!(1461446703485210103287273052203988822378723970342_U256);

// Q128.128 multipliers: 1/sqrt(1.0001)^(2^i) for i = 1..19.
// Bit 0 is handled separately since it seeds the ratio.
const TICK_MULTIPLIERS: [U256; 19] = [
    uint!(0xfff97272373d413259a46990580e213a_U256),
    uint!(0xfff2e50f5f656932ef12357cf3c7fdcc_U256),
    uint!(0xffe5caca7e10e4e61c3624eaa0941cd0_U256),
    uint!(0xffcb9843d60f6159c9db58835c926644_U256),
    uint!(0xff973b41fa98c081472e6896dfb254c0_U256),
    uint!(0xff2ea16466c96a3843ec78b326b52861_U256),
    uint!(0xfe5dee046a99a2a811c461f1969c3053_U256),
    uint!(0xfcbe86c7900a88aedcffc83b479aa3a4_U256),
    uint!(0xf987a7253ac413176f2b074cf7815e54_U256),
    uint!(0xf3392b0822b70005940c7a398e4b70f3_U256),
    uint!(0xe7159475a2c29b7443b29c7fa6e889d9_U256),
    uint!(0xd097f3bdfd2022b8845ad8f792aa5825_U256),
    uint!(0xa9f746462d870fdf8a65dc1f90e061e5_U256),
    uint!(0x70d869a156d2a1b890bb3df62baf32f7_U256),
    uint!(0x31be135f97d08fd981231505542fcfa6_U256),
    uint!(0x9aa508b5b7a84e1c677de54f3e99bc9_U256),
    uint!(0x5d6af8dedb81196699c329225ee604_U256),
    uint!(0x2216e584f5fa1ea926041bedfe98_U256),
    uint!(0x48a170391f7dc42444e8fa2_U256),
];

// ============================================
// Tick to Price Conversion
// ============================================

/// Convert a tick to its sqrt price ratio in Q64.96 format.
///
/// Formula: sqrt(1.0001^tick) * 2^96, rounded up.
/// Returns `None` when the tick lies outside `[MIN_TICK, MAX_TICK]`.
pub fn sqrt_ratio_at_tick(tick: i32) -> Option<U256> {
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return None;
    }

    let abs_tick = tick.unsigned_abs();

    let mut ratio = if abs_tick & 0x1 != 0 {
        uint!(0xfffcb933bd6fad37aa2d162d1a594001_U256)
    } else {
        U256::from(1) << 128
    };

    for (bit, multiplier) in TICK_MULTIPLIERS.iter().enumerate() {
        if abs_tick & (0x2 << bit) != 0 {
            ratio = (ratio * *multiplier) >> 128;
        }
    }

    // For positive ticks, take reciprocal
    if tick > 0 {
        ratio = U256::MAX / ratio;
    }

    // Q128.128 -> Q64.96, rounding up
    let round_up = !(ratio & U256::from(u32::MAX)).is_zero();
    Some((ratio >> 32) + U256::from(round_up as u8))
}

/// Check that `sqrt_price_x96` falls in the price range covered by `tick`.
///
/// A pool at tick `t` must satisfy
/// `sqrt_ratio_at_tick(t) <= sqrt_price_x96 <= sqrt_ratio_at_tick(t + 1)`.
/// The upper bound is inclusive: a zeroForOne swap that stops exactly on a
/// tick boundary leaves `tick = boundary - 1` with the price at the boundary.
/// At `MAX_TICK` the price must stay below `MAX_SQRT_RATIO`.
pub fn tick_matches_sqrt_price(tick: i32, sqrt_price_x96: U256) -> bool {
    let Some(lower) = sqrt_ratio_at_tick(tick) else {
        return false;
    };
    if sqrt_price_x96 < lower {
        return false;
    }

    if tick == MAX_TICK {
        return sqrt_price_x96 < MAX_SQRT_RATIO;
    }

    match sqrt_ratio_at_tick(tick + 1) {
        Some(upper) => sqrt_price_x96 <= upper,
        None => false,
    }
}
