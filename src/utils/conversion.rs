//! BigDecimal conversion helpers.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use once_cell::sync::Lazy;

// ============================================
// Internal Helpers
// ============================================

static POW10_CACHE: Lazy<[BigDecimal; 25]> =
    Lazy::new(|| std::array::from_fn(|i| BigDecimal::from(BigInt::from(10u32).pow(i as u32))));

/// Compute 10^exp as BigDecimal.
pub(crate) fn big_pow10(exp: u8) -> BigDecimal {
    if (exp as usize) < POW10_CACHE.len() {
        POW10_CACHE[exp as usize].clone()
    } else {
        BigDecimal::from(BigInt::from(10u32).pow(exp as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_big_pow10() {
        assert_eq!(big_pow10(0), BigDecimal::from(1));
        assert_eq!(big_pow10(6), BigDecimal::from(1_000_000));
        assert_eq!(big_pow10(30), BigDecimal::from_str("1e30").unwrap());
    }
}
