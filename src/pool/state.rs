use alloy::primitives::{Address, B256, U256};
use serde::Serialize;
use thiserror::Error;

use super::{
    currency::Currency,
    key::{AssetPair, PoolKey},
};
use crate::utils::{
    sqrt_price_x96_to_adjusted_price, tick_matches_sqrt_price,
    tick_math::{MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK},
};

/// Largest static LP fee, in hundredths of a bip (100%).
pub const MAX_LP_FEE: u32 = 1_000_000;

/// Fee value flagging a pool whose LP fee is set by its hook.
pub const DYNAMIC_FEE_FLAG: u32 = 0x800000;

/// Invariant violations detected while constructing a [`PoolState`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolStateError {
    #[error("fee {0} exceeds the maximum LP fee")]
    InvalidFee(u32),
    #[error("slot0 LP fee {0} exceeds the maximum LP fee")]
    InvalidLpFee(u32),
    #[error("tick spacing {0} must be positive")]
    InvalidTickSpacing(i32),
    #[error("tick {0} is outside the supported range")]
    TickOutOfRange(i32),
    #[error("sqrtPriceX96 {0} is outside the representable range")]
    SqrtPriceOutOfRange(U256),
    #[error("sqrtPriceX96 {sqrt_price_x96} does not lie within tick {tick}")]
    PriceTickMismatch { sqrt_price_x96: U256, tick: i32 },
}

/// Observed state of a V4 pool. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolState {
    pair: AssetPair,
    fee: u32,
    sqrt_price_x96: U256,
    liquidity: u128,
    tick_spacing: i32,
    tick: i32,
    hooks: Address,
    /// LP fee in force, as read from slot0. Differs from `fee` for dynamic-fee pools.
    lp_fee: u32,
}

impl PoolState {
    /// Build a pool from its key and the slot0/liquidity readings.
    ///
    /// `lp_fee` is slot0's current LP fee; for static-fee pools it equals the key's fee.
    ///
    /// # Errors
    ///
    /// Returns [`PoolStateError`] when the readings are inconsistent with each
    /// other or with the key.
    pub fn new(
        key: &PoolKey,
        sqrt_price_x96: U256,
        liquidity: u128,
        tick: i32,
        lp_fee: u32,
    ) -> Result<Self, PoolStateError> {
        let fee = key.fee();
        if fee > MAX_LP_FEE && fee != DYNAMIC_FEE_FLAG {
            return Err(PoolStateError::InvalidFee(fee));
        }

        if lp_fee > MAX_LP_FEE {
            return Err(PoolStateError::InvalidLpFee(lp_fee));
        }

        let tick_spacing = key.tick_spacing();
        if tick_spacing <= 0 {
            return Err(PoolStateError::InvalidTickSpacing(tick_spacing));
        }

        if !(MIN_TICK..=MAX_TICK).contains(&tick) {
            return Err(PoolStateError::TickOutOfRange(tick));
        }

        if sqrt_price_x96 < MIN_SQRT_RATIO || sqrt_price_x96 >= MAX_SQRT_RATIO {
            return Err(PoolStateError::SqrtPriceOutOfRange(sqrt_price_x96));
        }

        if !tick_matches_sqrt_price(tick, sqrt_price_x96) {
            return Err(PoolStateError::PriceTickMismatch {
                sqrt_price_x96,
                tick,
            });
        }

        Ok(Self {
            pair: key.pair(),
            fee,
            sqrt_price_x96,
            liquidity,
            tick_spacing,
            tick,
            hooks: key.hooks(),
            lp_fee,
        })
    }

    pub fn currency0(&self) -> Currency {
        self.pair.currency0()
    }

    pub fn currency1(&self) -> Currency {
        self.pair.currency1()
    }

    pub fn fee(&self) -> u32 {
        self.fee
    }

    pub fn sqrt_price_x96(&self) -> U256 {
        self.sqrt_price_x96
    }

    pub fn liquidity(&self) -> u128 {
        self.liquidity
    }

    pub fn tick_spacing(&self) -> i32 {
        self.tick_spacing
    }

    pub fn tick(&self) -> i32 {
        self.tick
    }

    pub fn hooks(&self) -> Address {
        self.hooks
    }

    pub fn lp_fee(&self) -> u32 {
        self.lp_fee
    }

    /// Whether the hook sets the LP fee (the key carries [`DYNAMIC_FEE_FLAG`]).
    pub fn is_dynamic_fee(&self) -> bool {
        self.fee == DYNAMIC_FEE_FLAG
    }

    /// Whether this pool was built from exactly these readings.
    ///
    /// Compares every field that identifies a cached instance, so two pools
    /// observed at different prices are distinct entries.
    pub fn matches(
        &self,
        key: &PoolKey,
        sqrt_price_x96: U256,
        liquidity: u128,
        tick: i32,
        lp_fee: u32,
    ) -> bool {
        self.pair == key.pair()
            && self.fee == key.fee()
            && self.tick_spacing == key.tick_spacing()
            && self.hooks == key.hooks()
            && self.sqrt_price_x96 == sqrt_price_x96
            && self.liquidity == liquidity
            && self.tick == tick
            && self.lp_fee == lp_fee
    }

    pub fn involves(&self, currency: &Currency) -> bool {
        self.currency0() == *currency || self.currency1() == *currency
    }

    pub fn pool_key(&self) -> PoolKey {
        PoolKey::new(self.pair, self.fee, self.tick_spacing, self.hooks)
    }

    pub fn pool_id(&self) -> B256 {
        self.pool_key().pool_id()
    }

    /// Price of currency0 denominated in currency1, adjusted for decimals.
    pub fn token0_price(&self, decimals0: u8, decimals1: u8) -> Option<f64> {
        sqrt_price_x96_to_adjusted_price(self.sqrt_price_x96, decimals0, decimals1)
    }

    /// Price of currency1 denominated in currency0, adjusted for decimals.
    pub fn token1_price(&self, decimals0: u8, decimals1: u8) -> Option<f64> {
        self.token0_price(decimals0, decimals1).map(|price| 1.0 / price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::sqrt_ratio_at_tick;
    use alloy::primitives::address;

    const WETH: Address = address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");
    const USDC: Address = address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");

    fn key(fee: u32, tick_spacing: i32) -> PoolKey {
        let pair = AssetPair::new(Currency::native(WETH), Currency::token(USDC)).unwrap();
        PoolKey::new(pair, fee, tick_spacing, Address::ZERO)
    }

    fn q96() -> U256 {
        U256::from(1) << 96
    }

    #[test]
    fn test_new_pool_at_tick_zero() {
        let pool = PoolState::new(&key(3000, 60), q96(), 1_000_000, 0, 3000).unwrap();

        assert!(pool.currency0().is_native());
        assert_eq!(pool.currency1(), Currency::token(USDC));
        assert_eq!(pool.fee(), 3000);
        assert_eq!(pool.liquidity(), 1_000_000);
        assert_eq!(pool.tick_spacing(), 60);
        assert_eq!(pool.pool_id(), key(3000, 60).pool_id());
        assert!(pool.involves(&Currency::token(USDC)));
        assert!(!pool.involves(&Currency::token(WETH)));
    }

    #[test]
    fn test_price_tick_mismatch() {
        let err = PoolState::new(&key(3000, 60), q96(), 1, 100, 3000).unwrap_err();
        assert_eq!(
            err,
            PoolStateError::PriceTickMismatch {
                sqrt_price_x96: q96(),
                tick: 100
            }
        );
    }

    #[test]
    fn test_price_out_of_range() {
        let err = PoolState::new(&key(3000, 60), U256::from(1), 1, MIN_TICK, 3000).unwrap_err();
        assert_eq!(err, PoolStateError::SqrtPriceOutOfRange(U256::from(1)));
    }

    #[test]
    fn test_tick_out_of_range() {
        let err = PoolState::new(&key(3000, 60), q96(), 1, MAX_TICK + 1, 3000).unwrap_err();
        assert_eq!(err, PoolStateError::TickOutOfRange(MAX_TICK + 1));
    }

    #[test]
    fn test_fee_and_tick_spacing_validation() {
        assert_eq!(
            PoolState::new(&key(MAX_LP_FEE + 1, 60), q96(), 1, 0, 0).unwrap_err(),
            PoolStateError::InvalidFee(MAX_LP_FEE + 1)
        );
        assert_eq!(
            PoolState::new(&key(3000, 0), q96(), 1, 0, 3000).unwrap_err(),
            PoolStateError::InvalidTickSpacing(0)
        );
    }

    #[test]
    fn test_dynamic_fee_pool_exposes_slot0_fee() {
        let pool = PoolState::new(&key(DYNAMIC_FEE_FLAG, 60), q96(), 1, 0, 4500).unwrap();

        assert!(pool.is_dynamic_fee());
        assert_eq!(pool.fee(), DYNAMIC_FEE_FLAG);
        assert_eq!(pool.lp_fee(), 4500);
        assert!(!pool.matches(&key(DYNAMIC_FEE_FLAG, 60), q96(), 1, 0, 500));

        assert_eq!(
            PoolState::new(&key(DYNAMIC_FEE_FLAG, 60), q96(), 1, 0, MAX_LP_FEE + 1).unwrap_err(),
            PoolStateError::InvalidLpFee(MAX_LP_FEE + 1)
        );
    }

    #[test]
    fn test_price_on_boundary_above_tick() {
        // A downward swap ending exactly on tick -600 records tick -601
        let boundary = sqrt_ratio_at_tick(-600).unwrap();
        let pool = PoolState::new(&key(3000, 60), boundary, 10_000, -601, 3000).unwrap();

        assert_eq!(pool.tick(), -601);
        assert_eq!(pool.sqrt_price_x96(), boundary);
    }

    #[test]
    fn test_nonzero_tick() {
        let price = sqrt_ratio_at_tick(-1200).unwrap();
        let pool = PoolState::new(&key(3000, 60), price, 42, -1200, 3000).unwrap();
        assert_eq!(pool.tick(), -1200);
        assert!(pool.matches(&key(3000, 60), price, 42, -1200, 3000));
        assert!(!pool.matches(&key(3000, 60), price, 43, -1200, 3000));
    }

    #[test]
    fn test_prices() {
        let pool = PoolState::new(&key(3000, 60), q96(), 1, 0, 3000).unwrap();
        let p0 = pool.token0_price(18, 6).unwrap();
        let p1 = pool.token1_price(18, 6).unwrap();
        assert!((p0 * p1 - 1.0).abs() < 1e-9);
    }
}
