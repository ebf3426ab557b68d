//! Utility functions for poolkeep.
//!
//! This module is organized into focused submodules:
//!
//! - [`conversion`] - BigDecimal helpers
//! - [`tick_math`] - Uniswap V4 tick calculations
//! - [`price`] - Price conversion utilities (sqrtPriceX96)
//! - [`pool_id`] - Uniswap V4 pool ID computation

mod conversion;
mod pool_id;
mod price;
pub mod tick_math;

// ============================================
// Re-exports
// ============================================

// Pool ID utilities (V4)
pub use pool_id::compute_pool_id;

// Price conversion utilities
pub use price::sqrt_price_x96_to_adjusted_price;

// Tick math utilities
pub use tick_math::{sqrt_ratio_at_tick, tick_matches_sqrt_price};
