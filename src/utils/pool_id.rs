//! Uniswap V4 pool ID utilities.
//!
//! Functions for computing V4 pool IDs from pool key fields.

use alloy::primitives::{keccak256, Address, B256};
use alloy::sol_types::SolValue;

/// Compute the Uniswap V4 pool ID from pool key fields.
///
/// The pool ID is computed as:
/// ```text
/// keccak256(abi.encode(currency0, currency1, fee, tickSpacing, hooks))
/// ```
///
/// The encoding is order-sensitive: callers must pass currencies already
/// sorted (lower address first, so the native currency is always `currency0`).
///
/// # Arguments
/// * `currency0` - Lower currency address (zero address for the native currency)
/// * `currency1` - Higher currency address
/// * `fee` - Pool fee in hundredths of a bip (e.g., 3000 = 0.30%)
/// * `tick_spacing` - Tick spacing for the pool
/// * `hooks` - Hook contract address (zero address if no hooks)
pub fn compute_pool_id(
    currency0: Address,
    currency1: Address,
    fee: u32,
    tick_spacing: i32,
    hooks: Address,
) -> B256 {
    // (address, address, uint24, int24, address) pads identically to the
    // (address, address, uint32, int32, address) tuple used here
    let encoded = (currency0, currency1, fee, tick_spacing, hooks).abi_encode();

    keccak256(&encoded)
}
