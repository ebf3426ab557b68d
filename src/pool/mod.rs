//! Pool identity and state types.
//!
//! - [`currency`] - Native/token currencies and their canonical wrapped form
//! - [`key`] - Request normalization, sorted pairs and V4 pool keys
//! - [`state`] - Validated pool state snapshots

pub mod currency;
pub mod key;
pub mod state;

pub use currency::Currency;
pub use key::{normalize, AssetPair, PoolKey, PoolRequest, DEFAULT_TICK_SPACING};
pub use state::{PoolState, PoolStateError, DYNAMIC_FEE_FLAG, MAX_LP_FEE};
