pub mod abis;
pub mod cache;
pub mod config;
pub mod ledger;
pub mod pool;
pub mod resolver;
pub mod utils;

pub use cache::{PoolCache, SharedPoolCache};
pub use self::config::Settings;
pub use ledger::{LedgerContext, LedgerReader, RpcLedgerReader};
pub use pool::{Currency, PoolKey, PoolRequest, PoolState};
pub use resolver::{PoolAvailability, PoolResolution, PoolResolver};
