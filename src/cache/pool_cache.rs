use std::{collections::VecDeque, sync::Arc};

use alloy::primitives::U256;
use log::debug;
use parking_lot::Mutex;

use crate::pool::{PoolKey, PoolState, PoolStateError};

/// Default number of entries kept per sequence.
///
/// Twice the distinct pools a long multi-hop route can touch (64).
pub const DEFAULT_CACHE_CAPACITY: usize = 128;

/// Pool cache shared between resolvers of one session.
pub type SharedPoolCache = Arc<Mutex<PoolCache>>;

/// Bounded store of canonical pool keys and constructed pool states.
///
/// Both sequences are ordered most-recently-inserted first. A hit returns
/// the stored instance without moving it; a miss inserts at the front and,
/// when that pushes the sequence over capacity, keeps only the most recent
/// half.
#[derive(Debug)]
pub struct PoolCache {
    capacity: usize,
    keys: VecDeque<Arc<PoolKey>>,
    pools: VecDeque<Arc<PoolState>>,
}

impl Default for PoolCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl PoolCache {
    pub fn new(capacity: usize) -> Self {
        // A capacity below 2 would evict the entry just inserted
        let capacity = capacity.max(2);

        Self {
            capacity,
            keys: VecDeque::with_capacity(capacity + 1),
            pools: VecDeque::with_capacity(capacity + 1),
        }
    }

    pub fn shared(capacity: usize) -> SharedPoolCache {
        Arc::new(Mutex::new(Self::new(capacity)))
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    /// Return the stored key equal to `key`, inserting it on a miss.
    pub fn canonical_key(&mut self, key: PoolKey) -> Arc<PoolKey> {
        if let Some(existing) = self.keys.iter().find(|k| ***k == key) {
            return existing.clone();
        }

        let key = Arc::new(key);
        self.keys.push_front(key.clone());
        Self::evict(&mut self.keys, self.capacity);

        key
    }

    /// Return the stored pool built from these readings, constructing it on a miss.
    ///
    /// # Errors
    ///
    /// Returns [`PoolStateError`] when the readings fail pool validation.
    /// Nothing is inserted in that case.
    pub fn get_pool(
        &mut self,
        key: &PoolKey,
        sqrt_price_x96: U256,
        liquidity: u128,
        tick: i32,
        lp_fee: u32,
    ) -> Result<Arc<PoolState>, PoolStateError> {
        if let Some(existing) = self
            .pools
            .iter()
            .find(|p| p.matches(key, sqrt_price_x96, liquidity, tick, lp_fee))
        {
            return Ok(existing.clone());
        }

        let pool = Arc::new(PoolState::new(key, sqrt_price_x96, liquidity, tick, lp_fee)?);
        self.pools.push_front(pool.clone());
        Self::evict(&mut self.pools, self.capacity);

        Ok(pool)
    }

    fn evict<T>(entries: &mut VecDeque<T>, capacity: usize) {
        if entries.len() > capacity {
            entries.truncate(capacity / 2);
            debug!("Pool cache over capacity {capacity}, kept {} entries", entries.len());
        }
    }
}
