use std::{fmt, sync::Arc};

use log::warn;
use serde::Serialize;

use crate::{
    cache::PoolCache,
    ledger::Slot0,
    pool::{PoolKey, PoolState},
};

/// Tracking record for one remote read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallState<T> {
    pub loading: bool,
    /// False once the read failed (transport or decode).
    pub valid: bool,
    pub result: Option<T>,
}

impl<T> CallState<T> {
    pub fn loading() -> Self {
        Self {
            loading: true,
            valid: true,
            result: None,
        }
    }

    pub fn resolved(result: T) -> Self {
        Self {
            loading: false,
            valid: true,
            result: Some(result),
        }
    }

    pub fn failed() -> Self {
        Self {
            loading: false,
            valid: false,
            result: None,
        }
    }
}

/// Whether a requested pool can be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PoolAvailability {
    Loading,
    NotExists,
    Exists,
    Invalid,
}

impl fmt::Display for PoolAvailability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Loading => "LOADING",
            Self::NotExists => "NOT_EXISTS",
            Self::Exists => "EXISTS",
            Self::Invalid => "INVALID",
        };
        f.write_str(name)
    }
}

/// Availability paired with the pool, present only when it exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolResolution {
    pub availability: PoolAvailability,
    pub pool: Option<Arc<PoolState>>,
}

impl PoolResolution {
    pub fn invalid() -> Self {
        Self::without_pool(PoolAvailability::Invalid)
    }

    pub fn loading() -> Self {
        Self::without_pool(PoolAvailability::Loading)
    }

    pub fn not_exists() -> Self {
        Self::without_pool(PoolAvailability::NotExists)
    }

    pub fn exists(pool: Arc<PoolState>) -> Self {
        Self {
            availability: PoolAvailability::Exists,
            pool: Some(pool),
        }
    }

    fn without_pool(availability: PoolAvailability) -> Self {
        Self {
            availability,
            pool: None,
        }
    }
}

/// Reduce the request's key and read trackers to a resolution.
///
/// Rules, first match wins:
/// 1. no pool key, or either tracker absent → `Invalid`
/// 2. either read failed → `Invalid`
/// 3. either read in flight → `Loading`
/// 4. either read without result, or a zero sqrtPrice (uninitialized) → `NotExists`
/// 5. pool built (or found) in the cache → `Exists`; construction failure → `NotExists`
pub fn resolve(
    key: Option<&PoolKey>,
    slot0: Option<&CallState<Slot0>>,
    liquidity: Option<&CallState<u128>>,
    cache: &mut PoolCache,
) -> PoolResolution {
    let (Some(key), Some(slot0), Some(liquidity)) = (key, slot0, liquidity) else {
        return PoolResolution::invalid();
    };

    if !slot0.valid || !liquidity.valid {
        return PoolResolution::invalid();
    }

    if slot0.loading || liquidity.loading {
        return PoolResolution::loading();
    }

    let (Some(slot0), Some(liquidity)) = (slot0.result.as_ref(), liquidity.result) else {
        return PoolResolution::not_exists();
    };

    if slot0.sqrt_price_x96.is_zero() {
        return PoolResolution::not_exists();
    }

    match cache.get_pool(
        key,
        slot0.sqrt_price_x96,
        liquidity,
        slot0.tick,
        slot0.lp_fee,
    ) {
        Ok(pool) => PoolResolution::exists(pool),
        Err(e) => {
            warn!("Failed to construct pool {}: {}", key.pool_id(), e);
            PoolResolution::not_exists()
        },
    }
}
