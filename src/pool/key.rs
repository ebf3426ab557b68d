use alloy::primitives::{Address, B256};
use log::debug;
use serde::{Deserialize, Serialize};

use super::currency::Currency;
use crate::utils::compute_pool_id;

/// Tick spacing used when a request does not name one (the 0.30% tier's spacing).
pub const DEFAULT_TICK_SPACING: i32 = 60;

/// Two distinct currencies sorted by key address (lower first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AssetPair {
    currency0: Currency,
    currency1: Currency,
}

impl AssetPair {
    /// Order two currencies into a pair.
    ///
    /// Returns `None` when both sides resolve to the same underlying token,
    /// which includes the native currency against its own wrapper, or share a
    /// key address (two native sides, or native against the zero token).
    pub fn new(a: Currency, b: Currency) -> Option<Self> {
        if a.same_underlying(&b) || a.key_address() == b.key_address() {
            return None;
        }

        let (currency0, currency1) =
            if a.key_address() < b.key_address() { (a, b) } else { (b, a) };

        Some(Self {
            currency0,
            currency1,
        })
    }

    pub fn currency0(&self) -> Currency {
        self.currency0
    }

    pub fn currency1(&self) -> Currency {
        self.currency1
    }
}

/// V4 pool key. Two keys are the same pool iff all five fields match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PoolKey {
    currency0: Currency,
    currency1: Currency,
    fee: u32,
    tick_spacing: i32,
    hooks: Address,
}

impl PoolKey {
    pub fn new(pair: AssetPair, fee: u32, tick_spacing: i32, hooks: Address) -> Self {
        Self {
            currency0: pair.currency0,
            currency1: pair.currency1,
            fee,
            tick_spacing,
            hooks,
        }
    }

    pub fn currency0(&self) -> Currency {
        self.currency0
    }

    pub fn currency1(&self) -> Currency {
        self.currency1
    }

    pub fn fee(&self) -> u32 {
        self.fee
    }

    pub fn tick_spacing(&self) -> i32 {
        self.tick_spacing
    }

    pub fn hooks(&self) -> Address {
        self.hooks
    }

    pub fn pair(&self) -> AssetPair {
        AssetPair {
            currency0: self.currency0,
            currency1: self.currency1,
        }
    }

    /// Lookup identifier: `keccak256(abi.encode(currency0, currency1, fee, tickSpacing, hooks))`.
    pub fn pool_id(&self) -> B256 {
        compute_pool_id(
            self.currency0.key_address(),
            self.currency1.key_address(),
            self.fee,
            self.tick_spacing,
            self.hooks,
        )
    }
}

/// A caller's pool request. Every field may be missing while the caller is
/// still assembling it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PoolRequest {
    #[serde(default)]
    pub currency_a: Option<Currency>,
    #[serde(default)]
    pub currency_b: Option<Currency>,
    #[serde(default)]
    pub fee: Option<u32>,
    #[serde(default)]
    pub tick_spacing: Option<i32>,
    #[serde(default)]
    pub hooks: Option<Address>,
}

impl PoolRequest {
    pub fn new(
        currency_a: Option<Currency>,
        currency_b: Option<Currency>,
        fee: Option<u32>,
        tick_spacing: Option<i32>,
        hooks: Option<Address>,
    ) -> Self {
        Self {
            currency_a,
            currency_b,
            fee,
            tick_spacing,
            hooks,
        }
    }

    /// Point every native side of the request at the chain's wrapped token.
    pub fn with_wrapped_native(self, wrapped: Address) -> Self {
        Self {
            currency_a: self.currency_a.map(|c| c.with_wrapped_native(wrapped)),
            currency_b: self.currency_b.map(|c| c.with_wrapped_native(wrapped)),
            ..self
        }
    }
}

/// Normalize a request into a pool key.
///
/// Yields no key when either currency or the fee is missing, or when both
/// currencies resolve to the same token. A missing tick spacing falls back to
/// [`DEFAULT_TICK_SPACING`] and missing hooks to the zero address.
pub fn normalize(request: &PoolRequest) -> Option<PoolKey> {
    let pair = AssetPair::new(request.currency_a?, request.currency_b?)?;
    let fee = request.fee?;

    let key = PoolKey::new(
        pair,
        fee,
        request.tick_spacing.unwrap_or(DEFAULT_TICK_SPACING),
        request.hooks.unwrap_or(Address::ZERO),
    );

    debug!(
        "Normalized pool {}/{} fee={} tick_spacing={} hooks={} -> id {}",
        key.currency0,
        key.currency1,
        key.fee,
        key.tick_spacing,
        key.hooks,
        key.pool_id()
    );

    Some(key)
}
