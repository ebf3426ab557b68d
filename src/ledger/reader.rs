use std::{fmt, sync::Arc};

use alloy::{
    primitives::{Address, Bytes, B256, U256},
    sol_types::SolCall,
};
use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::abis::IStateView;

/// Read-only call access to the ledger.
#[async_trait]
pub trait LedgerReader: Send + Sync {
    /// Execute a read-only call of `data` against `to` and return the raw result.
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes>;
}

/// Connection the resolver reads pools through.
#[derive(Clone)]
pub struct LedgerContext {
    pub chain_id: u64,
    /// V4 StateView lens contract answering slot0/liquidity reads.
    pub state_view: Address,
    pub reader: Arc<dyn LedgerReader>,
}

impl fmt::Debug for LedgerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LedgerContext")
            .field("chain_id", &self.chain_id)
            .field("state_view", &self.state_view)
            .finish_non_exhaustive()
    }
}

impl LedgerContext {
    pub fn new(chain_id: u64, state_view: Address, reader: Arc<dyn LedgerReader>) -> Self {
        Self {
            chain_id,
            state_view,
            reader,
        }
    }

    /// Whether two contexts address the same contract on the same chain
    /// through the same reader.
    pub fn same_target(&self, other: &LedgerContext) -> bool {
        self.chain_id == other.chain_id
            && self.state_view == other.state_view
            && Arc::ptr_eq(&self.reader, &other.reader)
    }
}

/// Decoded `getSlot0` result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot0 {
    pub sqrt_price_x96: U256,
    pub tick: i32,
    /// LP fee currently charged. Tracks the hook's value on dynamic-fee pools.
    pub lp_fee: u32,
}

/// Read and decode a pool's slot0 through the StateView contract.
pub async fn read_slot0(context: &LedgerContext, pool_id: B256) -> Result<Slot0> {
    let data = IStateView::getSlot0Call { poolId: pool_id }.abi_encode();

    let raw = context
        .reader
        .call(context.state_view, data.into())
        .await
        .context("getSlot0 call failed")?;

    let decoded =
        IStateView::getSlot0Call::abi_decode_returns(&raw).context("Failed to decode getSlot0")?;

    Ok(Slot0 {
        sqrt_price_x96: U256::from(decoded.sqrtPriceX96),
        tick: decoded.tick.as_i32(),
        lp_fee: decoded.lpFee.to::<u32>(),
    })
}

/// Read and decode a pool's in-range liquidity through the StateView contract.
pub async fn read_liquidity(context: &LedgerContext, pool_id: B256) -> Result<u128> {
    let data = IStateView::getLiquidityCall { poolId: pool_id }.abi_encode();

    let raw = context
        .reader
        .call(context.state_view, data.into())
        .await
        .context("getLiquidity call failed")?;

    IStateView::getLiquidityCall::abi_decode_returns(&raw).context("Failed to decode getLiquidity")
}
