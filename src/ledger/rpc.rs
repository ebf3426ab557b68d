use std::time::Duration;

use alloy::{
    network::TransactionBuilder,
    primitives::{Address, Bytes},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use url::Url;

use super::reader::LedgerReader;

/// [`LedgerReader`] backed by an HTTP JSON-RPC endpoint (`eth_call`).
#[derive(Clone)]
pub struct RpcLedgerReader {
    provider: DynProvider,
    /// Optional bound on a single call. The resolver itself never times out.
    call_timeout: Option<Duration>,
}

impl RpcLedgerReader {
    pub fn new(rpc_url: &str, call_timeout: Option<Duration>) -> Result<Self> {
        let url = Url::parse(rpc_url).context("Invalid RPC URL")?;

        let client = ProviderBuilder::new().connect_http(url);

        Ok(Self {
            provider: DynProvider::new(client),
            call_timeout,
        })
    }

    /// Chain id reported by the endpoint.
    pub async fn chain_id(&self) -> Result<u64> {
        self.provider
            .get_chain_id()
            .await
            .context("eth_chainId failed")
    }
}

#[async_trait]
impl LedgerReader for RpcLedgerReader {
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes> {
        let tx = TransactionRequest::default().with_to(to).with_input(data);
        let call = self.provider.call(tx);

        match self.call_timeout {
            Some(timeout) => tokio::time::timeout(timeout, call)
                .await
                .context("eth_call timeout")?
                .context("eth_call failed"),
            None => call.await.context("eth_call failed"),
        }
    }
}
