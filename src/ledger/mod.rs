//! Remote ledger access: the read-call seam and its JSON-RPC implementation.

mod reader;
mod rpc;

pub use reader::{read_liquidity, read_slot0, LedgerContext, LedgerReader, Slot0};
pub use rpc::RpcLedgerReader;
