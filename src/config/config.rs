use alloy::primitives::Address;
use config::{Config, ConfigError, Environment, File};
use log::LevelFilter;
use serde::Deserialize;

use crate::{cache::DEFAULT_CACHE_CAPACITY, pool::PoolRequest};

/// Ledger connection configuration.
///
/// The StateView contract answers `getSlot0`/`getLiquidity` reads for every
/// V4 pool on the chain, keyed by pool id.
#[derive(Debug, Deserialize, Clone)]
pub struct LedgerSettings {
    pub rpc_url: String,
    pub chain_id: u64,
    pub state_view_address: Address,
    /// Wrapped native token (e.g. WETH), the canonical form of the native currency.
    /// Overrides any `wrapped` given on a pool's native side.
    pub wrapped_native_address: Address,
    /// Per-call bound applied by the RPC reader. Unset means no timeout.
    #[serde(default)]
    pub call_timeout_ms: Option<u64>,
}

/// Resolver and cache tuning.
#[derive(Debug, Deserialize, Clone)]
pub struct ResolverSettings {
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            cache_capacity: default_cache_capacity(),
            refresh_interval_ms: default_refresh_interval_ms(),
        }
    }
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

fn default_refresh_interval_ms() -> u64 {
    12_000 // One mainnet block
}

/// A pool to resolve and keep refreshed.
#[derive(Debug, Deserialize, Clone)]
pub struct WatchedPool {
    pub name: String,
    #[serde(flatten)]
    pub request: PoolRequest,
}

impl WatchedPool {
    /// The pool's request with native sides bound to the ledger's wrapped token.
    pub fn chain_request(&self, ledger: &LedgerSettings) -> PoolRequest {
        self.request
            .clone()
            .with_wrapped_native(ledger.wrapped_native_address)
    }
}

/// Root application configuration.
///
/// Loaded from `config.yaml` at startup, with `POOLKEEP__`-prefixed
/// environment variables overriding individual keys
/// (e.g. `POOLKEEP__LEDGER__RPC_URL`).
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub ledger: LedgerSettings,
    #[serde(default)]
    pub resolver: ResolverSettings,
    #[serde(default)]
    pub pools: Vec<WatchedPool>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name("config"))
            .add_source(Environment::with_prefix("POOLKEEP").separator("__"))
            .build()?;

        let settings: Settings = s.try_deserialize()?;

        Ok(settings)
    }

    /// Configured log level, falling back to `Info` for unknown names.
    pub fn log_level(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    const YAML: &str = r#"
ledger:
  rpc_url: "http://localhost:8545"
  chain_id: 1
  state_view_address: "0x7ffe42c4a5deea5b0fec41c94c136cf115597227"
  wrapped_native_address: "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2"
resolver:
  refresh_interval_ms: 2000
pools:
  - name: "ETH/USDC 0.30%"
    currency_a:
      kind: native
    currency_b:
      kind: token
      address: "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"
    fee: 3000
    tick_spacing: 60
  - name: "ETH/DAI 0.30%"
    currency_a:
      kind: native
      wrapped: "0x6b175474e89094c44da98b954eedeac495271d0f"
    currency_b:
      kind: token
      address: "0x6b175474e89094c44da98b954eedeac495271d0f"
    fee: 3000
log_level: "debug"
"#;

    fn parse(yaml: &str) -> Settings {
        Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_parse_settings() {
        let settings = parse(YAML);

        assert_eq!(settings.ledger.chain_id, 1);
        assert_eq!(settings.ledger.call_timeout_ms, None);
        assert_eq!(settings.resolver.cache_capacity, DEFAULT_CACHE_CAPACITY);
        assert_eq!(settings.resolver.refresh_interval_ms, 2000);
        assert_eq!(settings.log_level(), LevelFilter::Debug);

        let pool = &settings.pools[0];
        assert_eq!(pool.name, "ETH/USDC 0.30%");
        assert_eq!(pool.request.fee, Some(3000));
        assert_eq!(pool.request.hooks, None);
        assert!(pool.request.currency_a.unwrap().is_native());
    }

    #[test]
    fn test_chain_request_uses_ledger_wrapper() {
        let settings = parse(YAML);
        let weth: Address = "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2".parse().unwrap();
        let dai: Address = "0x6b175474e89094c44da98b954eedeac495271d0f".parse().unwrap();

        let eth_usdc = settings.pools[0].chain_request(&settings.ledger);
        assert_eq!(eth_usdc.currency_a.map(|c| c.wrapped()), Some(weth));
        assert!(crate::pool::normalize(&eth_usdc).is_some());

        // A per-pool wrapper disagreeing with the chain's is replaced
        assert_eq!(settings.pools[1].request.currency_a.map(|c| c.wrapped()), Some(dai));
        let eth_dai = settings.pools[1].chain_request(&settings.ledger);
        assert_eq!(eth_dai.currency_a.map(|c| c.wrapped()), Some(weth));
        assert!(crate::pool::normalize(&eth_dai).is_some());
    }

    #[test]
    fn test_unknown_log_level_falls_back() {
        let mut settings = parse(YAML);
        settings.log_level = "chatty".to_string();
        assert_eq!(settings.log_level(), LevelFilter::Info);
    }
}
