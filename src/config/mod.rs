#[allow(clippy::module_inception)]
mod config;

pub use self::config::{LedgerSettings, ResolverSettings, Settings, WatchedPool};
