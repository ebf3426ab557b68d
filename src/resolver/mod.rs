//! Pool resolution: request → normalized key → concurrent reads → cached pool.

mod availability;
#[allow(clippy::module_inception)]
mod resolver;

pub use availability::{resolve, CallState, PoolAvailability, PoolResolution};
pub use resolver::PoolResolver;
