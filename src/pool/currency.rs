use std::fmt;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

/// One side of a V4 pool.
///
/// V4 pools trade the chain's native currency directly (zero address in the
/// pool key), while its ERC-20 wrapper is a different token. Both refer to the
/// same underlying asset, so a native currency carries its wrapped address to
/// let pairs detect that case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Currency {
    /// `wrapped` may be left out of configuration; the chain's wrapper is filled in.
    Native {
        #[serde(default)]
        wrapped: Address,
    },
    Token { address: Address },
}

impl Currency {
    pub fn native(wrapped: Address) -> Self {
        Self::Native { wrapped }
    }

    pub fn token(address: Address) -> Self {
        Self::Token { address }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native { .. })
    }

    /// Address used in the pool key (zero address for the native currency).
    pub fn key_address(&self) -> Address {
        match self {
            Self::Native { .. } => Address::ZERO,
            Self::Token { address } => *address,
        }
    }

    /// Canonical tradable token for this currency.
    pub fn wrapped(&self) -> Address {
        match self {
            Self::Native { wrapped } => *wrapped,
            Self::Token { address } => *address,
        }
    }

    /// Replace the wrapper of a native currency. Tokens are returned unchanged.
    pub fn with_wrapped_native(self, wrapped: Address) -> Self {
        match self {
            Self::Native { .. } => Self::Native { wrapped },
            token => token,
        }
    }

    /// Whether both currencies resolve to the same underlying token.
    pub fn same_underlying(&self, other: &Currency) -> bool {
        self.wrapped() == other.wrapped()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native { .. } => write!(f, "native"),
            Self::Token { address } => write!(f, "{address}"),
        }
    }
}
