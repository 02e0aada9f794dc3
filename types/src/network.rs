//! Chain identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;

/// Identifies which Nebulas chain transactions are signed for.
///
/// The chain ID is part of every transaction hash, so a transaction signed
/// for one chain is rejected by the others.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(pub u32);

impl ChainId {
    /// The production network.
    pub const MAINNET: Self = Self(1);
    /// The public test network.
    pub const TESTNET: Self = Self(1001);

    /// Default public RPC endpoint for the well-known chains.
    pub fn default_rpc_url(&self) -> Option<&'static str> {
        match *self {
            Self::MAINNET => Some("https://mainnet.nebulas.io"),
            Self::TESTNET => Some("https://testnet.nebulas.io"),
            _ => None,
        }
    }

    /// Block explorer where users can look up pending transactions.
    pub fn explorer_url(&self) -> &'static str {
        match *self {
            Self::TESTNET => "https://explorer.nebulas.io/#/testnet",
            _ => "https://explorer.nebulas.io/",
        }
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::MAINNET => write!(f, "mainnet"),
            Self::TESTNET => write!(f, "testnet"),
            Self(id) => write!(f, "chain-{id}"),
        }
    }
}

impl FromStr for ChainId {
    type Err = TypesError;

    /// Accepts `mainnet`, `testnet`, or a numeric chain ID.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mainnet" | "main" => Ok(Self::MAINNET),
            "testnet" | "test" => Ok(Self::TESTNET),
            other => other
                .parse::<u32>()
                .map(Self)
                .map_err(|_| TypesError::UnknownNetwork(s.to_string())),
        }
    }
}
