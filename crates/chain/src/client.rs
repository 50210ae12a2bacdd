//! The abstract read/write seam to the wallet and RPC node.

use crate::error::ChainError;
use async_trait::async_trait;
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use woosh_domain::Address;

/// A dynamically typed contract-call argument or return value.
///
/// The concrete ABI encoding is owned by the collaborator behind
/// [`ChainClient`]; this enum only carries the values alongside the exact
/// function signature string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallValue {
    Address(Address),
    Uint(U256),
    Bool(bool),
    Str(String),
    /// `address[]` parameter, e.g. a swap path.
    AddressArray(Vec<Address>),
}

impl CallValue {
    pub fn as_uint(&self) -> Result<U256, ChainError> {
        match self {
            Self::Uint(v) => Ok(*v),
            other => Err(ChainError::Decode(format!("expected uint, got {other:?}"))),
        }
    }

    pub fn as_address(&self) -> Result<Address, ChainError> {
        match self {
            Self::Address(a) => Ok(a.clone()),
            other => Err(ChainError::Decode(format!("expected address, got {other:?}"))),
        }
    }

    pub fn as_str(&self) -> Result<&str, ChainError> {
        match self {
            Self::Str(s) => Ok(s),
            other => Err(ChainError::Decode(format!("expected string, got {other:?}"))),
        }
    }
}

impl From<U256> for CallValue {
    fn from(v: U256) -> Self {
        Self::Uint(v)
    }
}

impl From<Address> for CallValue {
    fn from(a: Address) -> Self {
        Self::Address(a)
    }
}

/// Handle for a broadcast transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxHandle(pub String);

/// A confirmed receipt. Reverts surface as [`ChainError::Reverted`]
/// instead of a receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub tx_hash: TxHandle,
    pub block_number: u64,
}

/// Asynchronous access to the chain, as provided by the surrounding
/// wallet layer.
///
/// Reads look synchronous to callers but suspend on the network; the
/// engine never blocks on them outside an `.await`.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Calls a view function. `signature` is the exact Solidity function
    /// signature, e.g. `getReserves()`.
    async fn read(
        &self,
        target: &Address,
        signature: &str,
        args: &[CallValue],
    ) -> Result<Vec<CallValue>, ChainError>;

    /// Signs and broadcasts a state-changing call through the wallet.
    async fn write(
        &self,
        target: &Address,
        signature: &str,
        args: &[CallValue],
    ) -> Result<TxHandle, ChainError>;

    /// Waits until the transaction is mined.
    async fn wait_for_receipt(&self, tx: &TxHandle) -> Result<Receipt, ChainError>;
}
