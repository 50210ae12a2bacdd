//! Factory-wide pool browsing.

use crate::client::{CallValue, ChainClient};
use crate::contracts::{self, DexContracts};
use crate::error::ChainError;
use primitive_types::U256;
use std::sync::Arc;
use tracing::debug;
use woosh_domain::{Address, TokenAmount};

/// Pools rendered per directory page.
pub const POOLS_PAGE_SIZE: u64 = 5;

/// One row of the pools listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSummary {
    pub index: u64,
    pub pair: Address,
    pub token0: Address,
    pub token1: Address,
    pub symbol0: String,
    pub symbol1: String,
    pub reserve0: TokenAmount,
    pub reserve1: TokenAmount,
}

/// Enumerates every pair the factory has created, a page at a time.
pub struct PoolDirectory {
    client: Arc<dyn ChainClient>,
    contracts: DexContracts,
}

impl PoolDirectory {
    pub fn new(client: Arc<dyn ChainClient>, contracts: DexContracts) -> Self {
        Self { client, contracts }
    }

    /// Total number of pairs ever created.
    pub async fn pool_count(&self) -> Result<u64, ChainError> {
        let ret = self
            .client
            .read(&self.contracts.factory, contracts::FACTORY_ALL_PAIRS_LENGTH, &[])
            .await?;
        let count = ret
            .first()
            .ok_or_else(|| ChainError::Decode("empty return".to_string()))?
            .as_uint()?;
        u64::try_from(count).map_err(|_| ChainError::Decode(format!("pair count out of range: {count}")))
    }

    /// Number of pages for the current pool count.
    pub async fn page_count(&self) -> Result<u64, ChainError> {
        Ok(self.pool_count().await?.div_ceil(POOLS_PAGE_SIZE))
    }

    /// Fetches one page of pool rows, index-ordered.
    pub async fn page(&self, page: u64) -> Result<Vec<PoolSummary>, ChainError> {
        let total = self.pool_count().await?;
        let start = page * POOLS_PAGE_SIZE;
        let end = (start + POOLS_PAGE_SIZE).min(total);

        let mut rows = Vec::new();
        for index in start..end {
            rows.push(self.pool_at(index).await?);
        }
        debug!(page, rows = rows.len(), "fetched pool directory page");
        Ok(rows)
    }

    async fn pool_at(&self, index: u64) -> Result<PoolSummary, ChainError> {
        let pair = self
            .read_one(
                &self.contracts.factory,
                contracts::FACTORY_ALL_PAIRS,
                &[CallValue::Uint(U256::from(index))],
            )
            .await?
            .as_address()?;

        let token0 = self
            .read_one(&pair, contracts::PAIR_TOKEN0, &[])
            .await?
            .as_address()?;
        let token1 = self
            .read_one(&pair, contracts::PAIR_TOKEN1, &[])
            .await?
            .as_address()?;
        let symbol0 = self
            .read_one(&token0, contracts::ERC20_SYMBOL, &[])
            .await?
            .as_str()?
            .to_string();
        let symbol1 = self
            .read_one(&token1, contracts::ERC20_SYMBOL, &[])
            .await?
            .as_str()?
            .to_string();

        let reserves = self
            .client
            .read(&pair, contracts::PAIR_GET_RESERVES, &[])
            .await?;
        if reserves.len() < 2 {
            return Err(ChainError::Decode(format!(
                "getReserves returned {} values",
                reserves.len()
            )));
        }

        Ok(PoolSummary {
            index,
            pair,
            token0,
            token1,
            symbol0,
            symbol1,
            reserve0: TokenAmount(reserves[0].as_uint()?),
            reserve1: TokenAmount(reserves[1].as_uint()?),
        })
    }

    async fn read_one(
        &self,
        target: &Address,
        signature: &str,
        args: &[CallValue],
    ) -> Result<CallValue, ChainError> {
        let ret = self.client.read(target, signature, args).await?;
        ret.into_iter()
            .next()
            .ok_or_else(|| ChainError::Decode("empty return".to_string()))
    }
}
