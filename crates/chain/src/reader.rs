//! Pair resolution and reserve reads.

use crate::client::{CallValue, ChainClient};
use crate::contracts::{self, DexContracts};
use crate::error::ChainError;
use primitive_types::U256;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;
use woosh_domain::pool::ReserveSnapshot;
use woosh_domain::{Address, TokenAmount};

/// Reads pair state through the factory and pair contracts.
///
/// One-shot reads only; periodic refresh is the poller's job. Both token
/// arguments must be ERC-20 contracts: the native currency has no pair
/// leg of its own, and sessions filter it out before reaching here.
pub struct PairReader {
    client: Arc<dyn ChainClient>,
    contracts: DexContracts,
}

impl PairReader {
    pub fn new(client: Arc<dyn ChainClient>, contracts: DexContracts) -> Self {
        Self { client, contracts }
    }

    pub fn contracts(&self) -> &DexContracts {
        &self.contracts
    }

    /// Resolves the canonical pair for two tokens. `Ok(None)` means the
    /// factory returned the zero address: the pair has not been created,
    /// a normal state for a would-be first liquidity provider.
    pub async fn pair_address(
        &self,
        token_a: &Address,
        token_b: &Address,
    ) -> Result<Option<Address>, ChainError> {
        let ret = self
            .client
            .read(
                &self.contracts.factory,
                contracts::FACTORY_GET_PAIR,
                &[token_a.clone().into(), token_b.clone().into()],
            )
            .await?;
        let pair = first(&ret)?.as_address()?;
        Ok(if pair.is_zero() { None } else { Some(pair) })
    }

    /// Full pair state: reserves, canonical token0 and LP total supply.
    pub async fn pair_state(
        &self,
        token_a: &Address,
        token_b: &Address,
    ) -> Result<Option<ReserveSnapshot>, ChainError> {
        let Some(pair) = self.pair_address(token_a, token_b).await? else {
            debug!(token_a = %token_a, token_b = %token_b, "pair does not exist yet");
            return Ok(None);
        };

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
        let reserve0 = reserves[0].as_uint()?;
        let reserve1 = reserves[1].as_uint()?;

        let token0 = first(&self.client.read(&pair, contracts::PAIR_TOKEN0, &[]).await?)?
            .as_address()?;
        let total_supply = first(
            &self
                .client
                .read(&pair, contracts::PAIR_TOTAL_SUPPLY, &[])
                .await?,
        )?
        .as_uint()?;

        debug!(pair = %pair, %reserve0, %reserve1, "fetched pair state");

        Ok(Some(ReserveSnapshot {
            pair,
            token0,
            reserve0: TokenAmount(reserve0),
            reserve1: TokenAmount(reserve1),
            total_supply: TokenAmount(total_supply),
            fetched_at: unix_now(),
        }))
    }

    /// Current allowance granted by `owner` to the router on `token`.
    /// Also used for LP tokens, where `token` is the pair address.
    pub async fn allowance(&self, token: &Address, owner: &Address) -> Result<U256, ChainError> {
        let ret = self
            .client
            .read(
                token,
                contracts::ERC20_ALLOWANCE,
                &[owner.clone().into(), self.contracts.router.clone().into()],
            )
            .await?;
        first(&ret)?.as_uint()
    }

    /// ERC-20 (or LP token) balance of `owner`.
    pub async fn balance_of(&self, token: &Address, owner: &Address) -> Result<U256, ChainError> {
        let ret = self
            .client
            .read(token, contracts::ERC20_BALANCE_OF, &[owner.clone().into()])
            .await?;
        first(&ret)?.as_uint()
    }

    /// Symbol and decimals for an arbitrary (possibly unlisted) token.
    pub async fn token_metadata(&self, token: &Address) -> Result<(String, u8), ChainError> {
        let symbol = first(&self.client.read(token, contracts::ERC20_SYMBOL, &[]).await?)?
            .as_str()?
            .to_string();
        let decimals = first(
            &self
                .client
                .read(token, contracts::ERC20_DECIMALS, &[])
                .await?,
        )?
        .as_uint()?;
        let decimals = u8::try_from(decimals)
            .map_err(|_| ChainError::Decode(format!("decimals out of range: {decimals}")))?;
        Ok((symbol, decimals))
    }
}

fn first(values: &[CallValue]) -> Result<&CallValue, ChainError> {
    values
        .first()
        .ok_or_else(|| ChainError::Decode("empty return".to_string()))
}

pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockChain;

    fn addr(s: &str) -> Address {
        s.parse().unwrap()
    }

    fn setup() -> (Arc<MockChain>, PairReader) {
        let chain = Arc::new(MockChain::new());
        let reader = PairReader::new(chain.clone(), DexContracts::arc_testnet());
        (chain, reader)
    }

    #[tokio::test]
    async fn missing_pair_is_none_not_error() {
        let (chain, reader) = setup();
        let a = addr("0x3600000000000000000000000000000000000000");
        let b = addr("0x89B50855Aa3bE2F677cD6303Cec089B5F319D72a");
        chain.set_read(
            &reader.contracts().factory,
            contracts::FACTORY_GET_PAIR,
            &[a.clone().into(), b.clone().into()],
            vec![Address::zero().into()],
        );

        assert_eq!(reader.pair_state(&a, &b).await.unwrap(), None);
    }

    #[tokio::test]
    async fn reads_full_pair_state() {
        let (chain, reader) = setup();
        let a = addr("0x3600000000000000000000000000000000000000");
        let b = addr("0x89B50855Aa3bE2F677cD6303Cec089B5F319D72a");
        let pair = addr("0x33d3c9DC1D84613FCc9356353435c35C3c08ea63");
        chain.seed_pair(
            reader.contracts(),
            &a,
            &b,
            &pair,
            U256::from(100u64),
            U256::from(400u64),
            U256::from(200u64),
        );

        let snap = reader.pair_state(&a, &b).await.unwrap().unwrap();
        assert_eq!(snap.pair, pair);
        assert_eq!(snap.token0, a);
        assert_eq!(snap.reserve0, TokenAmount::from(100u64));
        assert_eq!(snap.reserve1, TokenAmount::from(400u64));
        assert_eq!(snap.total_supply, TokenAmount::from(200u64));
    }

    #[tokio::test]
    async fn reads_metadata_for_an_unlisted_token() {
        let (chain, reader) = setup();
        let token = addr("0x9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0");
        chain.set_read(
            &token,
            contracts::ERC20_SYMBOL,
            &[],
            vec![CallValue::Str("WETH".into())],
        );
        chain.set_read(&token, contracts::ERC20_DECIMALS, &[], vec![U256::from(18u64).into()]);

        assert_eq!(
            reader.token_metadata(&token).await.unwrap(),
            ("WETH".to_string(), 18)
        );
    }

    #[tokio::test]
    async fn out_of_range_decimals_is_a_decode_error() {
        let (chain, reader) = setup();
        let token = addr("0x9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0");
        chain.set_read(
            &token,
            contracts::ERC20_SYMBOL,
            &[],
            vec![CallValue::Str("BAD".into())],
        );
        chain.set_read(&token, contracts::ERC20_DECIMALS, &[], vec![U256::from(300u64).into()]);

        assert!(matches!(
            reader.token_metadata(&token).await,
            Err(ChainError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn unprogrammed_read_is_rpc_error() {
        let (_, reader) = setup();
        let a = addr("0x3600000000000000000000000000000000000000");
        let b = addr("0x89B50855Aa3bE2F677cD6303Cec089B5F319D72a");
        assert!(matches!(
            reader.pair_state(&a, &b).await,
            Err(ChainError::Rpc(_))
        ));
    }
}
