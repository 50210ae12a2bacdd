//! Programmable in-memory chain for tests and offline demos.

use crate::client::{CallValue, ChainClient, Receipt, TxHandle};
use crate::contracts::{self, DexContracts};
use crate::error::ChainError;
use async_trait::async_trait;
use primitive_types::U256;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use woosh_domain::Address;

type CallKey = (Address, String, Vec<CallValue>);

/// A write the mock accepted, for assertions on submitted intents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedWrite {
    pub target: Address,
    pub signature: String,
    pub args: Vec<CallValue>,
    pub tx: TxHandle,
}

/// In-memory [`ChainClient`]: reads answer from a programmed table,
/// writes are recorded and confirmed unless scripted to fail.
///
/// Unprogrammed reads return [`ChainError::Rpc`], which doubles as the
/// transient-failure fixture.
#[derive(Default)]
pub struct MockChain {
    reads: Mutex<HashMap<CallKey, Vec<CallValue>>>,
    writes: Mutex<Vec<RecordedWrite>>,
    next_write_failure: Mutex<Option<ChainError>>,
    next_receipt_revert: Mutex<Option<String>>,
    tx_counter: AtomicU64,
    block_counter: AtomicU64,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Programs the response for one exact (target, signature, args) read.
    pub fn set_read(
        &self,
        target: &Address,
        signature: &str,
        args: &[CallValue],
        ret: Vec<CallValue>,
    ) {
        self.reads
            .lock()
            .expect("mock lock")
            .insert((target.clone(), signature.to_string(), args.to_vec()), ret);
    }

    /// Convenience: wires up a live pair between two tokens, with
    /// `token_a` as canonical token0, in both factory lookup orders.
    #[allow(clippy::too_many_arguments)]
    pub fn seed_pair(
        &self,
        contracts: &DexContracts,
        token_a: &Address,
        token_b: &Address,
        pair: &Address,
        reserve0: U256,
        reserve1: U256,
        total_supply: U256,
    ) {
        for (x, y) in [(token_a, token_b), (token_b, token_a)] {
            self.set_read(
                &contracts.factory,
                contracts::FACTORY_GET_PAIR,
                &[x.clone().into(), y.clone().into()],
                vec![pair.clone().into()],
            );
        }
        self.set_read(
            pair,
            contracts::PAIR_GET_RESERVES,
            &[],
            vec![reserve0.into(), reserve1.into(), U256::zero().into()],
        );
        self.set_read(
            pair,
            contracts::PAIR_TOKEN0,
            &[],
            vec![token_a.clone().into()],
        );
        self.set_read(
            pair,
            contracts::PAIR_TOKEN1,
            &[],
            vec![token_b.clone().into()],
        );
        self.set_read(
            pair,
            contracts::PAIR_TOTAL_SUPPLY,
            &[],
            vec![total_supply.into()],
        );
    }

    /// Programs `allowance(owner, router)` on a token (or LP pair).
    pub fn set_allowance(
        &self,
        contracts: &DexContracts,
        token: &Address,
        owner: &Address,
        value: U256,
    ) {
        self.set_read(
            token,
            contracts::ERC20_ALLOWANCE,
            &[owner.clone().into(), contracts.router.clone().into()],
            vec![value.into()],
        );
    }

    /// Programs `balanceOf(owner)` on a token (or LP pair).
    pub fn set_balance(&self, token: &Address, owner: &Address, value: U256) {
        self.set_read(
            token,
            contracts::ERC20_BALANCE_OF,
            &[owner.clone().into()],
            vec![value.into()],
        );
    }

    /// The next `write` fails with the given error (e.g. wallet decline).
    pub fn fail_next_write(&self, error: ChainError) {
        *self.next_write_failure.lock().expect("mock lock") = Some(error);
    }

    /// The next receipt wait reports an on-chain revert.
    pub fn revert_next_receipt(&self, reason: impl Into<String>) {
        *self.next_receipt_revert.lock().expect("mock lock") = Some(reason.into());
    }

    pub fn writes(&self) -> Vec<RecordedWrite> {
        self.writes.lock().expect("mock lock").clone()
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn read(
        &self,
        target: &Address,
        signature: &str,
        args: &[CallValue],
    ) -> Result<Vec<CallValue>, ChainError> {
        self.reads
            .lock()
            .expect("mock lock")
            .get(&(target.clone(), signature.to_string(), args.to_vec()))
            .cloned()
            .ok_or_else(|| {
                ChainError::Rpc(format!("no response programmed for {signature} on {target}"))
            })
    }

    async fn write(
        &self,
        target: &Address,
        signature: &str,
        args: &[CallValue],
    ) -> Result<TxHandle, ChainError> {
        if let Some(error) = self.next_write_failure.lock().expect("mock lock").take() {
            return Err(error);
        }
        let n = self.tx_counter.fetch_add(1, Ordering::SeqCst);
        let tx = TxHandle(format!("0xmock{n:08x}"));
        self.writes.lock().expect("mock lock").push(RecordedWrite {
            target: target.clone(),
            signature: signature.to_string(),
            args: args.to_vec(),
            tx: tx.clone(),
        });
        Ok(tx)
    }

    async fn wait_for_receipt(&self, tx: &TxHandle) -> Result<Receipt, ChainError> {
        if let Some(reason) = self.next_receipt_revert.lock().expect("mock lock").take() {
            return Err(ChainError::Reverted(reason));
        }
        Ok(Receipt {
            tx_hash: tx.clone(),
            block_number: self.block_counter.fetch_add(1, Ordering::SeqCst),
        })
    }
}
